//! Error types for the conversion client.
//!
//! # Design
//! Every failure surfaces synchronously at the call that caused it; nothing
//! is retried internally. `ServiceError` is a standalone type because callers
//! routinely need more than a message from it: the status code to decide on a
//! retry, and the trace header to correlate with the service's logs.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::http::{find_header, BoxError, HttpResponse};

/// Header carrying the correlation id of a request.
pub const DEFAULT_TRACE_HEADER: &str = "Gotenberg-Trace";

/// Errors returned while building, sending, or saving a conversion request.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// An option value could not be serialized to its JSON wire form.
    #[error("failed to encode form value: {0}")]
    EncodingFailed(String),

    /// The service answered with a status outside 200..=299.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A successful response carried no usable `Content-Disposition` filename.
    #[error("no file in the conversion service response")]
    NoOutputFile,

    /// Opening, writing, or closing the output file failed.
    #[error("failed to write output file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP client failed before any response was received.
    #[error("transport failed: {0}")]
    Transport(#[source] BoxError),

    /// The environment held a malformed configuration value.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ConversionError {
    /// The service error, if this is one.
    pub fn as_service(&self) -> Option<&ServiceError> {
        match self {
            ConversionError::Service(e) => Some(e),
            _ => None,
        }
    }
}

/// A non-2xx response from the conversion service.
///
/// Keeps the status, the body text and every header so the trace id stays
/// readable after a failure.
#[derive(Debug, Clone)]
pub struct ServiceError {
    status: u16,
    body: String,
    headers: Vec<(String, String)>,
}

impl ServiceError {
    pub fn new(status: u16, body: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self {
            status,
            body: body.into(),
            headers,
        }
    }

    pub fn from_response(response: HttpResponse) -> Self {
        let body = response.text();
        Self::new(response.status, body, response.headers)
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Value of the header `name`, or `""` when the response lacked it.
    pub fn header_line(&self, name: &str) -> &str {
        find_header(&self.headers, name).unwrap_or("")
    }

    /// Trace id echoed back under the default `Gotenberg-Trace` header.
    pub fn trace(&self) -> &str {
        self.header_line(DEFAULT_TRACE_HEADER)
    }

    /// Trace id echoed back under a custom header name.
    pub fn trace_with(&self, header: &str) -> &str {
        self.header_line(header)
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conversion service returned HTTP {}: {}", self.status, self.body)
    }
}

impl std::error::Error for ServiceError {}
