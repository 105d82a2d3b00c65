//! Entry point handing out endpoint modules for one conversion service.
//!
//! # Design
//! `Gotenberg` holds only the service's base URL and the trace header name.
//! It carries no mutable state: every factory method returns a fresh module
//! with its own `RequestBuilder`, so one instance can be shared freely and a
//! retry simply asks for a new module. The trace header name travels with
//! that builder, so `trace()` writes the header `trace_of` later reads.

use crate::builder::RequestBuilder;
use crate::config::ClientConfig;
use crate::error::{ServiceError, DEFAULT_TRACE_HEADER};
use crate::modules::{Chromium, ChromiumPdf, ChromiumScreenshot, HealthCheck, LibreOffice, PdfEngines};

#[derive(Debug, Clone)]
pub struct Gotenberg {
    base_url: String,
    trace_header: String,
}

impl Gotenberg {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            trace_header: DEFAULT_TRACE_HEADER.to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            trace_header: config.trace_header.clone(),
            ..Self::new(&config.base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn trace_header(&self) -> &str {
        &self.trace_header
    }

    /// Trace id of a failed request, read under this service's header name.
    pub fn trace_of<'e>(&self, error: &'e ServiceError) -> &'e str {
        error.trace_with(&self.trace_header)
    }

    fn request_builder(&self) -> RequestBuilder {
        RequestBuilder::new(&self.base_url).with_trace_header(self.trace_header.as_str())
    }

    pub fn chromium(&self) -> Chromium {
        Chromium::with_builder(self.request_builder())
    }

    /// Shorthand for `chromium().pdf()`.
    pub fn chromium_pdf(&self) -> ChromiumPdf {
        self.chromium().pdf()
    }

    /// Shorthand for `chromium().screenshot()`.
    pub fn chromium_screenshot(&self) -> ChromiumScreenshot {
        self.chromium().screenshot()
    }

    pub fn libre_office(&self) -> LibreOffice {
        LibreOffice::with_builder(self.request_builder())
    }

    pub fn pdf_engines(&self) -> PdfEngines {
        PdfEngines::with_builder(self.request_builder())
    }

    pub fn health_check(&self) -> HealthCheck {
        HealthCheck::with_builder(self.request_builder())
    }
}
