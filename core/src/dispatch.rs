//! Sends built requests and interprets the responses.
//!
//! # Design
//! The HTTP client is always an explicit argument; this module never picks
//! one on its own. A status outside `200..=299` becomes a `ServiceError`
//! carrying the response headers, so the trace id survives the failure.
//! Nothing is retried here: a retry means building a fresh request.

use std::fs::File;
use std::io::Write;
use std::path::{Component, Path};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ConversionError, ServiceError};
use crate::http::{HttpClient, HttpRequest, HttpResponse};

static QUOTED_FILENAME: Lazy<Regex> = Lazy::new(|| Regex::new(r#"filename="(.+?)""#).expect("valid regex"));
static BARE_FILENAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"filename=([^; ]+)").expect("valid regex"));

/// Sends `request` through `client` and fails on any non-2xx status.
pub fn send<C: HttpClient + ?Sized>(request: HttpRequest, client: &C) -> Result<HttpResponse, ConversionError> {
    let method = request.method;
    let url = request.url.clone();

    let response = client.execute(request).map_err(ConversionError::Transport)?;

    if !response.is_success() {
        let error = ServiceError::from_response(response);
        tracing::warn!(
            method = method.as_str(),
            %url,
            status = error.status(),
            trace = error.trace(),
            "conversion service returned an error"
        );
        return Err(error.into());
    }

    tracing::debug!(method = method.as_str(), %url, status = response.status, "conversion succeeded");
    Ok(response)
}

/// Sends `request` and writes the returned file into `dir`.
///
/// The filename comes from the response's `Content-Disposition` header; an
/// existing file of that name is overwritten. Returns the filename.
///
/// The name must be a single plain path component. Absolute names, `..` and
/// names containing a separator are refused with `NoOutputFile`, so the file
/// always lands directly inside `dir`.
pub fn save<C: HttpClient + ?Sized>(
    request: HttpRequest,
    dir: impl AsRef<Path>,
    client: &C,
) -> Result<String, ConversionError> {
    let response = send(request, client)?;

    let filename = output_filename(&response).ok_or(ConversionError::NoOutputFile)?;
    if !is_plain_filename(&filename) {
        tracing::warn!(%filename, "refusing output filename that is not a plain file name");
        return Err(ConversionError::NoOutputFile);
    }
    let path = dir.as_ref().join(&filename);

    let io_err = |source: std::io::Error| ConversionError::Io {
        path: path.clone(),
        source,
    };
    let mut file = File::create(&path).map_err(io_err)?;
    file.write_all(&response.body).map_err(io_err)?;
    file.sync_all().map_err(io_err)?;

    tracing::debug!(path = %path.display(), bytes = response.body.len(), "saved conversion output");
    Ok(filename)
}

/// Filename advertised by the response's `Content-Disposition` headers.
pub fn output_filename(response: &HttpResponse) -> Option<String> {
    response
        .header_values("Content-Disposition")
        .find_map(filename_from_disposition)
}

fn is_plain_filename(filename: &str) -> bool {
    let mut components = Path::new(filename).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(name)), None) if name == filename
    )
}

/// Extracts the filename of one `Content-Disposition` value, trying the
/// quoted form before the bare one.
pub fn filename_from_disposition(value: &str) -> Option<String> {
    QUOTED_FILENAME
        .captures(value)
        .or_else(|| BARE_FILENAME.captures(value))
        .map(|caps| caps[1].to_string())
}
