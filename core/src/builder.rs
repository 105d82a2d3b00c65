//! Accumulates the headers and form parts of one outbound request.
//!
//! # Design
//! A `RequestBuilder` belongs to exactly one endpoint module and therefore to
//! one request. `finalize` consumes it, so a builder can never produce a
//! second request; a retry starts from a fresh module.

use serde::Serialize;

use crate::error::{ConversionError, DEFAULT_TRACE_HEADER};
use crate::http::{HttpMethod, HttpRequest};
use crate::multipart::{FormPart, MultipartBody};
use crate::stream::Stream;

/// Canonical textual form of a scalar form value.
///
/// Booleans become `"1"` / `"0"`; numbers use Rust's locale-independent
/// decimal formatting (`8.5`, `1`, `-3`).
pub trait FormValue {
    fn to_form_value(&self) -> String;
}

impl FormValue for bool {
    fn to_form_value(&self) -> String {
        if *self { "1" } else { "0" }.to_string()
    }
}

impl FormValue for str {
    fn to_form_value(&self) -> String {
        self.to_string()
    }
}

impl FormValue for String {
    fn to_form_value(&self) -> String {
        self.clone()
    }
}

impl<T: FormValue + ?Sized> FormValue for &T {
    fn to_form_value(&self) -> String {
        (**self).to_form_value()
    }
}

macro_rules! display_form_value {
    ($($t:ty),*) => {
        $(impl FormValue for $t {
            fn to_form_value(&self) -> String {
                self.to_string()
            }
        })*
    };
}

display_form_value!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize, f32, f64);

/// Serializes `value` to compact JSON, the wire form of composite options.
pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String, ConversionError> {
    serde_json::to_string(value).map_err(|e| ConversionError::EncodingFailed(e.to_string()))
}

/// Staged state of one request: base URL, header overrides, and form parts.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    trace_header: String,
    headers: Vec<(String, String)>,
    parts: Vec<FormPart>,
}

impl RequestBuilder {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            trace_header: DEFAULT_TRACE_HEADER.to_string(),
            headers: Vec::new(),
            parts: Vec::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Header name used by `ApiModule::trace` for this request.
    pub fn with_trace_header(mut self, name: impl Into<String>) -> Self {
        self.trace_header = name.into();
        self
    }

    pub fn trace_header(&self) -> &str {
        &self.trace_header
    }

    /// Adds or replaces a header. Names compare case-insensitively and the
    /// last value written wins.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        upsert(&mut self.headers, name.into(), value.into());
        self
    }

    /// Appends a text field.
    pub fn add_form_value(&mut self, name: impl Into<String>, value: impl FormValue) -> &mut Self {
        self.parts.push(FormPart::Value {
            name: name.into(),
            value: value.to_form_value(),
        });
        self
    }

    /// Appends a text field holding the JSON encoding of `value`.
    pub fn add_form_json<T: Serialize + ?Sized>(
        &mut self,
        name: impl Into<String>,
        value: &T,
    ) -> Result<&mut Self, ConversionError> {
        let json = encode_json(value)?;
        Ok(self.add_form_value(name, json))
    }

    /// Appends a file under the `files` field. Duplicate filenames are kept.
    pub fn add_form_file(&mut self, filename: impl Into<String>, content: Stream) -> &mut Self {
        self.parts.push(FormPart::File {
            filename: filename.into(),
            content,
        });
        self
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Builds the request for `base_url + endpoint` without sending it.
    ///
    /// With staged parts the body is `multipart/form-data` and the matching
    /// `Content-Type` is set first; staged headers are applied afterwards and
    /// so take precedence. Without parts the request has no body.
    pub fn finalize(self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut headers = Vec::with_capacity(self.headers.len() + 1);
        let body = if self.parts.is_empty() {
            None
        } else {
            let body = MultipartBody::new(self.parts);
            headers.push(("Content-Type".to_string(), body.content_type()));
            Some(body)
        };
        for (name, value) in self.headers {
            upsert(&mut headers, name, value);
        }

        tracing::debug!(
            method = method.as_str(),
            %url,
            parts = body.as_ref().map_or(0, |b| b.parts().len()),
            "finalized conversion request"
        );

        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}

fn upsert(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        Some(slot) => *slot = (name, value),
        None => headers.push((name, value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn scalar_values_are_canonical() {
        assert_eq!(true.to_form_value(), "1");
        assert_eq!(false.to_form_value(), "0");
        assert_eq!(8.5f64.to_form_value(), "8.5");
        assert_eq!(1.0f64.to_form_value(), "1");
        assert_eq!(100u32.to_form_value(), "100");
        assert_eq!((-2i64).to_form_value(), "-2");
        assert_eq!("print".to_form_value(), "print");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = RequestBuilder::new("http://localhost:3000/").finalize(HttpMethod::Get, "/health");
        assert_eq!(req.url, "http://localhost:3000/health");
    }

    #[test]
    fn trace_header_defaults_and_overrides() {
        let builder = RequestBuilder::new("");
        assert_eq!(builder.trace_header(), "Gotenberg-Trace");
        let builder = builder.with_trace_header("X-Request-Id");
        assert_eq!(builder.trace_header(), "X-Request-Id");
    }

    #[test]
    fn no_parts_means_no_body() {
        let mut builder = RequestBuilder::new("https://my.url");
        builder.set_header("Gotenberg-Trace", "debug");
        let req = builder.finalize(HttpMethod::Get, "/health");
        assert!(req.body.is_none());
        assert!(req.header("Content-Type").is_none());
        assert_eq!(req.header("Gotenberg-Trace"), Some("debug"));
    }

    #[test]
    fn parts_set_multipart_content_type() {
        let mut builder = RequestBuilder::new("https://my.url");
        builder.add_form_value("landscape", true);
        let req = builder.finalize(HttpMethod::Post, "/forms/chromium/convert/url");

        let body = req.body.as_ref().unwrap();
        let content_type = req.header("Content-Type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(content_type.contains(body.boundary()));
    }

    #[test]
    fn set_header_last_write_wins() {
        let mut builder = RequestBuilder::new("");
        builder
            .set_header("Gotenberg-Trace", "first")
            .set_header("gotenberg-trace", "second")
            .set_header("X-Other", "x");
        assert_eq!(builder.headers().len(), 2);

        let req = builder.finalize(HttpMethod::Get, "/");
        assert_eq!(req.header("Gotenberg-Trace"), Some("second"));
    }

    #[test]
    fn caller_content_type_overrides_multipart() {
        let mut builder = RequestBuilder::new("");
        builder.add_form_value("a", "b").set_header("Content-Type", "text/plain");
        let req = builder.finalize(HttpMethod::Post, "/");
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.headers.iter().filter(|(k, _)| k.eq_ignore_ascii_case("content-type")).count(), 1);
    }

    #[test]
    fn parts_keep_call_order() {
        let mut builder = RequestBuilder::new("");
        builder
            .add_form_value("b", 1u8)
            .add_form_file("x.pdf", Stream::string("x.pdf", ""))
            .add_form_value("a", 2u8)
            .add_form_value("b", 3u8);
        let names: Vec<&str> = builder.parts().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["b", "files", "a", "b"]);
    }

    #[test]
    fn json_values_are_compact() {
        let mut headers = HashMap::new();
        headers.insert("X-Header", "value");
        let mut builder = RequestBuilder::new("");
        builder.add_form_json("extraHttpHeaders", &headers).unwrap();
        let req = builder.finalize(HttpMethod::Post, "/");
        let body = req.body.unwrap();
        assert_eq!(body.values("extraHttpHeaders").collect::<Vec<_>>(), vec![r#"{"X-Header":"value"}"#]);
    }

    #[test]
    fn unencodable_json_is_rejected() {
        let mut bad = HashMap::new();
        bad.insert(vec![1u8], "value");
        let mut builder = RequestBuilder::new("");
        let err = builder.add_form_json("metadata", &bad).unwrap_err();
        assert!(matches!(err, ConversionError::EncodingFailed(_)));
        assert!(builder.parts().is_empty());
    }
}
