//! Option value types sent to the conversion service.
//!
//! # Design
//! Composite options are plain serde types; their JSON encoding is exactly
//! what the service expects in the corresponding form field. Scalar options
//! that accept more than one shape get a small closed enum with a single
//! canonical stringification instead of overloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::builder::FormValue;

/// A cookie stored in Chromium's cookie jar before loading the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ChromiumCookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_only: Option<bool>,
    /// One of `"Strict"`, `"Lax"`, or `"None"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub same_site: Option<String>,
}

impl ChromiumCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: None,
            secure: None,
            http_only: None,
            same_site: None,
        }
    }
}

/// A remote document the service downloads itself instead of receiving it
/// as an upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFrom {
    pub url: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub extra_http_headers: BTreeMap<String, String>,
}

impl DownloadFrom {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra_http_headers: BTreeMap::new(),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_http_headers.insert(name.into(), value.into());
        self
    }
}

/// How the PDF engines split a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitMode {
    mode: &'static str,
    span: String,
    unify: bool,
}

impl SplitMode {
    /// One output per `span` pages.
    pub fn intervals(span: u32) -> Self {
        Self {
            mode: "intervals",
            span: span.to_string(),
            unify: false,
        }
    }

    /// The given page ranges (e.g. `"1-2,5"`), optionally unified in one PDF.
    pub fn pages(span: impl Into<String>, unify: bool) -> Self {
        Self {
            mode: "pages",
            span: span.into(),
            unify,
        }
    }

    pub fn mode(&self) -> &str {
        self.mode
    }

    pub fn span(&self) -> &str {
        &self.span
    }

    pub fn unify(&self) -> bool {
        self.unify
    }
}

/// A page dimension: a bare number (inches) or a string with its own unit
/// suffix such as `"210mm"`.
#[derive(Debug, Clone, PartialEq)]
pub enum Dimension {
    Number(f64),
    Unit(String),
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Number(n) => write!(f, "{n}"),
            Dimension::Unit(s) => f.write_str(s),
        }
    }
}

impl FormValue for Dimension {
    fn to_form_value(&self) -> String {
        self.to_string()
    }
}

impl From<f64> for Dimension {
    fn from(n: f64) -> Self {
        Dimension::Number(n)
    }
}

impl From<u32> for Dimension {
    fn from(n: u32) -> Self {
        Dimension::Number(f64::from(n))
    }
}

impl From<&str> for Dimension {
    fn from(s: &str) -> Self {
        Dimension::Unit(s.to_string())
    }
}

impl From<String> for Dimension {
    fn from(s: String) -> Self {
        Dimension::Unit(s)
    }
}

/// HTTP verb the service uses to call a webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebhookMethod {
    #[default]
    Post,
    Patch,
    Put,
}

impl WebhookMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookMethod::Post => "POST",
            WebhookMethod::Patch => "PATCH",
            WebhookMethod::Put => "PUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_skips_unset_fields() {
        let cookie = ChromiumCookie::new("session", "abc", "example.com");
        let json = serde_json::to_string(&cookie).unwrap();
        assert_eq!(json, r#"{"name":"session","value":"abc","domain":"example.com"}"#);
    }

    #[test]
    fn cookie_uses_camel_case() {
        let cookie = ChromiumCookie {
            http_only: Some(true),
            same_site: Some("Lax".to_string()),
            ..ChromiumCookie::new("a", "b", "c")
        };
        let json = serde_json::to_value(&cookie).unwrap();
        assert_eq!(json["httpOnly"], true);
        assert_eq!(json["sameSite"], "Lax");
    }

    #[test]
    fn download_from_omits_empty_headers() {
        let plain = DownloadFrom::new("https://my.url/a.pdf");
        assert_eq!(serde_json::to_string(&plain).unwrap(), r#"{"url":"https://my.url/a.pdf"}"#);

        let with = DownloadFrom::new("https://my.url/b.pdf").with_header("X-Header", "value");
        assert_eq!(
            serde_json::to_string(&with).unwrap(),
            r#"{"url":"https://my.url/b.pdf","extraHttpHeaders":{"X-Header":"value"}}"#
        );
    }

    #[test]
    fn split_mode_constructors() {
        let intervals = SplitMode::intervals(1);
        assert_eq!((intervals.mode(), intervals.span(), intervals.unify()), ("intervals", "1", false));

        let pages = SplitMode::pages("1-2", true);
        assert_eq!((pages.mode(), pages.span(), pages.unify()), ("pages", "1-2", true));
    }

    #[test]
    fn dimension_display() {
        assert_eq!(Dimension::from(8.5).to_string(), "8.5");
        assert_eq!(Dimension::from(11u32).to_string(), "11");
        assert_eq!(Dimension::from("210mm").to_string(), "210mm");
    }
}
