use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path},
    http::{header, HeaderMap, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;
use uuid::Uuid;

pub const TRACE_HEADER: &str = "gotenberg-trace";
pub const OUTPUT_FILENAME_HEADER: &str = "gotenberg-output-filename";
pub const VERSION: &str = "8.0.0-mock";
/// Largest accepted form body.
pub const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// One uploaded file as the server saw it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReceivedFile {
    pub field: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub size: usize,
}

/// Body of every successful conversion: what the server received, in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub endpoint: String,
    pub trace: String,
    pub fields: Vec<(String, String)>,
    pub files: Vec<ReceivedFile>,
}

impl Manifest {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v.as_str())
    }

    pub fn filenames(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.filename.as_str()).collect()
    }

    fn flag(&self, name: &str) -> bool {
        matches!(self.field(name), Some("1" | "true"))
    }

    fn has_remote_source(&self) -> bool {
        self.field("downloadFrom").is_some_and(|v| v != "[]")
    }
}

enum Output {
    File(&'static str),
    Metadata,
}

pub fn app() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .route("/forms/chromium/convert/{kind}", post(chromium_convert))
        .route("/forms/chromium/screenshot/{kind}", post(chromium_screenshot))
        .route("/forms/libreoffice/convert", post(libreoffice_convert))
        .route("/forms/pdfengines/metadata/{op}", post(pdfengines_metadata))
        .route("/forms/pdfengines/{op}", post(pdfengines))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn trace_id(headers: &HeaderMap) -> String {
    headers
        .get(TRACE_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn reject(trace: String, status: StatusCode, message: impl Into<String>) -> Response {
    let message = message.into();
    tracing::warn!(%trace, status = status.as_u16(), %message, "rejected request");
    (status, [(HeaderName::from_static(TRACE_HEADER), trace)], message).into_response()
}

async fn read_form(mut multipart: Multipart) -> Result<(Vec<(String, String)>, Vec<ReceivedFile>), MultipartError> {
    let mut fields = Vec::new();
    let mut files = Vec::new();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match field.file_name().map(str::to_string) {
            Some(filename) => {
                let content_type = field.content_type().map(str::to_string);
                let size = field.bytes().await?.len();
                files.push(ReceivedFile {
                    field: name,
                    filename,
                    content_type,
                    size,
                });
            }
            None => fields.push((name, field.text().await?)),
        }
    }
    Ok((fields, files))
}

/// Parses the form, applies `rule` and answers the way the real service does:
/// an attachment named after the output-filename header, or a fresh uuid.
async fn convert(
    endpoint: String,
    headers: HeaderMap,
    multipart: Multipart,
    rule: impl FnOnce(&Manifest) -> Result<Output, String>,
) -> Response {
    let trace = trace_id(&headers);
    let (fields, files) = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => return reject(trace, err.status(), err.body_text()),
    };
    let manifest = Manifest {
        endpoint,
        trace,
        fields,
        files,
    };
    tracing::info!(
        endpoint = %manifest.endpoint,
        trace = %manifest.trace,
        fields = manifest.fields.len(),
        files = manifest.files.len(),
        "received conversion"
    );

    let extension = match rule(&manifest) {
        Ok(Output::File(extension)) => extension,
        Ok(Output::Metadata) => {
            let metadata: serde_json::Map<String, serde_json::Value> =
                manifest.files.iter().map(|f| (f.filename.clone(), json!({}))).collect();
            let trace_header = [(HeaderName::from_static(TRACE_HEADER), manifest.trace)];
            return (StatusCode::OK, trace_header, Json(metadata)).into_response();
        }
        Err(message) => return reject(manifest.trace, StatusCode::BAD_REQUEST, message),
    };

    let stem = headers
        .get(OUTPUT_FILENAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let disposition = format!("attachment; filename={stem}{extension}");
    let body = match serde_json::to_vec(&manifest) {
        Ok(body) => body,
        Err(err) => return reject(manifest.trace, StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    };
    (
        StatusCode::OK,
        [
            (header::CONTENT_DISPOSITION, disposition),
            (HeaderName::from_static(TRACE_HEADER), manifest.trace),
        ],
        body,
    )
        .into_response()
}

fn require_files(manifest: &Manifest) -> Result<(), String> {
    if manifest.files.is_empty() && !manifest.has_remote_source() {
        return Err("no form file found for extensions".to_string());
    }
    Ok(())
}

fn single_or_zip(manifest: &Manifest) -> Output {
    if manifest.files.len() > 1 {
        Output::File(".zip")
    } else {
        Output::File(".pdf")
    }
}

fn chromium_source(kind: &str, manifest: &Manifest) -> Result<(), String> {
    let has_index = manifest.filenames().contains(&"index.html");
    match kind {
        "url" if manifest.field("url").is_some_and(|u| !u.is_empty()) => Ok(()),
        "url" => Err("form field 'url' is required".to_string()),
        "html" if has_index => Ok(()),
        "markdown" if has_index && manifest.filenames().iter().any(|f| f.ends_with(".md")) => Ok(()),
        "html" | "markdown" => Err("form file 'index.html' is required".to_string()),
        other => Err(format!("unknown source '{other}'")),
    }
}

async fn chromium_convert(Path(kind): Path<String>, headers: HeaderMap, multipart: Multipart) -> Response {
    let endpoint = format!("chromium/convert/{kind}");
    convert(endpoint, headers, multipart, |m| {
        chromium_source(&kind, m)?;
        Ok(Output::File(".pdf"))
    })
    .await
}

async fn chromium_screenshot(Path(kind): Path<String>, headers: HeaderMap, multipart: Multipart) -> Response {
    let endpoint = format!("chromium/screenshot/{kind}");
    convert(endpoint, headers, multipart, |m| {
        chromium_source(&kind, m)?;
        match m.field("format").unwrap_or("png") {
            "png" => Ok(Output::File(".png")),
            "jpeg" => Ok(Output::File(".jpeg")),
            "webp" => Ok(Output::File(".webp")),
            other => Err(format!("unsupported format '{other}'")),
        }
    })
    .await
}

async fn libreoffice_convert(headers: HeaderMap, multipart: Multipart) -> Response {
    convert("libreoffice/convert".to_string(), headers, multipart, |m| {
        require_files(m)?;
        if m.flag("merge") {
            Ok(Output::File(".pdf"))
        } else {
            Ok(single_or_zip(m))
        }
    })
    .await
}

async fn pdfengines(Path(op): Path<String>, headers: HeaderMap, multipart: Multipart) -> Response {
    let endpoint = format!("pdfengines/{op}");
    convert(endpoint, headers, multipart, |m| {
        require_files(m)?;
        match op.as_str() {
            "merge" => Ok(Output::File(".pdf")),
            "split" => match (m.field("splitMode"), m.field("splitSpan")) {
                (Some("intervals" | "pages"), Some(span)) if !span.is_empty() => Ok(Output::File(".zip")),
                _ => Err("form fields 'splitMode' and 'splitSpan' are required".to_string()),
            },
            "flatten" => Ok(single_or_zip(m)),
            "convert" if m.field("pdfa").is_some() || m.flag("pdfua") => Ok(single_or_zip(m)),
            "convert" => Err("at least one of 'pdfa' or 'pdfua' is required".to_string()),
            other => Err(format!("unknown operation '{other}'")),
        }
    })
    .await
}

async fn pdfengines_metadata(Path(op): Path<String>, headers: HeaderMap, multipart: Multipart) -> Response {
    let endpoint = format!("pdfengines/metadata/{op}");
    convert(endpoint, headers, multipart, |m| {
        require_files(m)?;
        match op.as_str() {
            "read" => Ok(Output::Metadata),
            "write" if m.field("metadata").is_some() => Ok(single_or_zip(m)),
            "write" => Err("form field 'metadata' is required".to_string()),
            other => Err(format!("unknown operation '{other}'")),
        }
    })
    .await
}

async fn health(headers: HeaderMap) -> impl IntoResponse {
    let trace = [(HeaderName::from_static(TRACE_HEADER), trace_id(&headers))];
    (
        trace,
        Json(json!({
            "status": "up",
            "details": {
                "chromium": { "status": "up" },
                "libreoffice": { "status": "up" }
            }
        })),
    )
}

async fn version(headers: HeaderMap) -> impl IntoResponse {
    let trace = [(HeaderName::from_static(TRACE_HEADER), trace_id(&headers))];
    (trace, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(fields: &[(&str, &str)], files: &[&str]) -> Manifest {
        Manifest {
            endpoint: "test".to_string(),
            trace: "t".to_string(),
            fields: fields.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            files: files
                .iter()
                .map(|f| ReceivedFile {
                    field: "files".to_string(),
                    filename: f.to_string(),
                    content_type: None,
                    size: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn flags_accept_numeric_and_literal_true() {
        let m = manifest(&[("merge", "1"), ("pdfua", "true"), ("landscape", "0")], &[]);
        assert!(m.flag("merge"));
        assert!(m.flag("pdfua"));
        assert!(!m.flag("landscape"));
        assert!(!m.flag("missing"));
    }

    #[test]
    fn download_from_counts_as_a_source() {
        assert!(require_files(&manifest(&[("downloadFrom", r#"[{"url":"u"}]"#)], &[])).is_ok());
        assert!(require_files(&manifest(&[("downloadFrom", "[]")], &[])).is_err());
        assert!(require_files(&manifest(&[], &[])).is_err());
    }

    #[test]
    fn chromium_sources_are_validated() {
        assert!(chromium_source("url", &manifest(&[("url", "https://x")], &[])).is_ok());
        assert!(chromium_source("url", &manifest(&[], &[])).is_err());
        assert!(chromium_source("html", &manifest(&[], &["index.html"])).is_ok());
        assert!(chromium_source("html", &manifest(&[], &["page.html"])).is_err());
        assert!(chromium_source("markdown", &manifest(&[], &["index.html", "a.md"])).is_ok());
        assert!(chromium_source("markdown", &manifest(&[], &["index.html"])).is_err());
        assert!(chromium_source("docx", &manifest(&[], &["index.html"])).is_err());
    }

    #[test]
    fn manifest_serializes_fields_as_pairs() {
        let m = manifest(&[("landscape", "1")], &["a.pdf"]);
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["fields"][0][0], "landscape");
        assert_eq!(json["fields"][0][1], "1");
        assert_eq!(json["files"][0]["filename"], "a.pdf");
        let back: Manifest = serde_json::from_value(json).unwrap();
        assert_eq!(back, m);
    }
}
