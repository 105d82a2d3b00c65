use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Manifest, TRACE_HEADER};
use tower::ServiceExt;

const BOUNDARY: &str = "mock-boundary";

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str)]) -> String {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    for (filename, content) in files {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{content}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    body
}

fn form_request(uri: &str, headers: &[(&str, &str)], fields: &[(&str, &str)], files: &[(&str, &str)]) -> Request<String> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"));
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(multipart_body(fields, files)).unwrap()
}

fn disposition(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(http::header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
}

fn trace(response: &axum::response::Response) -> &str {
    response.headers().get(TRACE_HEADER).unwrap().to_str().unwrap()
}

// --- health ---

#[tokio::test]
async fn health_reports_up() {
    let resp = app()
        .oneshot(Request::builder().uri("/health").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json: serde_json::Value = body_json(resp).await;
    assert_eq!(json["status"], "up");
}

#[tokio::test]
async fn version_echoes_trace() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/version")
                .header("Gotenberg-Trace", "v-trace")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(trace(&resp), "v-trace");
    assert_eq!(body_bytes(resp).await, mock_server::VERSION.as_bytes());
}

// --- chromium ---

#[tokio::test]
async fn chromium_url_returns_pdf_attachment() {
    let req = form_request(
        "/forms/chromium/convert/url",
        &[("Gotenberg-Trace", "abc"), ("Gotenberg-Output-Filename", "report")],
        &[("url", "https://example.com"), ("landscape", "1")],
        &[],
    );
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(disposition(&resp), "attachment; filename=report.pdf");
    assert_eq!(trace(&resp), "abc");
    let manifest: Manifest = body_json(resp).await;
    assert_eq!(manifest.endpoint, "chromium/convert/url");
    assert_eq!(manifest.field("landscape"), Some("1"));
    assert!(manifest.files.is_empty());
}

#[tokio::test]
async fn chromium_html_requires_index() {
    let req = form_request("/forms/chromium/convert/html", &[], &[], &[("page.html", "<p/>")]);
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    // a trace is generated when the caller sends none
    assert!(!trace(&resp).is_empty());
}

#[tokio::test]
async fn screenshot_extension_follows_format() {
    let req = form_request(
        "/forms/chromium/screenshot/html",
        &[("Gotenberg-Output-Filename", "shot")],
        &[("format", "jpeg")],
        &[("index.html", "<h1/>")],
    );
    let resp = app().oneshot(req).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(disposition(&resp), "attachment; filename=shot.jpeg");
}

#[tokio::test]
async fn generated_filename_without_output_header() {
    let req = form_request("/forms/chromium/convert/html", &[], &[], &[("index.html", "<h1/>")]);
    let resp = app().oneshot(req).await.unwrap();

    let value = disposition(&resp);
    assert!(value.starts_with("attachment; filename="));
    assert!(value.ends_with(".pdf"));
}

// --- libreoffice ---

#[tokio::test]
async fn libreoffice_zips_multiple_outputs_unless_merged() {
    let files = [("a.docx", "A"), ("b.docx", "B")];

    let resp = app()
        .oneshot(form_request("/forms/libreoffice/convert", &[("Gotenberg-Output-Filename", "out")], &[], &files))
        .await
        .unwrap();
    assert_eq!(disposition(&resp), "attachment; filename=out.zip");

    let resp = app()
        .oneshot(form_request(
            "/forms/libreoffice/convert",
            &[("Gotenberg-Output-Filename", "out")],
            &[("merge", "1")],
            &files,
        ))
        .await
        .unwrap();
    assert_eq!(disposition(&resp), "attachment; filename=out.pdf");
    let manifest: Manifest = body_json(resp).await;
    assert_eq!(manifest.filenames(), vec!["a.docx", "b.docx"]);
    assert_eq!(manifest.files[0].size, 1);
}

#[tokio::test]
async fn libreoffice_without_files_is_rejected() {
    let resp = app()
        .oneshot(form_request("/forms/libreoffice/convert", &[("Gotenberg-Trace", "t1")], &[], &[]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(trace(&resp), "t1");
}

// --- pdf engines ---

#[tokio::test]
async fn merge_preserves_upload_order() {
    let files = [("1_b.pdf", "%PDF"), ("2_a.pdf", "%PDF")];
    let resp = app()
        .oneshot(form_request("/forms/pdfengines/merge", &[], &[], &files))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let manifest: Manifest = body_json(resp).await;
    assert_eq!(manifest.filenames(), vec!["1_b.pdf", "2_a.pdf"]);
}

#[tokio::test]
async fn split_requires_mode_and_span() {
    let files = [("a.pdf", "%PDF")];
    let resp = app()
        .oneshot(form_request("/forms/pdfengines/split", &[], &[("splitMode", "pages")], &files))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = app()
        .oneshot(form_request(
            "/forms/pdfengines/split",
            &[],
            &[("splitMode", "intervals"), ("splitSpan", "2")],
            &files,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(disposition(&resp).ends_with(".zip"));
}

#[tokio::test]
async fn unknown_operation_is_rejected() {
    let resp = app()
        .oneshot(form_request("/forms/pdfengines/shred", &[], &[], &[("a.pdf", "%PDF")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn metadata_read_returns_json_without_attachment() {
    let resp = app()
        .oneshot(form_request("/forms/pdfengines/metadata/read", &[], &[], &[("a.pdf", "%PDF")]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(http::header::CONTENT_DISPOSITION).is_none());
    let json: serde_json::Value = body_json(resp).await;
    assert!(json.get("a.pdf").is_some());
}
