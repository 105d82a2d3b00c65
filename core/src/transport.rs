//! Blocking `HttpClient` backed by ureq.
//!
//! This is the default transport for applications that do not bring their
//! own. Status codes are returned as data (`http_status_as_error(false)`) so
//! that classification stays in [`crate::dispatch`].
//!
//! Multipart bodies are streamed with chunked transfer encoding: each file
//! source is opened only when the upload reaches it and is never held in
//! memory as a whole. A source that cannot be opened aborts the upload and
//! surfaces as a transport error.

use std::fmt;
use std::io::Read;

use ureq::{Agent, SendBody};

use crate::config::ClientConfig;
use crate::http::{BoxError, HttpClient, HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartBody;

#[derive(Clone)]
pub struct UreqClient {
    agent: Agent,
}

impl fmt::Debug for UreqClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqClient").finish_non_exhaustive()
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::from_config(&ClientConfig::default())
    }
}

impl UreqClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the configured timeout to the whole request.
    pub fn from_config(config: &ClientConfig) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(config.timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &[(String, String)]) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

impl HttpClient for UreqClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;
        let result = match method {
            HttpMethod::Get => with_headers(self.agent.get(&url), &headers).call(),
            HttpMethod::Delete => with_headers(self.agent.delete(&url), &headers).call(),
            HttpMethod::Post => send(with_headers(self.agent.post(&url), &headers), body),
            HttpMethod::Put => send(with_headers(self.agent.put(&url), &headers), body),
            HttpMethod::Patch => send(with_headers(self.agent.patch(&url), &headers), body),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let mut body = Vec::new();
        response.body_mut().as_reader().read_to_end(&mut body)?;

        Ok(HttpResponse { status, headers, body })
    }
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<MultipartBody>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(SendBody::from_owned_reader(body.into_reader())),
        None => builder.send_empty(),
    }
}
