//! Body-less requests: health and version probes.

use super::ApiModule;
use crate::builder::RequestBuilder;
use crate::http::{HttpMethod, HttpRequest};

pub const HEALTH_ENDPOINT: &str = "/health";
pub const VERSION_ENDPOINT: &str = "/version";

/// Builds requests without a form, carrying only headers.
#[derive(Debug, Clone)]
pub struct HealthCheck {
    builder: RequestBuilder,
}

impl ApiModule for HealthCheck {
    fn builder(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }
}

impl HealthCheck {
    pub fn new(base_url: &str) -> Self {
        Self::with_builder(RequestBuilder::new(base_url))
    }

    pub fn with_builder(builder: RequestBuilder) -> Self {
        Self { builder }
    }

    /// `GET /health`.
    pub fn health(self) -> HttpRequest {
        self.builder.finalize(HttpMethod::Get, HEALTH_ENDPOINT)
    }

    /// `GET /version`.
    pub fn version(self) -> HttpRequest {
        self.builder.finalize(HttpMethod::Get, VERSION_ENDPOINT)
    }

    /// Any method against any path, for routes without a dedicated helper.
    pub fn request(self, method: HttpMethod, endpoint: &str) -> HttpRequest {
        self.builder.finalize(method, endpoint)
    }
}
