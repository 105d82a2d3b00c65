//! Synchronous request builder for a Gotenberg-style document conversion
//! service.
//!
//! # Overview
//! Endpoint modules stage form fields, files and headers into a
//! `RequestBuilder` and finalize them into a plain-data `HttpRequest`
//! (host-does-IO pattern). The caller then hands the request to
//! [`dispatch::send`] or [`dispatch::save`] together with an `HttpClient` of
//! its choice; nothing here resolves a client implicitly.
//!
//! # Design
//! - `Gotenberg` is stateless: it holds the base URL and hands out fresh
//!   modules, one per request.
//! - Terminal operations consume their module, so a finalized request can
//!   never be reconfigured.
//! - Multipart bodies are encoded lazily; file sources are opened only when
//!   the transport reads the body.
//! - Merge order is pinned by prefixing uploads with `IndexGenerator` tokens.
//!
//! ```no_run
//! use gotenberg_core::prelude::*;
//!
//! # fn main() -> Result<(), ConversionError> {
//! let client = UreqClient::new();
//! let request = Gotenberg::new("http://localhost:3000")
//!     .chromium_pdf()
//!     .landscape()
//!     .trace("my-trace")
//!     .html(Stream::path("index.html"));
//! let filename = save(request, "out", &client)?;
//! # let _ = filename;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod index;
pub mod modules;
pub mod multipart;
pub mod stream;
#[cfg(feature = "ureq")]
pub mod transport;
pub mod types;

pub use builder::{FormValue, RequestBuilder};
pub use client::Gotenberg;
pub use config::ClientConfig;
pub use dispatch::{save, send};
pub use error::{ConversionError, ServiceError};
pub use http::{BoxError, HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use index::{to_alpha, AlphaIndex, HrtimeIndex, IndexGenerator};
pub use modules::{
    ApiModule, Chromium, ChromiumModule, ChromiumPdf, ChromiumScreenshot, HealthCheck, LibreOffice, MultipartModule,
    PdfEngines,
};
pub use multipart::{FormPart, MultipartBody};
pub use stream::Stream;
#[cfg(feature = "ureq")]
pub use transport::UreqClient;
pub use types::{ChromiumCookie, Dimension, DownloadFrom, SplitMode, WebhookMethod};

/// Everything needed to build and send requests, including the option traits.
pub mod prelude {
    pub use crate::dispatch::{save, send};
    pub use crate::error::{ConversionError, ServiceError};
    pub use crate::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    pub use crate::index::{AlphaIndex, HrtimeIndex, IndexGenerator};
    pub use crate::modules::{ApiModule, ChromiumModule, MultipartModule};
    pub use crate::stream::Stream;
    #[cfg(feature = "ureq")]
    pub use crate::transport::UreqClient;
    pub use crate::types::{ChromiumCookie, Dimension, DownloadFrom, SplitMode, WebhookMethod};
    pub use crate::{ClientConfig, Gotenberg};
}
