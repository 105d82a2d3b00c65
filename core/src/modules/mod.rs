//! Endpoint modules, one per family of conversion routes.
//!
//! # Design
//! Every module owns a `RequestBuilder` and nothing else shares it. Options
//! common to several families live in the traits below as provided methods
//! written against `builder()`, so each module opts into a family by
//! implementing one accessor. Setters take and return `self` for chaining;
//! those that JSON-encode a value return `Result<Self, ConversionError>`.
//!
//! Terminal operations (`url`, `html`, `convert`, `merge`, ...) consume the
//! module and return the finished `HttpRequest`. Once a request is built the
//! module no longer exists, so configuring it again cannot compile.

mod chromium;
mod health;
mod libreoffice;
mod pdfengines;

pub use chromium::{Chromium, ChromiumPdf, ChromiumScreenshot};
pub use health::HealthCheck;
pub use libreoffice::LibreOffice;
pub use pdfengines::PdfEngines;

use serde::Serialize;

use crate::builder::{encode_json, RequestBuilder};
use crate::error::ConversionError;
use crate::index::IndexGenerator;
use crate::stream::Stream;
use crate::types::{ChromiumCookie, DownloadFrom, WebhookMethod};

pub const OUTPUT_FILENAME_HEADER: &str = "Gotenberg-Output-Filename";
pub const WEBHOOK_URL_HEADER: &str = "Gotenberg-Webhook-Url";
pub const WEBHOOK_ERROR_URL_HEADER: &str = "Gotenberg-Webhook-Error-Url";
pub const WEBHOOK_METHOD_HEADER: &str = "Gotenberg-Webhook-Method";
pub const WEBHOOK_ERROR_METHOD_HEADER: &str = "Gotenberg-Webhook-Error-Method";
pub const WEBHOOK_EXTRA_HTTP_HEADERS_HEADER: &str = "Gotenberg-Webhook-Extra-Http-Headers";

/// Header handling shared by every module.
pub trait ApiModule: Sized {
    /// The builder this module stages its request into.
    fn builder(&mut self) -> &mut RequestBuilder;

    /// Adds or replaces a header sent with the request.
    fn set_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.builder().set_header(name, value);
        self
    }

    /// Overrides the trace id identifying the request in the service's logs.
    ///
    /// Sent under the builder's trace header, `Gotenberg-Trace` unless the
    /// module came from a `Gotenberg` configured otherwise.
    fn trace(mut self, trace: impl Into<String>) -> Self {
        let header = self.builder().trace_header().to_string();
        self.set_header(header, trace)
    }

    /// Like [`ApiModule::trace`], for a service configured with another
    /// trace header name.
    fn trace_with(self, header: impl Into<String>, trace: impl Into<String>) -> Self {
        self.set_header(header, trace)
    }
}

/// Options of every module whose request carries a multipart form.
pub trait MultipartModule: ApiModule {
    /// Base name of the output file; the service appends the extension.
    fn output_filename(self, filename: impl Into<String>) -> Self {
        self.set_header(OUTPUT_FILENAME_HEADER, filename)
    }

    /// Asks the service to deliver the result, or the error, asynchronously.
    fn webhook(self, url: impl Into<String>, error_url: impl Into<String>) -> Self {
        self.set_header(WEBHOOK_URL_HEADER, url)
            .set_header(WEBHOOK_ERROR_URL_HEADER, error_url)
    }

    fn webhook_method(self, method: WebhookMethod) -> Self {
        self.set_header(WEBHOOK_METHOD_HEADER, method.as_str())
    }

    fn webhook_error_method(self, method: WebhookMethod) -> Self {
        self.set_header(WEBHOOK_ERROR_METHOD_HEADER, method.as_str())
    }

    /// Extra headers the service sends along with both webhook calls.
    fn webhook_extra_http_headers<T: Serialize + ?Sized>(self, headers: &T) -> Result<Self, ConversionError> {
        let json = encode_json(headers)?;
        Ok(self.set_header(WEBHOOK_EXTRA_HTTP_HEADERS_HEADER, json))
    }

    /// Remote documents the service fetches itself.
    fn download_from(mut self, downloads: &[DownloadFrom]) -> Result<Self, ConversionError> {
        self.builder().add_form_json("downloadFrom", downloads)?;
        Ok(self)
    }
}

/// Page-loading options shared by Chromium PDF and screenshot requests.
pub trait ChromiumModule: MultipartModule {
    /// Hides the default white background, allowing transparency.
    fn omit_background(mut self) -> Self {
        self.builder().add_form_value("omitBackground", true);
        self
    }

    /// Duration (e.g. `"1s"`) to wait after loading before converting.
    fn wait_delay(mut self, delay: impl Into<String>) -> Self {
        self.builder().add_form_value("waitDelay", delay.into());
        self
    }

    /// JavaScript expression to wait on until it returns true, e.g.
    /// `"window.status === 'ready'"`.
    fn wait_for_expression(mut self, expression: impl Into<String>) -> Self {
        self.builder().add_form_value("waitForExpression", expression.into());
        self
    }

    fn emulate_print_media_type(mut self) -> Self {
        self.builder().add_form_value("emulatedMediaType", "print");
        self
    }

    fn emulate_screen_media_type(mut self) -> Self {
        self.builder().add_form_value("emulatedMediaType", "screen");
        self
    }

    fn cookies(mut self, cookies: &[ChromiumCookie]) -> Result<Self, ConversionError> {
        self.builder().add_form_json("cookies", cookies)?;
        Ok(self)
    }

    /// Overrides the default `User-Agent` header.
    fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.builder().add_form_value("userAgent", user_agent.into());
        self
    }

    /// Headers Chromium sends when loading the document.
    fn extra_http_headers<T: Serialize + ?Sized>(mut self, headers: &T) -> Result<Self, ConversionError> {
        self.builder().add_form_json("extraHttpHeaders", headers)?;
        Ok(self)
    }

    /// Main-page status codes that make the service answer 409 Conflict.
    fn fail_on_http_status_codes(mut self, codes: &[u16]) -> Result<Self, ConversionError> {
        self.builder().add_form_json("failOnHttpStatusCodes", codes)?;
        Ok(self)
    }

    /// Resource status codes that make the service answer 409 Conflict.
    fn fail_on_resource_http_status_codes(mut self, codes: &[u16]) -> Result<Self, ConversionError> {
        self.builder().add_form_json("failOnResourceHttpStatusCodes", codes)?;
        Ok(self)
    }

    fn fail_on_resource_loading_failed(mut self) -> Self {
        self.builder().add_form_value("failOnResourceLoadingFailed", true);
        self
    }

    fn fail_on_console_exceptions(mut self) -> Self {
        self.builder().add_form_value("failOnConsoleExceptions", true);
        self
    }

    fn skip_network_idle_event(mut self, skip: bool) -> Self {
        self.builder().add_form_value("skipNetworkIdleEvent", skip);
        self
    }

    /// Images, fonts, stylesheets and other files the document references.
    fn assets(mut self, assets: impl IntoIterator<Item = Stream>) -> Self {
        add_files(self.builder(), assets);
        self
    }
}

/// `<token>_<filename>`, the upload name that fixes a file's merge position.
pub(crate) fn indexed_filename(index: &mut dyn IndexGenerator, filename: &str) -> String {
    format!("{}_{}", index.next_token(), filename)
}

/// Stages `files` under their own names.
pub(crate) fn add_files(builder: &mut RequestBuilder, files: impl IntoIterator<Item = Stream>) {
    for file in files {
        let filename = file.filename().to_string();
        builder.add_form_file(filename, file);
    }
}
