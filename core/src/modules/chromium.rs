//! Chromium routes: HTML, URL and Markdown to PDF or to an image.

use serde::Serialize;

use super::{add_files, ApiModule, ChromiumModule, MultipartModule};
use crate::builder::RequestBuilder;
use crate::error::ConversionError;
use crate::http::{HttpMethod, HttpRequest};
use crate::stream::Stream;
use crate::types::Dimension;

pub const PDF_URL_ENDPOINT: &str = "/forms/chromium/convert/url";
pub const PDF_HTML_ENDPOINT: &str = "/forms/chromium/convert/html";
pub const PDF_MARKDOWN_ENDPOINT: &str = "/forms/chromium/convert/markdown";
pub const SCREENSHOT_URL_ENDPOINT: &str = "/forms/chromium/screenshot/url";
pub const SCREENSHOT_HTML_ENDPOINT: &str = "/forms/chromium/screenshot/html";
pub const SCREENSHOT_MARKDOWN_ENDPOINT: &str = "/forms/chromium/screenshot/markdown";

/// Filenames the service requires for these parts.
const INDEX_FILENAME: &str = "index.html";
const HEADER_FILENAME: &str = "header.html";
const FOOTER_FILENAME: &str = "footer.html";

/// Entry point to the Chromium routes.
#[derive(Debug, Clone)]
pub struct Chromium {
    template: RequestBuilder,
}

impl Chromium {
    pub fn new(base_url: &str) -> Self {
        Self::with_builder(RequestBuilder::new(base_url))
    }

    /// Every module handed out starts from a copy of `template`.
    pub fn with_builder(template: RequestBuilder) -> Self {
        Self { template }
    }

    pub fn pdf(&self) -> ChromiumPdf {
        ChromiumPdf {
            builder: self.template.clone(),
        }
    }

    pub fn screenshot(&self) -> ChromiumScreenshot {
        ChromiumScreenshot {
            builder: self.template.clone(),
        }
    }
}

fn url_request(mut builder: RequestBuilder, url: &str, endpoint: &str) -> HttpRequest {
    builder.add_form_value("url", url);
    builder.finalize(HttpMethod::Post, endpoint)
}

fn html_request(mut builder: RequestBuilder, index: Stream, endpoint: &str) -> HttpRequest {
    builder.add_form_file(INDEX_FILENAME, index);
    builder.finalize(HttpMethod::Post, endpoint)
}

fn markdown_request(
    mut builder: RequestBuilder,
    index: Stream,
    markdown: Stream,
    more: impl IntoIterator<Item = Stream>,
    endpoint: &str,
) -> HttpRequest {
    builder.add_form_file(INDEX_FILENAME, index);
    add_files(&mut builder, std::iter::once(markdown).chain(more));
    builder.finalize(HttpMethod::Post, endpoint)
}

/// Builds requests for the Chromium PDF routes.
#[derive(Debug, Clone)]
pub struct ChromiumPdf {
    builder: RequestBuilder,
}

impl ApiModule for ChromiumPdf {
    fn builder(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }
}

impl MultipartModule for ChromiumPdf {}
impl ChromiumModule for ChromiumPdf {}

impl ChromiumPdf {
    /// Prints the entire content on one single page.
    pub fn single_page(mut self) -> Self {
        self.builder.add_form_value("singlePage", true);
        self
    }

    /// Overrides the default paper size (Letter, 8.5 x 11 inches).
    ///
    /// Bare numbers are inches; strings carry their own unit (`"210mm"`).
    pub fn paper_size(mut self, width: impl Into<Dimension>, height: impl Into<Dimension>) -> Self {
        self.builder
            .add_form_value("paperWidth", width.into())
            .add_form_value("paperHeight", height.into());
        self
    }

    /// Overrides the default margins (0.39 inches).
    pub fn margins(
        mut self,
        top: impl Into<Dimension>,
        bottom: impl Into<Dimension>,
        left: impl Into<Dimension>,
        right: impl Into<Dimension>,
    ) -> Self {
        self.builder
            .add_form_value("marginTop", top.into())
            .add_form_value("marginBottom", bottom.into())
            .add_form_value("marginLeft", left.into())
            .add_form_value("marginRight", right.into());
        self
    }

    /// Uses the page size defined by CSS.
    pub fn prefer_css_page_size(mut self) -> Self {
        self.builder.add_form_value("preferCssPageSize", true);
        self
    }

    /// Embeds the document outline in the PDF.
    pub fn generate_document_outline(mut self) -> Self {
        self.builder.add_form_value("generateDocumentOutline", true);
        self
    }

    pub fn print_background(mut self) -> Self {
        self.builder.add_form_value("printBackground", true);
        self
    }

    pub fn landscape(mut self) -> Self {
        self.builder.add_form_value("landscape", true);
        self
    }

    /// Overrides the default rendering scale (1.0).
    pub fn scale(mut self, scale: f64) -> Self {
        self.builder.add_form_value("scale", scale);
        self
    }

    /// Page ranges to print, e.g. `"1-5, 8, 11-13"`. Empty means all pages.
    pub fn native_page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.builder.add_form_value("nativePageRanges", ranges.into());
        self
    }

    /// HTML printed at the top of each page. Uploaded as `header.html`.
    pub fn header(mut self, header: Stream) -> Self {
        self.builder.add_form_file(HEADER_FILENAME, header);
        self
    }

    /// HTML printed at the bottom of each page. Uploaded as `footer.html`.
    pub fn footer(mut self, footer: Stream) -> Self {
        self.builder.add_form_file(FOOTER_FILENAME, footer);
        self
    }

    /// PDF/A format of the result, e.g. `"PDF/A-1b"`.
    pub fn pdfa(mut self, format: impl Into<String>) -> Self {
        self.builder.add_form_value("pdfa", format.into());
        self
    }

    /// Enables PDF for Universal Access.
    pub fn pdfua(mut self) -> Self {
        self.builder.add_form_value("pdfua", true);
        self
    }

    /// Metadata written into the resulting PDF.
    pub fn metadata<T: Serialize + ?Sized>(mut self, metadata: &T) -> Result<Self, ConversionError> {
        self.builder.add_form_json("metadata", metadata)?;
        Ok(self)
    }

    /// Converts the page at `url`.
    pub fn url(self, url: &str) -> HttpRequest {
        url_request(self.builder, url, PDF_URL_ENDPOINT)
    }

    /// Converts an HTML document, uploaded as `index.html`.
    pub fn html(self, index: Stream) -> HttpRequest {
        html_request(self.builder, index, PDF_HTML_ENDPOINT)
    }

    /// Converts Markdown files through an `index.html` wrapper that
    /// references them.
    pub fn markdown(self, index: Stream, markdown: Stream, more: impl IntoIterator<Item = Stream>) -> HttpRequest {
        markdown_request(self.builder, index, markdown, more, PDF_MARKDOWN_ENDPOINT)
    }
}

/// Builds requests for the Chromium screenshot routes.
#[derive(Debug, Clone)]
pub struct ChromiumScreenshot {
    builder: RequestBuilder,
}

impl ApiModule for ChromiumScreenshot {
    fn builder(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }
}

impl MultipartModule for ChromiumScreenshot {}
impl ChromiumModule for ChromiumScreenshot {}

impl ChromiumScreenshot {
    /// Device screen width in pixels.
    pub fn width(mut self, width: u32) -> Self {
        self.builder.add_form_value("width", width);
        self
    }

    /// Device screen height in pixels.
    pub fn height(mut self, height: u32) -> Self {
        self.builder.add_form_value("height", height);
        self
    }

    /// Clips the screenshot to the device dimensions.
    pub fn clip(mut self) -> Self {
        self.builder.add_form_value("clip", true);
        self
    }

    pub fn png(mut self) -> Self {
        self.builder.add_form_value("format", "png");
        self
    }

    pub fn jpeg(mut self) -> Self {
        self.builder.add_form_value("format", "jpeg");
        self
    }

    pub fn webp(mut self) -> Self {
        self.builder.add_form_value("format", "webp");
        self
    }

    /// Compression quality from 0 to 100 (jpeg only).
    pub fn quality(mut self, quality: u8) -> Self {
        self.builder.add_form_value("quality", quality);
        self
    }

    /// Optimizes image encoding for speed rather than size.
    pub fn optimize_for_speed(mut self) -> Self {
        self.builder.add_form_value("optimizeForSpeed", true);
        self
    }

    pub fn url(self, url: &str) -> HttpRequest {
        url_request(self.builder, url, SCREENSHOT_URL_ENDPOINT)
    }

    pub fn html(self, index: Stream) -> HttpRequest {
        html_request(self.builder, index, SCREENSHOT_HTML_ENDPOINT)
    }

    pub fn markdown(self, index: Stream, markdown: Stream, more: impl IntoIterator<Item = Stream>) -> HttpRequest {
        markdown_request(self.builder, index, markdown, more, SCREENSHOT_MARKDOWN_ENDPOINT)
    }
}
