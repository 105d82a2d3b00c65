//! PDF engine routes: merge, split, flatten, convert, and metadata.

use std::fmt;

use serde::Serialize;

use super::{add_files, indexed_filename, ApiModule, MultipartModule};
use crate::builder::RequestBuilder;
use crate::error::ConversionError;
use crate::http::{HttpMethod, HttpRequest};
use crate::index::{HrtimeIndex, IndexGenerator};
use crate::stream::Stream;
use crate::types::SplitMode;

pub const MERGE_ENDPOINT: &str = "/forms/pdfengines/merge";
pub const SPLIT_ENDPOINT: &str = "/forms/pdfengines/split";
pub const FLATTEN_ENDPOINT: &str = "/forms/pdfengines/flatten";
pub const CONVERT_ENDPOINT: &str = "/forms/pdfengines/convert";
pub const READ_METADATA_ENDPOINT: &str = "/forms/pdfengines/metadata/read";
pub const WRITE_METADATA_ENDPOINT: &str = "/forms/pdfengines/metadata/write";

/// Builds requests for the PDF engine routes.
pub struct PdfEngines {
    builder: RequestBuilder,
    index: Option<Box<dyn IndexGenerator>>,
}

impl fmt::Debug for PdfEngines {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PdfEngines")
            .field("builder", &self.builder)
            .field("custom_index", &self.index.is_some())
            .finish()
    }
}

impl ApiModule for PdfEngines {
    fn builder(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }
}

impl MultipartModule for PdfEngines {}

impl PdfEngines {
    pub fn new(base_url: &str) -> Self {
        Self::with_builder(RequestBuilder::new(base_url))
    }

    pub fn with_builder(builder: RequestBuilder) -> Self {
        Self {
            builder,
            index: None,
        }
    }

    /// Replaces the default [`HrtimeIndex`] used to order merged files.
    pub fn index(mut self, index: impl IndexGenerator + 'static) -> Self {
        self.index = Some(Box::new(index));
        self
    }

    pub fn pdfa(mut self, format: impl Into<String>) -> Self {
        self.builder.add_form_value("pdfa", format.into());
        self
    }

    pub fn pdfua(mut self) -> Self {
        self.builder.add_form_value("pdfua", true);
        self
    }

    pub fn metadata<T: Serialize + ?Sized>(mut self, metadata: &T) -> Result<Self, ConversionError> {
        self.builder.add_form_json("metadata", metadata)?;
        Ok(self)
    }

    /// Flattens the result of another operation. Use [`PdfEngines::flatten`]
    /// to only flatten.
    pub fn flattening(mut self) -> Self {
        self.builder.add_form_value("flatten", true);
        self
    }

    /// Merges `pdfs` into one PDF, in argument order.
    pub fn merge(mut self, pdfs: impl IntoIterator<Item = Stream>) -> HttpRequest {
        let mut index = self.index.take().unwrap_or_else(|| Box::new(HrtimeIndex::new()));
        for pdf in pdfs {
            let filename = indexed_filename(index.as_mut(), pdf.filename());
            self.builder.add_form_file(filename, pdf);
        }
        self.builder.finalize(HttpMethod::Post, MERGE_ENDPOINT)
    }

    /// Splits `pdfs`; the service answers with a PDF or a ZIP archive.
    pub fn split(mut self, mode: &SplitMode, pdfs: impl IntoIterator<Item = Stream>) -> HttpRequest {
        self.builder
            .add_form_value("splitMode", mode.mode())
            .add_form_value("splitSpan", mode.span())
            .add_form_value("splitUnify", mode.unify());
        add_files(&mut self.builder, pdfs);
        self.builder.finalize(HttpMethod::Post, SPLIT_ENDPOINT)
    }

    pub fn flatten(mut self, pdfs: impl IntoIterator<Item = Stream>) -> HttpRequest {
        self.builder.add_form_value("flatten", true);
        add_files(&mut self.builder, pdfs);
        self.builder.finalize(HttpMethod::Post, FLATTEN_ENDPOINT)
    }

    /// Converts `pdfs` to the PDF/A format `pdfa`.
    pub fn convert(self, pdfa: impl Into<String>, pdfs: impl IntoIterator<Item = Stream>) -> HttpRequest {
        let mut this = self.pdfa(pdfa);
        add_files(&mut this.builder, pdfs);
        this.builder.finalize(HttpMethod::Post, CONVERT_ENDPOINT)
    }

    /// Reads the metadata of `pdfs`; the service answers with JSON keyed by
    /// filename.
    pub fn read_metadata(mut self, pdfs: impl IntoIterator<Item = Stream>) -> HttpRequest {
        add_files(&mut self.builder, pdfs);
        self.builder.finalize(HttpMethod::Post, READ_METADATA_ENDPOINT)
    }

    pub fn write_metadata<T: Serialize + ?Sized>(
        self,
        metadata: &T,
        pdfs: impl IntoIterator<Item = Stream>,
    ) -> Result<HttpRequest, ConversionError> {
        let mut this = self.metadata(metadata)?;
        add_files(&mut this.builder, pdfs);
        Ok(this.builder.finalize(HttpMethod::Post, WRITE_METADATA_ENDPOINT))
    }
}
