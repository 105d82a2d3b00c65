//! LibreOffice route: office documents to PDF.

use std::fmt;

use serde::Serialize;

use super::{indexed_filename, ApiModule, MultipartModule};
use crate::builder::RequestBuilder;
use crate::error::ConversionError;
use crate::http::{HttpMethod, HttpRequest};
use crate::index::{HrtimeIndex, IndexGenerator};
use crate::stream::Stream;

pub const CONVERT_ENDPOINT: &str = "/forms/libreoffice/convert";

/// Builds requests for the LibreOffice conversion route.
///
/// Without [`LibreOffice::merge`] the service answers with one PDF per
/// document (zipped when there are several). With it, the PDFs are merged in
/// the order the documents were passed to [`LibreOffice::convert`].
pub struct LibreOffice {
    builder: RequestBuilder,
    index: Option<Box<dyn IndexGenerator>>,
    merge: bool,
}

impl fmt::Debug for LibreOffice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LibreOffice")
            .field("builder", &self.builder)
            .field("custom_index", &self.index.is_some())
            .field("merge", &self.merge)
            .finish()
    }
}

impl ApiModule for LibreOffice {
    fn builder(&mut self) -> &mut RequestBuilder {
        &mut self.builder
    }
}

impl MultipartModule for LibreOffice {}

macro_rules! flag_options {
    ($($(#[$doc:meta])* $method:ident => $field:literal;)*) => {
        $(
            $(#[$doc])*
            pub fn $method(mut self) -> Self {
                self.builder.add_form_value($field, true);
                self
            }
        )*
    };
}

impl LibreOffice {
    pub fn new(base_url: &str) -> Self {
        Self::with_builder(RequestBuilder::new(base_url))
    }

    pub fn with_builder(builder: RequestBuilder) -> Self {
        Self {
            builder,
            index: None,
            merge: false,
        }
    }

    /// Replaces the default [`HrtimeIndex`] used to order merged files.
    pub fn index(mut self, index: impl IndexGenerator + 'static) -> Self {
        self.index = Some(Box::new(index));
        self
    }

    flag_options! {
        landscape => "landscape";
        /// Lets form fields with the same name coexist.
        allow_duplicate_field_names => "allowDuplicateFieldNames";
        export_bookmarks_to_pdf_destination => "exportBookmarksToPdfDestination";
        export_placeholders => "exportPlaceholders";
        export_notes => "exportNotes";
        export_notes_pages => "exportNotesPages";
        export_only_notes_pages => "exportOnlyNotesPages";
        export_notes_in_margin => "exportNotesInMargin";
        convert_ooo_target_to_pdf_target => "convertOooTargetToPdfTarget";
        export_links_relative_fsys => "exportLinksRelativeFsys";
        export_hidden_slides => "exportHiddenSlides";
        skip_empty_pages => "skipEmptyPages";
        add_original_document_as_stream => "addOriginalDocumentAsStream";
        /// Renders each spreadsheet as a single page.
        single_page_sheets => "singlePageSheets";
        lossless_image_compression => "losslessImageCompression";
        reduce_image_resolution => "reduceImageResolution";
        /// Enables PDF for Universal Access.
        pdfua => "pdfua";
    }

    /// Page ranges, e.g. `"1-4"`, applied to every document independently.
    pub fn native_page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.builder.add_form_value("nativePageRanges", ranges.into());
        self
    }

    /// Whether to export form fields, or only their entered content.
    pub fn export_form_fields(mut self, export: bool) -> Self {
        self.builder.add_form_value("exportFormFields", export);
        self
    }

    pub fn export_bookmarks(mut self, export: bool) -> Self {
        self.builder.add_form_value("exportBookmarks", export);
        self
    }

    /// JPEG quality from 1 to 100.
    pub fn quality(mut self, quality: u8) -> Self {
        self.builder.add_form_value("quality", quality);
        self
    }

    /// Target DPI when reducing image resolution (75, 150, 300, 600 or 1200).
    pub fn max_image_resolution(mut self, dpi: u32) -> Self {
        self.builder.add_form_value("maxImageResolution", dpi);
        self
    }

    pub fn pdfa(mut self, format: impl Into<String>) -> Self {
        self.builder.add_form_value("pdfa", format.into());
        self
    }

    pub fn metadata<T: Serialize + ?Sized>(mut self, metadata: &T) -> Result<Self, ConversionError> {
        self.builder.add_form_json("metadata", metadata)?;
        Ok(self)
    }

    /// Merges the resulting PDFs in argument order.
    pub fn merge(mut self) -> Self {
        self.merge = true;
        self.builder.add_form_value("merge", true);
        self
    }

    /// Converts `file` and `more` to PDF.
    ///
    /// When a merge was requested each upload name is prefixed with an index
    /// token, taken in argument order; otherwise the names are left as is.
    pub fn convert(mut self, file: Stream, more: impl IntoIterator<Item = Stream>) -> HttpRequest {
        let mut index = self.index.take().unwrap_or_else(|| Box::new(HrtimeIndex::new()));
        for file in std::iter::once(file).chain(more) {
            let filename = if self.merge {
                indexed_filename(index.as_mut(), file.filename())
            } else {
                file.filename().to_string()
            };
            self.builder.add_form_file(filename, file);
        }
        self.builder.finalize(HttpMethod::Post, CONVERT_ENDPOINT)
    }
}
