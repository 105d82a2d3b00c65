//! `multipart/form-data` body assembly.
//!
//! # Design
//! A `MultipartBody` is an ordered list of `FormPart`s plus a boundary. The
//! parts are never reordered or deduplicated: the wire order is the order in
//! which the endpoint module staged them, which the conversion service relies
//! on (e.g. for merge order).
//!
//! Encoding is deferred. `into_reader` yields a forward-only `Read` that
//! emits the section headers from memory and opens each file source only
//! when the reader reaches it, so request building is infallible and uploads
//! are not buffered eagerly.

use std::collections::VecDeque;
use std::fmt;
use std::io::{self, Cursor, Read};

use uuid::Uuid;

use crate::stream::Stream;

/// Form field name shared by every uploaded file.
pub const FILES_FIELD: &str = "files";

const CRLF: &str = "\r\n";

/// One section of a multipart form.
#[derive(Debug, Clone)]
pub enum FormPart {
    /// A text field. The same name may occur several times.
    Value { name: String, value: String },
    /// A file uploaded under the `files` field.
    File { filename: String, content: Stream },
}

impl FormPart {
    pub fn name(&self) -> &str {
        match self {
            FormPart::Value { name, .. } => name,
            FormPart::File { .. } => FILES_FIELD,
        }
    }

    fn section_header(&self, boundary: &str) -> String {
        match self {
            FormPart::Value { name, .. } => format!(
                "--{boundary}{CRLF}Content-Disposition: form-data; name=\"{}\"{CRLF}{CRLF}",
                escape_quoted(name)
            ),
            FormPart::File { filename, .. } => format!(
                "--{boundary}{CRLF}Content-Disposition: form-data; name=\"{FILES_FIELD}\"; filename=\"{}\"{CRLF}Content-Type: {}{CRLF}{CRLF}",
                escape_quoted(filename),
                content_type_for(filename)
            ),
        }
    }
}

/// An ordered multipart form with its boundary.
#[derive(Debug, Clone)]
pub struct MultipartBody {
    boundary: String,
    parts: Vec<FormPart>,
}

impl MultipartBody {
    /// Wraps `parts` with a freshly generated boundary.
    pub fn new(parts: Vec<FormPart>) -> Self {
        Self::with_boundary(Uuid::new_v4().simple().to_string(), parts)
    }

    pub fn with_boundary(boundary: impl Into<String>, parts: Vec<FormPart>) -> Self {
        Self {
            boundary: boundary.into(),
            parts,
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Value of the `Content-Type` header announcing this body.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary=\"{}\"", self.boundary)
    }

    /// Values of every text field named `name`, in staging order.
    pub fn values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.parts.iter().filter_map(move |part| match part {
            FormPart::Value { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// Upload names of every file part, in staging order.
    pub fn filenames(&self) -> impl Iterator<Item = &str> + '_ {
        self.parts.iter().filter_map(|part| match part {
            FormPart::File { filename, .. } => Some(filename.as_str()),
            FormPart::Value { .. } => None,
        })
    }

    pub fn into_reader(self) -> MultipartReader {
        let mut segments = VecDeque::with_capacity(self.parts.len() * 3 + 1);
        for part in self.parts {
            segments.push_back(Segment::Bytes(part.section_header(&self.boundary).into_bytes()));
            match part {
                FormPart::Value { value, .. } => segments.push_back(Segment::Bytes(value.into_bytes())),
                FormPart::File { content, .. } => segments.push_back(Segment::Source(content)),
            }
            segments.push_back(Segment::Bytes(CRLF.as_bytes().to_vec()));
        }
        segments.push_back(Segment::Bytes(format!("--{}--{CRLF}", self.boundary).into_bytes()));

        MultipartReader {
            segments,
            current: None,
        }
    }

    /// Encodes the whole body into memory, reading every file source.
    pub fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.clone().into_reader().read_to_end(&mut buf)?;
        Ok(buf)
    }
}

enum Segment {
    Bytes(Vec<u8>),
    Source(Stream),
}

/// Forward-only reader over an encoded `MultipartBody`.
pub struct MultipartReader {
    segments: VecDeque<Segment>,
    current: Option<Box<dyn Read + Send>>,
}

impl fmt::Debug for MultipartReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultipartReader")
            .field("pending_segments", &self.segments.len())
            .finish()
    }
}

impl Read for MultipartReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        loop {
            if let Some(reader) = self.current.as_mut() {
                let n = reader.read(buf)?;
                if n > 0 {
                    return Ok(n);
                }
                self.current = None;
            }
            match self.segments.pop_front() {
                None => return Ok(0),
                Some(Segment::Bytes(bytes)) => self.current = Some(Box::new(Cursor::new(bytes))),
                Some(Segment::Source(stream)) => self.current = Some(stream.open()?),
            }
        }
    }
}

fn escape_quoted(s: &str) -> String {
    s.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

/// Guesses a part's media type from its filename extension.
pub fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "html" | "htm" => "text/html",
        "md" | "markdown" => "text/markdown",
        "css" => "text/css",
        "js" => "text/javascript",
        "txt" => "text/plain",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "pptx" => "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "odt" => "application/vnd.oasis.opendocument.text",
        "ods" => "application/vnd.oasis.opendocument.spreadsheet",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}
