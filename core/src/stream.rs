//! Named byte sources uploaded as file parts.
//!
//! A `Stream` pairs the filename the service will see with the place its
//! bytes come from. Files on disk are not opened until a reader is requested,
//! so building a request never touches the file system and large documents
//! are streamed straight into the multipart body.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};

use bytes::Bytes;

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Memory(Bytes),
}

/// A named, lazily readable byte source.
#[derive(Debug, Clone)]
pub struct Stream {
    filename: String,
    source: Source,
}

impl Stream {
    /// A file on disk, uploaded under its own basename.
    pub fn path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::path_with_filename(path, filename)
    }

    /// A file on disk, uploaded under `filename` instead of its basename.
    pub fn path_with_filename(path: impl AsRef<Path>, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source: Source::Path(path.as_ref().to_path_buf()),
        }
    }

    /// In-memory text content.
    pub fn string(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self::bytes(filename, Bytes::from(content.into()))
    }

    /// In-memory binary content.
    pub fn bytes(filename: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            source: Source::Memory(content.into()),
        }
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Returns a copy of this source uploaded under another name.
    pub fn renamed(&self, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source: self.source.clone(),
        }
    }

    /// Opens a fresh reader positioned at the start of the content.
    ///
    /// Every call starts over, so a source can be read more than once.
    pub fn open(&self) -> io::Result<Box<dyn Read + Send>> {
        match &self.source {
            Source::Path(path) => {
                let file = File::open(path)
                    .map_err(|e| io::Error::new(e.kind(), format!("cannot open '{}': {e}", path.display())))?;
                Ok(Box::new(file))
            }
            Source::Memory(bytes) => Ok(Box::new(Cursor::new(bytes.clone()))),
        }
    }

    pub fn read_to_vec(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.open()?.read_to_end(&mut buf)?;
        Ok(buf)
    }
}
