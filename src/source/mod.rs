//! Where metadata JSON comes from
//!
//! A [`MetadataSource`] turns a file path into the JSON text describing that
//! file. [`JsonFileSource`] reads files that already contain extracted
//! metadata; [`TikaClient`] sends the file to a Tika server and returns its
//! response.

pub mod tika;
pub mod walk;

pub use tika::{TikaClient, TikaConfig};
pub use walk::{collect_files, CollectedFiles};

use crate::error::SourceError;
use std::path::Path;

pub trait MetadataSource: Send + Sync {
    /// Produce the metadata JSON text for one file
    fn fetch(&self, path: &Path) -> Result<String, SourceError>;
}

impl<T: MetadataSource + ?Sized> MetadataSource for Box<T> {
    fn fetch(&self, path: &Path) -> Result<String, SourceError> {
        (**self).fetch(path)
    }
}

/// Reads metadata JSON that is already on disk
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFileSource;

impl MetadataSource for JsonFileSource {
    fn fetch(&self, path: &Path) -> Result<String, SourceError> {
        let bytes = std::fs::read(path).map_err(|e| SourceError::io(path, e))?;
        String::from_utf8(bytes).map_err(|_| SourceError::InvalidUtf8(path.to_path_buf()))
    }
}
