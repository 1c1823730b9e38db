//! Error types for document processing and metadata sources

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to turn one JSON document into metadata entries
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Malformed or truncated JSON
    #[error("parse error at offset {offset} (line {line}, column {column}): {message}")]
    Parse {
        /// Byte offset into the document text
        offset: usize,
        line: usize,
        column: usize,
        message: String,
    },

    /// Well-formed JSON with a shape we do not extract from
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("document root must be an object or an array of objects, found {found}")]
    UnexpectedRoot { found: &'static str },

    #[error("document nesting exceeds the limit of {limit} levels")]
    TooDeep { limit: usize },
}

/// Failure to obtain metadata text for a file
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("path does not exist or is not a file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{} is not valid UTF-8", .0.display())]
    InvalidUtf8(PathBuf),

    #[error("extraction request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("extraction service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    /// The file or directory the error is about, when it names one
    pub fn path(&self) -> Option<&Path> {
        match self {
            SourceError::Io { path, .. }
            | SourceError::NotFound(path)
            | SourceError::InvalidUtf8(path) => Some(path),
            SourceError::Http(_) | SourceError::Status { .. } => None,
        }
    }
}

/// One file the batch could not use
#[derive(Debug, Error)]
#[error("{}: {kind}", .path.display())]
pub struct BatchError {
    pub path: PathBuf,
    #[source]
    pub kind: BatchErrorKind,
}

#[derive(Debug, Error)]
pub enum BatchErrorKind {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Document(#[from] DocumentError),
}
