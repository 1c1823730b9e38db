use crate::value::{Value, DEFAULT_MAX_DEPTH};
use serde::Serialize;

/// One top-level metadata property of a document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataEntry {
    /// Property name exactly as the document spells it
    pub key: String,

    /// The property value
    pub value: Value,
}

impl MetadataEntry {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        MetadataEntry {
            key: key.into(),
            value,
        }
    }
}

/// Configuration for document processing
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Maximum container nesting accepted in a document.
    /// `DocumentProcessor` clamps it to `1..=MAX_SUPPORTED_DEPTH` so the limit
    /// is always enforced before serde_json's own recursion guard.
    pub max_depth: usize,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        ProcessConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
