//! Document processing: JSON text to metadata entries
//!
//! Extraction services report metadata either as a single object or, for
//! recursive extraction, as an array holding one object per (embedded)
//! resource. Both shapes are flattened into one ordered list of
//! [`MetadataEntry`] values; duplicate keys are kept.

use crate::error::{DocumentError, SchemaError};
use crate::types::{MetadataEntry, ProcessConfig};
use crate::value::{Value, ValueSeed, MAX_SUPPORTED_DEPTH, TOO_DEEP};
use serde::de::DeserializeSeed;
use serde_json::error::Category;
use tracing::{debug, warn};

/// Parses documents and extracts their top-level properties
#[derive(Debug, Clone, Default)]
pub struct DocumentProcessor {
    config: ProcessConfig,
}

impl DocumentProcessor {
    /// `max_depth` is clamped to `1..=MAX_SUPPORTED_DEPTH`
    pub fn new(mut config: ProcessConfig) -> Self {
        let max_depth = config.max_depth.clamp(1, MAX_SUPPORTED_DEPTH);
        if max_depth != config.max_depth {
            warn!(requested = config.max_depth, max_depth, "depth limit out of range");
            config.max_depth = max_depth;
        }
        DocumentProcessor { config }
    }

    pub fn config(&self) -> &ProcessConfig {
        &self.config
    }

    /// Parse JSON text into a [`Value`] tree
    pub fn parse(&self, text: &str) -> Result<Value, DocumentError> {
        let mut de = serde_json::Deserializer::from_str(text);
        let value = ValueSeed::new(self.config.max_depth)
            .deserialize(&mut de)
            .map_err(|e| self.classify_error(text, e))?;

        // Reject trailing garbage after the document
        de.end().map_err(|e| parse_error(text, e))?;
        Ok(value)
    }

    /// Parse a document and return one entry per top-level property
    pub fn process(&self, text: &str) -> Result<Vec<MetadataEntry>, DocumentError> {
        let root = self.parse(text)?;
        let entries = entries_from_root(root)?;
        debug!(entries = entries.len(), "processed document");
        Ok(entries)
    }

    fn classify_error(&self, text: &str, err: serde_json::Error) -> DocumentError {
        // Value accepts every JSON shape, so the only data error is the depth guard
        if err.classify() == Category::Data && err.to_string().starts_with(TOO_DEEP) {
            return SchemaError::TooDeep {
                limit: self.config.max_depth,
            }
            .into();
        }
        parse_error(text, err)
    }
}

/// Process a document with the default configuration
pub fn process(text: &str) -> Result<Vec<MetadataEntry>, DocumentError> {
    DocumentProcessor::default().process(text)
}

/// Flatten a parsed document root into metadata entries
pub fn entries_from_root(root: Value) -> Result<Vec<MetadataEntry>, SchemaError> {
    match root {
        Value::Object(obj) => Ok(entries_from_object(obj).collect()),
        Value::Array(items) => {
            let total = items.len();
            let mut entries = Vec::new();
            let mut objects = 0;

            for (index, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(obj) => {
                        objects += 1;
                        entries.extend(entries_from_object(obj));
                    }
                    other => {
                        debug!(index, kind = other.kind(), "skipping non-object array element");
                    }
                }
            }

            if total > 0 && objects == 0 {
                return Err(SchemaError::UnexpectedRoot {
                    found: "array without objects",
                });
            }
            Ok(entries)
        }
        other => Err(SchemaError::UnexpectedRoot {
            found: other.kind(),
        }),
    }
}

fn entries_from_object(obj: crate::value::Object) -> impl Iterator<Item = MetadataEntry> {
    obj.into_iter()
        .map(|(key, value)| MetadataEntry::new(key, value))
}

fn parse_error(text: &str, err: serde_json::Error) -> DocumentError {
    let (line, column) = (err.line(), err.column());
    let full = err.to_string();
    let message = match full.rfind(" at line ") {
        Some(idx) if line > 0 => full[..idx].to_string(),
        _ => full,
    };

    DocumentError::Parse {
        offset: byte_offset(text, line, column),
        line,
        column,
        message,
    }
}

/// serde_json reports 1-based line and byte column; convert to a byte offset
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let line_start: usize = text
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    (line_start + column.saturating_sub(1)).min(text.len())
}
