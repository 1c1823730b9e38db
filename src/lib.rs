//! # Metasift - metadata key classification
//!
//! Turns the schema-less JSON metadata produced by document extraction
//! services (such as Apache Tika) into a typed value model, and sorts the
//! observed metadata keys into core, ignored and remaining sets.
//!
//! ## Modules
//!
//! - **value**: tagged-union [`Value`] model and the JSON transformer
//! - **document**: document text to ordered [`MetadataEntry`] lists
//! - **classify**: substring rules assigning each key a [`KeyClass`]
//! - **aggregate**: distinct keys across documents
//! - **source**, **output**, **pipeline**: file and HTTP input, key-set
//!   files and reports, batch runs over many files
//!
//! ## Quick Start
//!
//! ```rust
//! use metasift::{process, KeyAggregator};
//!
//! # fn main() -> anyhow::Result<()> {
//! let entries = process(r#"[{"dc:title": "Notes", "Content-Type": "text/plain", "Unknown": 1}]"#)?;
//!
//! let mut keys = KeyAggregator::new();
//! keys.add_entries(&entries);
//!
//! let result = keys.classify();
//! assert!(result.core.contains("dc:title"));
//! assert!(result.remaining.contains("Content-Type"));
//! assert!(result.ignored.contains("Unknown"));
//! # Ok(())
//! # }
//! ```

use tracing::warn;

pub mod aggregate;
pub mod classify;
pub mod document;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod source;
pub mod types;
pub mod value;

// Re-export commonly used types for convenience
pub use aggregate::{aggregate, KeyAggregator};
pub use classify::{
    classify, classify_key, ClassificationResult, KeyClass, KeyRecord, CORE_KEYS, IGNORE_KEYS,
};
pub use document::{process, DocumentProcessor};
pub use error::{BatchError, BatchErrorKind, DocumentError, SchemaError, SourceError};
pub use output::{CoreReport, KeySetWriter};
pub use pipeline::{BatchSummary, Pipeline, PipelineConfig};
pub use source::{
    collect_files, CollectedFiles, JsonFileSource, MetadataSource, TikaClient, TikaConfig,
};
pub use types::{MetadataEntry, ProcessConfig};
pub use value::{transform, Object, Value};

/// Classify the keys of several in-memory documents
///
/// Documents that fail to parse are logged and skipped; their errors are
/// returned alongside the classification of everything else.
pub fn classify_documents<'a, I>(documents: I) -> (ClassificationResult, Vec<DocumentError>)
where
    I: IntoIterator<Item = &'a str>,
{
    let processor = DocumentProcessor::default();
    let mut keys = KeyAggregator::new();
    let mut errors = Vec::new();

    for (index, text) in documents.into_iter().enumerate() {
        match processor.process(text) {
            Ok(entries) => keys.add_entries(&entries),
            Err(e) => {
                warn!(document = index, error = %e, "skipping document");
                errors.push(e);
            }
        }
    }

    (keys.classify(), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_documents() {
        let (result, errors) = classify_documents([
            r#"{"a":1,"b":[1,2,3],"c":{"d":"x"}}"#,
            "{ invalid",
            r#"[{"Author":"Xavier","author":"Casey"}]"#,
        ]);

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], DocumentError::Parse { .. }));

        assert_eq!(result.core.len(), 2);
        assert!(result.core.contains("Author"));
        assert!(result.core.contains("author"));
        assert_eq!(result.remaining.len(), 3);
        assert!(result.ignored.is_empty());
    }
}
