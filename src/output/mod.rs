//! Persisting and presenting classification results

pub mod report;
pub mod writer;

pub use report::CoreReport;
pub use writer::{
    write_keys, KeySetWriter, CORE_KEYS_FILE, IGNORED_KEYS_FILE, REMAINING_KEYS_FILE,
};
