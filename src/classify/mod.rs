//! Metadata key classification
//!
//! Keys are sorted into three buckets by case-insensitive substring rules,
//! evaluated per key in a fixed order:
//!
//! 1. any key containing an [`IGNORE_KEYS`] entry is **ignored**
//! 2. any key containing a [`CORE_KEYS`] entry is **core**
//! 3. everything else is **remaining**
//!
//! Matching is plain containment on the upper-cased key, so
//! `X-TIKA:CreatorTool` is core through `CREATOR` and `dc:title` through
//! `DC:`. The decision for one key never depends on the other keys.

pub mod classifier;
pub mod keys;

pub use classifier::{classify, classify_key, ClassificationResult, KeyClass, KeyRecord};
pub use keys::{CORE_KEYS, IGNORE_KEYS};
