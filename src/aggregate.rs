//! Distinct-key accumulation across documents
//!
//! Keys are compared exactly (case-sensitive), so `Author` and `author` stay
//! two keys; case only matters later, inside the classifier.
//!
//! A [`KeyAggregator`] is plain owned state. When documents are processed on
//! several threads each worker fills its own aggregator and the owner folds
//! them together with [`KeyAggregator::merge`] after the workers finish.

use crate::classify::{classify, ClassificationResult};
use crate::types::MetadataEntry;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyAggregator {
    keys: BTreeSet<String>,
}

impl KeyAggregator {
    pub fn new() -> Self {
        KeyAggregator::default()
    }

    /// Returns true if the key was not seen before
    pub fn add_key(&mut self, key: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_string())
    }

    pub fn add_entries<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a MetadataEntry>,
    {
        for entry in entries {
            self.add_key(&entry.key);
        }
    }

    pub fn merge(&mut self, other: KeyAggregator) {
        if self.keys.is_empty() {
            self.keys = other.keys;
        } else {
            self.keys.extend(other.keys);
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    pub fn classify(&self) -> ClassificationResult {
        classify(&self.keys)
    }

    pub fn into_keys(self) -> BTreeSet<String> {
        self.keys
    }
}

impl<'a> Extend<&'a MetadataEntry> for KeyAggregator {
    fn extend<I: IntoIterator<Item = &'a MetadataEntry>>(&mut self, iter: I) {
        self.add_entries(iter);
    }
}

/// Distinct raw keys over any number of entries
pub fn aggregate<'a, I>(entries: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a MetadataEntry>,
{
    let mut aggregator = KeyAggregator::new();
    aggregator.add_entries(entries);
    aggregator.into_keys()
}
