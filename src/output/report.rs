//! Unique core metadata report
//!
//! Collects the core entries seen across documents. Two entries count as the
//! same when their keys match case-insensitively and their values render
//! identically, so `Author: "Casey"` and `author: "Casey"` are listed once
//! while `author: "Dana"` is listed separately.

use crate::classify::{classify_key, KeyClass};
use crate::types::MetadataEntry;
use crate::value::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Default)]
pub struct CoreReport {
    // (upper-cased key, rendered value) -> first entry seen
    entries: BTreeMap<(String, String), MetadataEntry>,
}

impl CoreReport {
    pub fn new() -> Self {
        CoreReport::default()
    }

    /// Record the core entries among `entries`; other keys are skipped
    pub fn add_entries<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = &'a MetadataEntry>,
    {
        for entry in entries {
            if classify_key(&entry.key) != KeyClass::Core {
                continue;
            }
            let id = (entry.key.to_uppercase(), entry.value.to_string());
            self.entries.entry(id).or_insert_with(|| entry.clone());
        }
    }

    pub fn merge(&mut self, other: CoreReport) {
        for (id, entry) in other.entries {
            self.entries.entry(id).or_insert(entry);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by upper-cased key, then value
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .values()
            .map(|entry| (entry.key.as_str(), &entry.value))
    }
}

impl fmt::Display for CoreReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Unique Core Metadata")?;
        writeln!(f)?;
        writeln!(f, "[")?;
        let last = self.entries.len().saturating_sub(1);
        for (idx, (key, value)) in self.iter().enumerate() {
            let separator = if idx < last { "," } else { "" };
            writeln!(f, " {}: {}{}", Value::Text(key.to_string()), value, separator)?;
        }
        writeln!(f, "]")
    }
}
