use crate::classify::keys::{CORE_KEYS, IGNORE_KEYS};
use serde::Serialize;
use std::collections::BTreeSet;

/// Category a metadata key falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyClass {
    /// Basic or Dublin Core property
    Core,
    /// Explicitly excluded from output
    Ignored,
    /// Anything else
    Remaining,
}

/// A raw key together with the form used for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord<'a> {
    raw: &'a str,
    normalized: String,
}

impl<'a> KeyRecord<'a> {
    pub fn new(raw: &'a str) -> Self {
        KeyRecord {
            raw,
            normalized: raw.to_ascii_uppercase(),
        }
    }

    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// ASCII upper-cased key. Only used for matching, never written out.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// First matching rule wins: ignore, then core, then remaining
    pub fn class(&self) -> KeyClass {
        if contains_any(&self.normalized, IGNORE_KEYS) {
            KeyClass::Ignored
        } else if contains_any(&self.normalized, CORE_KEYS) {
            KeyClass::Core
        } else {
            KeyClass::Remaining
        }
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Classify a single key
pub fn classify_key(key: &str) -> KeyClass {
    KeyRecord::new(key).class()
}

/// Keys split into disjoint, sorted sets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub core: BTreeSet<String>,
    pub ignored: BTreeSet<String>,
    pub remaining: BTreeSet<String>,
}

impl ClassificationResult {
    pub fn insert(&mut self, key: &str) -> KeyClass {
        let class = classify_key(key);
        self.set_mut(class).insert(key.to_string());
        class
    }

    pub fn get(&self, class: KeyClass) -> &BTreeSet<String> {
        match class {
            KeyClass::Core => &self.core,
            KeyClass::Ignored => &self.ignored,
            KeyClass::Remaining => &self.remaining,
        }
    }

    fn set_mut(&mut self, class: KeyClass) -> &mut BTreeSet<String> {
        match class {
            KeyClass::Core => &mut self.core,
            KeyClass::Ignored => &mut self.ignored,
            KeyClass::Remaining => &mut self.remaining,
        }
    }

    /// Which set holds `key`, if any
    pub fn class_of(&self, key: &str) -> Option<KeyClass> {
        [KeyClass::Core, KeyClass::Ignored, KeyClass::Remaining]
            .into_iter()
            .find(|class| self.get(*class).contains(key))
    }

    pub fn len(&self) -> usize {
        self.core.len() + self.ignored.len() + self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every classified key, whatever its class
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.core
            .iter()
            .chain(&self.ignored)
            .chain(&self.remaining)
            .map(String::as_str)
    }
}

/// Classify a collection of raw keys
pub fn classify<I, S>(keys: I) -> ClassificationResult
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result = ClassificationResult::default();
    for key in keys {
        result.insert(key.as_ref());
    }
    result
}
