//! Tagged-union model for schema-less metadata values
//!
//! Metadata returned by extraction services is arbitrary JSON. This module maps
//! any JSON node onto [`Value`], keeping the distinction between signed,
//! unsigned and floating point numbers and keeping duplicate object keys.
//!
//! Two routes lead into the model:
//!
//! - [`transform`] converts an already-parsed `serde_json::Value`. A
//!   `serde_json::Map` has already collapsed duplicate keys at that point.
//! - Deserializing JSON text straight into [`Value`] (see [`ValueSeed`]) sees
//!   every member, so `{"author": "a", "author": "b"}` keeps both.

use serde::de::{self, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum container nesting accepted when parsing text.
///
/// Kept below serde_json's own recursion guard (128) so that deep input is
/// reported through [`ValueSeed`] rather than as a syntax error.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Largest depth limit that [`ValueSeed`] can enforce.
///
/// serde_json rejects the 128th nested container before the visitor sees it,
/// so the seed has to trip on the 127th at the latest.
pub const MAX_SUPPORTED_DEPTH: usize = 126;

/// Any JSON value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int64(i64),
    UInt64(u64),
    Float64(f64),
    Text(String),
    Array(Vec<Value>),
    Object(Object),
}

/// Insertion-ordered, multi-valued mapping from key to value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Object {
    members: Vec<(String, Value)>,
}

impl Object {
    pub fn new() -> Self {
        Object { members: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Object {
            members: Vec::with_capacity(capacity),
        }
    }

    /// Append a member. An existing member with the same key is kept.
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.members.push((key.into(), value));
    }

    /// First value stored under `key` (exact match)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Every value stored under `key`, in insertion order
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.members
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, Value)> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = &'a (String, Value);
    type IntoIter = std::slice::Iter<'a, (String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Object {
            members: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl Value {
    /// Short name of the variant, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Int64(_) => "int64",
            Value::UInt64(_) => "uint64",
            Value::Float64(_) => "float64",
            Value::Text(_) => "text",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Non-negative integer: `Int64` when it fits, otherwise `UInt64`
    fn from_unsigned(u: u64) -> Value {
        match i64::try_from(u) {
            Ok(i) => Value::Int64(i),
            Err(_) => Value::UInt64(u),
        }
    }
}

/// Convert a parsed `serde_json` node into a [`Value`]
///
/// Never fails. Member order follows the source document (serde_json is built
/// with `preserve_order`).
pub fn transform(node: serde_json::Value) -> Value {
    match node {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => transform_number(&n),
        serde_json::Value::String(s) => Value::Text(s),
        serde_json::Value::Array(items) => {
            Value::Array(items.into_iter().map(transform).collect())
        }
        serde_json::Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, transform(value)))
                .collect(),
        ),
    }
}

fn transform_number(n: &serde_json::Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Int64(i)
    } else if let Some(u) = n.as_u64() {
        Value::UInt64(u)
    } else {
        match n.as_f64() {
            Some(f) => Value::Float64(f),
            None => Value::Null,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(node: serde_json::Value) -> Self {
        transform(node)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int64(i) => serializer.serialize_i64(*i),
            Value::UInt64(u) => serializer.serialize_u64(*u),
            Value::Float64(f) => serializer.serialize_f64(*f),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            // Duplicate keys are written as repeated members
            Value::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (key, value) in obj {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

/// Deserializes a [`Value`] while counting container nesting.
///
/// Exceeding `max_depth` fails with a custom error whose message starts with
/// [`TOO_DEEP`].
#[derive(Debug, Clone, Copy)]
pub struct ValueSeed {
    depth: usize,
    max_depth: usize,
}

pub(crate) const TOO_DEEP: &str = "nesting depth exceeds limit";

impl ValueSeed {
    pub fn new(max_depth: usize) -> Self {
        ValueSeed {
            depth: 0,
            max_depth,
        }
    }

    fn enter<E: de::Error>(self) -> Result<ValueSeed, E> {
        let depth = self.depth + 1;
        if depth > self.max_depth {
            return Err(E::custom(format_args!("{} of {}", TOO_DEEP, self.max_depth)));
        }
        Ok(ValueSeed { depth, ..self })
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for ValueSeed {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        self.deserialize(deserializer)
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> Result<Value, E> {
        Ok(Value::Int64(i))
    }

    // serde_json hands every non-negative integer to visit_u64
    fn visit_u64<E: de::Error>(self, u: u64) -> Result<Value, E> {
        Ok(Value::from_unsigned(u))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> Result<Value, E> {
        Ok(Value::Float64(f))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
        Ok(Value::Text(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<Value, E> {
        Ok(Value::Text(s))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let child = self.enter()?;
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element_seed(child)? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let child = self.enter()?;
        let mut obj = Object::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(child)?;
            obj.push(key, value);
        }
        Ok(Value::Object(obj))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed::new(DEFAULT_MAX_DEPTH).deserialize(deserializer)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int64(i) => write!(f, "{}", i),
            Value::UInt64(u) => write!(f, "{}", u),
            Value::Float64(x) if x.is_finite() => write!(f, "{:?}", x),
            Value::Float64(_) => f.write_str("null"),
            Value::Text(s) => write_quoted(f, s),
            Value::Array(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Value::Object(obj) => {
                f.write_str("{")?;
                for (idx, (key, value)) in obj.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": {}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
    f.write_str(&quoted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_transform() {
        assert_eq!(transform(json!(null)), Value::Null);
        assert_eq!(transform(json!(true)), Value::Bool(true));
        assert_eq!(transform(json!(-5)), Value::Int64(-5));
        assert_eq!(transform(json!(42)), Value::Int64(42));
        assert_eq!(transform(json!(1.5)), Value::Float64(1.5));
        assert_eq!(transform(json!("x")), Value::Text("x".to_string()));
    }

    #[test]
    fn test_transform_keeps_source_key_order() {
        let node: serde_json::Value =
            serde_json::from_str(r#"{"zeta": 1, "alpha": {"y": 2, "b": 3}, "mid": 4}"#).unwrap();
        let value = transform(node);
        let obj = value.as_object().unwrap();

        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        let inner = obj.get("alpha").and_then(Value::as_object).unwrap();
        assert_eq!(inner.keys().collect::<Vec<_>>(), vec!["y", "b"]);
    }

    #[test]
    fn test_floats_parse_without_precision_loss() {
        for text in [
            "1.0715660391465826e-75",
            "0.1",
            "2.2250738585072014e-308",
            "1.7976931348623157e308",
            "-3.141592653589793",
        ] {
            let expected: f64 = text.parse().unwrap();
            let parsed: Value = serde_json::from_str(text).unwrap();
            assert_eq!(parsed, Value::Float64(expected), "{text}");

            let Value::Float64(f) = parsed else { unreachable!() };
            assert_eq!(f.to_bits(), expected.to_bits(), "{text}");
        }
    }

    #[test]
    fn test_numeric_split() {
        assert_eq!(transform(json!(i64::MAX)), Value::Int64(i64::MAX));
        assert_eq!(transform(json!(i64::MIN)), Value::Int64(i64::MIN));
        assert_eq!(transform(json!(u64::MAX)), Value::UInt64(u64::MAX));

        let parsed: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(parsed, Value::UInt64(u64::MAX));

        let parsed: Value = serde_json::from_str("9223372036854775807").unwrap();
        assert_eq!(parsed, Value::Int64(i64::MAX));

        // Past u64 range: stored as a float rather than rejected
        let parsed: Value = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(parsed, Value::Float64(18446744073709551616.0));
    }

    #[test]
    fn test_scalar_round_trip() {
        for node in [
            json!(null),
            json!(false),
            json!(-17),
            json!(u64::MAX),
            json!(0.25),
            json!("héllo \"quoted\""),
        ] {
            let value = transform(node.clone());
            assert_eq!(serde_json::to_value(&value).unwrap(), node);
        }
    }

    #[test]
    fn test_nested_transform() {
        let value = transform(json!({"b": [1, 2, 3], "c": {"d": "x"}}));
        let obj = value.as_object().unwrap();

        assert_eq!(
            obj.get("b"),
            Some(&Value::Array(vec![
                Value::Int64(1),
                Value::Int64(2),
                Value::Int64(3)
            ]))
        );
        let c = obj.get("c").and_then(Value::as_object).unwrap();
        assert_eq!(c.get("d"), Some(&Value::Text("x".to_string())));
    }

    #[test]
    fn test_object_lookup_with_temporary_key() {
        let obj: Object = [
            ("dc:title", Value::Text("Notes".to_string())),
            ("dc:title", Value::Text("Draft".to_string())),
        ]
        .into_iter()
        .collect();

        // The key only lives for the call; the result borrows from `obj`
        let found = {
            let key = format!("dc:{}", "title");
            obj.get(&key)
        };
        assert_eq!(found.and_then(Value::as_str), Some("Notes"));
        assert_eq!(obj.get(&String::from("missing")), None);
    }

    #[test]
    fn test_duplicate_keys_survive_parsing() {
        let value: Value =
            serde_json::from_str(r#"{"author": "a", "Author": "b", "author": "c"}"#).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), 3);
        assert_eq!(obj.keys().collect::<Vec<_>>(), vec!["author", "Author", "author"]);
        let authors: Vec<_> = obj.get_all("author").filter_map(Value::as_str).collect();
        assert_eq!(authors, vec!["a", "c"]);

        let written = serde_json::to_string(&value).unwrap();
        assert_eq!(written, r#"{"author":"a","Author":"b","author":"c"}"#);
    }

    #[test]
    fn test_depth_limit() {
        let nested = format!("{}{}", "[".repeat(5), "]".repeat(5));

        let mut de = serde_json::Deserializer::from_str(&nested);
        assert!(ValueSeed::new(5).deserialize(&mut de).is_ok());

        let mut de = serde_json::Deserializer::from_str(&nested);
        let err = ValueSeed::new(4).deserialize(&mut de).unwrap_err();
        assert!(err.to_string().contains(TOO_DEEP));
    }

    #[test]
    fn test_deep_dublin_core_array_is_lossless() {
        let text = r#"{"dc:subject": [["a", ["b", ["c"]]], 1.0]}"#;
        let value: Value = serde_json::from_str(text).unwrap();
        let back: serde_json::Value = serde_json::to_value(&value).unwrap();
        let original: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_display() {
        let value: Value =
            serde_json::from_str(r#"{"a": [1, 2.5, "x"], "b": null, "c": {"d": true}}"#).unwrap();
        assert_eq!(
            value.to_string(),
            r#"{"a": [1, 2.5, "x"], "b": null, "c": {"d": true}}"#
        );
        assert_eq!(Value::Float64(3.0).to_string(), "3.0");
        assert_eq!(Value::Array(vec![]).to_string(), "[]");
        assert_eq!(Value::Text("say \"hi\"".into()).to_string(), r#""say \"hi\"""#);
    }
}
