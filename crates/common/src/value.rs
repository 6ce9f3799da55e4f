//! The closed set of value shapes the default serializer understands.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Deepest nesting of sequences and records a [`Value`] may have.
///
/// Tagged JSON spends two levels per container plus one for a tagged leaf,
/// and `serde_json` refuses to read past 127 levels: 2 * 63 + 1 = 127.
pub const MAX_DEPTH: usize = 63;

/// A structured value that can be encrypted into a message.
///
/// Records are keyed by string and ordered, so equal records always serialize
/// to equal bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Integer(i64),
    /// Must be finite; non-finite floats are rejected at serialization.
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Sequence(Vec<Value>),
    Record(BTreeMap<String, Value>),
}

impl Value {
    /// Build a record from `(key, value)` pairs.
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Returns the first shape inside this value that cannot be represented,
    /// described for an error message, or `None` if the whole tree is valid.
    ///
    /// Sequences and records may nest at most [`MAX_DEPTH`] levels. The walk
    /// stops at that depth, so arbitrarily deep input cannot exhaust the stack.
    pub fn find_unsupported(&self) -> Option<String> {
        self.find_unsupported_at(1)
    }

    fn find_unsupported_at(&self, depth: usize) -> Option<String> {
        match self {
            Value::Float(f) if !f.is_finite() => Some(format!("non-finite float {f}")),
            Value::Sequence(_) | Value::Record(_) if depth > MAX_DEPTH => {
                Some(format!("nesting deeper than {MAX_DEPTH} levels"))
            }
            Value::Sequence(items) => items
                .iter()
                .find_map(|v| v.find_unsupported_at(depth + 1)),
            Value::Record(map) => map.iter().find_map(|(k, v)| {
                v.find_unsupported_at(depth + 1)
                    .map(|reason| format!("{reason} at key {k:?}"))
            }),
            _ => None,
        }
    }

    /// Convert a plain JSON document into a [`Value`].
    ///
    /// JSON has no timestamp type, so strings stay strings. Unsigned integers
    /// above `i64::MAX` become floats.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Record(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Render this value as a plain JSON document.
    ///
    /// Timestamps become RFC 3339 strings; non-finite floats become `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Integer(i) => serde_json::Value::from(*i),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(t) => {
                serde_json::Value::String(t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Record(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Record(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
