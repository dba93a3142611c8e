use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schema::ColumnType;

/// A tagged field value. Every value stored in a record carries its own tag,
/// so type checks against the column's declared type are exhaustive matches
/// rather than runtime probing.
///
/// Deserialization is untagged: plain YAML/JSON scalars map onto the obvious
/// variants, and anything structured (sequences, mappings) becomes
/// `Structured`. `Timestamp` values are only produced by the engine itself
/// (timestamp columns and mirrored record timestamps); an incoming RFC 3339
/// string stays a `String`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Structured(serde_json::Value),
}

impl Value {
    /// The tag name, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Timestamp(_) => "timestamp",
            Value::Structured(_) => "structured",
        }
    }

    /// Whether this value's tag matches the given column type.
    pub fn matches(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (Value::String(_), ColumnType::String)
                | (Value::Number(_), ColumnType::Number)
                | (Value::Bool(_), ColumnType::Boolean)
                | (Value::Timestamp(_), ColumnType::Timestamp)
                | (Value::Structured(_), ColumnType::Structured)
                | (Value::Null, ColumnType::Null)
        )
    }

    /// Convert to a plain JSON value for snapshot export.
    /// Timestamps become RFC 3339 strings; a non-finite number becomes null.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
            Value::Structured(v) => v.clone(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}
