//! Record value model
//!
//! Records are trees of maps and lists with scalar leaves. Sources that
//! produce JSON can convert through `From<serde_json::Value>`; sources with
//! richer scalars (native timestamps, binary blobs) build [`Value`]s directly.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};

use super::error::InferenceError;

/// A node in a record tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent / null value
    Null,
    /// Boolean value
    Boolean(bool),
    /// Integral number
    Integer(i64),
    /// Floating point number
    Number(f64),
    /// Text value (subject to literal detection)
    Text(String),
    /// Native timestamp
    Timestamp(DateTime<FixedOffset>),
    /// Opaque binary value
    Bytes(Vec<u8>),
    /// Ordered list of values
    List(Vec<Value>),
    /// String-keyed map of values
    Map(BTreeMap<String, Value>),
}

/// A single record: the root of a value tree
pub type Record = Value;

impl Value {
    /// Name of this value's kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Number(_) => "number",
            Value::Text(_) => "text",
            Value::Timestamp(_) => "timestamp",
            Value::Bytes(_) => "bytes",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }

    /// Check if this value is a map or a list
    pub fn is_container(&self) -> bool {
        matches!(self, Value::List(_) | Value::Map(_))
    }

    /// Check if this value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                // u64 beyond i64::MAX and real numbers
                None => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Map(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Value> for Value {
    fn from(value: &serde_json::Value) -> Self {
        Value::from(value.clone())
    }
}

/// Parse record text: a JSON document (an object or an array of records) or
/// newline-delimited JSON, one record per non-empty line.
pub fn parse_records(text: &str) -> Result<Vec<Value>, InferenceError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if let Ok(document) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return match document {
            serde_json::Value::Array(items) => Ok(items.into_iter().map(Value::from).collect()),
            object @ serde_json::Value::Object(_) => Ok(vec![Value::from(object)]),
            other => Err(InferenceError::MalformedInput(
                Value::from(other).kind_name().to_string(),
            )),
        };
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str::<serde_json::Value>(line)
                .map(Value::from)
                .map_err(InferenceError::from)
        })
        .collect()
}
