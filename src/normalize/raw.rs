//! Raw archival records
//!
//! A raw record is built field by field. A value that cannot be represented as
//! JSON is replaced with [`NOT_SERIALIZABLE`] so the rest of the record is
//! still archived.

use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder written for fields that failed to serialize
pub const NOT_SERIALIZABLE: &str = "<not serializable>";

/// A best-effort JSON object, written as one NDJSON line
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RawRecord(Map<String, Value>);

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from a sequence of fields
    pub fn from_fields<K, T, I>(fields: I) -> Self
    where
        K: Into<String>,
        T: Serialize,
        I: IntoIterator<Item = (K, T)>,
    {
        let mut record = Self::new();
        for (key, value) in fields {
            record.insert(key, &value);
        }
        record
    }

    /// Inserts one field, substituting the placeholder on encode failure
    pub fn insert<K, T>(&mut self, key: K, value: &T)
    where
        K: Into<String>,
        T: Serialize + ?Sized,
    {
        let key = key.into();
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!("Field `{}` is not serializable: {}", key, e);
                Value::String(NOT_SERIALIZABLE.to_string())
            }
        };
        self.0.insert(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The record as a single line of JSON, without the trailing newline
    pub fn to_json_line(&self) -> String {
        // Display on a JSON value is infallible and escapes control characters,
        // so the output never contains a raw newline.
        Value::Object(self.0.clone()).to_string()
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self::from_fields(map)
    }
}
