//! Run metadata document (`params.yaml`)

use crate::state::BoundWindow;
use crate::storage::traits::{StorageError, StorageResult};
use serde::Serialize;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// The run metadata: invocation options plus crawl progress fields
pub type ParamsDocument = Mapping;

/// Older end of the last lap's window
pub const UTC_OLDER: &str = "utc_older";
/// Newer end of the last lap's window
pub const UTC_NEWER: &str = "utc_newer";
pub const TOTAL_COMMENTS: &str = "total_comments_counter";
pub const TOTAL_SUBMISSIONS: &str = "total_submissions_counter";
pub const TOTAL: &str = "total_counter";

/// Serializes a struct into a metadata document
pub fn params_from<T: Serialize>(value: &T) -> StorageResult<ParamsDocument> {
    match serde_yaml::to_value(value)? {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(StorageError::NotAMapping(format!("{:?}", other))),
    }
}

/// Sets `key` to `value`, replacing any previous value
pub fn set_param<V: Into<Value>>(doc: &mut ParamsDocument, key: &str, value: V) {
    doc.insert(Value::from(key), value.into());
}

/// Sets `key` to `value`, or to null when absent
pub fn set_optional_param(doc: &mut ParamsDocument, key: &str, value: Option<i64>) {
    let value = value.map(Value::from).unwrap_or(Value::Null);
    doc.insert(Value::from(key), value);
}

/// Reads an integer field
pub fn get_i64(doc: &ParamsDocument, key: &str) -> Option<i64> {
    doc.get(key).and_then(Value::as_i64)
}

/// The window recorded by the last completed lap of a run
pub fn window_from_params(doc: &ParamsDocument) -> BoundWindow {
    BoundWindow {
        lower: get_i64(doc, UTC_OLDER),
        upper: get_i64(doc, UTC_NEWER),
    }
}

pub fn write_params(path: &Path, doc: &ParamsDocument) -> StorageResult<()> {
    let yaml = serde_yaml::to_string(doc)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

pub fn read_params(path: &Path) -> StorageResult<ParamsDocument> {
    let content = std::fs::read_to_string(path)?;
    let value: Value = serde_yaml::from_str(&content)?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(StorageError::NotAMapping(format!("{:?}", other))),
    }
}
