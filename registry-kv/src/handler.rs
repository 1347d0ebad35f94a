use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{StorageError, StorageResult};

pub use registry_model::FieldMap;

/// A table-oriented object store.
///
/// Implementations must apply each call atomically per key: a concurrent
/// reader sees a record either entirely before or entirely after a
/// `save_value` or `update_value`.
pub trait KvHandler: Send + Sync {
    /// Upserts the full record stored under `key`.
    ///
    /// `value` must serialize to a JSON object.
    fn save_value<T: Serialize>(&self, table: &str, key: &str, value: &T) -> StorageResult<()>;

    /// Overwrites the named fields of the record under `key`, leaving every
    /// other field as it is. A missing key is not an error and writes nothing.
    fn update_value(&self, table: &str, key: &str, fields: FieldMap) -> StorageResult<()>;

    /// Loads the records stored under `keys`. Keys with no record are absent
    /// from the result.
    fn load_values<T: DeserializeOwned>(
        &self,
        table: &str,
        keys: &[&str],
    ) -> StorageResult<HashMap<String, T>>;

    /// Scans the whole table and returns the records accepted by `predicate`.
    ///
    /// The predicate sees only the `watched` fields of each record; a watched
    /// field the record lacks is absent from the mapping.
    fn load_values_by_filter<T, F>(
        &self,
        table: &str,
        watched: &[&str],
        predicate: F,
    ) -> StorageResult<HashMap<String, T>>
    where
        T: DeserializeOwned,
        F: FnMut(&FieldMap) -> bool;

    /// Scans the whole table and returns every record.
    fn load_values_all<T: DeserializeOwned>(&self, table: &str) -> StorageResult<HashMap<String, T>>;
}

impl<H: KvHandler> KvHandler for Arc<H> {
    fn save_value<T: Serialize>(&self, table: &str, key: &str, value: &T) -> StorageResult<()> {
        (**self).save_value(table, key, value)
    }

    fn update_value(&self, table: &str, key: &str, fields: FieldMap) -> StorageResult<()> {
        (**self).update_value(table, key, fields)
    }

    fn load_values<T: DeserializeOwned>(
        &self,
        table: &str,
        keys: &[&str],
    ) -> StorageResult<HashMap<String, T>> {
        (**self).load_values(table, keys)
    }

    fn load_values_by_filter<T, F>(
        &self,
        table: &str,
        watched: &[&str],
        predicate: F,
    ) -> StorageResult<HashMap<String, T>>
    where
        T: DeserializeOwned,
        F: FnMut(&FieldMap) -> bool,
    {
        (**self).load_values_by_filter(table, watched, predicate)
    }

    fn load_values_all<T: DeserializeOwned>(&self, table: &str) -> StorageResult<HashMap<String, T>> {
        (**self).load_values_all(table)
    }
}

/// Serializes a value into the record shape handlers persist.
pub(crate) fn to_record<T: Serialize>(value: &T) -> StorageResult<FieldMap> {
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(StorageError::InvalidData(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Decodes a stored record into the caller's type.
pub(crate) fn decode<T: DeserializeOwned>(record: FieldMap) -> StorageResult<T> {
    Ok(serde_json::from_value(serde_json::Value::Object(record))?)
}

/// Restricts a record to the watched fields.
pub(crate) fn watched_fields(record: &FieldMap, watched: &[&str]) -> FieldMap {
    watched
        .iter()
        .filter_map(|name| record.get(*name).map(|v| ((*name).to_string(), v.clone())))
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
