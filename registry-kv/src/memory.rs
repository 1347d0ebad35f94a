//! In-process handler.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::handler::{decode, to_record, watched_fields, FieldMap, KvHandler};

type Tables = HashMap<String, BTreeMap<String, FieldMap>>;

/// Handler that keeps every table in memory.
///
/// Records are held in serialized form, so decoding behaves exactly as it
/// does for [`SqliteHandler`](crate::SqliteHandler). Nothing survives the
/// handler being dropped.
#[derive(Debug, Default)]
pub struct MemoryHandler {
    tables: RwLock<Tables>,
}

impl MemoryHandler {
    /// Creates an empty handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of records in `table`.
    pub fn len(&self, table: &str) -> StorageResult<usize> {
        Ok(self.read()?.get(table).map_or(0, BTreeMap::len))
    }

    /// Returns true if `table` holds no records.
    pub fn is_empty(&self, table: &str) -> StorageResult<bool> {
        Ok(self.len(table)? == 0)
    }

    /// Returns the raw stored record under `key`, if any.
    pub fn raw_record(&self, table: &str, key: &str) -> StorageResult<Option<FieldMap>> {
        Ok(self
            .read()?
            .get(table)
            .and_then(|records| records.get(key))
            .cloned())
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables.write().map_err(|_| StorageError::LockPoisoned)
    }

    fn collect<T, F>(&self, table: &str, mut keep: F) -> StorageResult<HashMap<String, T>>
    where
        T: DeserializeOwned,
        F: FnMut(&FieldMap) -> bool,
    {
        let tables = self.read()?;
        let Some(records) = tables.get(table) else {
            return Ok(HashMap::new());
        };
        let mut out = HashMap::new();
        for (key, record) in records {
            if keep(record) {
                out.insert(key.clone(), decode(record.clone())?);
            }
        }
        Ok(out)
    }
}

impl KvHandler for MemoryHandler {
    fn save_value<T: Serialize>(&self, table: &str, key: &str, value: &T) -> StorageResult<()> {
        let record = to_record(value)?;
        self.write()?
            .entry(table.to_string())
            .or_default()
            .insert(key.to_string(), record);
        Ok(())
    }

    fn update_value(&self, table: &str, key: &str, fields: FieldMap) -> StorageResult<()> {
        let mut tables = self.write()?;
        match tables.get_mut(table).and_then(|records| records.get_mut(key)) {
            Some(record) => record.extend(fields),
            None => debug!(table, key, "update of missing record ignored"),
        }
        Ok(())
    }

    fn load_values<T: DeserializeOwned>(
        &self,
        table: &str,
        keys: &[&str],
    ) -> StorageResult<HashMap<String, T>> {
        let tables = self.read()?;
        let Some(records) = tables.get(table) else {
            return Ok(HashMap::new());
        };
        let mut out = HashMap::new();
        for key in keys {
            if let Some(record) = records.get(*key) {
                out.insert((*key).to_string(), decode(record.clone())?);
            }
        }
        Ok(out)
    }

    fn load_values_by_filter<T, F>(
        &self,
        table: &str,
        watched: &[&str],
        mut predicate: F,
    ) -> StorageResult<HashMap<String, T>>
    where
        T: DeserializeOwned,
        F: FnMut(&FieldMap) -> bool,
    {
        self.collect(table, |record| predicate(&watched_fields(record, watched)))
    }

    fn load_values_all<T: DeserializeOwned>(&self, table: &str) -> StorageResult<HashMap<String, T>> {
        self.collect(table, |_| true)
    }
}
