//! SQLite-backed handler.
//!
//! Every table lives in one `kv_records` table keyed by `(tbl, key)`, with the
//! record stored as JSON text. Partial updates read, merge and write the
//! record inside a single transaction.

use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

use crate::error::{StorageError, StorageResult};
use crate::handler::{decode, to_record, watched_fields, FieldMap, KvHandler};

/// Persistent handler backed by a single SQLite database.
pub struct SqliteHandler {
    conn: Mutex<Connection>,
}

impl SqliteHandler {
    /// Opens (or creates) a handler database at the given path.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening kv database");
        Self::with_connection(Connection::open(path)?)
    }

    /// Opens an in-memory handler (for testing).
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        let handler = Self {
            conn: Mutex::new(conn),
        };
        handler.init_schema()?;
        Ok(handler)
    }

    fn init_schema(&self) -> StorageResult<()> {
        self.lock()?.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv_records (
                tbl TEXT NOT NULL,
                key TEXT NOT NULL,
                value TEXT NOT NULL,
                PRIMARY KEY (tbl, key)
            );
            ",
        )?;
        Ok(())
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn scan<T, F>(&self, table: &str, mut keep: F) -> StorageResult<HashMap<String, T>>
    where
        T: DeserializeOwned,
        F: FnMut(&FieldMap) -> bool,
    {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM kv_records WHERE tbl = ?1")?;
        let rows = stmt.query_map(params![table], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = HashMap::new();
        for row in rows {
            let (key, text) = row?;
            let record = parse_record(&text)?;
            if keep(&record) {
                out.insert(key, decode(record)?);
            }
        }
        Ok(out)
    }
}

impl KvHandler for SqliteHandler {
    fn save_value<T: Serialize>(&self, table: &str, key: &str, value: &T) -> StorageResult<()> {
        let text = serde_json::to_string(&to_record(value)?)?;
        self.lock()?.execute(
            "INSERT OR REPLACE INTO kv_records (tbl, key, value) VALUES (?1, ?2, ?3)",
            params![table, key, text],
        )?;
        Ok(())
    }

    fn update_value(&self, table: &str, key: &str, fields: FieldMap) -> StorageResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let existing: Option<String> = tx
            .query_row(
                "SELECT value FROM kv_records WHERE tbl = ?1 AND key = ?2",
                params![table, key],
                |row| row.get(0),
            )
            .optional()?;

        let Some(text) = existing else {
            debug!(table, key, "update of missing record ignored");
            return Ok(());
        };

        let mut record = parse_record(&text)?;
        record.extend(fields);
        tx.execute(
            "UPDATE kv_records SET value = ?3 WHERE tbl = ?1 AND key = ?2",
            params![table, key, serde_json::to_string(&record)?],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn load_values<T: DeserializeOwned>(
        &self,
        table: &str,
        keys: &[&str],
    ) -> StorageResult<HashMap<String, T>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM kv_records WHERE tbl = ?1 AND key = ?2")?;

        let mut out = HashMap::new();
        for key in keys {
            let text: Option<String> = stmt
                .query_row(params![table, key], |row| row.get(0))
                .optional()?;
            if let Some(text) = text {
                out.insert((*key).to_string(), decode(parse_record(&text)?)?);
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
        self.scan(table, |record| predicate(&watched_fields(record, watched)))
    }

    fn load_values_all<T: DeserializeOwned>(&self, table: &str) -> StorageResult<HashMap<String, T>> {
        self.scan(table, |_| true)
    }
}

fn parse_record(text: &str) -> StorageResult<FieldMap> {
    match serde_json::from_str(text)? {
        serde_json::Value::Object(map) => Ok(map),
        _ => Err(StorageError::InvalidData(
            "stored record is not a JSON object".to_string(),
        )),
    }
}
