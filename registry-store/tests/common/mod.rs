//! Shared test helpers for namespace store tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use registry_kv::{FieldMap, KvHandler, MemoryHandler, StorageError, StorageResult};
use registry_model::Namespace;
use registry_store::{ManualClock, NamespaceStore};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub type TestStore = NamespaceStore<CountingHandler, Arc<ManualClock>>;

/// Seconds since the Unix epoch as a UTC instant.
pub fn t(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

/// A namespace created at `t(100)`.
pub fn ns(name: &str, owner: &str, token: &str) -> Namespace {
    Namespace::new(name, owner, token).with_times(t(100))
}

/// A namespace created and last modified at `t(secs)`.
pub fn ns_at(name: &str, owner: &str, secs: i64) -> Namespace {
    Namespace::new(name, owner, "tok").with_times(t(secs))
}

/// Store over an in-memory handler with a manual clock starting at `t(1_000)`.
pub fn test_store() -> (TestStore, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(t(1_000)));
    let store = NamespaceStore::with_clock(CountingHandler::default(), Arc::clone(&clock));
    (store, clock)
}

/// Advances the clock by one second and returns the new instant.
pub fn tick(clock: &ManualClock) -> DateTime<Utc> {
    clock.advance(Duration::seconds(1));
    registry_store::Clock::now(clock)
}

pub fn names(items: &[Namespace]) -> Vec<String> {
    let mut names: Vec<String> = items.iter().map(|n| n.name.clone()).collect();
    names.sort();
    names
}

/// Memory handler that counts every call made to it.
#[derive(Default)]
pub struct CountingHandler {
    pub inner: MemoryHandler,
    calls: AtomicUsize,
}

impl CountingHandler {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl KvHandler for CountingHandler {
    fn save_value<T: Serialize>(&self, table: &str, key: &str, value: &T) -> StorageResult<()> {
        self.hit();
        self.inner.save_value(table, key, value)
    }

    fn update_value(&self, table: &str, key: &str, fields: FieldMap) -> StorageResult<()> {
        self.hit();
        self.inner.update_value(table, key, fields)
    }

    fn load_values<T: DeserializeOwned>(
        &self,
        table: &str,
        keys: &[&str],
    ) -> StorageResult<HashMap<String, T>> {
        self.hit();
        self.inner.load_values(table, keys)
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
        self.hit();
        self.inner.load_values_by_filter(table, watched, predicate)
    }

    fn load_values_all<T: DeserializeOwned>(&self, table: &str) -> StorageResult<HashMap<String, T>> {
        self.hit();
        self.inner.load_values_all(table)
    }
}

/// Handler whose every call fails.
pub struct FailingHandler;

fn broken() -> StorageError {
    StorageError::InvalidData("disk unavailable".to_string())
}

impl KvHandler for FailingHandler {
    fn save_value<T: Serialize>(&self, _: &str, _: &str, _: &T) -> StorageResult<()> {
        Err(broken())
    }

    fn update_value(&self, _: &str, _: &str, _: FieldMap) -> StorageResult<()> {
        Err(broken())
    }

    fn load_values<T: DeserializeOwned>(&self, _: &str, _: &[&str]) -> StorageResult<HashMap<String, T>> {
        Err(broken())
    }

    fn load_values_by_filter<T, F>(&self, _: &str, _: &[&str], _: F) -> StorageResult<HashMap<String, T>>
    where
        T: DeserializeOwned,
        F: FnMut(&FieldMap) -> bool,
    {
        Err(broken())
    }

    fn load_values_all<T: DeserializeOwned>(&self, _: &str) -> StorageResult<HashMap<String, T>> {
        Err(broken())
    }
}
