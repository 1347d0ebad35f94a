use chrono::{DateTime, Utc};
use registry_kv::KvHandler;
use registry_model::{fields, sort_newest_first, Namespace, NamespacePatch};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::cursor::SyncCursor;
use crate::error::{StoreError, StoreResult};

/// Handler table every namespace record lives in.
pub const NAMESPACE_TABLE: &str = "namespace";

/// Outcome of a point lookup that keeps "absent" and "soft-deleted" apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceState {
    NotFound,
    Deleted(Namespace),
    Found(Namespace),
}

impl NamespaceState {
    /// Collapses to the two-way view: only a live namespace is returned.
    pub fn into_live(self) -> Option<Namespace> {
        match self {
            Self::Found(ns) => Some(ns),
            Self::NotFound | Self::Deleted(_) => None,
        }
    }
}

/// Namespace persistence on top of a key-value handler.
///
/// Arguments are validated before the handler is called; a rejected call
/// performs no storage work. Every mutation is a single handler call whose
/// patch carries the new `ModifyTime` together with the fields it changes.
pub struct NamespaceStore<H, C = SystemClock> {
    handler: H,
    clock: C,
    table: &'static str,
}

impl<H: KvHandler> NamespaceStore<H> {
    /// Creates a store stamping modifications with the system clock.
    pub fn new(handler: H) -> Self {
        Self::with_clock(handler, SystemClock::new())
    }
}

impl<H: KvHandler, C: Clock> NamespaceStore<H, C> {
    /// Creates a store stamping modifications with `clock`.
    pub fn with_clock(handler: H, clock: C) -> Self {
        Self {
            handler,
            clock,
            table: NAMESPACE_TABLE,
        }
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // ── Writes ───────────────────────────────────────────────────

    /// Writes the whole namespace under its name, replacing any existing record.
    pub fn add_namespace(&self, namespace: &Namespace) -> StoreResult<()> {
        const OP: &str = "add namespace";
        require(OP, &namespace.name, "name is empty")?;
        require(OP, &namespace.owner, "owner is empty")?;
        require(OP, &namespace.token, "token is empty")?;

        debug!(table = self.table, name = %namespace.name, "saving namespace");
        self.handler
            .save_value(self.table, &namespace.name, namespace)?;
        Ok(())
    }

    /// Replaces the owner and comment of the namespace named `namespace.name`.
    ///
    /// The token and every other field in `namespace` are ignored. Whether a
    /// missing record is an error is up to the handler.
    pub fn update_namespace(&self, namespace: &Namespace) -> StoreResult<()> {
        const OP: &str = "update namespace";
        require(OP, &namespace.name, "name is empty")?;
        require(OP, &namespace.owner, "owner is empty")?;

        let patch = NamespacePatch::owner_comment(namespace, self.clock.now());
        self.apply(&namespace.name, patch)
    }

    /// Rotates the token of the namespace called `name`.
    pub fn update_namespace_token(&self, name: &str, token: &str) -> StoreResult<()> {
        const OP: &str = "update namespace token";
        require(OP, name, "name is empty")?;
        require(OP, token, "token is empty")?;

        let patch = NamespacePatch::token(token, self.clock.now());
        self.apply(name, patch)
    }

    fn apply(&self, name: &str, patch: NamespacePatch) -> StoreResult<()> {
        debug!(
            table = self.table,
            name,
            fields = ?patch.field_names(),
            "patching namespace"
        );
        self.handler
            .update_value(self.table, name, patch.into_fields()?)?;
        Ok(())
    }

    // ── Point lookups ────────────────────────────────────────────

    /// Returns the live namespace called `name`.
    ///
    /// `None` covers both a name that was never stored and a soft-deleted one.
    pub fn get_namespace(&self, name: &str) -> StoreResult<Option<Namespace>> {
        Ok(self.namespace_state(name)?.into_live())
    }

    /// Looks up `name`, telling a soft-deleted record apart from a missing one.
    pub fn namespace_state(&self, name: &str) -> StoreResult<NamespaceState> {
        let mut values = self
            .handler
            .load_values::<Namespace>(self.table, &[name])?;
        Ok(match values.remove(name) {
            None => NamespaceState::NotFound,
            Some(ns) if !ns.valid => NamespaceState::Deleted(ns),
            Some(ns) => NamespaceState::Found(ns),
        })
    }

    // ── Scans ────────────────────────────────────────────────────

    /// Returns every namespace whose owner contains `owner` as a substring.
    ///
    /// The match is unanchored and case-sensitive. Soft-deleted namespaces
    /// are not filtered out.
    pub fn list_namespaces(&self, owner: &str) -> StoreResult<Vec<Namespace>> {
        require("list namespaces", owner, "owner is empty")?;

        let values = self
            .handler
            .load_values_by_filter::<Namespace, _>(self.table, &[fields::OWNER], |record| {
                record
                    .get(fields::OWNER)
                    .and_then(|v| v.as_str())
                    .is_some_and(|stored| stored.contains(owner))
            })?;
        Ok(values.into_values().collect())
    }

    /// Returns one page of all namespaces, most recently modified first.
    ///
    /// The page covers positions `offset * limit` up to `offset * limit + limit`
    /// of the sorted table; a page past the end is empty. `filter` is accepted
    /// for interface compatibility and does not narrow the result. The second
    /// value is always `0` and is not a total count.
    pub fn get_namespaces(
        &self,
        filter: &HashMap<String, Vec<String>>,
        offset: usize,
        limit: usize,
    ) -> StoreResult<(Vec<Namespace>, u32)> {
        if !filter.is_empty() {
            debug!(keys = ?filter.keys().collect::<Vec<_>>(), "namespace page filter ignored");
        }

        let values = self.handler.load_values_all::<Namespace>(self.table)?;
        let mut namespaces: Vec<Namespace> = values.into_values().collect();
        sort_newest_first(&mut namespaces);

        let total = namespaces.len();
        let start = offset.checked_mul(limit).unwrap_or(usize::MAX);
        if start >= total {
            return Ok((Vec::new(), 0));
        }
        let end = start.saturating_add(limit).min(total);
        Ok((namespaces.drain(start..end).collect(), 0))
    }

    /// Returns every namespace modified strictly after `mtime`, soft-deleted
    /// ones included.
    ///
    /// Callers keep the newest `ModifyTime` they have seen and pass it back on
    /// the next call; a record stamped exactly `mtime` is not returned again.
    /// `ModifyTime` is read with the same decoder as the full record, so every
    /// record a point lookup can return is also visible here.
    pub fn get_more_namespaces(&self, mtime: DateTime<Utc>) -> StoreResult<Vec<Namespace>> {
        let values = self.handler.load_values_by_filter::<Namespace, _>(
            self.table,
            &[fields::MODIFY_TIME],
            |record| {
                record
                    .get(fields::MODIFY_TIME)
                    .and_then(|v| DateTime::<Utc>::deserialize(v).ok())
                    .is_some_and(|t| t > mtime)
            },
        )?;
        Ok(values.into_values().collect())
    }

    /// Fetches everything newer than the cursor and advances it past the batch.
    pub fn sync(&self, cursor: &mut SyncCursor) -> StoreResult<Vec<Namespace>> {
        let batch = self.get_more_namespaces(cursor.watermark())?;
        cursor.observe(&batch);
        debug!(
            count = batch.len(),
            watermark = %cursor.watermark(),
            "incremental namespace sync"
        );
        Ok(batch)
    }
}

fn require(op: &'static str, value: &str, reason: &'static str) -> StoreResult<()> {
    if value.is_empty() {
        return Err(StoreError::validation(op, reason));
    }
    Ok(())
}
