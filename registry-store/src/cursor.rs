//! Incremental-sync watermark.

use chrono::{DateTime, Utc};
use registry_model::Namespace;

/// The `ModifyTime` watermark a replication consumer carries between fetches.
///
/// Fetching with [`NamespaceStore::sync`](crate::NamespaceStore::sync) returns
/// every namespace modified strictly after the watermark and then moves the
/// watermark to the newest `ModifyTime` seen. The watermark never moves back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyncCursor {
    watermark: DateTime<Utc>,
}

impl SyncCursor {
    /// Starts a cursor that has seen everything up to and including `watermark`.
    pub const fn new(watermark: DateTime<Utc>) -> Self {
        Self { watermark }
    }

    /// Starts a cursor that has seen nothing.
    pub const fn from_start() -> Self {
        Self::new(DateTime::<Utc>::MIN_UTC)
    }

    pub const fn watermark(&self) -> DateTime<Utc> {
        self.watermark
    }

    /// Advances the watermark past every namespace in `batch`.
    pub fn observe(&mut self, batch: &[Namespace]) {
        if let Some(newest) = batch.iter().map(|ns| ns.modify_time).max() {
            self.watermark = self.watermark.max(newest);
        }
    }
}

impl Default for SyncCursor {
    fn default() -> Self {
        Self::from_start()
    }
}
