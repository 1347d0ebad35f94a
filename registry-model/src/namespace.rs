use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A flat field-name to value mapping: the shape of every stored record and
/// of every partial update.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// A namespace registered with the control plane.
///
/// `name` is the storage key and never changes once the namespace exists.
/// A namespace with `valid == false` has been soft-deleted: it stays in the
/// table (and in full or incremental scans) but point lookups treat it as
/// absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Namespace {
    pub name: String,
    pub owner: String,
    pub token: String,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub valid: bool,
    pub create_time: DateTime<Utc>,
    pub modify_time: DateTime<Utc>,
}

impl Namespace {
    /// Creates a valid namespace stamped with the current time.
    pub fn new(name: impl Into<String>, owner: impl Into<String>, token: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            owner: owner.into(),
            token: token.into(),
            comment: String::new(),
            valid: true,
            create_time: now,
            modify_time: now,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Sets the soft-delete flag.
    #[must_use]
    pub fn with_valid(mut self, valid: bool) -> Self {
        self.valid = valid;
        self
    }

    /// Sets both timestamps to the given instant.
    #[must_use]
    pub fn with_times(mut self, at: DateTime<Utc>) -> Self {
        self.create_time = at;
        self.modify_time = at;
        self
    }
}

/// Orders two namespaces by `modify_time`, oldest first.
///
/// Namespaces with the same `modify_time` compare equal; callers must not
/// rely on their relative order.
pub fn by_modify_time(a: &Namespace, b: &Namespace) -> Ordering {
    a.modify_time.cmp(&b.modify_time)
}

/// Sorts namespaces most-recently-modified first, the order listings use.
pub fn sort_newest_first(namespaces: &mut [Namespace]) {
    namespaces.sort_by(|a, b| by_modify_time(b, a));
}
