//! Error types for the namespace store.

use registry_kv::StorageError;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required argument was empty. Raised before the handler is touched.
    #[error("{op}: {reason}")]
    Validation {
        op: &'static str,
        reason: &'static str,
    },

    /// Failure reported by the underlying handler, passed through unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl StoreError {
    pub(crate) fn validation(op: &'static str, reason: &'static str) -> Self {
        Self::Validation { op, reason }
    }

    /// Returns true for a rejected argument, as opposed to a storage failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Storage(StorageError::Serialization(err))
    }
}
