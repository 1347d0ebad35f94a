//! Error types for the key-value handlers.

use thiserror::Error;

/// Result type for handler operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in handler operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A value or stored record is not a flat JSON object.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// A thread panicked while holding the handler's lock.
    #[error("storage lock poisoned")]
    LockPoisoned,
}
