//! Embedded key-value handlers for registry control-plane stores.
//!
//! A handler groups records into named tables. Each record is a flat JSON
//! object stored under a string key. Stores built on top of a handler see
//! five operations (see [`KvHandler`]): full upsert, in-place partial update,
//! batch point lookup, predicate scan, and full scan.
//!
//! # Implementations
//!
//! - [`MemoryHandler`] keeps every table in process memory
//! - [`SqliteHandler`] persists every table in one SQLite file
//!
//! Both keep values in their serialized form, so a value decodes the same way
//! whichever handler stored it.

mod error;
mod handler;
mod memory;
mod sqlite;

pub use error::{StorageError, StorageResult};
pub use handler::{FieldMap, KvHandler};
pub use memory::MemoryHandler;
pub use sqlite::SqliteHandler;
