//! Namespace store for the registry control plane.
//!
//! [`NamespaceStore`] persists [`Namespace`](registry_model::Namespace)
//! records through any [`KvHandler`](registry_kv::KvHandler) and offers:
//! - validated full writes and two minimal partial updates (owner/comment,
//!   token rotation), each stamping a fresh `ModifyTime` in the same write
//! - soft-delete-aware point lookups
//! - owner substring listing
//! - offset/limit pages sorted newest first
//! - an incremental-sync scan keyed on `ModifyTime`, plus a [`SyncCursor`]
//!   that tracks the watermark between fetches
//!
//! # Example
//!
//! ```
//! use registry_kv::MemoryHandler;
//! use registry_model::Namespace;
//! use registry_store::NamespaceStore;
//!
//! let store = NamespaceStore::new(MemoryHandler::new());
//! store.add_namespace(&Namespace::new("payments", "team-a", "secret")).unwrap();
//! store.update_namespace_token("payments", "rotated").unwrap();
//!
//! let ns = store.get_namespace("payments").unwrap().unwrap();
//! assert_eq!(ns.token, "rotated");
//! assert_eq!(ns.owner, "team-a");
//! ```

mod clock;
mod cursor;
mod error;
mod store;

pub use clock::{Clock, FixedClock, ManualClock, SystemClock};
pub use cursor::SyncCursor;
pub use error::{StoreError, StoreResult};
pub use store::{NamespaceState, NamespaceStore, NAMESPACE_TABLE};
