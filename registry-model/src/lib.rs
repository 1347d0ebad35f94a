//! Namespace entity model for the registry control plane.
//!
//! Defines the types the namespace store and its callers share:
//! - [`Namespace`]: the persisted entity (name, owner, token, soft-delete flag, timestamps)
//! - [`NamespacePatch`]: the two minimal partial updates a namespace accepts
//! - [`fields`]: the on-disk field names of a namespace record
//! - [`by_modify_time`] / [`sort_newest_first`]: the listing order
//!
//! Records are persisted as flat JSON objects keyed by the PascalCase field
//! names in [`fields`]. A patch is projected onto that same mapping, so the
//! storage handler never needs to know the entity type to apply it.

mod namespace;
mod patch;

pub mod fields;

pub use namespace::{by_modify_time, sort_newest_first, FieldMap, Namespace};
pub use patch::NamespacePatch;
