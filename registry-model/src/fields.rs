//! Field names of a persisted namespace record.
//!
//! These strings are the keys of the stored JSON object and must stay stable:
//! records written by earlier store instances use exactly these names.

pub const NAME: &str = "Name";
pub const OWNER: &str = "Owner";
pub const TOKEN: &str = "Token";
pub const COMMENT: &str = "Comment";
pub const VALID: &str = "Valid";
pub const CREATE_TIME: &str = "CreateTime";
pub const MODIFY_TIME: &str = "ModifyTime";
