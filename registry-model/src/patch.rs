use chrono::{DateTime, Utc};

use crate::fields;
use crate::namespace::{FieldMap, Namespace};

/// A partial update to a stored namespace.
///
/// Each variant names exactly the fields its operation may touch. The two
/// field sets share only `ModifyTime`, which every patch carries so the
/// timestamp lands in the same write as the fields it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespacePatch {
    /// General update: owner and description.
    OwnerComment {
        owner: String,
        comment: String,
        modify_time: DateTime<Utc>,
    },
    /// Credential rotation.
    Token {
        token: String,
        modify_time: DateTime<Utc>,
    },
}

impl NamespacePatch {
    /// Builds the general-update patch from the owner and comment of `namespace`.
    ///
    /// Every other field of `namespace` (name, token, flags, timestamps) is ignored.
    pub fn owner_comment(namespace: &Namespace, now: DateTime<Utc>) -> Self {
        Self::OwnerComment {
            owner: namespace.owner.clone(),
            comment: namespace.comment.clone(),
            modify_time: now,
        }
    }

    /// Builds the token-rotation patch.
    pub fn token(token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::Token {
            token: token.into(),
            modify_time: now,
        }
    }

    /// The modification time this patch stamps on the record.
    pub fn modify_time(&self) -> DateTime<Utc> {
        match self {
            Self::OwnerComment { modify_time, .. } | Self::Token { modify_time, .. } => *modify_time,
        }
    }

    /// Names of the fields this patch writes.
    pub fn field_names(&self) -> &'static [&'static str] {
        match self {
            Self::OwnerComment { .. } => &[fields::OWNER, fields::COMMENT, fields::MODIFY_TIME],
            Self::Token { .. } => &[fields::TOKEN, fields::MODIFY_TIME],
        }
    }

    /// Projects the patch onto the flat field mapping a handler applies in place.
    pub fn into_fields(self) -> serde_json::Result<FieldMap> {
        let mut map = FieldMap::new();
        match self {
            Self::OwnerComment {
                owner,
                comment,
                modify_time,
            } => {
                map.insert(fields::OWNER.into(), owner.into());
                map.insert(fields::COMMENT.into(), comment.into());
                map.insert(fields::MODIFY_TIME.into(), serde_json::to_value(modify_time)?);
            }
            Self::Token { token, modify_time } => {
                map.insert(fields::TOKEN.into(), token.into());
                map.insert(fields::MODIFY_TIME.into(), serde_json::to_value(modify_time)?);
            }
        }
        Ok(map)
    }
}
