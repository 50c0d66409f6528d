//! Error type shared by tables, records and the codec.

use thiserror::Error;

use crate::value::ValueKind;

#[derive(Debug, Error)]
pub enum RecordError {
    /// A value's runtime kind disagrees with the declared shape.
    ///
    /// `path` is the JSON pointer of the offending value relative to the
    /// top-level record (empty for the record itself).
    #[error(
        "type mismatch at `{path}`: field `{field}` (wire key `{wire_key}`) of `{record}` expects {expected}, found {found}"
    )]
    TypeMismatch {
        record: String,
        field: String,
        wire_key: String,
        path: String,
        expected: String,
        found: ValueKind,
    },
    /// An overflow key shadows a declared wire key.
    #[error("overflow key `{key}` collides with a declared field of `{record}`")]
    KeyCollision { record: String, key: String },
    /// The value cannot be represented on the wire.
    #[error("cannot serialize value: {0}")]
    Serialization(String),
    #[error("`{record}` declares no field `{identifier}`")]
    UnknownField { record: String, identifier: String },
    #[error("`{record}` declares {what} `{key}` more than once")]
    DuplicateKey {
        record: String,
        key: String,
        what: &'static str,
    },
    #[error("unknown record `{0}`")]
    UnknownRecord(String),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl RecordError {
    /// Wire key named by a type mismatch, if this is one.
    pub fn wire_key(&self) -> Option<&str> {
        match self {
            Self::TypeMismatch { wire_key, .. } => Some(wire_key),
            _ => None,
        }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    pub fn is_key_collision(&self) -> bool {
        matches!(self, Self::KeyCollision { .. })
    }
}

pub type Result<T> = std::result::Result<T, RecordError>;
