//! Error types for the objstream engine.

use crate::{GraphId, TypeName, TypeVersion};
use thiserror::Error;

/// All possible errors from the objstream engine.
///
/// Every variant is terminal for the encode or decode call that raised it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Registry errors
    #[error("type already registered: {0}")]
    DuplicateType(TypeName),

    #[error("unknown type: {0}")]
    UnknownType(TypeName),

    #[error("invalid descriptor for type '{type_id}': {reason}")]
    InvalidDescriptor { type_id: TypeName, reason: String },

    #[error("invalid schema document: {0}")]
    InvalidSchema(String),

    // Encode errors
    #[error("instance of unregistered type: {0}")]
    UnregisteredType(TypeName),

    #[error("object handle {0} does not belong to this graph")]
    InvalidHandle(usize),

    #[error("object graph too large: {0} objects")]
    GraphTooLarge(usize),

    // Decode errors
    #[error("version mismatch for type '{type_id}': expected {expected}, found {found}")]
    VersionMismatch {
        type_id: TypeName,
        expected: TypeVersion,
        found: TypeVersion,
    },

    #[error("truncated stream: needed {needed} bytes at offset {offset}")]
    TruncatedStream { offset: usize, needed: usize },

    #[error("malformed field '{field}' of type '{type_id}': {reason}")]
    MalformedField {
        type_id: TypeName,
        field: String,
        reason: String,
    },

    #[error("dangling reference to graph id {0}")]
    DanglingReference(GraphId),

    #[error("graph id {0} defined more than once")]
    DuplicateRecord(GraphId),

    #[error("stream has no root record")]
    MissingRoot,

    #[error("{0} trailing bytes after last record")]
    TrailingBytes(usize),
}

impl Error {
    pub(crate) fn malformed(
        type_id: impl Into<TypeName>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::MalformedField {
            type_id: type_id.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::UnknownType("Ghost".into());
        assert_eq!(err.to_string(), "unknown type: Ghost");

        let err = Error::VersionMismatch {
            type_id: "Account".into(),
            expected: 1,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "version mismatch for type 'Account': expected 1, found 2"
        );

        let err = Error::malformed("Account", "active", "invalid bool byte 7");
        assert_eq!(
            err.to_string(),
            "malformed field 'active' of type 'Account': invalid bool byte 7"
        );

        let err = Error::TruncatedStream {
            offset: 12,
            needed: 8,
        };
        assert_eq!(
            err.to_string(),
            "truncated stream: needed 8 bytes at offset 12"
        );
    }
}
