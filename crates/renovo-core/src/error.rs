//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error type used throughout the Renovo repository. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every mutation is all-or-nothing: on any error the persisted document
//!   is left exactly as it was before the call.
//! - Validation errors name the field path and the violated rule. Tests and
//!   callers match on substrings of these messages, so the wording is part
//!   of the contract and must stay stable.
//! - Not-found errors name the entity kind and the offending id.
//! - This layer never retries; retries, if any, belong to the caller.

use thiserror::Error;

/// Top-level error type for every repository operation.
#[derive(Error, Debug)]
pub enum RepoError {
    /// A referenced entity does not exist.
    #[error("{kind} \"{id}\" not found")]
    NotFound {
        /// Entity kind, e.g. `"project"`, `"section"`, `"invoice"`.
        kind: &'static str,
        /// The id that failed to resolve.
        id: String,
    },

    /// A named field violated a type, enum, uniqueness, or
    /// referential-integrity rule.
    #[error("{field} {reason}")]
    Validation {
        /// Field path, e.g. `"Item.unitId"`.
        field: String,
        /// The violated rule, e.g. `"\"x\" must reference an existing unit."`
        reason: String,
    },

    /// The operation conflicts with current state: duplicate id on create,
    /// deleting an entity still in use, or editing a non-draft invoice.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The document bytes are not valid JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Underlying read/write failure, opaque to this layer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepoError {
    /// Build a `NotFound` error for the given entity kind and id.
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Build a `Validation` error for the given field path and rule.
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Build a `Conflict` error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_kind_and_id() {
        let err = RepoError::not_found("section", "s-9");
        assert_eq!(err.to_string(), "section \"s-9\" not found");
    }

    #[test]
    fn test_validation_names_field_and_rule() {
        let err = RepoError::validation(
            "Item.unitId",
            "\"u-1\" must reference an existing unit.",
        );
        assert_eq!(
            err.to_string(),
            "Item.unitId \"u-1\" must reference an existing unit."
        );
    }

    #[test]
    fn test_conflict_display() {
        let err = RepoError::conflict("invoice \"inv-1\" is not a draft");
        assert!(err.to_string().contains("conflict"));
        assert!(err.to_string().contains("inv-1"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: RepoError = io.into();
        assert!(matches!(err, RepoError::Io(_)));
    }
}
