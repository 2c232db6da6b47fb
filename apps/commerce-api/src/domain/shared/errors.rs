//! Error kinds shared by every bounded context.
//!
//! `StoreError` is what a repository adapter reports; it carries no
//! driver-specific detail so callers can map it without knowing the backend.

use thiserror::Error;

/// A payload or field failed a shape/range rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for '{field}': {message}")]
pub struct ValidationError {
    /// Offending field, in request (camelCase) naming.
    pub field: String,
    /// What rule was broken.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for a field.
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Failure reported by the store-access layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The targeted record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity kind ("user", "product", "order").
        entity: &'static str,
        /// Identifier that was looked up.
        id: String,
    },

    /// A unique field already holds this value.
    #[error("Unique constraint violated on '{field}'")]
    UniqueConflict {
        /// The unique field.
        field: String,
    },

    /// An atomic batch was rejected at commit time; nothing was applied.
    #[error("Write conflict: {reason}")]
    WriteConflict {
        /// Why the batch was rejected.
        reason: String,
    },

    /// Anything the adapter could not classify.
    #[error("Store error: {0}")]
    Other(String),
}

impl StoreError {
    /// Shorthand for a not-found error.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Shorthand for a write conflict.
    #[must_use]
    pub fn write_conflict(reason: impl Into<String>) -> Self {
        Self::WriteConflict {
            reason: reason.into(),
        }
    }
}
