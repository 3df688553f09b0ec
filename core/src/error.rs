//! Error taxonomy shared by every store.
//!
//! The variants separate client-correctable failures (validation, missing
//! entities, conflicts) from infrastructure faults (timeouts and driver
//! errors). The HTTP layer maps each variant onto a status code; only the
//! infrastructure variants carry detail that must never reach a client.

use std::fmt;
use thiserror::Error;

/// Errors returned by store operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Malformed or missing input, rejected before any database access.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required entity does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Entity kind (e.g. `"Order"`).
        entity: &'static str,
        /// Identifier that failed to resolve.
        id: String,
    },

    /// A uniqueness constraint, stock guard or transition rule was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The operation did not finish within the configured timeout.
    #[error("Operation timed out: {operation}")]
    Timeout {
        /// Name of the store operation that timed out.
        operation: &'static str,
    },

    /// Any other database or driver fault.
    #[error("Database error: {0}")]
    Database(String),
}

impl StoreError {
    /// Create a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a not-found error for the given entity kind and id.
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Create a conflict error.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// Create a database error.
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    /// Whether the error is an infrastructure fault rather than a
    /// client-correctable one.
    #[must_use]
    pub const fn is_infrastructure(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Database(_))
    }
}

/// Reject text the database cannot store.
///
/// `PostgreSQL` text values cannot contain U+0000.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] naming `field` if `value` contains a
/// NUL character.
pub fn check_text(field: &str, value: &str) -> Result<(), StoreError> {
    if value.contains('\0') {
        return Err(StoreError::validation(format!(
            "{field} must not contain NUL characters"
        )));
    }
    Ok(())
}
