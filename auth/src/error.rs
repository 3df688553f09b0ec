//! Error types for authentication operations.

use thiserror::Error;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Failure modes of the credential seams.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential was presented.
    #[error("Authentication required")]
    Unauthenticated,

    /// The presented credential is malformed, forged or unknown.
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    /// The presented token is past its expiry.
    #[error("Token has expired")]
    Expired,

    /// Hashing or token signing failed.
    #[error("Credential processing failed: {0}")]
    Hashing(String),
}

impl AuthError {
    /// Returns `true` if the caller should be answered with 401.
    ///
    /// # Examples
    ///
    /// ```
    /// # use bookstore_auth::AuthError;
    /// assert!(AuthError::Expired.is_client_error());
    /// assert!(!AuthError::Hashing("bad salt".into()).is_client_error());
    /// ```
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Hashing(_))
    }
}
