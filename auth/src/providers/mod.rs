//! Authentication providers.
//!
//! Traits for the credential operations the HTTP layer depends on. The
//! server holds them as trait objects so tests can swap in [`crate::mocks`].

use crate::error::Result;
use crate::state::Principal;

/// Issues bearer tokens.
pub trait TokenIssuer: Send + Sync {
    /// Issue a token for the principal.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Hashing`] if signing fails.
    fn issue(&self, principal: &Principal) -> Result<String>;
}

/// Verifies bearer tokens.
pub trait TokenVerifier: Send + Sync {
    /// Resolve a token to the principal it was issued for.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Expired`] for an expired token and
    /// [`crate::AuthError::InvalidCredential`] for anything else it rejects.
    fn verify(&self, token: &str) -> Result<Principal>;
}

/// One-way password digests.
pub trait PasswordHasher: Send + Sync {
    /// Hash a password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Hashing`] if hashing fails.
    fn hash(&self, password: &str) -> Result<String>;

    /// Check a password against a stored digest.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::Hashing`] if the digest cannot be parsed.
    fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}
