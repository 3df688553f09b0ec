//! Mock provider implementations for testing.
//!
//! Deterministic, in-memory implementations of the provider traits for
//! handler tests.

pub mod password;
pub mod token;

pub use password::PlainPasswordHasher;
pub use token::MockTokenService;
