//! # Bookstore Authentication
//!
//! Credential seams used by the HTTP layer:
//!
//! - [`TokenIssuer`] / [`TokenVerifier`]: bearer tokens carrying a [`Principal`]
//! - [`PasswordHasher`]: one-way password digests
//!
//! Production implementations are [`JwtTokenService`] (HS256) and
//! [`Argon2PasswordHasher`]. With the default `test-utils` feature, the
//! [`mocks`] module provides deterministic in-memory stand-ins.
//!
//! ## Example
//!
//! ```rust,ignore
//! use bookstore_auth::{JwtTokenService, Principal, TokenIssuer, TokenVerifier};
//!
//! let tokens = JwtTokenService::new(b"secret", std::time::Duration::from_secs(3600));
//! let token = tokens.issue(&Principal::new(42, "reader"))?;
//! assert_eq!(tokens.verify(&token)?.id, 42);
//! ```

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod constants;
pub mod error;
pub mod providers;
pub mod services;
pub mod state;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use error::{AuthError, Result};
pub use providers::{PasswordHasher, TokenIssuer, TokenVerifier};
pub use services::{Argon2PasswordHasher, JwtTokenService};
pub use state::{Claims, Principal};
