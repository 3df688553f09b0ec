//! Authenticated callers and password hashing off the async runtime.

use crate::server::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use bookstore_auth::{PasswordHasher, Principal};
use bookstore_web::{AppError, BearerToken};
use std::sync::Arc;

/// The caller identified by a valid bearer token.
///
/// Rejects with 401 when the header is missing or malformed, or when the
/// token does not verify.
///
/// # Example
///
/// ```rust,ignore
/// async fn profile(AuthUser(principal): AuthUser, State(state): State<AppState>) -> ... {
///     state.users.get_profile(principal.id).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let BearerToken(token) = BearerToken::from_request_parts(parts, state).await?;

        let principal = state.token_verifier.verify(&token).map_err(|err| {
            tracing::debug!(error = %err, "Bearer token rejected");
            AppError::from(err)
        })?;

        Ok(Self(principal))
    }
}

/// Hash a password on the blocking pool.
///
/// # Errors
///
/// Returns a 500 [`AppError`] if hashing fails or the task panics.
pub async fn hash_password(
    hasher: Arc<dyn PasswordHasher>,
    password: String,
) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|err| AppError::internal("An internal error occurred").with_source(err.into()))?
        .map_err(AppError::from)
}

/// Verify a password against a stored digest on the blocking pool.
///
/// # Errors
///
/// Returns a 500 [`AppError`] if the digest is unusable or the task panics.
pub async fn verify_password(
    hasher: Arc<dyn PasswordHasher>,
    password: String,
    digest: String,
) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
        .await
        .map_err(|err| AppError::internal("An internal error occurred").with_source(err.into()))?
        .map_err(AppError::from)
}
