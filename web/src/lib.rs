//! Axum integration for the bookstore backend.
//!
//! The pieces every HTTP handler shares:
//!
//! - [`AppError`]: the `{ code, message }` error envelope, with conversions
//!   from [`bookstore_core::StoreError`] and [`bookstore_auth::AuthError`]
//! - Extractors: [`CorrelationId`], [`ClientIp`], [`UserAgent`], [`BearerToken`]
//!   and [`PageParams`]
//! - [`correlation_id_layer`]: request span plus `X-Correlation-ID` echo
//! - Liveness and readiness handlers
//!
//! # Example
//!
//! ```ignore
//! use bookstore_web::{AppError, PageParams};
//! use axum::{extract::{Query, State}, Json};
//!
//! async fn list(
//!     State(state): State<AppState>,
//!     Query(params): Query<PageParams>,
//! ) -> Result<Json<Listing>, AppError> {
//!     let pagination = params.pagination()?;
//!     let page = state.store.list(pagination).await?;
//!     Ok(Json(Listing::new(page, pagination)))
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{BearerToken, ClientIp, CorrelationId, PageParams, UserAgent};
pub use middleware::{CORRELATION_ID_HEADER, CorrelationIdExt, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
