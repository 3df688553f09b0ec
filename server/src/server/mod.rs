//! HTTP server module for the bookstore.
//!
//! This module provides the Axum-based HTTP server with:
//! - Application state management
//! - Router configuration
//! - CORS for the storefront origin

pub mod routes;
pub mod state;

pub use routes::{build_router, cors_layer};
pub use state::AppState;
