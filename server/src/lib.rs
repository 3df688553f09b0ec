//! # Bookstore Server
//!
//! The HTTP surface of the bookstore backend: configuration, resource
//! bootstrap, the Axum router and its handlers.
//!
//! ## Layout
//!
//! - [`config`]: environment configuration
//! - [`bootstrap`]: pool and store construction
//! - [`server`]: application state and router
//! - [`api`]: request handlers, grouped by resource
//! - [`auth`]: the authenticated-caller extractor and password helpers
//! - [`metrics`]: business metric descriptions
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = Config::from_env();
//! let resources = ResourceManager::from_config(&config).await?;
//! let app = build_router(resources.app_state());
//! axum::serve(listener, app).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod config;
pub mod metrics;
pub mod server;

pub use bootstrap::ResourceManager;
pub use config::Config;
pub use server::{AppState, build_router};
