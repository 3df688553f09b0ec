//! Resource management for infrastructure setup.
//!
//! Centralizes pool creation and store construction into a single
//! [`ResourceManager`].
//!
//! # Example
//!
//! ```rust,ignore
//! let config = Config::from_env();
//! let resources = ResourceManager::from_config(&config).await?;
//! let app = build_router(resources.app_state());
//! // ... serve ...
//! resources.close().await;
//! ```

use crate::config::Config;
use crate::server::AppState;
use bookstore_auth::{Argon2PasswordHasher, JwtTokenService};
use bookstore_core::StoreError;
use bookstore_postgres::{
    PostgresBookStore, PostgresCarouselStore, PostgresCategoryStore, PostgresFavoriteStore,
    PostgresOrderStore, PostgresReadiness, PostgresUserStore, StoreOptions, apply_schema, connect,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Owns the process-wide connection pool and the settings derived from
/// configuration.
#[derive(Clone)]
pub struct ResourceManager {
    /// Application configuration
    pub config: Arc<Config>,

    /// The one connection pool of the process
    pub pool: PgPool,

    /// Options shared by every store
    pub store_options: StoreOptions,
}

impl ResourceManager {
    /// Connect the pool and, if configured, apply the schema.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database cannot be reached or
    /// the schema fails to apply.
    pub async fn from_config(config: &Config) -> Result<Self, StoreError> {
        info!("Connecting to database...");
        let pool = connect(&config.pool_settings()).await?;

        if config.database.apply_schema {
            info!("Applying schema...");
            apply_schema(&pool).await?;
        }

        let store_options = config.store_options();
        info!(
            reserve_stock = store_options.reserve_stock,
            transition_policy = ?store_options.transition_policy,
            timeout_ms = u64::try_from(store_options.operation_timeout.as_millis()).unwrap_or(u64::MAX),
            "Stores configured"
        );

        Ok(Self {
            config: Arc::new(config.clone()),
            pool,
            store_options,
        })
    }

    /// Build the handler state over the `PostgreSQL` stores.
    #[must_use]
    pub fn app_state(&self) -> AppState {
        let pool = &self.pool;
        let options = self.store_options;
        let tokens = Arc::new(JwtTokenService::new(
            self.config.auth.jwt_secret.as_bytes(),
            Duration::from_secs(self.config.auth.token_ttl),
        ));

        AppState {
            books: Arc::new(PostgresBookStore::with_options(pool.clone(), options)),
            categories: Arc::new(PostgresCategoryStore::with_options(pool.clone(), options)),
            carousels: Arc::new(PostgresCarouselStore::with_options(pool.clone(), options)),
            orders: Arc::new(PostgresOrderStore::with_options(pool.clone(), options)),
            users: Arc::new(PostgresUserStore::with_options(pool.clone(), options)),
            favorites: Arc::new(PostgresFavoriteStore::with_options(pool.clone(), options)),
            readiness: Arc::new(PostgresReadiness::new(pool.clone(), options)),
            token_issuer: tokens.clone(),
            token_verifier: tokens,
            passwords: Arc::new(Argon2PasswordHasher::new()),
        }
    }

    /// Close the pool, waiting at most the configured shutdown timeout.
    pub async fn close(&self) {
        let limit = Duration::from_secs(self.config.server.shutdown_timeout);
        if tokio::time::timeout(limit, self.pool.close()).await.is_err() {
            warn!(timeout_s = limit.as_secs(), "Timed out closing the database pool");
        } else {
            info!("Database pool closed");
        }
    }
}
