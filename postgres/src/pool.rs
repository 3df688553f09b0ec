//! Connection pool lifecycle, store options and the readiness probe.

use crate::support::{map_db_error, timed};
use async_trait::async_trait;
use bookstore_core::order::TransitionPolicy;
use bookstore_core::store::ReadinessProbe;
use bookstore_core::StoreError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// The bookstore schema, applied out of band in production.
pub const SCHEMA_SQL: &str = include_str!("../migrations/0001_bookstore_schema.sql");

/// Settings for the process-wide connection pool.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    /// Connection URL.
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
    /// Connections kept open when idle.
    pub min_connections: u32,
    /// How long to wait for a free connection.
    pub acquire_timeout: Duration,
    /// Idle connections older than this are closed.
    pub idle_timeout: Duration,
    /// Connections are recycled after this age.
    pub max_lifetime: Duration,
}

/// Open the connection pool.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if the first connection cannot be
/// established.
pub async fn connect(settings: &PoolSettings) -> Result<PgPool, StoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .min_connections(settings.min_connections)
        .acquire_timeout(settings.acquire_timeout)
        .idle_timeout(Some(settings.idle_timeout))
        .max_lifetime(Some(settings.max_lifetime))
        .connect(&settings.url)
        .await
        .map_err(map_db_error)?;

    tracing::info!(
        max_connections = settings.max_connections,
        min_connections = settings.min_connections,
        "Database pool ready"
    );

    Ok(pool)
}

/// Apply [`SCHEMA_SQL`]. Every statement is idempotent.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if a statement fails.
pub async fn apply_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::raw_sql(SCHEMA_SQL)
        .execute(pool)
        .await
        .map_err(map_db_error)?;
    tracing::info!("Bookstore schema applied");
    Ok(())
}

/// Behaviour knobs shared by the stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Upper bound for every store operation.
    pub operation_timeout: Duration,
    /// Decrement inventory inside the order transaction.
    pub reserve_stock: bool,
    /// How out-of-table status changes are treated.
    pub transition_policy: TransitionPolicy,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            operation_timeout: Duration::from_secs(10),
            reserve_stock: true,
            transition_policy: TransitionPolicy::Permissive,
        }
    }
}

/// Readiness probe that pings the database.
#[derive(Clone)]
pub struct PostgresReadiness {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresReadiness {
    /// Create a probe over the pool.
    #[must_use]
    pub const fn new(pool: PgPool, options: StoreOptions) -> Self {
        Self { pool, options }
    }
}

#[async_trait]
impl ReadinessProbe for PostgresReadiness {
    async fn ping(&self) -> Result<(), StoreError> {
        timed("ping", self.options.operation_timeout, async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;
            Ok(())
        })
        .await
    }
}
