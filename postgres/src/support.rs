//! Shared plumbing for the Postgres stores: error mapping, operation
//! timeouts and LIKE pattern escaping.

use bookstore_core::StoreError;
use std::future::Future;
use std::time::{Duration, Instant};

/// `unique_violation` SQLSTATE.
const UNIQUE_VIOLATION: &str = "23505";

/// `foreign_key_violation` SQLSTATE.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a driver error onto the store taxonomy.
///
/// Unique violations become [`StoreError::Conflict`], foreign key violations
/// become [`StoreError::Validation`]; everything else is a
/// [`StoreError::Database`] fault.
pub(crate) fn map_db_error(err: sqlx::Error) -> StoreError {
    if let Some(constraint) = unique_violation(&err) {
        return StoreError::conflict(format!("duplicate value violates {constraint}"));
    }
    if let Some(constraint) = foreign_key_violation(&err) {
        return StoreError::validation(format!(
            "referenced record does not exist ({constraint})"
        ));
    }
    StoreError::database(err.to_string())
}

/// Constraint name of a unique violation, if `err` is one.
pub(crate) fn unique_violation(err: &sqlx::Error) -> Option<String> {
    violated_constraint(err, UNIQUE_VIOLATION)
}

/// Constraint name of a foreign key violation, if `err` is one.
pub(crate) fn foreign_key_violation(err: &sqlx::Error) -> Option<String> {
    violated_constraint(err, FOREIGN_KEY_VIOLATION)
}

fn violated_constraint(err: &sqlx::Error, code: &str) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(code) => {
            Some(db.constraint().unwrap_or("unknown constraint").to_string())
        }
        _ => None,
    }
}

/// Run a store operation under a timeout and record its duration.
///
/// When the timeout elapses the operation future is dropped, which rolls
/// back any transaction it holds and returns its connection to the pool.
pub(crate) async fn timed<T, F>(
    operation: &'static str,
    limit: Duration,
    future: F,
) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let started = Instant::now();
    let result = if let Ok(result) = tokio::time::timeout(limit, future).await {
        result
    } else {
        tracing::error!(
            operation,
            timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
            "Store operation timed out"
        );
        metrics::counter!("bookstore_store_timeouts_total", "operation" => operation).increment(1);
        Err(StoreError::Timeout { operation })
    };

    metrics::histogram!("bookstore_query_duration_seconds", "operation" => operation)
        .record(started.elapsed().as_secs_f64());

    if let Err(err) = &result {
        if err.is_infrastructure() {
            tracing::error!(operation, error = %err, "Store operation failed");
        }
    }

    result
}

/// Wrap a keyword into an `ILIKE` pattern that matches it literally.
///
/// `%`, `_` and `\` are escaped with the default `\` escape character.
pub(crate) fn like_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for ch in keyword.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
