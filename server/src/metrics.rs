//! Business metrics for the bookstore.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `bookstore_http_requests_total{method,status}` - Requests served
//! - `bookstore_book_queries_total{sort}` - Book listings by sort key
//! - `bookstore_orders_created_total` - Orders committed
//! - `bookstore_order_rollbacks_total` - Order creations rolled back
//! - `bookstore_order_status_changes_total{status}` - Status changes by target
//! - `bookstore_users_registered_total` - Registrations
//! - `bookstore_logins_total{outcome}` - Logins accepted or rejected
//! - `bookstore_store_timeouts_total{operation}` - Store operations that timed out
//!
//! ## Histograms
//! - `bookstore_query_duration_seconds{operation}` - Store operation latency

use metrics::{describe_counter, describe_histogram};

/// Initialize and register all business metrics descriptions.
///
/// This should be called once at application startup, after the recorder is
/// installed and before any metrics are recorded.
pub fn register_business_metrics() {
    describe_counter!(
        "bookstore_http_requests_total",
        "Total number of HTTP requests by method and status"
    );

    // Catalog metrics
    describe_counter!(
        "bookstore_book_queries_total",
        "Total number of book listings by sort key"
    );

    // Order metrics
    describe_counter!(
        "bookstore_orders_created_total",
        "Total number of orders committed"
    );
    describe_counter!(
        "bookstore_order_rollbacks_total",
        "Total number of order creations rolled back"
    );
    describe_counter!(
        "bookstore_order_status_changes_total",
        "Total number of order status changes by target status"
    );

    // Account metrics
    describe_counter!(
        "bookstore_users_registered_total",
        "Total number of registered users"
    );
    describe_counter!(
        "bookstore_logins_total",
        "Total number of login attempts by outcome"
    );

    // Store metrics
    describe_counter!(
        "bookstore_store_timeouts_total",
        "Total number of store operations that exceeded their timeout"
    );
    describe_histogram!(
        "bookstore_query_duration_seconds",
        "Time taken by a store operation"
    );

    tracing::info!("Business metrics registered");
}
