//! Router configuration for the bookstore.
//!
//! Builds the complete Axum router with all endpoints.

use super::state::AppState;
use crate::api::{auth, books, carousels, categories, orders, users};
use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, patch, post, put},
};
use bookstore_web::correlation_id_layer;
use bookstore_web::handlers::{health_check, readiness_check};
use tower_http::cors::CorsLayer;

/// Build the complete Axum router.
///
/// Configures all routes including:
/// - Health checks
/// - Catalog endpoints (books, categories, carousels)
/// - Registration and login
/// - Authenticated user, wishlist and order endpoints
///
/// Every request passes through the correlation id middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/featured/hot", get(books::hot_books))
        .route("/books/featured/new", get(books::new_books))
        .route("/books/:id", get(books::get_book))
        .route("/categories", get(categories::list_categories))
        .route("/categories/tree/structure", get(categories::category_tree))
        .route("/categories/slug/:slug", get(categories::category_by_slug))
        .route("/categories/:id", get(categories::category_by_id))
        .route("/categories/:id/books", get(categories::category_books))
        .route("/carousels", get(carousels::list_carousels))
        // Accounts
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route(
            "/users/profile",
            get(users::get_profile).put(users::update_profile),
        )
        .route("/users/change-password", post(users::change_password))
        .route("/users/avatar", put(users::update_avatar))
        .route("/users/addresses", get(users::list_addresses))
        .route("/users/stats", get(users::stats))
        .route("/users/wishlist", get(users::list_wishlist))
        .route(
            "/users/wishlist/:book_id",
            post(users::add_to_wishlist).delete(users::remove_from_wishlist),
        )
        .route("/users/orders", get(orders::list_orders))
        // Orders
        .route("/orders", post(orders::create_order).get(orders::list_orders))
        .route("/orders/:id", get(orders::get_order))
        .route("/orders/:id/status", patch(orders::update_status));

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        // API routes under /api prefix
        .nest("/api", api_routes)
        .layer(correlation_id_layer())
        .with_state(state)
}

/// CORS policy admitting the storefront origin.
///
/// # Errors
///
/// Returns an error if `origin` is not a valid header value.
pub fn cors_layer(origin: &str) -> Result<CorsLayer, header::InvalidHeaderValue> {
    Ok(CorsLayer::new()
        .allow_origin(HeaderValue::from_str(origin)?)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true))
}
