//! Application state for the bookstore HTTP server.
//!
//! Contains all shared resources needed by HTTP handlers:
//! - Stores (catalog, orders, users, favorites)
//! - Readiness probe
//! - Token and password seams

use axum::extract::FromRef;
use bookstore_auth::{PasswordHasher, TokenIssuer, TokenVerifier};
use bookstore_core::store::{
    BookStore, CarouselStore, CategoryStore, FavoriteStore, OrderStore, ReadinessProbe, UserStore,
};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Every dependency is a trait object so that the same router runs against
/// the `PostgreSQL` stores in production and the in-memory stores in tests.
/// Cloning is cheap (`Arc`s only).
#[derive(Clone)]
pub struct AppState {
    /// Book catalog
    pub books: Arc<dyn BookStore>,
    /// Category navigation
    pub categories: Arc<dyn CategoryStore>,
    /// Home page carousel
    pub carousels: Arc<dyn CarouselStore>,
    /// Orders
    pub orders: Arc<dyn OrderStore>,
    /// Accounts, addresses and statistics
    pub users: Arc<dyn UserStore>,
    /// Wishlist
    pub favorites: Arc<dyn FavoriteStore>,
    /// Dependency check behind `/ready`
    pub readiness: Arc<dyn ReadinessProbe>,
    /// Issues tokens on login
    pub token_issuer: Arc<dyn TokenIssuer>,
    /// Verifies bearer tokens
    pub token_verifier: Arc<dyn TokenVerifier>,
    /// Hashes and verifies passwords
    pub passwords: Arc<dyn PasswordHasher>,
}

impl AppState {
    /// Build a state where one value provides every store.
    ///
    /// # Arguments
    ///
    /// - `store`: implements all store traits and the readiness probe
    /// - `tokens`: issues and verifies tokens
    /// - `passwords`: password hasher
    #[must_use]
    pub fn from_shared_store<S, T, P>(store: S, tokens: T, passwords: P) -> Self
    where
        S: BookStore
            + CategoryStore
            + CarouselStore
            + OrderStore
            + UserStore
            + FavoriteStore
            + ReadinessProbe
            + 'static,
        T: TokenIssuer + TokenVerifier + 'static,
        P: PasswordHasher + 'static,
    {
        let store = Arc::new(store);
        let tokens = Arc::new(tokens);
        Self {
            books: store.clone(),
            categories: store.clone(),
            carousels: store.clone(),
            orders: store.clone(),
            users: store.clone(),
            favorites: store.clone(),
            readiness: store,
            token_issuer: tokens.clone(),
            token_verifier: tokens,
            passwords: Arc::new(passwords),
        }
    }
}

// Lets the shared readiness handler extract its probe from AppState
impl FromRef<AppState> for Arc<dyn ReadinessProbe> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.readiness.clone()
    }
}
