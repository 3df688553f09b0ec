//! Store traits: the seam between HTTP handlers and persistence.
//!
//! # Implementations
//!
//! - `Postgres*Store` (in `bookstore-postgres`): production implementations
//! - `InMemory*Store` (in `bookstore-testing`): fast, deterministic tests
//!
//! # Dyn Compatibility
//!
//! The traits use `#[async_trait]` so that handlers can hold them as
//! `Arc<dyn BookStore>` and friends inside the application state.

use crate::book::{BookDetail, BookQuery, BookSort, BookWithCategory};
use crate::carousel::Carousel;
use crate::category::{Category, CategoryNode};
use crate::error::StoreError;
use crate::order::{NewOrder, OrderDetail, OrderStatus, OrderStatusFilter, OrderSummary};
use crate::pagination::{Page, Pagination};
use crate::user::{NewUser, ProfileUpdate, UserAddress, UserCredentials, UserProfile, UserStats};
use async_trait::async_trait;

/// Read access to the book catalog.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// List books matching the query, plus the exact number of matches.
    ///
    /// An empty page with `total == 0` is a successful answer.
    ///
    /// # Errors
    ///
    /// - `Validation`: the query is invalid (rejected before any query runs)
    /// - `Timeout` / `Database`: infrastructure failure
    async fn list_books(&self, query: &BookQuery) -> Result<Page<BookWithCategory>, StoreError>;

    /// Fetch the detail view of one book, `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn get_book(&self, id: i64) -> Result<Option<BookDetail>, StoreError>;

    /// Hot books by sales volume.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an out-of-range limit, `Timeout` / `Database`
    /// on infrastructure failure.
    async fn hot_books(&self, limit: i64) -> Result<Vec<BookWithCategory>, StoreError>;

    /// New books by creation time.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an out-of-range limit, `Timeout` / `Database`
    /// on infrastructure failure.
    async fn new_books(&self, limit: i64) -> Result<Vec<BookWithCategory>, StoreError>;

    /// Books of one category, through the regular listing path.
    ///
    /// # Errors
    ///
    /// Same as [`BookStore::list_books`].
    async fn books_by_category(
        &self,
        category_id: i64,
        sort: BookSort,
        pagination: Pagination,
    ) -> Result<Page<BookWithCategory>, StoreError> {
        let query = BookQuery::new(pagination)
            .with_category(category_id)
            .with_sort(sort);
        self.list_books(&query).await
    }
}

/// Read access to category navigation.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Active categories by sort order, then name.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    /// Active category with the given slug.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError>;

    /// Active category with the given id.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError>;

    /// Active categories assembled into a forest.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn category_tree(&self) -> Result<Vec<CategoryNode>, StoreError>;
}

/// Order creation, status changes and ownership-agnostic reads.
///
/// Ownership checks are the caller's job: the same store serves internal
/// callers that have no request principal.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Create an order and its items atomically, then re-read it.
    ///
    /// Either the header and every item persist, or nothing does.
    ///
    /// # Errors
    ///
    /// - `Validation`: empty items, non-positive quantity, negative amounts,
    ///   or a reference to a missing book/user/address
    /// - `Conflict`: insufficient stock when stock reservation is enabled
    /// - `Timeout` / `Database`: infrastructure failure (transaction rolled back)
    async fn create_order(&self, order: &NewOrder) -> Result<OrderDetail, StoreError>;

    /// Fetch an order with address fields and items, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure only.
    async fn get_order(&self, order_id: i64) -> Result<Option<OrderDetail>, StoreError>;

    /// Change the status of an order and return the previous status.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no such order
    /// - `Conflict`: rejected by an enforced transition policy
    /// - `Timeout` / `Database`: infrastructure failure
    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<OrderStatus, StoreError>;

    /// List one user's orders, newest first, with the exact total.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn list_user_orders(
        &self,
        user_id: i64,
        filter: OrderStatusFilter,
        pagination: Pagination,
    ) -> Result<Page<OrderSummary>, StoreError>;
}

/// User accounts, addresses and statistics.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Register a user.
    ///
    /// # Errors
    ///
    /// - `Conflict`: username or email already taken
    /// - `Timeout` / `Database`: infrastructure failure
    async fn create_user(&self, user: &NewUser) -> Result<UserProfile, StoreError>;

    /// Credentials by username.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn find_credentials(&self, username: &str) -> Result<Option<UserCredentials>, StoreError>;

    /// Credentials by user id.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn find_credentials_by_id(&self, user_id: i64) -> Result<Option<UserCredentials>, StoreError>;

    /// Public profile.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn get_profile(&self, user_id: i64) -> Result<Option<UserProfile>, StoreError>;

    /// Apply a partial profile update and return the new profile.
    ///
    /// # Errors
    ///
    /// - `Validation`: empty or malformed update
    /// - `NotFound`: no such user
    /// - `Conflict`: username or email taken by another user
    /// - `Timeout` / `Database`: infrastructure failure
    async fn update_profile(&self, user_id: i64, update: &ProfileUpdate) -> Result<UserProfile, StoreError>;

    /// Replace the password digest.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no such user
    /// - `Timeout` / `Database`: infrastructure failure
    async fn update_password(&self, user_id: i64, password_hash: &str) -> Result<(), StoreError>;

    /// Replace the avatar URL and return the new profile.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no such user
    /// - `Timeout` / `Database`: infrastructure failure
    async fn update_avatar(&self, user_id: i64, avatar_url: &str) -> Result<UserProfile, StoreError>;

    /// Saved addresses, default first.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn list_addresses(&self, user_id: i64) -> Result<Vec<UserAddress>, StoreError>;

    /// Order count, favorite count and total spend.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn user_stats(&self, user_id: i64) -> Result<UserStats, StoreError>;
}

/// A user's favorite books.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Favorite books, most recently added first, with the exact total.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn list_favorites(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<BookWithCategory>, StoreError>;

    /// Add a favorite; adding an existing favorite is a no-op.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no such book
    /// - `Timeout` / `Database`: infrastructure failure
    async fn add_favorite(&self, user_id: i64, book_id: i64) -> Result<(), StoreError>;

    /// Remove a favorite; returns whether one was removed.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn remove_favorite(&self, user_id: i64, book_id: i64) -> Result<bool, StoreError>;
}

/// Home page carousel.
#[async_trait]
pub trait CarouselStore: Send + Sync {
    /// Slides by sort order.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` on infrastructure failure.
    async fn list_carousels(&self) -> Result<Vec<Carousel>, StoreError>;
}

/// Dependency probe used by the readiness endpoint.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Check that the backing store answers.
    ///
    /// # Errors
    ///
    /// Returns `Timeout` / `Database` when the store is unreachable.
    async fn ping(&self) -> Result<(), StoreError>;
}
