//! # Bookstore Core
//!
//! Domain types, the error taxonomy and the store traits of the bookstore
//! backend. Nothing in this crate performs I/O.
//!
//! ## Core Concepts
//!
//! - **Book query**: keyword, category, a closed [`book::BookSort`] and a
//!   validated [`pagination::Pagination`]
//! - **Order creation**: a [`order::NewOrder`] validated up front, persisted
//!   atomically by an [`store::OrderStore`]
//! - **Errors**: [`error::StoreError`] separates client-correctable failures
//!   from infrastructure faults
//! - **Stores**: async traits implemented by `bookstore-postgres` for
//!   production and by `bookstore-testing` for tests
//!
//! ## Example
//!
//! ```ignore
//! use bookstore_core::book::{BookQuery, BookSort};
//! use bookstore_core::pagination::Pagination;
//! use bookstore_core::store::BookStore;
//!
//! async fn first_page(store: &dyn BookStore) -> Result<(), bookstore_core::StoreError> {
//!     let query = BookQuery::new(Pagination::from_page(1, 10)?)
//!         .with_keyword("harry")
//!         .with_sort(BookSort::Bestseller);
//!     let page = store.list_books(&query).await?;
//!     println!("{} of {}", page.items.len(), page.total);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod book;
pub mod carousel;
pub mod category;
pub mod error;
pub mod order;
pub mod pagination;
pub mod store;
pub mod user;

pub use error::{StoreError, check_text};
pub use pagination::{Page, PageMeta, Pagination};

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use rust_decimal::Decimal;

/// Environment module - Dependency injection traits
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use bookstore_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let earlier = clock.now();
    /// assert!(clock.now() >= earlier);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
