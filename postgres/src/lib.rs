//! `PostgreSQL` stores for the bookstore backend.
//!
//! This crate implements the store traits of `bookstore-core` on top of a
//! shared [`sqlx::PgPool`]:
//!
//! - [`PostgresBookStore`]: the book query engine (filter, sort, paginate, count)
//! - [`PostgresOrderStore`]: atomic order creation, status changes, listings
//! - [`PostgresCategoryStore`], [`PostgresCarouselStore`],
//!   [`PostgresUserStore`], [`PostgresFavoriteStore`]: supporting reads and writes
//!
//! Every operation runs under [`StoreOptions::operation_timeout`] and maps
//! driver errors onto [`bookstore_core::StoreError`].
//!
//! # Example
//!
//! ```ignore
//! use bookstore_postgres::{PoolSettings, PostgresBookStore, StoreOptions, connect};
//!
//! async fn example(settings: PoolSettings) -> Result<(), bookstore_core::StoreError> {
//!     let pool = connect(&settings).await?;
//!     let books = PostgresBookStore::with_options(pool.clone(), StoreOptions::default());
//!     // ...
//!     pool.close().await;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod books;
pub mod carousels;
pub mod categories;
pub mod favorites;
pub mod orders;
pub mod pool;
mod rows;
mod support;
pub mod users;

pub use books::PostgresBookStore;
pub use carousels::PostgresCarouselStore;
pub use categories::PostgresCategoryStore;
pub use favorites::PostgresFavoriteStore;
pub use orders::PostgresOrderStore;
pub use pool::{PoolSettings, PostgresReadiness, SCHEMA_SQL, StoreOptions, apply_schema, connect};
pub use users::PostgresUserStore;
