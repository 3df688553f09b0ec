//! Favorite books.
//!
//! The listing follows the same single-path rule as the book query engine:
//! one parameterized page query and one parameterized count query.

use crate::pool::StoreOptions;
use crate::rows::book_with_category_from_row;
use crate::support::{foreign_key_violation, map_db_error, timed};
use async_trait::async_trait;
use bookstore_core::book::BookWithCategory;
use bookstore_core::store::FavoriteStore;
use bookstore_core::{Page, Pagination, StoreError};
use sqlx::PgPool;

/// `PostgreSQL`-backed favorites store.
#[derive(Clone)]
pub struct PostgresFavoriteStore {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresFavoriteStore {
    /// Create a store with default options.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_options(pool, StoreOptions::default())
    }

    /// Create a store with explicit options.
    #[must_use]
    pub const fn with_options(pool: PgPool, options: StoreOptions) -> Self {
        Self { pool, options }
    }
}

#[async_trait]
impl FavoriteStore for PostgresFavoriteStore {
    async fn list_favorites(
        &self,
        user_id: i64,
        pagination: Pagination,
    ) -> Result<Page<BookWithCategory>, StoreError> {
        timed("list_favorites", self.options.operation_timeout, async {
            let rows = sqlx::query(
                r"
                SELECT b.*, c.name AS category_name, c.slug AS category_slug
                FROM favorites f
                JOIN books b ON b.id = f.book_id
                LEFT JOIN categories c ON c.id = b.category_id
                WHERE f.user_id = $1
                ORDER BY f.created_at DESC, f.book_id DESC
                LIMIT $2 OFFSET $3
                ",
            )
            .bind(user_id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            let (total,): (i64,) = sqlx::query_as(
                r"
                SELECT COUNT(*)
                FROM favorites f
                JOIN books b ON b.id = f.book_id
                WHERE f.user_id = $1
                ",
            )
            .bind(user_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

            let items = rows
                .iter()
                .map(book_with_category_from_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(map_db_error)?;

            Ok(Page::new(items, total))
        })
        .await
    }

    async fn add_favorite(&self, user_id: i64, book_id: i64) -> Result<(), StoreError> {
        timed("add_favorite", self.options.operation_timeout, async {
            sqlx::query(
                r"
                INSERT INTO favorites (user_id, book_id, created_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (user_id, book_id) DO NOTHING
                ",
            )
            .bind(user_id)
            .bind(book_id)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if foreign_key_violation(&err).as_deref() == Some("favorites_book_id_fkey") {
                    StoreError::not_found("Book", book_id)
                } else {
                    map_db_error(err)
                }
            })?;

            tracing::debug!(user_id, book_id, "Favorite added");
            Ok(())
        })
        .await
    }

    async fn remove_favorite(&self, user_id: i64, book_id: i64) -> Result<bool, StoreError> {
        timed("remove_favorite", self.options.operation_timeout, async {
            let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND book_id = $2")
                .bind(user_id)
                .bind(book_id)
                .execute(&self.pool)
                .await
                .map_err(map_db_error)?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
