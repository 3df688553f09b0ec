//! Category navigation reads.

use crate::pool::StoreOptions;
use crate::support::{map_db_error, timed};
use async_trait::async_trait;
use bookstore_core::{StoreError, check_text};
use bookstore_core::category::{Category, CategoryNode, build_tree};
use bookstore_core::store::CategoryStore;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

/// `PostgreSQL`-backed category store.
#[derive(Clone)]
pub struct PostgresCategoryStore {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresCategoryStore {
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

    async fn fetch_one_active(&self, column: Lookup<'_>) -> Result<Option<Category>, StoreError> {
        let query = match column {
            Lookup::Id(id) => {
                sqlx::query("SELECT * FROM categories WHERE id = $1 AND is_active").bind(id)
            }
            Lookup::Slug(slug) => {
                sqlx::query("SELECT * FROM categories WHERE slug = $1 AND is_active").bind(slug)
            }
        };

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        row.as_ref()
            .map(category_from_row)
            .transpose()
            .map_err(map_db_error)
    }
}

enum Lookup<'a> {
    Id(i64),
    Slug(&'a str),
}

fn category_from_row(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        slug: row.try_get("slug")?,
        description: row.try_get("description")?,
        parent_id: row.try_get("parent_id")?,
        image_url: row.try_get("image_url")?,
        sort_order: row.try_get("sort_order")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl CategoryStore for PostgresCategoryStore {
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        timed("list_categories", self.options.operation_timeout, async {
            let rows = sqlx::query(
                r"
                SELECT * FROM categories
                WHERE is_active
                ORDER BY sort_order ASC, name ASC
                ",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            rows.iter()
                .map(category_from_row)
                .collect::<Result<_, _>>()
                .map_err(map_db_error)
        })
        .await
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        check_text("slug", slug)?;
        timed(
            "category_by_slug",
            self.options.operation_timeout,
            self.fetch_one_active(Lookup::Slug(slug)),
        )
        .await
    }

    async fn category_by_id(&self, id: i64) -> Result<Option<Category>, StoreError> {
        timed(
            "category_by_id",
            self.options.operation_timeout,
            self.fetch_one_active(Lookup::Id(id)),
        )
        .await
    }

    async fn category_tree(&self) -> Result<Vec<CategoryNode>, StoreError> {
        timed("category_tree", self.options.operation_timeout, async {
            let rows = sqlx::query(
                r"
                SELECT c.*, p.name AS parent_name
                FROM categories c
                LEFT JOIN categories p ON p.id = c.parent_id AND p.is_active
                WHERE c.is_active
                ORDER BY c.sort_order ASC, c.name ASC
                ",
            )
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

            let entries = rows
                .iter()
                .map(|row| Ok((category_from_row(row)?, row.try_get("parent_name")?)))
                .collect::<Result<Vec<_>, sqlx::Error>>()
                .map_err(map_db_error)?;

            Ok(build_tree(entries))
        })
        .await
    }
}
