//! Home page carousel reads.

use crate::pool::StoreOptions;
use crate::support::{map_db_error, timed};
use async_trait::async_trait;
use bookstore_core::StoreError;
use bookstore_core::carousel::Carousel;
use bookstore_core::store::CarouselStore;
use sqlx::{PgPool, Row};

/// `PostgreSQL`-backed carousel store.
#[derive(Clone)]
pub struct PostgresCarouselStore {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresCarouselStore {
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
impl CarouselStore for PostgresCarouselStore {
    async fn list_carousels(&self) -> Result<Vec<Carousel>, StoreError> {
        timed("list_carousels", self.options.operation_timeout, async {
            let rows = sqlx::query("SELECT * FROM carousels ORDER BY sort_order ASC, id ASC")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

            rows.iter()
                .map(|row| {
                    Ok(Carousel {
                        id: row.try_get("id")?,
                        image_url: row.try_get("image_url")?,
                        title: row.try_get("title")?,
                        description: row.try_get("description")?,
                        link: row.try_get("link")?,
                        button_text: row.try_get("button_text")?,
                        sort_order: row.try_get("sort_order")?,
                        created_at: row.try_get("created_at")?,
                        updated_at: row.try_get("updated_at")?,
                    })
                })
                .collect::<Result<_, sqlx::Error>>()
                .map_err(map_db_error)
        })
        .await
    }
}
