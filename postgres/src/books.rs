//! Book query engine.
//!
//! Every listing is built by one [`QueryBuilder`] path. The filter clause is
//! produced by [`push_book_filters`] and shared verbatim by the page query
//! and the count query, so `total` always counts exactly the rows the page
//! is sliced from. Caller input only ever reaches the database as bound
//! parameters; the `ORDER BY` text comes from the closed [`BookSort`] table.

use crate::pool::StoreOptions;
use crate::rows::{BOOK_WITH_CATEGORY_SELECT, book_from_row, book_with_category_from_row};
use crate::support::{like_pattern, map_db_error, timed};
use async_trait::async_trait;
use bookstore_core::book::{
    BookDetail, BookQuery, BookWithCategory, RELATED_BOOKS_LIMIT, RelatedBook, RelationType,
    discount_rate,
};
use bookstore_core::pagination::check_limit;
use bookstore_core::store::BookStore;
use bookstore_core::{Page, StoreError};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// Append the `WHERE` clause of a book listing.
///
/// The keyword is matched case-insensitively and literally against title,
/// author and isbn; the category is matched exactly. Both are bound.
fn push_book_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &BookQuery) {
    let mut separator = " WHERE ";

    if let Some(keyword) = query.keyword() {
        let pattern = like_pattern(keyword);
        builder
            .push(separator)
            .push("(b.title ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR b.author ILIKE ")
            .push_bind(pattern.clone())
            .push(" OR b.isbn ILIKE ")
            .push_bind(pattern)
            .push(")");
        separator = " AND ";
    }

    if let Some(category_id) = query.category_id() {
        builder
            .push(separator)
            .push("b.category_id = ")
            .push_bind(category_id);
    }
}

/// `PostgreSQL`-backed catalog reads.
#[derive(Clone)]
pub struct PostgresBookStore {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresBookStore {
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

    async fn featured(
        &self,
        featured: Featured,
        limit: i64,
    ) -> Result<Vec<BookWithCategory>, StoreError> {
        let limit = check_limit(limit)?;
        let sql = format!("{BOOK_WITH_CATEGORY_SELECT} {}", featured.clause());

        let rows = sqlx::query(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        decode_books(&rows)
    }

    async fn related_books(&self, book_id: i64) -> Result<Vec<RelatedBook>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT b.id, b.title, b.author, b.cover_image, b.selling_price, r.relation_type
            FROM book_relations r
            JOIN books b ON b.id = r.related_book_id
            WHERE r.book_id = $1 AND r.related_book_id <> $1
            ORDER BY r.relation_type DESC, b.id ASC
            LIMIT $2
            ",
        )
        .bind(book_id)
        .bind(RELATED_BOOKS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.iter()
            .map(|row| {
                let relation: String = row.try_get("relation_type").map_err(map_db_error)?;
                Ok(RelatedBook {
                    id: row.try_get("id").map_err(map_db_error)?,
                    title: row.try_get("title").map_err(map_db_error)?,
                    author: row.try_get("author").map_err(map_db_error)?,
                    cover_image: row.try_get("cover_image").map_err(map_db_error)?,
                    selling_price: row.try_get("selling_price").map_err(map_db_error)?,
                    relation_type: RelationType::parse(&relation)?,
                })
            })
            .collect()
    }
}

/// Featured shelves on the home page.
#[derive(Debug, Clone, Copy)]
enum Featured {
    Hot,
    New,
}

impl Featured {
    const fn clause(self) -> &'static str {
        match self {
            Self::Hot => "WHERE b.is_hot ORDER BY b.sales_volume DESC, b.id DESC LIMIT $1",
            Self::New => "WHERE b.is_new ORDER BY b.created_at DESC, b.id DESC LIMIT $1",
        }
    }
}

fn decode_books(rows: &[PgRow]) -> Result<Vec<BookWithCategory>, StoreError> {
    rows.iter()
        .map(|row| book_with_category_from_row(row).map_err(map_db_error))
        .collect()
}

#[async_trait]
impl BookStore for PostgresBookStore {
    async fn list_books(&self, query: &BookQuery) -> Result<Page<BookWithCategory>, StoreError> {
        query.validate()?;
        let pagination = query.pagination();

        metrics::counter!("bookstore_book_queries_total", "sort" => query.sort().as_str())
            .increment(1);

        timed("list_books", self.options.operation_timeout, async {
            let mut select = QueryBuilder::<Postgres>::new(BOOK_WITH_CATEGORY_SELECT);
            push_book_filters(&mut select, query);
            select
                .push(" ORDER BY ")
                .push(query.sort().order_by())
                .push(" LIMIT ")
                .push_bind(pagination.limit())
                .push(" OFFSET ")
                .push_bind(pagination.offset());

            let rows = select
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

            let mut count = QueryBuilder::<Postgres>::new(
                "SELECT COUNT(*) FROM books b LEFT JOIN categories c ON c.id = b.category_id",
            );
            push_book_filters(&mut count, query);

            let total: i64 = count
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

            let items = decode_books(&rows)?;

            tracing::debug!(
                keyword = query.keyword(),
                category_id = query.category_id(),
                sort = %query.sort(),
                limit = pagination.limit(),
                offset = pagination.offset(),
                returned = items.len(),
                total,
                "Listed books"
            );

            Ok(Page::new(items, total))
        })
        .await
    }

    async fn get_book(&self, id: i64) -> Result<Option<BookDetail>, StoreError> {
        timed("get_book", self.options.operation_timeout, async {
            let row = sqlx::query(
                r"
                SELECT b.*, c.name AS category_name, c.slug AS category_slug,
                       COALESCE(i.quantity, 0) AS stock
                FROM books b
                LEFT JOIN categories c ON c.id = b.category_id
                LEFT JOIN inventory i ON i.book_id = b.id
                WHERE b.id = $1
                ",
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            let Some(row) = row else {
                tracing::debug!(book_id = id, "Book not found");
                return Ok(None);
            };

            let book = book_from_row(&row).map_err(map_db_error)?;
            let stock: i32 = row.try_get("stock").map_err(map_db_error)?;
            let discount = discount_rate(book.original_price, book.selling_price);
            let listing = BookWithCategory {
                book,
                category_name: row.try_get("category_name").map_err(map_db_error)?,
                category_slug: row.try_get("category_slug").map_err(map_db_error)?,
            };
            let related_books = self.related_books(id).await?;

            Ok(Some(BookDetail {
                listing,
                stock,
                discount_rate: discount,
                related_books,
            }))
        })
        .await
    }

    async fn hot_books(&self, limit: i64) -> Result<Vec<BookWithCategory>, StoreError> {
        timed("hot_books", self.options.operation_timeout, self.featured(Featured::Hot, limit)).await
    }

    async fn new_books(&self, limit: i64) -> Result<Vec<BookWithCategory>, StoreError> {
        timed("new_books", self.options.operation_timeout, self.featured(Featured::New, limit)).await
    }
}
