//! Book catalog endpoints.
//!
//! - GET /api/books - Filtered, sorted, paginated listing
//! - GET /api/books/:id - Detail view with stock and related books
//! - GET /api/books/featured/hot - Hot books by sales volume
//! - GET /api/books/featured/new - New books by creation time

use super::parse_id;
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use bookstore_core::PageMeta;
use bookstore_core::book::{BookDetail, BookQuery, BookSort, BookWithCategory};
use bookstore_core::pagination::DEFAULT_PAGE_SIZE;
use bookstore_web::{AppError, PageParams};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the book listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListBooksParams {
    /// `page` and `limit`
    #[serde(flatten)]
    pub page: PageParams,
    /// Category id filter
    pub category: Option<String>,
    /// Sort key (`newest`, `price-asc`, `price-desc`, `bestseller`, `recommended`)
    pub sort: Option<String>,
    /// Keyword matched against title, author and ISBN
    pub search: Option<String>,
}

/// Query parameters for featured lists.
#[derive(Debug, Default, Deserialize)]
pub struct FeaturedParams {
    /// Number of books, default 10
    pub limit: Option<String>,
}

/// A page of books plus the pagination envelope.
#[derive(Debug, Serialize)]
pub struct BookListResponse {
    /// Books in this page
    pub books: Vec<BookWithCategory>,
    /// Pagination envelope
    pub pagination: PageMeta,
}

impl ListBooksParams {
    fn to_query(&self) -> Result<BookQuery, AppError> {
        let mut query = BookQuery::new(self.page.pagination()?)
            .with_sort(BookSort::from_param(self.sort.as_deref()));

        if let Some(category) = self.category.as_deref().filter(|c| !c.trim().is_empty()) {
            query = query.with_category(parse_id("category", category)?);
        }
        if let Some(search) = &self.search {
            query = query.with_keyword(search.as_str());
        }

        query.validate()?;
        Ok(query)
    }
}

impl FeaturedParams {
    fn limit(&self) -> Result<i64, AppError> {
        self.limit
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .map_or(Ok(DEFAULT_PAGE_SIZE), |l| parse_id("limit", l))
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// List books.
///
/// Invalid `page`, `limit` or `category` values are rejected with 422 before
/// the store is queried; an unknown `sort` falls back to `newest`.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:3001/api/books?search=rust&sort=price-asc&page=2&limit=5'
/// ```
///
/// Response:
/// ```json
/// {
///   "books": [{ "id": 12, "title": "Programming Rust", "category_name": "Computing", ... }],
///   "pagination": { "page": 2, "limit": 5, "total": 7, "pages": 2 }
/// }
/// ```
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<ListBooksParams>,
) -> Result<Json<BookListResponse>, AppError> {
    let query = params.to_query()?;

    let page = state.books.list_books(&query).await?;

    Ok(Json(BookListResponse {
        books: page.items,
        pagination: PageMeta::new(query.pagination(), page.total),
    }))
}

/// Get one book.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3001/api/books/12
/// ```
///
/// Response:
/// ```json
/// {
///   "id": 12,
///   "title": "Programming Rust",
///   "stock": 8,
///   "discount_rate": 25,
///   "related_books": [{ "id": 14, "title": "Rust in Action", "relation_type": "similar", ... }],
///   ...
/// }
/// ```
pub async fn get_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BookDetail>, AppError> {
    let id = parse_id("id", &id)?;

    state
        .books
        .get_book(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Book", id))
}

/// Hot books, best selling first.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:3001/api/books/featured/hot?limit=8'
/// ```
pub async fn hot_books(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
) -> Result<Json<Vec<BookWithCategory>>, AppError> {
    Ok(Json(state.books.hot_books(params.limit()?).await?))
}

/// New books, most recently added first.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:3001/api/books/featured/new?limit=8'
/// ```
pub async fn new_books(
    State(state): State<AppState>,
    Query(params): Query<FeaturedParams>,
) -> Result<Json<Vec<BookWithCategory>>, AppError> {
    Ok(Json(state.books.new_books(params.limit()?).await?))
}
