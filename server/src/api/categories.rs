//! Category navigation endpoints.
//!
//! - GET /api/categories - Active categories
//! - GET /api/categories/tree/structure - Active categories as a forest
//! - GET /api/categories/slug/:slug - One category by slug
//! - GET /api/categories/:id - One category by id
//! - GET /api/categories/:id/books - Books of one category

use super::books::BookListResponse;
use super::parse_id;
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
};
use bookstore_core::PageMeta;
use bookstore_core::book::BookSort;
use bookstore_core::category::{Category, CategoryNode};
use bookstore_web::{AppError, PageParams};
use serde::Deserialize;

/// Query parameters for a category's books.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryBooksParams {
    /// `page` and `limit`
    #[serde(flatten)]
    pub page: PageParams,
    /// Sort key, unknown values mean `newest`
    pub sort: Option<String>,
}

/// List active categories by sort order, then name.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3001/api/categories
/// ```
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.categories.list_categories().await?))
}

/// Active categories nested under their parents.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3001/api/categories/tree/structure
/// ```
///
/// Response:
/// ```json
/// [{ "id": 1, "name": "Fiction", "parent_name": null, "children": [{ "id": 4, ... }] }]
/// ```
pub async fn category_tree(State(state): State<AppState>) -> Result<Json<Vec<CategoryNode>>, AppError> {
    Ok(Json(state.categories.category_tree().await?))
}

/// One active category by slug.
pub async fn category_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Category>, AppError> {
    state
        .categories
        .category_by_slug(&slug)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Category", slug))
}

/// One active category by id.
pub async fn category_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Category>, AppError> {
    let id = parse_id("id", &id)?;

    state
        .categories
        .category_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("Category", id))
}

/// Books of one active category, through the regular listing path.
///
/// Sorted by `recommended` unless `sort` says otherwise.
///
/// # Example
///
/// ```bash
/// curl 'http://localhost:3001/api/categories/3/books?sort=bestseller&page=1&limit=20'
/// ```
pub async fn category_books(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<CategoryBooksParams>,
) -> Result<Json<BookListResponse>, AppError> {
    let id = parse_id("id", &id)?;
    let pagination = params.page.pagination()?;

    if state.categories.category_by_id(id).await?.is_none() {
        return Err(AppError::not_found("Category", id));
    }

    let sort = params
        .sort
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map_or(BookSort::Recommended, |s| BookSort::from_param(Some(s)));

    let page = state
        .books
        .books_by_category(id, sort, pagination)
        .await?;

    Ok(Json(BookListResponse {
        books: page.items,
        pagination: PageMeta::new(pagination, page.total),
    }))
}
