//! Authenticated user endpoints.
//!
//! - GET/PUT /api/users/profile - Read or update the profile
//! - POST /api/users/change-password - Change the password
//! - PUT /api/users/avatar - Set the avatar URL
//! - GET /api/users/addresses - Saved addresses
//! - GET /api/users/stats - Order count, favorite count, total spend
//! - GET /api/users/wishlist - Favorite books
//! - POST/DELETE /api/users/wishlist/:book_id - Add or remove a favorite

use super::parse_id;
use crate::auth::{AuthUser, hash_password, verify_password};
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bookstore_core::PageMeta;
use bookstore_core::book::BookWithCategory;
use bookstore_core::user::{ProfileUpdate, UserAddress, UserProfile, UserStats, validate_password};
use bookstore_web::{AppError, PageParams};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Password change request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    /// Current password
    pub old_password: String,
    /// Replacement, at least 8 characters
    pub new_password: String,
}

/// Avatar update request.
#[derive(Debug, Deserialize)]
pub struct AvatarRequest {
    /// Public URL of the uploaded image
    #[serde(alias = "avatarUrl")]
    pub avatar_url: String,
}

/// Plain acknowledgement.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: &'static str,
}

/// A page of favorite books plus the pagination envelope.
#[derive(Debug, Serialize)]
pub struct WishlistResponse {
    /// Favorite books, most recently added first
    pub items: Vec<BookWithCategory>,
    /// Pagination envelope
    pub pagination: PageMeta,
}

/// Outcome of adding a favorite.
#[derive(Debug, Serialize)]
pub struct WishlistEntry {
    /// The favorite book
    pub book_id: i64,
}

// ============================================================================
// Handlers
// ============================================================================

/// The caller's profile.
pub async fn get_profile(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserProfile>, AppError> {
    state
        .users
        .get_profile(principal.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User", principal.id))
}

/// Update the caller's profile; absent fields are left unchanged.
///
/// # Example
///
/// ```bash
/// curl -X PUT http://localhost:3001/api/users/profile \
///   -H "Authorization: Bearer $TOKEN" -H "Content-Type: application/json" \
///   -d '{"nickname":"Bookworm","bio":"Reads on trains"}'
/// ```
pub async fn update_profile(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let profile = state.users.update_profile(principal.id, &update).await?;
    Ok(Json(profile))
}

/// Change the caller's password.
///
/// The new password must have at least 8 characters and the old password
/// must match; both failures are 422.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3001/api/users/change-password \
///   -H "Authorization: Bearer $TOKEN" -H "Content-Type: application/json" \
///   -d '{"oldPassword":"correct horse","newPassword":"battery staple"}'
/// ```
pub async fn change_password(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    validate_password(&request.new_password)?;

    let credentials = state
        .users
        .find_credentials_by_id(principal.id)
        .await?
        .ok_or_else(|| AppError::not_found("User", principal.id))?;

    let matches = verify_password(
        state.passwords.clone(),
        request.old_password,
        credentials.password_hash,
    )
    .await?;
    if !matches {
        return Err(AppError::validation("old password is incorrect"));
    }

    let digest = hash_password(state.passwords.clone(), request.new_password).await?;
    state.users.update_password(principal.id, &digest).await?;

    Ok(Json(MessageResponse {
        message: "Password updated",
    }))
}

/// Set the caller's avatar URL.
pub async fn update_avatar(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<AvatarRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let avatar_url = request.avatar_url.trim();
    if avatar_url.is_empty() {
        return Err(AppError::validation("avatar_url must not be empty"));
    }

    Ok(Json(state.users.update_avatar(principal.id, avatar_url).await?))
}

/// The caller's saved addresses, default first.
pub async fn list_addresses(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserAddress>>, AppError> {
    Ok(Json(state.users.list_addresses(principal.id).await?))
}

/// The caller's order count, favorite count and total spend.
pub async fn stats(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
) -> Result<Json<UserStats>, AppError> {
    Ok(Json(state.users.user_stats(principal.id).await?))
}

/// The caller's favorite books.
///
/// # Example
///
/// ```bash
/// curl -H "Authorization: Bearer $TOKEN" 'http://localhost:3001/api/users/wishlist?page=1&limit=20'
/// ```
pub async fn list_wishlist(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<WishlistResponse>, AppError> {
    let pagination = params.pagination()?;

    let page = state.favorites.list_favorites(principal.id, pagination).await?;

    Ok(Json(WishlistResponse {
        items: page.items,
        pagination: PageMeta::new(pagination, page.total),
    }))
}

/// Add a book to the caller's favorites. Adding twice is harmless.
pub async fn add_to_wishlist(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<(StatusCode, Json<WishlistEntry>), AppError> {
    let book_id = parse_id("book_id", &book_id)?;

    state.favorites.add_favorite(principal.id, book_id).await?;

    Ok((StatusCode::CREATED, Json(WishlistEntry { book_id })))
}

/// Remove a book from the caller's favorites.
pub async fn remove_from_wishlist(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let book_id = parse_id("book_id", &book_id)?;

    if state.favorites.remove_favorite(principal.id, book_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Favorite", book_id))
    }
}
