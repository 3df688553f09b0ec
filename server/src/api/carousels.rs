//! Home page carousel.

use crate::server::AppState;
use axum::{Json, extract::State};
use bookstore_core::carousel::Carousel;
use bookstore_web::AppError;

/// Carousel slides by sort order.
///
/// # Example
///
/// ```bash
/// curl http://localhost:3001/api/carousels
/// ```
pub async fn list_carousels(State(state): State<AppState>) -> Result<Json<Vec<Carousel>>, AppError> {
    Ok(Json(state.carousels.list_carousels().await?))
}
