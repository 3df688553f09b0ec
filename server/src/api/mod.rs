//! API endpoints, grouped by resource.
//!
//! Handlers return `Result<_, AppError>`; store errors convert through
//! `From<StoreError> for AppError`.

pub mod auth;
pub mod books;
pub mod carousels;
pub mod categories;
pub mod orders;
pub mod users;

use bookstore_web::AppError;

/// Parse a positive integer path or query value, rejecting with 422.
pub(crate) fn parse_id(name: &str, raw: &str) -> Result<i64, AppError> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::validation(format!("{name} must be an integer, got '{raw}'")))?;
    if id <= 0 {
        return Err(AppError::validation(format!("{name} must be positive, got {id}")));
    }
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("id", " 42 ").unwrap(), 42);
        assert_eq!(
            parse_id("id", "abc").unwrap_err().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_parse_id_rejects_non_positive() {
        for raw in ["0", "-5", " -1 "] {
            assert_eq!(
                parse_id("id", raw).unwrap_err().status(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "{raw}"
            );
        }
    }
}
