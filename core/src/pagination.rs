//! Pagination primitives shared by every listing.
//!
//! [`Pagination`] can only be built through validating constructors, so a
//! store that receives one never has to re-check `limit`/`offset`.

use crate::error::StoreError;
use serde::{Deserialize, Serialize};

/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Page size used when the caller does not provide one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Validated `LIMIT`/`OFFSET` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Pagination {
    /// Create a pagination window from a raw limit and offset.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if `limit` is outside
    /// `1..=MAX_PAGE_SIZE` or `offset` is negative.
    pub fn new(limit: i64, offset: i64) -> Result<Self, StoreError> {
        let limit = check_limit(limit)?;
        if offset < 0 {
            return Err(StoreError::validation(format!(
                "offset must be non-negative, got {offset}"
            )));
        }
        Ok(Self { limit, offset })
    }

    /// Create a pagination window from a 1-based page number and page size.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if `page` is less than 1, `limit`
    /// is out of range, or the resulting offset overflows.
    pub fn from_page(page: i64, limit: i64) -> Result<Self, StoreError> {
        if page < 1 {
            return Err(StoreError::validation(format!(
                "page must be at least 1, got {page}"
            )));
        }
        let limit = check_limit(limit)?;
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| StoreError::validation(format!("page {page} is out of range")))?;
        Self::new(limit, offset)
    }

    /// Parse raw `page` / `limit` query-string values.
    ///
    /// Absent values fall back to page 1 and [`DEFAULT_PAGE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for non-numeric or out-of-range input.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Result<Self, StoreError> {
        let page = parse_number("page", page)?.unwrap_or(1);
        let limit = parse_number("limit", limit)?.unwrap_or(DEFAULT_PAGE_SIZE);
        Self::from_page(page, limit)
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows skipped before the page starts.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        self.offset
    }

    /// 1-based page number the window starts on.
    #[must_use]
    pub const fn page(&self) -> i64 {
        self.offset / self.limit + 1
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            offset: 0,
        }
    }
}

/// Check that a standalone result limit lies in `1..=MAX_PAGE_SIZE`.
///
/// # Errors
///
/// Returns [`StoreError::Validation`] when the limit is out of range.
pub fn check_limit(limit: i64) -> Result<i64, StoreError> {
    if (1..=MAX_PAGE_SIZE).contains(&limit) {
        Ok(limit)
    } else {
        Err(StoreError::validation(format!(
            "limit must be between 1 and {MAX_PAGE_SIZE}, got {limit}"
        )))
    }
}

fn parse_number(name: &str, raw: Option<&str>) -> Result<Option<i64>, StoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| StoreError::validation(format!("{name} must be an integer, got '{value}'"))),
    }
}

/// One page of results plus the exact number of rows matching the filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Rows in this page, in query order.
    pub items: Vec<T>,
    /// Number of rows matching the same filters without `LIMIT`/`OFFSET`.
    pub total: i64,
}

impl<T> Page<T> {
    /// Create a page.
    #[must_use]
    pub const fn new(items: Vec<T>, total: i64) -> Self {
        Self { items, total }
    }

    /// An empty page with a zero total.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
        }
    }

    /// Transform every item, keeping the total.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

/// Pagination envelope returned next to list results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    /// 1-based page number.
    pub page: i64,
    /// Page size.
    pub limit: i64,
    /// Total matching rows.
    pub total: i64,
    /// Number of pages, `ceil(total / limit)`.
    pub pages: i64,
}

impl PageMeta {
    /// Build the envelope for a pagination window and a total.
    #[must_use]
    pub const fn new(pagination: Pagination, total: i64) -> Self {
        let limit = pagination.limit();
        Self {
            page: pagination.page(),
            limit,
            total,
            pages: (total + limit - 1) / limit,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parse_uses_defaults_when_absent() {
        let pagination = Pagination::parse(None, None).unwrap();
        assert_eq!(pagination.limit(), DEFAULT_PAGE_SIZE);
        assert_eq!(pagination.offset(), 0);
        assert_eq!(pagination.page(), 1);
    }

    #[test]
    fn parse_rejects_non_numeric_input() {
        let err = Pagination::parse(Some("two"), None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = Pagination::parse(None, Some("10; DROP TABLE books")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(Pagination::new(0, 0).is_err());
        assert!(Pagination::new(MAX_PAGE_SIZE + 1, 0).is_err());
        assert!(Pagination::new(10, -1).is_err());
        assert!(Pagination::from_page(0, 10).is_err());
        assert!(Pagination::from_page(i64::MAX, 100).is_err());
    }

    #[test]
    fn page_meta_rounds_pages_up() {
        let pagination = Pagination::from_page(2, 10).unwrap();
        let meta = PageMeta::new(pagination, 21);
        assert_eq!(meta, PageMeta { page: 2, limit: 10, total: 21, pages: 3 });

        let empty = PageMeta::new(Pagination::default(), 0);
        assert_eq!(empty.pages, 0);
    }

    proptest! {
        #[test]
        fn from_page_round_trips_page_number(page in 1i64..10_000, limit in 1i64..=MAX_PAGE_SIZE) {
            let pagination = Pagination::from_page(page, limit).unwrap();
            prop_assert_eq!(pagination.offset(), (page - 1) * limit);
            prop_assert_eq!(pagination.page(), page);
        }

        #[test]
        fn pages_cover_total(total in 0i64..1_000_000, limit in 1i64..=MAX_PAGE_SIZE) {
            let meta = PageMeta::new(Pagination::new(limit, 0).unwrap(), total);
            prop_assert!(meta.pages * limit >= total);
            prop_assert!(meta.pages == 0 || (meta.pages - 1) * limit < total);
        }
    }
}
