//! Catalog types and the book query description.
//!
//! A [`BookQuery`] is a pure value: keyword, category, sort key and a
//! validated [`Pagination`]. Stores turn it into bound SQL parameters; no
//! part of it is ever spliced into query text.

use crate::error::{StoreError, check_text};
use crate::pagination::Pagination;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A catalog book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Book id.
    pub id: i64,
    /// ISBN (unique).
    pub isbn: String,
    /// Title.
    pub title: String,
    /// Subtitle.
    pub subtitle: Option<String>,
    /// Author.
    pub author: String,
    /// Translator.
    pub translator: Option<String>,
    /// Publisher.
    pub publisher: String,
    /// Publication date.
    pub publish_date: Option<NaiveDate>,
    /// Language of the edition.
    pub language: String,
    /// Page count.
    pub pages: Option<i32>,
    /// Owning category.
    pub category_id: i64,
    /// List price.
    pub original_price: Decimal,
    /// Current selling price.
    pub selling_price: Decimal,
    /// Denormalized stock counter kept by catalog management.
    pub stock_quantity: i32,
    /// Units sold.
    pub sales_volume: i32,
    /// Cover image URL.
    pub cover_image: String,
    /// Short description.
    pub description: Option<String>,
    /// Long-form details.
    pub details: Option<String>,
    /// About the author.
    pub author_intro: Option<String>,
    /// Featured as a hot book.
    pub is_hot: bool,
    /// Featured as a new book.
    pub is_new: bool,
    /// Editorially recommended.
    pub is_recommended: bool,
    /// Average rating, 0.00 to 5.00.
    pub rating: Decimal,
    /// Number of reviews.
    pub review_count: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// A book joined with its (possibly missing) category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookWithCategory {
    /// The book row.
    #[serde(flatten)]
    pub book: Book,
    /// Category name, `None` when the category row is missing.
    pub category_name: Option<String>,
    /// Category slug, `None` when the category row is missing.
    pub category_slug: Option<String>,
}

/// How a related book is related.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// Similar subject matter.
    Similar,
    /// Frequently bought together.
    AlsoBought,
    /// Written by the same author.
    SameAuthor,
}

impl RelationType {
    /// Database representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Similar => "similar",
            Self::AlsoBought => "also_bought",
            Self::SameAuthor => "same_author",
        }
    }

    /// Parse the database representation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] for an unknown value, since relation
    /// types only ever come from stored rows.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s {
            "similar" => Ok(Self::Similar),
            "also_bought" => Ok(Self::AlsoBought),
            "same_author" => Ok(Self::SameAuthor),
            _ => Err(StoreError::database(format!("Invalid relation type: {s}"))),
        }
    }
}

/// Compact view of a related book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelatedBook {
    /// Book id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Author.
    pub author: String,
    /// Cover image URL.
    pub cover_image: String,
    /// Current selling price.
    pub selling_price: Decimal,
    /// Kind of relation.
    pub relation_type: RelationType,
}

/// Full detail view of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    /// Book and category.
    #[serde(flatten)]
    pub listing: BookWithCategory,
    /// Inventory quantity, 0 when there is no inventory row.
    pub stock: i32,
    /// Discount in whole percent, see [`discount_rate`].
    pub discount_rate: i32,
    /// Up to [`RELATED_BOOKS_LIMIT`] related books.
    pub related_books: Vec<RelatedBook>,
}

/// Maximum number of related books attached to a detail view.
pub const RELATED_BOOKS_LIMIT: i64 = 4;

/// Discount in whole percent: `round((1 - selling / original) * 100)`.
///
/// Returns 0 when either price is not positive or there is no discount.
#[must_use]
pub fn discount_rate(original: Decimal, selling: Decimal) -> i32 {
    if original <= Decimal::ZERO || selling <= Decimal::ZERO || selling >= original {
        return 0;
    }
    let rate = (Decimal::ONE - selling / original) * Decimal::ONE_HUNDRED;
    rate.round().to_i32().unwrap_or(0)
}

/// Closed set of listing sort keys.
///
/// Every variant maps to one static `ORDER BY` expression; unknown input
/// falls back to [`BookSort::Newest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookSort {
    /// Creation time, newest first.
    #[default]
    Newest,
    /// Selling price, cheapest first.
    PriceAsc,
    /// Selling price, most expensive first.
    PriceDesc,
    /// Sales volume, best selling first.
    Bestseller,
    /// Recommended flag, then rating, then sales volume.
    Recommended,
}

impl BookSort {
    /// All sort keys.
    pub const ALL: [Self; 5] = [
        Self::Newest,
        Self::PriceAsc,
        Self::PriceDesc,
        Self::Bestseller,
        Self::Recommended,
    ];

    /// Parse a query-string value leniently.
    ///
    /// Absent or unrecognized values yield [`BookSort::Newest`].
    #[must_use]
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("price-asc") => Self::PriceAsc,
            Some("price-desc") => Self::PriceDesc,
            Some("bestseller") => Self::Bestseller,
            Some("recommended") => Self::Recommended,
            _ => Self::Newest,
        }
    }

    /// Query-string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Bestseller => "bestseller",
            Self::Recommended => "recommended",
        }
    }

    /// Static `ORDER BY` expression over the `b` (books) alias.
    ///
    /// Every expression ends with `b.id DESC` so that page slices of the
    /// ordering are deterministic.
    #[must_use]
    pub const fn order_by(&self) -> &'static str {
        match self {
            Self::Newest => "b.created_at DESC, b.id DESC",
            Self::PriceAsc => "b.selling_price ASC, b.id DESC",
            Self::PriceDesc => "b.selling_price DESC, b.id DESC",
            Self::Bestseller => "b.sales_volume DESC, b.id DESC",
            Self::Recommended => {
                "b.is_recommended DESC, b.rating DESC, b.sales_volume DESC, b.id DESC"
            }
        }
    }

    /// In-process equivalent of [`BookSort::order_by`].
    #[must_use]
    pub fn compare(&self, a: &Book, b: &Book) -> Ordering {
        let primary = match self {
            Self::Newest => b.created_at.cmp(&a.created_at),
            Self::PriceAsc => a.selling_price.cmp(&b.selling_price),
            Self::PriceDesc => b.selling_price.cmp(&a.selling_price),
            Self::Bestseller => b.sales_volume.cmp(&a.sales_volume),
            Self::Recommended => b
                .is_recommended
                .cmp(&a.is_recommended)
                .then_with(|| b.rating.cmp(&a.rating))
                .then_with(|| b.sales_volume.cmp(&a.sales_volume)),
        };
        primary.then_with(|| b.id.cmp(&a.id))
    }
}

impl fmt::Display for BookSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Filter, sort and pagination description for a book listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BookQuery {
    keyword: Option<String>,
    category_id: Option<i64>,
    sort: BookSort,
    pagination: Pagination,
}

impl BookQuery {
    /// A query with no filters, sorted by [`BookSort::Newest`].
    #[must_use]
    pub fn new(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Self::default()
        }
    }

    /// Filter by keyword. Blank keywords disable the filter.
    #[must_use]
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        self.keyword = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    /// Filter by exact category id.
    #[must_use]
    pub const fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Set the sort key.
    #[must_use]
    pub const fn with_sort(mut self, sort: BookSort) -> Self {
        self.sort = sort;
        self
    }

    /// Keyword filter, already trimmed.
    #[must_use]
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref()
    }

    /// Category filter.
    #[must_use]
    pub const fn category_id(&self) -> Option<i64> {
        self.category_id
    }

    /// Sort key.
    #[must_use]
    pub const fn sort(&self) -> BookSort {
        self.sort
    }

    /// Pagination window.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Check the parts of the query that are not enforced by construction.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] when the category id is not positive
    /// or the keyword contains a NUL character.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(keyword) = &self.keyword {
            check_text("keyword", keyword)?;
        }
        match self.category_id {
            Some(id) if id <= 0 => Err(StoreError::validation(format!(
                "category id must be positive, got {id}"
            ))),
            _ => Ok(()),
        }
    }

    /// Whether a book satisfies the keyword and category filters.
    ///
    /// Mirrors the SQL predicate: case-insensitive literal substring match on
    /// title, author or isbn, combined with exact category equality.
    #[must_use]
    pub fn matches(&self, book: &Book) -> bool {
        let category_ok = self.category_id.is_none_or(|id| book.category_id == id);
        let keyword_ok = self.keyword.as_deref().is_none_or(|keyword| {
            let needle = keyword.to_lowercase();
            [&book.title, &book.author, &book.isbn]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        });
        category_ok && keyword_ok
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn book(id: i64, price: i64, sales: i32) -> Book {
        let created_at = DateTime::from_timestamp(1_700_000_000 + id, 0).unwrap();
        Book {
            id,
            isbn: format!("978-{id:010}"),
            title: format!("Book {id}"),
            subtitle: None,
            author: "Anonymous".to_string(),
            translator: None,
            publisher: "Press".to_string(),
            publish_date: None,
            language: "en".to_string(),
            pages: None,
            category_id: 1,
            original_price: Decimal::new(price, 2),
            selling_price: Decimal::new(price, 2),
            stock_quantity: 0,
            sales_volume: sales,
            cover_image: String::new(),
            description: None,
            details: None,
            author_intro: None,
            is_hot: false,
            is_new: false,
            is_recommended: false,
            rating: Decimal::ZERO,
            review_count: 0,
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn unknown_sort_falls_back_to_newest() {
        assert_eq!(BookSort::from_param(None), BookSort::Newest);
        assert_eq!(BookSort::from_param(Some("")), BookSort::Newest);
        assert_eq!(BookSort::from_param(Some("title; DROP TABLE books")), BookSort::Newest);
        assert_eq!(BookSort::from_param(Some("price-asc")), BookSort::PriceAsc);
    }

    #[test]
    fn every_order_by_ends_with_id_tie_break() {
        for sort in BookSort::ALL {
            assert!(sort.order_by().ends_with("b.id DESC"), "{sort}");
            assert_eq!(BookSort::from_param(Some(sort.as_str())), sort);
        }
    }

    #[test]
    fn recommended_uses_three_keys() {
        let mut plain = book(1, 1000, 500);
        plain.rating = Decimal::new(490, 2);
        let mut picked = book(2, 1000, 10);
        picked.is_recommended = true;
        picked.rating = Decimal::new(300, 2);

        assert_eq!(BookSort::Recommended.compare(&picked, &plain), Ordering::Less);

        let mut also_picked = book(3, 1000, 50);
        also_picked.is_recommended = true;
        also_picked.rating = Decimal::new(300, 2);
        assert_eq!(BookSort::Recommended.compare(&also_picked, &picked), Ordering::Less);
    }

    #[test]
    fn blank_keyword_disables_filter() {
        let query = BookQuery::new(Pagination::default()).with_keyword("   ");
        assert_eq!(query.keyword(), None);
        assert!(query.matches(&book(1, 100, 0)));
    }

    #[test]
    fn keyword_matches_title_author_or_isbn_case_insensitively() {
        let mut target = book(1, 100, 0);
        target.title = "Harry Potter".to_string();
        let query = BookQuery::new(Pagination::default()).with_keyword(" HARRY ");
        assert!(query.matches(&target));
        assert!(!query.matches(&book(2, 100, 0)));

        let by_isbn = BookQuery::new(Pagination::default()).with_keyword("0000000002");
        assert!(by_isbn.matches(&book(2, 100, 0)));
    }

    #[test]
    fn keyword_wildcards_are_literal() {
        let query = BookQuery::new(Pagination::default()).with_keyword("%");
        assert!(!query.matches(&book(1, 100, 0)));
    }

    #[test]
    fn non_positive_category_is_rejected() {
        let query = BookQuery::new(Pagination::default()).with_category(0);
        assert!(matches!(query.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn nul_in_keyword_is_rejected() {
        let query = BookQuery::new(Pagination::default()).with_keyword("har\0ry");
        assert!(matches!(query.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn discount_rate_rounds_to_whole_percent() {
        assert_eq!(discount_rate(Decimal::new(5000, 2), Decimal::new(3990, 2)), 20);
        assert_eq!(discount_rate(Decimal::new(5000, 2), Decimal::new(5000, 2)), 0);
        assert_eq!(discount_rate(Decimal::ZERO, Decimal::new(100, 2)), 0);
    }

    proptest! {
        #[test]
        fn compare_is_a_total_order(
            a in (1i64..1000, 0i64..100_000, 0i32..10_000),
            b in (1i64..1000, 0i64..100_000, 0i32..10_000),
        ) {
            let (a, b) = (book(a.0, a.1, a.2), book(b.0, b.1, b.2));
            for sort in BookSort::ALL {
                prop_assert_eq!(sort.compare(&a, &b), sort.compare(&b, &a).reverse());
                prop_assert_eq!(sort.compare(&a, &a), Ordering::Equal);
            }
        }
    }
}
