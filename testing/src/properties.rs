//! proptest strategies for catalog data.

use crate::fixtures;
use crate::mocks::test_epoch;
use bookstore_core::Decimal;
use bookstore_core::book::{Book, BookSort};
use proptest::prelude::*;

const TITLE_WORDS: [&str; 6] = ["Rust", "Harry", "Ocean", "100%", "under_score", "Garden"];

/// Any listing sort key.
pub fn any_sort() -> impl Strategy<Value = BookSort> {
    prop::sample::select(BookSort::ALL.to_vec())
}

/// One book with the given id and randomized price, popularity, age and
/// category (1 to 3). Ties on every sort key are likely.
pub fn book(id: i64) -> impl Strategy<Value = Book> {
    (
        prop::sample::select(TITLE_WORDS.to_vec()),
        1i64..=3,
        1i64..=5,
        0i32..=3,
        any::<bool>(),
        0i64..=3,
    )
        .prop_map(move |(word, category_id, price, sales, recommended, age_days)| Book {
            selling_price: Decimal::new(price * 1000, 2),
            sales_volume: sales,
            is_recommended: recommended,
            created_at: test_epoch() - chrono::Duration::days(age_days),
            ..fixtures::book(id, &format!("{word} {id}"), category_id)
        })
}

/// Up to `max` books with ids `1..=n`.
pub fn catalog(max: usize) -> impl Strategy<Value = Vec<Book>> {
    (0..=max).prop_flat_map(|n| {
        (1..=i64::try_from(n).unwrap_or_default())
            .map(book)
            .collect::<Vec<_>>()
    })
}
