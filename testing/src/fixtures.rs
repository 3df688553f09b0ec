//! Fixture builders with plausible defaults.
//!
//! Every builder returns a plain value; adjust fields with struct update
//! syntax before seeding:
//!
//! ```
//! use bookstore_testing::fixtures;
//!
//! let book = bookstore_core::book::Book {
//!     sales_volume: 500,
//!     is_hot: true,
//!     ..fixtures::book(1, "Dune", 1)
//! };
//! assert_eq!(book.author, "Author 1");
//! ```

use crate::mocks::test_epoch;
use bookstore_core::Decimal;
use bookstore_core::book::Book;
use bookstore_core::carousel::Carousel;
use bookstore_core::category::Category;
use bookstore_core::user::UserAddress;

/// A book priced 20.00 (list 40.00), created at the test epoch.
#[must_use]
pub fn book(id: i64, title: &str, category_id: i64) -> Book {
    Book {
        id,
        isbn: format!("978000000{id:04}"),
        title: title.to_string(),
        subtitle: None,
        author: format!("Author {id}"),
        translator: None,
        publisher: "Test Press".to_string(),
        publish_date: None,
        language: "en".to_string(),
        pages: Some(320),
        category_id,
        original_price: Decimal::new(4000, 2),
        selling_price: Decimal::new(2000, 2),
        stock_quantity: 0,
        sales_volume: 0,
        cover_image: format!("/covers/{id}.jpg"),
        description: None,
        details: None,
        author_intro: None,
        is_hot: false,
        is_new: false,
        is_recommended: false,
        rating: Decimal::ZERO,
        review_count: 0,
        created_at: test_epoch(),
        updated_at: test_epoch(),
    }
}

/// An active category sorted by its id.
#[must_use]
pub fn category(id: i64, name: &str, slug: &str, parent_id: Option<i64>) -> Category {
    Category {
        id,
        name: name.to_string(),
        slug: slug.to_string(),
        description: None,
        parent_id,
        image_url: None,
        sort_order: i32::try_from(id).unwrap_or(i32::MAX),
        is_active: true,
        created_at: test_epoch(),
    }
}

/// A non-default address for the given user.
#[must_use]
pub fn address(id: i64, user_id: i64, recipient_name: &str) -> UserAddress {
    UserAddress {
        id,
        user_id,
        recipient_name: recipient_name.to_string(),
        recipient_phone: "555-0100".to_string(),
        province: "Ontario".to_string(),
        city: "Toronto".to_string(),
        district: "Downtown".to_string(),
        detail_address: format!("{id} King Street"),
        is_default: false,
    }
}

/// A carousel slide.
#[must_use]
pub fn carousel(id: i64, title: &str, sort_order: i32) -> Carousel {
    Carousel {
        id,
        image_url: format!("/banners/{id}.jpg"),
        title: title.to_string(),
        description: None,
        link: None,
        button_text: None,
        sort_order,
        created_at: test_epoch(),
        updated_at: test_epoch(),
    }
}
