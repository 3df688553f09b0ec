//! Row decoding shared by several stores.

use bookstore_core::book::{Book, BookWithCategory};
use bookstore_core::order::{Order, OrderStatus};
use bookstore_core::StoreError;
use sqlx::Row;
use sqlx::postgres::PgRow;

/// Columns of `books` joined with category name and slug.
///
/// Callers append filters, ordering and limits.
pub(crate) const BOOK_WITH_CATEGORY_SELECT: &str = r"
    SELECT b.*, c.name AS category_name, c.slug AS category_slug
    FROM books b
    LEFT JOIN categories c ON c.id = b.category_id
";

/// Decode a `books` row.
pub(crate) fn book_from_row(row: &PgRow) -> Result<Book, sqlx::Error> {
    Ok(Book {
        id: row.try_get("id")?,
        isbn: row.try_get("isbn")?,
        title: row.try_get("title")?,
        subtitle: row.try_get("subtitle")?,
        author: row.try_get("author")?,
        translator: row.try_get("translator")?,
        publisher: row.try_get("publisher")?,
        publish_date: row.try_get("publish_date")?,
        language: row.try_get("language")?,
        pages: row.try_get("pages")?,
        category_id: row.try_get("category_id")?,
        original_price: row.try_get("original_price")?,
        selling_price: row.try_get("selling_price")?,
        stock_quantity: row.try_get("stock_quantity")?,
        sales_volume: row.try_get("sales_volume")?,
        cover_image: row.try_get("cover_image")?,
        description: row.try_get("description")?,
        details: row.try_get("details")?,
        author_intro: row.try_get("author_intro")?,
        is_hot: row.try_get("is_hot")?,
        is_new: row.try_get("is_new")?,
        is_recommended: row.try_get("is_recommended")?,
        rating: row.try_get("rating")?,
        review_count: row.try_get("review_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Decode a row produced by [`BOOK_WITH_CATEGORY_SELECT`].
pub(crate) fn book_with_category_from_row(row: &PgRow) -> Result<BookWithCategory, sqlx::Error> {
    Ok(BookWithCategory {
        book: book_from_row(row)?,
        category_name: row.try_get("category_name")?,
        category_slug: row.try_get("category_slug")?,
    })
}

/// Decode an `orders` row.
pub(crate) fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let decode = |err: sqlx::Error| StoreError::database(err.to_string());
    let status: String = row.try_get("status").map_err(decode)?;

    Ok(Order {
        id: row.try_get("id").map_err(decode)?,
        user_id: row.try_get("user_id").map_err(decode)?,
        total_amount: row.try_get("total_amount").map_err(decode)?,
        final_amount: row.try_get("final_amount").map_err(decode)?,
        address_id: row.try_get("address_id").map_err(decode)?,
        status: OrderStatus::parse(&status)
            .map_err(|_| StoreError::database(format!("Invalid order status: {status}")))?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}
