//! Order transaction manager.
//!
//! # Atomicity
//!
//! [`PostgresOrderStore::create_order`] writes the order header and every
//! item inside one transaction. Any failure returns early and drops the
//! [`sqlx::Transaction`], which rolls it back, so either the header and all
//! items persist or none of them do. The transaction never outlives the
//! call, including when the operation timeout elapses.
//!
//! # Stock reservation
//!
//! With [`StoreOptions::reserve_stock`] enabled, each item also decrements
//! `inventory.quantity` inside the same transaction, guarded so the quantity
//! never goes negative. A book without enough stock (or without an inventory
//! row) fails the whole order with [`StoreError::Conflict`].

use crate::pool::StoreOptions;
use crate::rows::order_from_row;
use crate::support::{map_db_error, timed};
use async_trait::async_trait;
use bookstore_core::order::{
    NewOrder, OrderDetail, OrderItem, OrderStatus, OrderStatusFilter, OrderSummary,
    ShippingAddress,
};
use bookstore_core::store::OrderStore;
use bookstore_core::{Page, Pagination, StoreError};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// `PostgreSQL`-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
    options: StoreOptions,
}

impl PostgresOrderStore {
    /// Create a store with default options.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self::with_options(pool, StoreOptions::default())
    }

    /// Create a store with explicit options.
    #[must_use]
    pub const fn with_options(pool: PgPool, options: StoreOptions) -> Self {
        Self { pool, options }
    }

    /// Insert header and items in one transaction; returns the new order id.
    async fn insert_order(&self, order: &NewOrder) -> Result<i64, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let (order_id,): (i64,) = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, total_amount, final_amount, address_id, status, created_at)
            VALUES ($1, $2, $3, $4, 'pending', NOW())
            RETURNING id
            ",
        )
        .bind(order.user_id)
        .bind(order.total_amount)
        .bind(order.final_amount)
        .bind(order.address_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for item in &order.items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, book_id, quantity, price)
                VALUES ($1, $2, $3, $4)
                ",
            )
            .bind(order_id)
            .bind(item.book_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if self.options.reserve_stock {
                let reserved = sqlx::query(
                    r"
                    UPDATE inventory
                    SET quantity = quantity - $1, updated_at = NOW()
                    WHERE book_id = $2 AND quantity >= $1
                    ",
                )
                .bind(item.quantity)
                .bind(item.book_id)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

                if reserved.rows_affected() == 0 {
                    return Err(StoreError::conflict(format!(
                        "insufficient stock for book {}",
                        item.book_id
                    )));
                }
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(order_id)
    }

    async fn load_items(&self, order_id: i64) -> Result<Vec<OrderItem>, StoreError> {
        let rows = sqlx::query(
            r"
            SELECT oi.id, oi.order_id, oi.book_id, oi.quantity, oi.price, b.title, b.cover_image
            FROM order_items oi
            LEFT JOIN books b ON b.id = oi.book_id
            WHERE oi.order_id = $1
            ORDER BY oi.id ASC
            ",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.iter()
            .map(|row| {
                Ok(OrderItem {
                    id: row.try_get("id")?,
                    order_id: row.try_get("order_id")?,
                    book_id: row.try_get("book_id")?,
                    quantity: row.try_get("quantity")?,
                    price: row.try_get("price")?,
                    title: row.try_get("title")?,
                    cover_image: row.try_get("cover_image")?,
                })
            })
            .collect::<Result<_, sqlx::Error>>()
            .map_err(map_db_error)
    }

    async fn change_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<OrderStatus, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let current: Option<(String,)> =
            sqlx::query_as("SELECT status FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_db_error)?;

        let Some((current,)) = current else {
            return Err(StoreError::not_found("Order", order_id));
        };
        let previous = OrderStatus::parse(&current)
            .map_err(|_| StoreError::database(format!("Invalid order status: {current}")))?;

        if !self
            .options
            .transition_policy
            .check(order_id, previous, status)?
        {
            tracing::warn!(
                order_id,
                from = %previous,
                to = %status,
                "Order status change outside the lifecycle table"
            );
        }

        sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(status.as_str())
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(previous)
    }
}

/// Append the `WHERE` clause of an order listing.
fn push_order_filters(
    builder: &mut QueryBuilder<'_, Postgres>,
    user_id: i64,
    filter: OrderStatusFilter,
) {
    builder.push(" WHERE o.user_id = ").push_bind(user_id);
    if let Some(status) = filter.status() {
        builder.push(" AND o.status = ").push_bind(status.as_str());
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn create_order(&self, order: &NewOrder) -> Result<OrderDetail, StoreError> {
        order.validate()?;

        let order_id = match timed(
            "create_order",
            self.options.operation_timeout,
            self.insert_order(order),
        )
        .await
        {
            Ok(order_id) => order_id,
            Err(err) => {
                tracing::warn!(
                    user_id = order.user_id,
                    items = order.items.len(),
                    error = %err,
                    "Order creation rolled back"
                );
                metrics::counter!("bookstore_order_rollbacks_total").increment(1);
                return Err(err);
            }
        };

        tracing::info!(
            order_id,
            user_id = order.user_id,
            items = order.items.len(),
            final_amount = %order.final_amount,
            "Order created"
        );
        metrics::counter!("bookstore_orders_created_total").increment(1);

        self.get_order(order_id)
            .await?
            .ok_or_else(|| StoreError::database(format!("order {order_id} missing after commit")))
    }

    async fn get_order(&self, order_id: i64) -> Result<Option<OrderDetail>, StoreError> {
        timed("get_order", self.options.operation_timeout, async {
            let row = sqlx::query(
                r"
                SELECT o.*, a.recipient_name, a.recipient_phone, a.province, a.city,
                       a.district, a.detail_address
                FROM orders o
                LEFT JOIN user_addresses a ON a.id = o.address_id
                WHERE o.id = $1
                ",
            )
            .bind(order_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

            let Some(row) = row else {
                tracing::debug!(order_id, "Order not found");
                return Ok(None);
            };

            let order = order_from_row(&row)?;
            let address = ShippingAddress {
                recipient_name: row.try_get("recipient_name").map_err(map_db_error)?,
                recipient_phone: row.try_get("recipient_phone").map_err(map_db_error)?,
                province: row.try_get("province").map_err(map_db_error)?,
                city: row.try_get("city").map_err(map_db_error)?,
                district: row.try_get("district").map_err(map_db_error)?,
                detail_address: row.try_get("detail_address").map_err(map_db_error)?,
            };
            let items = self.load_items(order_id).await?;

            Ok(Some(OrderDetail {
                order,
                address,
                items,
            }))
        })
        .await
    }

    async fn update_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> Result<OrderStatus, StoreError> {
        let previous = timed(
            "update_order_status",
            self.options.operation_timeout,
            self.change_status(order_id, status),
        )
        .await?;

        tracing::info!(order_id, from = %previous, to = %status, "Order status updated");
        metrics::counter!("bookstore_order_status_changes_total", "status" => status.as_str())
            .increment(1);

        Ok(previous)
    }

    async fn list_user_orders(
        &self,
        user_id: i64,
        filter: OrderStatusFilter,
        pagination: Pagination,
    ) -> Result<Page<OrderSummary>, StoreError> {
        timed("list_user_orders", self.options.operation_timeout, async {
            let mut select = QueryBuilder::<Postgres>::new(
                r"
                SELECT o.*, a.recipient_name
                FROM orders o
                LEFT JOIN user_addresses a ON a.id = o.address_id
                ",
            );
            push_order_filters(&mut select, user_id, filter);
            select
                .push(" ORDER BY o.created_at DESC, o.id DESC LIMIT ")
                .push_bind(pagination.limit())
                .push(" OFFSET ")
                .push_bind(pagination.offset());

            let rows = select
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_error)?;

            let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM orders o");
            push_order_filters(&mut count, user_id, filter);

            let total: i64 = count
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool)
                .await
                .map_err(map_db_error)?;

            let items = rows
                .iter()
                .map(|row| {
                    Ok(OrderSummary {
                        order: order_from_row(row)?,
                        recipient_name: row.try_get("recipient_name").map_err(map_db_error)?,
                    })
                })
                .collect::<Result<Vec<_>, StoreError>>()?;

            tracing::debug!(user_id, returned = items.len(), total, "Listed user orders");

            Ok(Page::new(items, total))
        })
        .await
    }
}
