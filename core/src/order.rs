//! Order types, status lifecycle and order-creation input.
//!
//! # Status lifecycle
//!
//! ```text
//! pending ──► paid ──► shipped ──► completed
//!    │          │
//!    └──────────┴──► cancelled
//! ```
//!
//! Stores apply a [`TransitionPolicy`] when changing status. The permissive
//! policy applies any change; the enforced policy only allows the edges above.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Created, awaiting payment.
    Pending,
    /// Paid, awaiting shipment.
    Paid,
    /// Handed to the carrier.
    Shipped,
    /// Delivered.
    Completed,
    /// Cancelled before shipment.
    Cancelled,
}

impl OrderStatus {
    /// All statuses.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Paid,
        Self::Shipped,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Database and wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Shipped => "shipped",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse a status name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the name is not a known status.
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        match s.trim() {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "shipped" => Ok(Self::Shipped),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(StoreError::validation(format!("Invalid order status: {other}"))),
        }
    }

    /// Whether `self → next` is an edge of the lifecycle table.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Paid | Self::Cancelled)
                | (Self::Paid, Self::Shipped | Self::Cancelled)
                | (Self::Shipped, Self::Completed)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Status filter for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderStatusFilter {
    /// Every status (query value `all`).
    #[default]
    All,
    /// Exactly one status.
    Only(OrderStatus),
}

impl OrderStatusFilter {
    /// Parse a query-string value; absent, blank and `all` mean no filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for an unknown status name.
    pub fn from_param(value: Option<&str>) -> Result<Self, StoreError> {
        match value.map(str::trim) {
            None | Some("" | "all") => Ok(Self::All),
            Some(status) => OrderStatus::parse(status).map(Self::Only),
        }
    }

    /// The single status to filter by, if any.
    #[must_use]
    pub const fn status(&self) -> Option<OrderStatus> {
        match self {
            Self::All => None,
            Self::Only(status) => Some(*status),
        }
    }
}

/// How status updates treat transitions outside the lifecycle table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Apply any transition; stores log a warning for out-of-table ones.
    #[default]
    Permissive,
    /// Reject out-of-table transitions with [`StoreError::Conflict`].
    Enforced,
}

impl TransitionPolicy {
    /// Check a transition against the policy.
    ///
    /// Returns `Ok(true)` if the transition is in the table, `Ok(false)` if it
    /// is outside the table but allowed by a permissive policy.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Conflict`] if an enforced policy rejects it.
    pub fn check(&self, order_id: i64, from: OrderStatus, to: OrderStatus) -> Result<bool, StoreError> {
        if from.can_transition_to(to) {
            return Ok(true);
        }
        match self {
            Self::Permissive => Ok(false),
            Self::Enforced => Err(StoreError::conflict(format!(
                "order {order_id} cannot move from {from} to {to}"
            ))),
        }
    }
}

/// One line of an order being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    /// Book being bought.
    pub book_id: i64,
    /// Units, must be positive.
    pub quantity: i32,
    /// Snapshot unit price, stored verbatim.
    pub price: Decimal,
}

/// Input for order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    /// Owner of the order.
    pub user_id: i64,
    /// Lines, in caller order.
    pub items: Vec<NewOrderItem>,
    /// Sum before discounts.
    pub total_amount: Decimal,
    /// Amount charged.
    pub final_amount: Decimal,
    /// Shipping address.
    pub address_id: Option<i64>,
}

impl NewOrder {
    /// Validate the order before touching storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] if the item list is empty, a
    /// quantity is not positive, or any amount is negative.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.items.is_empty() {
            return Err(StoreError::validation("order must contain at least one item"));
        }
        for (position, item) in self.items.iter().enumerate() {
            if item.quantity <= 0 {
                return Err(StoreError::validation(format!(
                    "item {} (book {}): quantity must be positive",
                    position + 1,
                    item.book_id
                )));
            }
            if item.price.is_sign_negative() {
                return Err(StoreError::validation(format!(
                    "item {} (book {}): price must not be negative",
                    position + 1,
                    item.book_id
                )));
            }
        }
        if self.total_amount.is_sign_negative() || self.final_amount.is_sign_negative() {
            return Err(StoreError::validation("order amounts must not be negative"));
        }
        Ok(())
    }
}

/// Order header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order id.
    pub id: i64,
    /// Owner.
    pub user_id: i64,
    /// Sum before discounts.
    pub total_amount: Decimal,
    /// Amount charged.
    pub final_amount: Decimal,
    /// Shipping address.
    pub address_id: Option<i64>,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shipping address fields denormalized onto an order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient.
    pub recipient_name: Option<String>,
    /// Recipient phone.
    pub recipient_phone: Option<String>,
    /// Province.
    pub province: Option<String>,
    /// City.
    pub city: Option<String>,
    /// District.
    pub district: Option<String>,
    /// Street address.
    pub detail_address: Option<String>,
}

/// A stored order line, joined with display fields of its book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Item id.
    pub id: i64,
    /// Owning order.
    pub order_id: i64,
    /// Book bought.
    pub book_id: i64,
    /// Units.
    pub quantity: i32,
    /// Snapshot unit price.
    pub price: Decimal,
    /// Book title, `None` if the book row is gone.
    pub title: Option<String>,
    /// Book cover, `None` if the book row is gone.
    pub cover_image: Option<String>,
}

/// Order header with address and items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Header.
    #[serde(flatten)]
    pub order: Order,
    /// Shipping address.
    #[serde(flatten)]
    pub address: ShippingAddress,
    /// Lines, in insertion order.
    pub items: Vec<OrderItem>,
}

/// Order header for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// Header.
    #[serde(flatten)]
    pub order: Order,
    /// Recipient of the shipping address.
    pub recipient_name: Option<String>,
}
