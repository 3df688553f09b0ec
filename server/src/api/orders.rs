//! Order endpoints.
//!
//! - POST /api/orders - Create an order for the caller
//! - GET /api/orders (and /api/users/orders) - The caller's orders
//! - GET /api/orders/:id - One order, owner only
//! - PATCH /api/orders/:id/status - Change the status, owner only
//!
//! Existence is checked before ownership: a missing order is 404 for every
//! caller, an order owned by someone else is 403.

use super::parse_id;
use crate::auth::AuthUser;
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bookstore_auth::Principal;
use bookstore_core::order::{
    NewOrder, NewOrderItem, OrderDetail, OrderStatus, OrderStatusFilter, OrderSummary,
};
use bookstore_core::{Decimal, PageMeta};
use bookstore_web::{AppError, PageParams};
use serde::{Deserialize, Serialize};

// ============================================================================
// Request/Response Types
// ============================================================================

/// One line of an order request.
#[derive(Debug, Deserialize)]
pub struct CreateOrderItem {
    /// Book being bought
    #[serde(alias = "bookId")]
    pub book_id: i64,
    /// Number of copies
    pub quantity: i32,
    /// Unit price at checkout
    pub price: Decimal,
}

/// Order creation request. The owner is the authenticated caller.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    /// Order lines
    pub items: Vec<CreateOrderItem>,
    /// Sum before discounts
    #[serde(alias = "totalAmount")]
    pub total_amount: Decimal,
    /// Amount charged
    #[serde(alias = "finalAmount")]
    pub final_amount: Decimal,
    /// Shipping address
    #[serde(default, alias = "addressId")]
    pub address_id: Option<i64>,
}

/// Query parameters for order listings.
#[derive(Debug, Default, Deserialize)]
pub struct ListOrdersParams {
    /// `page` and `limit`
    #[serde(flatten)]
    pub page: PageParams,
    /// Status name or `all`
    pub status: Option<String>,
}

/// Status change request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    /// Target status
    pub status: String,
}

/// A single order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    /// The order with address fields and items
    pub order: OrderDetail,
}

/// A page of orders plus the pagination envelope.
#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    /// Orders, newest first
    pub orders: Vec<OrderSummary>,
    /// Pagination envelope
    pub pagination: PageMeta,
}

/// Outcome of a status change.
#[derive(Debug, Serialize)]
pub struct StatusChangeResponse {
    /// Order id
    pub id: i64,
    /// Status before the change
    pub previous_status: OrderStatus,
    /// Status after the change
    pub status: OrderStatus,
}

impl CreateOrderRequest {
    fn into_new_order(self, user_id: i64) -> NewOrder {
        NewOrder {
            user_id,
            items: self
                .items
                .into_iter()
                .map(|item| NewOrderItem {
                    book_id: item.book_id,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
            total_amount: self.total_amount,
            final_amount: self.final_amount,
            address_id: self.address_id,
        }
    }
}

/// Load an order and check that the caller owns it.
async fn owned_order(state: &AppState, principal: &Principal, id: i64) -> Result<OrderDetail, AppError> {
    let detail = state
        .orders
        .get_order(id)
        .await?
        .ok_or_else(|| AppError::not_found("Order", id))?;

    if detail.order.user_id != principal.id {
        tracing::warn!(order_id = id, user_id = principal.id, "Order access denied");
        return Err(AppError::forbidden("You do not have access to this order"));
    }

    Ok(detail)
}

// ============================================================================
// Handlers
// ============================================================================

/// Create an order.
///
/// Items and their stock reservations are written atomically; any failing
/// item leaves no trace.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:3001/api/orders \
///   -H "Authorization: Bearer $TOKEN" -H "Content-Type: application/json" \
///   -d '{"items":[{"book_id":7,"quantity":2,"price":"19.99"}],"total_amount":"39.98","final_amount":"39.98"}'
/// ```
///
/// Response (201):
/// ```json
/// {
///   "order": {
///     "id": 1001,
///     "user_id": 42,
///     "status": "pending",
///     "final_amount": "39.98",
///     "items": [{ "book_id": 7, "quantity": 2, "price": "19.99", "title": "Dune", ... }],
///     ...
///   }
/// }
/// ```
pub async fn create_order(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), AppError> {
    let order = request.into_new_order(principal.id);

    let detail = state.orders.create_order(&order).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse { order: detail })))
}

/// The caller's orders, newest first, optionally filtered by status.
///
/// # Example
///
/// ```bash
/// curl -H "Authorization: Bearer $TOKEN" 'http://localhost:3001/api/orders?status=paid&page=1&limit=10'
/// ```
pub async fn list_orders(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListOrdersParams>,
) -> Result<Json<OrderListResponse>, AppError> {
    let pagination = params.page.pagination()?;
    let filter = OrderStatusFilter::from_param(params.status.as_deref())?;

    let page = state
        .orders
        .list_user_orders(principal.id, filter, pagination)
        .await?;

    Ok(Json(OrderListResponse {
        orders: page.items,
        pagination: PageMeta::new(pagination, page.total),
    }))
}

/// One of the caller's orders.
pub async fn get_order(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let id = parse_id("id", &id)?;

    let order = owned_order(&state, &principal, id).await?;

    Ok(Json(OrderResponse { order }))
}

/// Change the status of one of the caller's orders.
///
/// # Example
///
/// ```bash
/// curl -X PATCH http://localhost:3001/api/orders/1001/status \
///   -H "Authorization: Bearer $TOKEN" -H "Content-Type: application/json" \
///   -d '{"status":"cancelled"}'
/// ```
///
/// Response:
/// ```json
/// { "id": 1001, "previous_status": "pending", "status": "cancelled" }
/// ```
pub async fn update_status(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<StatusChangeResponse>, AppError> {
    let id = parse_id("id", &id)?;
    let status = OrderStatus::parse(request.status.trim())?;

    owned_order(&state, &principal, id).await?;
    let previous_status = state.orders.update_order_status(id, status).await?;

    Ok(Json(StatusChangeResponse {
        id,
        previous_status,
        status,
    }))
}
