//! Order route handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;

use cartwheel_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus};

use crate::error::{AppJson, Result};
use crate::middleware::{CurrentUser, RequireAdmin};
use crate::models::{Order, OrderView, ShippingAddress};
use crate::services::OrderService;
use crate::state::AppState;

/// Checkout request body. Serde enforces presence of both fields; blank
/// address fields are rejected by the order workflow.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
}

/// Partial order update. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
}

/// Create an order from the caller's cart.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(req): AppJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>)> {
    let order = OrderService::new(state.pool())
        .checkout(user.id, req.shipping_address, req.payment_method)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// List the caller's own orders, most recent first.
pub async fn my_orders(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Order>>> {
    let orders = OrderService::new(state.pool()).list_own(user.id).await?;
    Ok(Json(orders))
}

/// Get one order. Owners see their own; admins see any.
pub async fn show(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i32>,
) -> Result<Json<OrderView>> {
    let order = OrderService::new(state.pool())
        .get(user.id, user.role, OrderId::new(id))
        .await?;

    Ok(Json(order))
}

/// List every order (admin), most recent first.
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<OrderView>>> {
    let orders = OrderService::new(state.pool()).list_all().await?;
    Ok(Json(orders))
}

/// Update an order's status and/or payment status (admin).
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i32>,
    AppJson(req): AppJson<UpdateOrderRequest>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.pool())
        .update(OrderId::new(id), req.status, req.payment_status)
        .await?;

    Ok(Json(order))
}
