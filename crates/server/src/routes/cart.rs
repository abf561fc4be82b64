//! Cart route handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use cartwheel_core::ProductId;

use crate::error::{AppJson, Result};
use crate::middleware::CurrentUser;
use crate::models::CartView;
use crate::services::CartService;
use crate::state::AppState;

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// Get-or-create the caller's cart.
pub async fn show(State(state): State<AppState>, user: CurrentUser) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool()).get_or_create(user.id).await?;
    Ok(Json(cart))
}

/// Add an item to the caller's cart. Adding a product already in the cart
/// increments its quantity.
pub async fn add(
    State(state): State<AppState>,
    user: CurrentUser,
    AppJson(req): AppJson<AddItemRequest>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool())
        .add_item(user.id, ProductId::new(req.product_id), req.quantity)
        .await?;

    Ok(Json(cart))
}

/// Remove a product's entry from the caller's cart.
pub async fn remove(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(product_id): Path<i32>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.pool())
        .remove_item(user.id, ProductId::new(product_id))
        .await?;

    Ok(Json(cart))
}
