//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use cartwheel_core::{CartId, UserId};

use super::Product;

/// A user's cart row. At most one per user; created lazily.
#[derive(Debug, Clone)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// The owning user.
    pub user_id: UserId,
    /// When the cart was created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A cart item with its product resolved against the catalog.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    /// The resolved product, for display.
    pub product: Product,
    /// How many units of the product are in the cart. Always >= 1.
    pub quantity: i32,
}

/// The denormalized cart returned by every cart operation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    /// Unique cart ID.
    pub id: CartId,
    /// Items in insertion order, one entry per distinct product.
    pub items: Vec<CartItemView>,
}
