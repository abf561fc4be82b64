//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cartwheel_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId};

/// Where an order ships to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub street: String,
    pub city: String,
    pub zipcode: String,
    pub country: String,
}

/// A line item snapshotted at checkout.
///
/// Name and price are captured from the product at order time and never
/// change afterwards, regardless of later catalog edits or deletions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    /// The product this line was created from. May no longer exist.
    pub product_id: ProductId,
    /// Product name at checkout.
    pub name: String,
    /// Unit price at checkout.
    pub price: Decimal,
    /// Units ordered. Always >= 1.
    pub quantity: i32,
}

/// A placed order.
///
/// Immutable after creation except `status` and `payment_status`, which only
/// admins may change.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// The user who placed the order.
    pub user_id: UserId,
    /// Snapshotted line items in cart order.
    pub items: Vec<OrderItem>,
    /// Sum of price x quantity over all items.
    pub total: Decimal,
    pub status: OrderStatus,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Owner identity fields denormalized onto order responses for display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// An order with its owner resolved, returned by single-order lookups and
/// the admin listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub user: OwnerSummary,
}
