//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use cartwheel_core::{ProductCategory, ProductId};

/// A catalog product.
///
/// Carts reference products by id only; orders snapshot name and price at
/// checkout, so editing a product never rewrites history.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price. Never negative.
    pub price: Decimal,
    /// Long-form description.
    pub description: String,
    /// Relative web path of the product image, if one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Catalog category.
    pub category: ProductCategory,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}
