//! Cart repository for database operations.
//!
//! The `cart_items` table has a `UNIQUE (cart_id, product_id)` constraint, so
//! the merge-on-add invariant is enforced by the store itself: `add_item`
//! upserts with an atomic quantity increment, which also serializes
//! concurrent adds from multiple devices.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cartwheel_core::{CartId, ProductCategory, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Cart, CartItemView, Product};

#[derive(sqlx::FromRow)]
struct CartRow {
    id: CartId,
    user_id: UserId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CartRow> for Cart {
    fn from(row: CartRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ResolvedItemRow {
    product_id: ProductId,
    name: String,
    price: Decimal,
    description: String,
    image: Option<String>,
    category: String,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
    quantity: i32,
}

impl ResolvedItemRow {
    fn into_view(self) -> Result<CartItemView, RepositoryError> {
        let category = self.category.parse::<ProductCategory>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid category in database: {e}"))
        })?;

        Ok(CartItemView {
            product: Product {
                id: self.product_id,
                name: self.name,
                price: self.price,
                description: self.description,
                image: self.image,
                category,
                created_at: self.product_created_at,
                updated_at: self.product_updated_at,
            },
            quantity: self.quantity,
        })
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating an empty one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            INSERT INTO carts (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING id, user_id, created_at, updated_at
            ",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Find the user's cart without creating one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn find_by_user(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let row = sqlx::query_as::<_, CartRow>(
            r"
            SELECT id, user_id, created_at, updated_at
            FROM carts
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Add quantity of a product to a cart.
    ///
    /// If the cart already holds the product, its quantity is incremented
    /// atomically; otherwise a new entry is appended.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product vanished between
    /// the caller's existence check and the insert.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (cart_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (cart_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(())
    }

    /// Remove a product's entry from a cart.
    ///
    /// # Returns
    ///
    /// Returns `true` if an entry was removed, `false` if the product was
    /// not in the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE cart_id = $1 AND product_id = $2
            ",
        )
        .bind(cart_id)
        .bind(product_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Load a cart's items with product details resolved, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored category is invalid.
    pub async fn resolved_items(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<CartItemView>, RepositoryError> {
        let rows = sqlx::query_as::<_, ResolvedItemRow>(
            r"
            SELECT p.id AS product_id, p.name, p.price, p.description, p.image, p.category,
                   p.created_at AS product_created_at, p.updated_at AS product_updated_at,
                   ci.quantity
            FROM cart_items ci
            JOIN products p ON p.id = ci.product_id
            WHERE ci.cart_id = $1
            ORDER BY ci.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(ResolvedItemRow::into_view).collect()
    }
}
