//! Order repository for database operations.
//!
//! Checkout persists the order, its line snapshots, and the cart clear in a
//! single transaction, so an order can never exist alongside the cart that
//! produced it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use cartwheel_core::{
    CartId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId, UserId,
};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderView, OwnerSummary, ShippingAddress};

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total: Decimal,
    status: String,
    street: String,
    city: String,
    zipcode: String,
    country: String,
    payment_method: String,
    payment_status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl OrderRow {
    fn into_order(self, items: Vec<OrderItem>) -> Result<Order, RepositoryError> {
        let status = self.status.parse::<OrderStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid order status in database: {e}"))
        })?;
        let payment_method = self.payment_method.parse::<PaymentMethod>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment method in database: {e}"))
        })?;
        let payment_status = self.payment_status.parse::<PaymentStatus>().map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid payment status in database: {e}"))
        })?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            items,
            total: self.total,
            status,
            shipping_address: ShippingAddress {
                street: self.street,
                city: self.city,
                zipcode: self.zipcode,
                country: self.country,
            },
            payment_method,
            payment_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    product_id: ProductId,
    name: String,
    price: Decimal,
    quantity: i32,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            product_id: row.product_id,
            name: row.name,
            price: row.price,
            quantity: row.quantity,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OwnerRow {
    user_id: UserId,
    username: String,
    owner_email: String,
}

const ORDER_COLUMNS: &str = "id, user_id, total, status, street, city, zipcode, country, \
                             payment_method, payment_status, created_at, updated_at";

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a new order from snapshotted line items and empty the source
    /// cart, atomically.
    ///
    /// Status and payment status start at their PENDING defaults.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing
    /// is committed in that case.
    pub async fn create(
        &self,
        user_id: UserId,
        cart_id: CartId,
        items: &[OrderItem],
        total: Decimal,
        address: &ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO orders (user_id, total, street, city, zipcode, country, payment_method)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(user_id)
        .bind(total)
        .bind(&address.street)
        .bind(&address.city)
        .bind(&address.zipcode)
        .bind(&address.country)
        .bind(payment_method.to_string())
        .fetch_one(&mut *tx)
        .await?;

        for item in items {
            sqlx::query(
                r"
                INSERT INTO order_items (order_id, product_id, name, price, quantity)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(row.id)
            .bind(item.product_id)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.quantity)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("DELETE FROM cart_items WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        row.into_order(items.to_vec())
    }

    /// List a user's orders, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let items = self.items_for(row.id).await?;
            orders.push(row.into_order(items)?);
        }

        Ok(orders)
    }

    /// Get an order with its owner resolved for display.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_owner(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderView>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE id = $1
            "
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let owner = self.owner_for(row.user_id).await?;
        let items = self.items_for(row.id).await?;

        Ok(Some(OrderView {
            order: row.into_order(items)?,
            user: owner,
        }))
    }

    /// List every order with owners resolved, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all_with_owner(&self) -> Result<Vec<OrderView>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            SELECT {ORDER_COLUMNS}
            FROM orders
            ORDER BY created_at DESC, id DESC
            "
        ))
        .fetch_all(self.pool)
        .await?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let owner = self.owner_for(row.user_id).await?;
            let items = self.items_for(row.id).await?;
            views.push(OrderView {
                order: row.into_order(items)?,
                user: owner,
            });
        }

        Ok(views)
    }

    /// Apply a partial status update to an order.
    ///
    /// `None` fields are left unchanged. Returns `None` if the order does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the update fails.
    pub async fn update(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE orders
            SET status = COALESCE($2, status),
                payment_status = COALESCE($3, payment_status),
                updated_at = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status.map(|s| s.to_string()))
        .bind(payment_status.map(|s| s.to_string()))
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let items = self.items_for(row.id).await?;
        Ok(Some(row.into_order(items)?))
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r"
            SELECT product_id, name, price, quantity
            FROM order_items
            WHERE order_id = $1
            ORDER BY id
            ",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn owner_for(&self, user_id: UserId) -> Result<OwnerSummary, RepositoryError> {
        let row = sqlx::query_as::<_, OwnerRow>(
            r"
            SELECT id AS user_id, username, email AS owner_email
            FROM users
            WHERE id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!("order owner {user_id} missing from users"))
        })?;

        Ok(OwnerSummary {
            id: row.user_id,
            username: row.username,
            email: row.owner_email,
        })
    }
}
