//! Order workflow.
//!
//! Checkout reads the caller's cart, snapshots line items against the
//! catalog as of that instant, computes the total in decimal arithmetic,
//! and persists the order while emptying the cart in one transaction.
//! Later product edits never alter a placed order.

use rust_decimal::Decimal;
use sqlx::PgPool;
use thiserror::Error;

use cartwheel_core::{OrderId, OrderStatus, PaymentMethod, PaymentStatus, Role, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::orders::OrderRepository;
use crate::models::{CartItemView, Order, OrderItem, OrderView, ShippingAddress};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Checkout requires a non-empty cart.
    #[error("cart is empty")]
    EmptyCart,

    /// A shipping address field is missing or blank.
    #[error("shipping address {0} is required")]
    MissingAddressField(&'static str),

    /// The order does not exist.
    #[error("order not found")]
    NotFound,

    /// The requester is neither the order's owner nor an admin.
    #[error("access denied")]
    AccessDenied,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
    carts: CartRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
            carts: CartRepository::new(pool),
        }
    }

    /// Create an order from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::MissingAddressField` if any address field is blank.
    /// Returns `OrderError::EmptyCart` if the user has no cart or it has no
    /// items; no order is persisted in that case.
    pub async fn checkout(
        &self,
        user_id: UserId,
        address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Result<Order, OrderError> {
        validate_address(&address)?;

        let cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .ok_or(OrderError::EmptyCart)?;

        let resolved = self.carts.resolved_items(cart.id).await?;
        if resolved.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let items = snapshot_items(&resolved);
        let total = order_total(&items);

        let order = self
            .orders
            .create(user_id, cart.id, &items, total, &address, payment_method)
            .await?;

        Ok(order)
    }

    /// List the user's own orders, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list_own(&self, user_id: UserId) -> Result<Vec<Order>, OrderError> {
        Ok(self.orders.list_by_user(user_id).await?)
    }

    /// Get one order, enforcing ownership.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist.
    /// Returns `OrderError::AccessDenied` if the requester is neither the
    /// owner nor an admin.
    pub async fn get(
        &self,
        requester: UserId,
        requester_role: Role,
        id: OrderId,
    ) -> Result<OrderView, OrderError> {
        let view = self
            .orders
            .get_with_owner(id)
            .await?
            .ok_or(OrderError::NotFound)?;

        if !requester_role.is_admin() && view.order.user_id != requester {
            return Err(OrderError::AccessDenied);
        }

        Ok(view)
    }

    /// List every order, most recently created first. Admin only; the route
    /// enforces the role.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the store fails.
    pub async fn list_all(&self) -> Result<Vec<OrderView>, OrderError> {
        Ok(self.orders.list_all_with_owner().await?)
    }

    /// Apply a partial status update. Absent fields are left unchanged; no
    /// transition validity is checked.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist.
    pub async fn update(
        &self,
        id: OrderId,
        status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
    ) -> Result<Order, OrderError> {
        self.orders
            .update(id, status, payment_status)
            .await?
            .ok_or(OrderError::NotFound)
    }
}

/// Reject a shipping address with any blank field.
fn validate_address(address: &ShippingAddress) -> Result<(), OrderError> {
    for (value, field) in [
        (&address.street, "street"),
        (&address.city, "city"),
        (&address.zipcode, "zipcode"),
        (&address.country, "country"),
    ] {
        if value.trim().is_empty() {
            return Err(OrderError::MissingAddressField(field));
        }
    }
    Ok(())
}

/// Snapshot resolved cart items into immutable order lines.
fn snapshot_items(resolved: &[CartItemView]) -> Vec<OrderItem> {
    resolved
        .iter()
        .map(|item| OrderItem {
            product_id: item.product.id,
            name: item.product.name.clone(),
            price: item.product.price,
            quantity: item.quantity,
        })
        .collect()
}

/// Sum price x quantity over all lines. Decimal arithmetic, no rounding.
fn order_total(items: &[OrderItem]) -> Decimal {
    items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}
