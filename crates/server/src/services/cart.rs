//! Cart service.
//!
//! The cart is created lazily: the first read or add materializes an empty
//! cart for the owner. All operations return the denormalized cart view so
//! clients can render without a second round-trip.

use sqlx::PgPool;
use thiserror::Error;

use cartwheel_core::{ProductId, UserId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::models::{Cart, CartView};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity below the minimum of 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// The product reference does not resolve in the catalog.
    #[error("product not found")]
    ProductNotFound,

    /// The user has no cart to remove from.
    #[error("cart not found")]
    CartNotFound,

    /// The product is not among the cart's items. A no-op remove is an
    /// error, not silently ignored.
    #[error("product not found in cart")]
    ItemNotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
pub struct CartService<'a> {
    carts: CartRepository<'a>,
    products: ProductRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            carts: CartRepository::new(pool),
            products: ProductRepository::new(pool),
        }
    }

    /// Get the user's cart, creating an empty one if none exists.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the store fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<CartView, CartError> {
        let cart = self.carts.get_or_create(user_id).await?;
        self.view(cart).await
    }

    /// Add quantity of a product to the user's cart.
    ///
    /// If the cart already holds the product the quantity is incremented;
    /// otherwise the product is appended. No upper bound is enforced.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` if `quantity < 1`.
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartView, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        self.products
            .get(product_id)
            .await?
            .ok_or(CartError::ProductNotFound)?;

        let cart = self.carts.get_or_create(user_id).await?;

        self.carts
            .add_item(cart.id, product_id, quantity)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ProductNotFound,
                other => CartError::Repository(other),
            })?;

        self.view(cart).await
    }

    /// Remove a product's entry from the user's cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartNotFound` if the user has no cart.
    /// Returns `CartError::ItemNotFound` if the product is not in the cart;
    /// the cart is unchanged in that case.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<CartView, CartError> {
        let cart = self
            .carts
            .find_by_user(user_id)
            .await?
            .ok_or(CartError::CartNotFound)?;

        let removed = self.carts.remove_item(cart.id, product_id).await?;
        if !removed {
            return Err(CartError::ItemNotFound);
        }

        self.view(cart).await
    }

    async fn view(&self, cart: Cart) -> Result<CartView, CartError> {
        let items = self.carts.resolved_items(cart.id).await?;
        Ok(CartView {
            id: cart.id,
            items,
        })
    }
}
