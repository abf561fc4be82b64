//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (verifies database)
//!
//! # Auth
//! POST /auth/register          - Create account, returns token + profile
//! POST /auth/login             - Verify credentials, returns token + profile
//! GET  /auth/profile           - Resolved identity (auth)
//!
//! # Products
//! GET    /products             - List catalog (auth)
//! GET    /products/{id}        - Product detail (auth)
//! POST   /products             - Create product, multipart (admin)
//! PUT    /products/{id}        - Update product, multipart (admin)
//! DELETE /products/{id}        - Delete product (admin)
//!
//! # Cart
//! GET    /cart                 - Get-or-create own cart (auth)
//! POST   /cart/add             - Add item {productId, quantity} (auth)
//! DELETE /cart/{productId}     - Remove item (auth)
//!
//! # Orders
//! POST /orders                 - Create order from cart (auth)
//! GET  /orders/my-orders       - Own orders, newest first (auth)
//! GET  /orders/{id}            - One order, ownership-checked (auth)
//! GET  /orders                 - All orders (admin)
//! PUT  /orders/{id}            - Update {status?, paymentStatus?} (admin)
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/profile", get(auth::profile))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/{product_id}", delete(cart::remove))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route("/my-orders", get(orders::my_orders))
        .route("/{id}", get(orders::show).put(orders::update))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .nest("/orders", order_routes())
}
