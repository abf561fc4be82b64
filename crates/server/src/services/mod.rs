//! Application services.
//!
//! Services wrap the repositories with the workflows the routes expose:
//! credential handling, cart mutation, checkout, and image persistence.

pub mod auth;
pub mod cart;
pub mod images;
pub mod orders;

pub use auth::AuthService;
pub use cart::CartService;
pub use orders::OrderService;
