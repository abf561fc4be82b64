//! Integration test helpers for Cartwheel.
//!
//! # Running Tests
//!
//! These tests require a running server with a migrated database and a
//! seeded admin user; see the crate README for the exact commands. All
//! tests are `#[ignore]`d so a plain `cargo test` never needs a database.
//!
//! Run with:
//!
//! ```bash
//! cargo test -p cartwheel-integration-tests -- --ignored
//! ```

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CARTWHEEL_BASE_URL").unwrap_or_else(|_| "http://localhost:4000".to_string())
}

/// Create an HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A unique email per call so tests never collide across runs.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@test.cartwheel.dev", Uuid::new_v4().simple())
}

/// Register a fresh user and return `(token, user id, email)`.
///
/// # Panics
///
/// Panics if registration does not succeed.
pub async fn register_user(client: &Client, prefix: &str, password: &str) -> (String, i64, String) {
    let email = unique_email(prefix);
    let resp = client
        .post(format!("{}/auth/register", base_url()))
        .json(&json!({
            "username": prefix,
            "email": email,
            "password": password,
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), 201, "registration failed for {email}");
    let body: Value = resp.json().await.expect("Failed to parse register body");

    let token = body["token"].as_str().expect("missing token").to_owned();
    let id = body["user"]["id"].as_i64().expect("missing user id");
    (token, id, email)
}

/// Log in as the seeded admin user and return a token.
///
/// # Panics
///
/// Panics if the admin login fails - seed the admin user first (see README).
pub async fn admin_token(client: &Client) -> String {
    let email = std::env::var("CARTWHEEL_TEST_ADMIN_EMAIL")
        .unwrap_or_else(|_| "admin@example.com".to_string());
    let password = std::env::var("CARTWHEEL_TEST_ADMIN_PASSWORD")
        .unwrap_or_else(|_| "cartwheel-admin-pw-1".to_string());

    let resp = client
        .post(format!("{}/auth/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in as admin");

    assert_eq!(
        resp.status(),
        200,
        "admin login failed - run `cw-cli seed admin` first"
    );
    let body: Value = resp.json().await.expect("Failed to parse admin login body");
    body["token"].as_str().expect("missing token").to_owned()
}

/// Create a product via the admin multipart endpoint and return its id.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn create_product(client: &Client, admin_token: &str, name: &str, price: &str) -> i64 {
    let form = reqwest::multipart::Form::new()
        .text("name", name.to_owned())
        .text("price", price.to_owned())
        .text("description", format!("{name} description"))
        .text("category", "other");

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(admin_token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), 201, "product creation failed");
    let body: Value = resp.json().await.expect("Failed to parse product body");
    body["id"].as_i64().expect("missing product id")
}

/// Add a product to the caller's cart and return the cart body.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn add_to_cart(client: &Client, token: &str, product_id: i64, quantity: i64) -> Value {
    let resp = client
        .post(format!("{}/cart/add", base_url()))
        .bearer_auth(token)
        .json(&json!({ "productId": product_id, "quantity": quantity }))
        .send()
        .await
        .expect("Failed to add to cart");

    assert_eq!(resp.status(), 200, "add to cart failed");
    resp.json().await.expect("Failed to parse cart body")
}

/// Place an order with a fixed valid address and return `(status, body)`.
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn place_order(client: &Client, token: &str) -> (u16, Value) {
    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(token)
        .json(&json!({
            "shippingAddress": {
                "street": "1 Main St",
                "city": "Springfield",
                "zipcode": "12345",
                "country": "US",
            },
            "paymentMethod": "CASH",
        }))
        .send()
        .await
        .expect("Failed to place order");

    let status = resp.status().as_u16();
    let body: Value = resp.json().await.expect("Failed to parse order body");
    (status, body)
}

/// Parse a price field (serialized as a decimal string) into f64 for
/// comparisons.
///
/// # Panics
///
/// Panics if the value is neither a decimal string nor a number.
#[must_use]
pub fn decimal_field(value: &Value) -> f64 {
    match value {
        Value::String(s) => s.parse().expect("unparseable decimal string"),
        Value::Number(n) => n.as_f64().expect("unparseable number"),
        other => panic!("expected decimal, got {other}"),
    }
}
