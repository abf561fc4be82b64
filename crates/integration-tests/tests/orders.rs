//! Integration tests for the order workflow.
//!
//! These tests require a running server, a migrated database, and a seeded
//! admin user; see the crate README.

use serde_json::{Value, json};

use cartwheel_integration_tests::{
    add_to_cart, admin_token, base_url, client, create_product, decimal_field, place_order,
    register_user,
};

// ============================================================================
// Checkout
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_checkout_on_empty_cart_is_rejected() {
    let client = client();
    let (token, _, _) = register_user(&client, "order-empty", "p4ssw0rd-ok").await;

    let (status, body) = place_order(&client, &token).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"]["category"].as_str(), Some("validation"));
    assert_eq!(body["error"]["message"].as_str(), Some("cart is empty"));

    // No order was persisted
    let orders: Value = client
        .get(format!("{}/orders/my-orders", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list orders")
        .json()
        .await
        .expect("orders body");
    assert_eq!(orders.as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_checkout_totals_lines_and_empties_cart() {
    let client = client();
    let admin = admin_token(&client).await;
    let ten = create_product(&client, &admin, "Ten Widget", "10.00").await;
    let five = create_product(&client, &admin, "Five Widget", "5.00").await;
    let (token, _, _) = register_user(&client, "order-total", "p4ssw0rd-ok").await;

    add_to_cart(&client, &token, ten, 2).await;
    add_to_cart(&client, &token, five, 1).await;

    let (status, order) = place_order(&client, &token).await;
    assert_eq!(status, 201);
    assert!((decimal_field(&order["total"]) - 25.0).abs() < f64::EPSILON);
    assert_eq!(order["status"].as_str(), Some("PENDING"));
    assert_eq!(order["paymentStatus"].as_str(), Some("PENDING"));
    assert_eq!(order["items"].as_array().map(Vec::len), Some(2));

    // Cart is emptied afterward
    let cart: Value = client
        .get(format!("{}/cart", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("cart body");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_checkout_rejects_blank_address_field() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_product(&client, &admin, "Address Widget", "1.00").await;
    let (token, _, _) = register_user(&client, "order-address", "p4ssw0rd-ok").await;

    add_to_cart(&client, &token, product, 1).await;

    let resp = client
        .post(format!("{}/orders", base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "shippingAddress": {
                "street": "1 Main St",
                "city": "",
                "zipcode": "12345",
                "country": "US",
            },
            "paymentMethod": "CASH",
        }))
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_order_snapshot_survives_later_price_change() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_product(&client, &admin, "Snapshot Widget", "19.99").await;
    let (token, _, _) = register_user(&client, "order-snapshot", "p4ssw0rd-ok").await;

    add_to_cart(&client, &token, product, 2).await;
    let (status, order) = place_order(&client, &token).await;
    assert_eq!(status, 201);
    let order_id = order["id"].as_i64().expect("order id");
    assert!((decimal_field(&order["total"]) - 39.98).abs() < 1e-9);

    // Admin raises the price afterwards
    let form = reqwest::multipart::Form::new().text("price", "29.99");
    let resp = client
        .put(format!("{}/products/{product}", base_url()))
        .bearer_auth(&admin)
        .multipart(form)
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), 200);

    // The placed order still shows the price at checkout time
    let fetched: Value = client
        .get(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch order")
        .json()
        .await
        .expect("order body");

    let items = fetched["items"].as_array().expect("items array");
    assert!((decimal_field(&items[0]["price"]) - 19.99).abs() < 1e-9);
    assert!((decimal_field(&fetched["total"]) - 39.98).abs() < 1e-9);
}

// ============================================================================
// Ownership & Listing
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_order_is_visible_to_owner_and_admin_only() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_product(&client, &admin, "Private Widget", "3.00").await;
    let (owner, _, owner_email) = register_user(&client, "order-owner", "p4ssw0rd-ok").await;
    let (stranger, _, _) = register_user(&client, "order-stranger", "p4ssw0rd-ok").await;

    add_to_cart(&client, &owner, product, 1).await;
    let (_, order) = place_order(&client, &owner).await;
    let order_id = order["id"].as_i64().expect("order id");

    let fetch = |token: String| {
        client
            .get(format!("{}/orders/{order_id}", base_url()))
            .bearer_auth(token)
            .send()
    };

    let as_stranger = fetch(stranger).await.expect("send");
    assert_eq!(as_stranger.status(), 403);

    let as_owner = fetch(owner).await.expect("send");
    assert_eq!(as_owner.status(), 200);
    let body: Value = as_owner.json().await.expect("order body");
    // Owner identity is denormalized for display
    assert_eq!(body["user"]["email"].as_str(), Some(owner_email.as_str()));

    let as_admin = fetch(admin).await.expect("send");
    assert_eq!(as_admin.status(), 200);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_my_orders_lists_newest_first() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_product(&client, &admin, "Serial Widget", "1.00").await;
    let (token, _, _) = register_user(&client, "order-list", "p4ssw0rd-ok").await;

    add_to_cart(&client, &token, product, 1).await;
    let (_, first) = place_order(&client, &token).await;
    add_to_cart(&client, &token, product, 1).await;
    let (_, second) = place_order(&client, &token).await;

    let orders: Value = client
        .get(format!("{}/orders/my-orders", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to list orders")
        .json()
        .await
        .expect("orders body");

    let orders = orders.as_array().expect("orders array");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["id"], second["id"]);
    assert_eq!(orders[1]["id"], first["id"]);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_list_all_orders_requires_admin() {
    let client = client();
    let (token, _, _) = register_user(&client, "order-forbidden", "p4ssw0rd-ok").await;

    let resp = client
        .get(format!("{}/orders", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 403);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"]["category"].as_str(), Some("authorization"));
}

// ============================================================================
// Admin Updates
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_partial_update_touches_only_supplied_field() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_product(&client, &admin, "Status Widget", "2.00").await;
    let (token, _, _) = register_user(&client, "order-update", "p4ssw0rd-ok").await;

    add_to_cart(&client, &token, product, 1).await;
    let (_, order) = place_order(&client, &token).await;
    let order_id = order["id"].as_i64().expect("order id");

    let update = |body: Value| {
        client
            .put(format!("{}/orders/{order_id}", base_url()))
            .bearer_auth(&admin)
            .json(&body)
            .send()
    };

    // Supplying only paymentStatus leaves status unchanged
    let resp = update(json!({ "paymentStatus": "PAID" })).await.expect("send");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("order body");
    assert_eq!(body["paymentStatus"].as_str(), Some("PAID"));
    assert_eq!(body["status"].as_str(), Some("PENDING"));

    // And vice versa
    let resp = update(json!({ "status": "SHIPPED" })).await.expect("send");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("order body");
    assert_eq!(body["status"].as_str(), Some("SHIPPED"));
    assert_eq!(body["paymentStatus"].as_str(), Some("PAID"));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_update_rejects_non_admin() {
    let client = client();
    let admin = admin_token(&client).await;
    let product = create_product(&client, &admin, "Locked Widget", "2.00").await;
    let (token, _, _) = register_user(&client, "order-locked", "p4ssw0rd-ok").await;

    add_to_cart(&client, &token, product, 1).await;
    let (_, order) = place_order(&client, &token).await;
    let order_id = order["id"].as_i64().expect("order id");

    let resp = client
        .put(format!("{}/orders/{order_id}", base_url()))
        .bearer_auth(&token)
        .json(&json!({ "status": "COMPLETED" }))
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 403);
}
