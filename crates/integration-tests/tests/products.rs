//! Integration tests for the product catalog.
//!
//! These tests require a running server, a migrated database, and a seeded
//! admin user; see the crate README.

use serde_json::Value;

use cartwheel_integration_tests::{
    admin_token, base_url, client, create_product, decimal_field, register_user,
};

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_catalog_reads_require_authentication() {
    let client = client();

    let resp = client
        .get(format!("{}/products", base_url()))
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 401);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_create_requires_admin_role() {
    let client = client();
    let (token, _, _) = register_user(&client, "catalog-user", "p4ssw0rd-ok").await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Forbidden Widget")
        .text("price", "1.00")
        .text("description", "should not be created");

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 403);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_created_product_is_visible_to_users() {
    let client = client();
    let admin = admin_token(&client).await;
    let id = create_product(&client, &admin, "Visible Widget", "12.34").await;
    let (token, _, _) = register_user(&client, "catalog-reader", "p4ssw0rd-ok").await;

    let resp = client
        .get(format!("{}/products/{id}", base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to fetch product");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("product body");
    assert_eq!(body["name"].as_str(), Some("Visible Widget"));
    assert!((decimal_field(&body["price"]) - 12.34).abs() < 1e-9);
    assert_eq!(body["category"].as_str(), Some("other"));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_create_rejects_missing_required_field() {
    let client = client();
    let admin = admin_token(&client).await;

    // No price
    let form = reqwest::multipart::Form::new()
        .text("name", "Halfdone Widget")
        .text("description", "missing a price");

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&admin)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"]["category"].as_str(), Some("validation"));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_create_rejects_negative_price() {
    let client = client();
    let admin = admin_token(&client).await;

    let form = reqwest::multipart::Form::new()
        .text("name", "Negative Widget")
        .text("price", "-1.00")
        .text("description", "nope");

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&admin)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 400);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_update_applies_only_supplied_fields() {
    let client = client();
    let admin = admin_token(&client).await;
    let id = create_product(&client, &admin, "Patch Widget", "5.00").await;

    let form = reqwest::multipart::Form::new().text("price", "6.50");
    let resp = client
        .put(format!("{}/products/{id}", base_url()))
        .bearer_auth(&admin)
        .multipart(form)
        .send()
        .await
        .expect("Failed to update");

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("product body");
    assert!((decimal_field(&body["price"]) - 6.5).abs() < 1e-9);
    // Untouched fields survive
    assert_eq!(body["name"].as_str(), Some("Patch Widget"));
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_delete_then_fetch_is_not_found() {
    let client = client();
    let admin = admin_token(&client).await;
    let id = create_product(&client, &admin, "Doomed Widget", "9.99").await;

    let resp = client
        .delete(format!("{}/products/{id}", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete");
    assert_eq!(resp.status(), 204);

    let resp = client
        .get(format!("{}/products/{id}", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to fetch");
    assert_eq!(resp.status(), 404);

    let resp = client
        .delete(format!("{}/products/{id}", base_url()))
        .bearer_auth(&admin)
        .send()
        .await
        .expect("Failed to delete twice");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_image_upload_is_stored_and_served() {
    let client = client();
    let admin = admin_token(&client).await;

    let image_part = reqwest::multipart::Part::bytes(vec![0x89, b'P', b'N', b'G'])
        .file_name("widget.png")
        .mime_str("image/png")
        .expect("valid mime");

    let form = reqwest::multipart::Form::new()
        .text("name", "Pictured Widget")
        .text("price", "7.00")
        .text("description", "has a picture")
        .part("image", image_part);

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&admin)
        .multipart(form)
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), 201);
    let body: Value = resp.json().await.expect("product body");
    let image_path = body["image"].as_str().expect("image path");
    assert!(image_path.starts_with("/uploads/products/"));

    // The stored file is served back as a static asset
    let resp = client
        .get(format!("{}{image_path}", base_url()))
        .send()
        .await
        .expect("Failed to fetch image");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.bytes().await.expect("image bytes").as_ref(),
        &[0x89, b'P', b'N', b'G']
    );
}

#[tokio::test]
#[ignore = "Requires running server, database, and seeded admin"]
async fn test_non_image_upload_is_rejected() {
    let client = client();
    let admin = admin_token(&client).await;

    let bogus = reqwest::multipart::Part::bytes(b"#!/bin/sh".to_vec())
        .file_name("script.sh")
        .mime_str("text/x-shellscript")
        .expect("valid mime");

    let form = reqwest::multipart::Form::new()
        .text("name", "Scripted Widget")
        .text("price", "7.00")
        .text("description", "nope")
        .part("image", bogus);

    let resp = client
        .post(format!("{}/products", base_url()))
        .bearer_auth(&admin)
        .multipart(form)
        .send()
        .await
        .expect("Failed to send");

    assert_eq!(resp.status(), 400);
}
