//! Integration tests for wallet connection and the session cart.
//!
//! Run with: `cargo test -p foodpi-integration-tests --test storefront_cart`

#![allow(clippy::unwrap_used)]

use foodpi_integration_tests::{ACCESS_TOKEN, TestContext, USER_UID};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn add_item(ctx: &TestContext, restaurant_id: &str, item_id: &str) -> reqwest::Response {
    ctx.client
        .post(ctx.url("/cart/add"))
        .form(&[("restaurant_id", restaurant_id), ("item_id", item_id)])
        .send()
        .await
        .unwrap()
}

async fn cart_count(ctx: &TestContext) -> String {
    ctx.client
        .get(ctx.url("/cart/count"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap()
        .trim()
        .to_string()
}

// ============================================================================
// Wallet
// ============================================================================

#[tokio::test]
async fn test_connect_wallet() {
    let ctx = TestContext::new().await;
    ctx.mock_user().await;

    let (status, body) = ctx
        .post_json("/auth/pi", &json!({"accessToken": ACCESS_TOKEN}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["uid"], USER_UID);

    let (status, me) = ctx.get_json("/auth/me").await;
    assert_eq!(status, 200);
    assert_eq!(me["username"], "pioneer");
}

#[tokio::test]
async fn test_connect_wallet_with_bad_token() {
    let ctx = TestContext::new().await;
    Mock::given(method("GET"))
        .and(path("/v2/me"))
        .and(header("authorization", "Bearer forged"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&ctx.pi)
        .await;

    let (status, _) = ctx
        .post_json("/auth/pi", &json!({"accessToken": "forged"}))
        .await;
    assert_eq!(status, 401);

    let (status, _) = ctx.get_json("/auth/me").await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_connect_wallet_with_malformed_body() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .post(ctx.url("/auth/pi"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].is_string());

    let (status, body) = ctx.post_json("/auth/pi", &json!({"token": "x"})).await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

// ============================================================================
// Cart
// ============================================================================

#[tokio::test]
async fn test_add_to_cart_requires_wallet() {
    let ctx = TestContext::new().await;

    let resp = add_item(&ctx, "1", "1").await;
    assert_eq!(resp.status(), 401);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Please connect your Pi Wallet to add items to cart"
    );
    assert_eq!(cart_count(&ctx).await, "0");
}

#[tokio::test]
async fn test_cart_flow() {
    let ctx = TestContext::new().await;
    ctx.connect_wallet().await;

    let resp = add_item(&ctx, "1", "1").await;
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("hx-trigger").unwrap().to_str().unwrap(),
        "cart-updated"
    );
    assert_eq!(resp.text().await.unwrap().trim(), "1");

    let resp = add_item(&ctx, "1", "2").await;
    assert_eq!(resp.text().await.unwrap().trim(), "2");
    assert_eq!(cart_count(&ctx).await, "2");

    let page = ctx
        .client
        .get(ctx.url("/cart"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Margherita Pizza"));
    assert!(page.contains("Pepperoni Pizza"));
    assert!(page.contains("π32.98"));
    assert!(page.contains(r#"data-amount="32.98""#));

    // Remove the Margherita line
    let resp = ctx
        .client
        .post(ctx.url("/cart/remove"))
        .form(&[("index", "0")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let fragment = resp.text().await.unwrap();
    assert!(!fragment.contains("Margherita Pizza"));
    assert!(fragment.contains("Pepperoni Pizza"));
    assert_eq!(cart_count(&ctx).await, "1");
}

#[tokio::test]
async fn test_remove_out_of_range_keeps_cart() {
    let ctx = TestContext::new().await;
    ctx.connect_wallet().await;
    add_item(&ctx, "1", "1").await;

    let resp = ctx
        .client
        .post(ctx.url("/cart/remove"))
        .form(&[("index", "7")])
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(cart_count(&ctx).await, "1");
}

#[tokio::test]
async fn test_add_unknown_item() {
    let ctx = TestContext::new().await;
    ctx.connect_wallet().await;

    assert_eq!(add_item(&ctx, "1", "99").await.status(), 404);
    assert_eq!(add_item(&ctx, "99", "1").await.status(), 404);
    assert_eq!(cart_count(&ctx).await, "0");
}

#[tokio::test]
async fn test_logout_clears_wallet_and_cart() {
    let ctx = TestContext::new().await;
    ctx.connect_wallet().await;
    add_item(&ctx, "1", "1").await;
    assert_eq!(cart_count(&ctx).await, "1");

    let resp = ctx.client.post(ctx.url("/auth/logout")).send().await.unwrap();
    assert_eq!(resp.status(), 204);

    assert_eq!(cart_count(&ctx).await, "0");
    let (status, _) = ctx.get_json("/auth/me").await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_order_clears_session_cart() {
    let ctx = TestContext::new().await;
    ctx.connect_wallet().await;
    ctx.mock_payment("pay_ok", 15.99, true).await;
    add_item(&ctx, "1", "1").await;

    let (status, _) = ctx
        .post_json(
            "/api/restaurants/orders",
            &json!({
                "items": [foodpi_integration_tests::cart_line("1", "Margherita Pizza", 15.99)],
                "payment": {"identifier": "pay_ok"},
                "userId": USER_UID,
                "restaurantId": "1"
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(cart_count(&ctx).await, "0");
}
