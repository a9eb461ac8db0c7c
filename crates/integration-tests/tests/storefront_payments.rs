//! Integration tests for the Pi payment callbacks.
//!
//! Run with: `cargo test -p foodpi-integration-tests --test storefront_payments`

#![allow(clippy::unwrap_used)]

use foodpi_integration_tests::{TestContext, USER_UID, payment_json};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

// ============================================================================
// SDK Callbacks
// ============================================================================

#[tokio::test]
async fn test_approve_payment() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/v2/payments/pay_1/approve"))
        .and(header("authorization", "Key test_pi_server_key_9f8e7d"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_1", 32.98, false)))
        .expect(1)
        .mount(&ctx.pi)
        .await;

    let (status, body) = ctx
        .post_json("/api/payments/approve", &json!({"paymentId": "pay_1"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["identifier"], "pay_1");
    assert_eq!(body["status"]["developer_approved"], true);
}

#[tokio::test]
async fn test_complete_payment_forwards_txid() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/v2/payments/pay_1/complete"))
        .and(body_json(json!({"txid": "tx_789"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_1", 32.98, true)))
        .expect(1)
        .mount(&ctx.pi)
        .await;

    let (status, body) = ctx
        .post_json(
            "/api/payments/complete",
            &json!({"paymentId": "pay_1", "txid": "tx_789"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"]["developer_completed"], true);
}

#[tokio::test]
async fn test_cancel_payment() {
    let ctx = TestContext::new().await;
    let mut cancelled = payment_json("pay_1", 32.98, false);
    cancelled["status"]["cancelled"] = json!(true);
    Mock::given(method("POST"))
        .and(path("/v2/payments/pay_1/cancel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(cancelled))
        .mount(&ctx.pi)
        .await;

    let (status, body) = ctx
        .post_json("/api/payments/cancel", &json!({"paymentId": "pay_1"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"]["cancelled"], true);
}

#[tokio::test]
async fn test_incomplete_payment_is_completed() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/v2/payments/pay_old/complete"))
        .and(body_json(json!({"txid": "tx_789"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_old", 5.0, true)))
        .expect(1)
        .mount(&ctx.pi)
        .await;

    let mut pending = payment_json("pay_old", 5.0, true);
    pending["status"]["developer_completed"] = json!(false);
    let (status, body) = ctx
        .post_json("/api/payments/incomplete", &json!({"payment": pending}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["identifier"], "pay_old");
}

#[tokio::test]
async fn test_incomplete_payment_without_transaction() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx
        .post_json(
            "/api/payments/incomplete",
            &json!({"payment": payment_json("pay_old", 5.0, false)}),
        )
        .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("pay_old"));
}

#[tokio::test]
async fn test_platform_failure_is_bad_gateway() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/v2/payments/pay_1/approve"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "internal"})))
        .mount(&ctx.pi)
        .await;

    let (status, body) = ctx
        .post_json("/api/payments/approve", &json!({"paymentId": "pay_1"}))
        .await;
    assert_eq!(status, 502);
    assert_eq!(body, json!({"error": "Payment service error"}));
}

// ============================================================================
// App-to-User Payments
// ============================================================================

#[tokio::test]
async fn test_create_payment_requires_wallet() {
    let ctx = TestContext::new().await;

    let (status, _) = ctx
        .post_json(
            "/api/payments/create",
            &json!({"amount": 1.5, "memo": "Refund"}),
        )
        .await;
    assert_eq!(status, 401);
}

#[tokio::test]
async fn test_create_payment_pays_connected_wallet() {
    let ctx = TestContext::new().await;
    ctx.connect_wallet().await;

    let mut created = payment_json("pay_a2u", 1.5, false);
    created["direction"] = json!("app_to_user");
    Mock::given(method("POST"))
        .and(path("/v2/payments"))
        .and(body_json(json!({
            "payment": {
                "amount": 1.5,
                "memo": "Refund",
                "metadata": {"orderId": "o1"},
                "uid": USER_UID
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(created))
        .expect(1)
        .mount(&ctx.pi)
        .await;

    let (status, body) = ctx
        .post_json(
            "/api/payments/create",
            &json!({"amount": 1.5, "memo": "Refund", "metadata": {"orderId": "o1"}}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["direction"], "app_to_user");
}

#[tokio::test]
async fn test_create_payment_rejects_zero_amount() {
    let ctx = TestContext::new().await;
    ctx.connect_wallet().await;

    let (status, _) = ctx
        .post_json("/api/payments/create", &json!({"amount": 0, "memo": "Nothing"}))
        .await;
    assert_eq!(status, 400);
}

// ============================================================================
// Rate Limiting
// ============================================================================

async fn approve_from(ctx: &TestContext, ip: &str) -> u16 {
    ctx.client
        .post(ctx.url("/api/payments/approve"))
        .header("x-forwarded-for", ip)
        .json(&json!({"paymentId": "pay_1"}))
        .send()
        .await
        .unwrap()
        .status()
        .as_u16()
}

#[tokio::test]
async fn test_payment_callbacks_are_rate_limited() {
    let ctx = TestContext::new().await;
    Mock::given(method("POST"))
        .and(path("/v2/payments/pay_1/approve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payment_json("pay_1", 32.98, false)))
        .mount(&ctx.pi)
        .await;

    let mut statuses = Vec::new();
    for _ in 0..15 {
        statuses.push(approve_from(&ctx, "203.0.113.7").await);
    }

    assert_eq!(statuses[0], 200);
    assert!(statuses.contains(&429), "never limited: {statuses:?}");

    // Other clients keep their own budget
    assert_eq!(approve_from(&ctx, "198.51.100.9").await, 200);
}
