//! Integration tests for rendered pages and offline assets.
//!
//! Run with: `cargo test -p foodpi-integration-tests --test storefront_pages`

#![allow(clippy::unwrap_used)]

use foodpi_integration_tests::TestContext;

async fn get_text(ctx: &TestContext, path: &str) -> (u16, String) {
    let resp = ctx.client.get(ctx.url(path)).send().await.unwrap();
    let status = resp.status().as_u16();
    (status, resp.text().await.unwrap())
}

// ============================================================================
// Pages
// ============================================================================

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;

    let (status, body) = get_text(&ctx, "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}

#[tokio::test]
async fn test_home_lists_restaurants() {
    let ctx = TestContext::new().await;

    let (status, page) = get_text(&ctx, "/").await;
    assert_eq!(status, 200);
    assert!(page.contains("Pizza Paradise"));
    assert!(page.contains(r#"href="/restaurants/1""#));
}

#[tokio::test]
async fn test_restaurant_page() {
    let ctx = TestContext::new().await;

    let (status, page) = get_text(&ctx, "/restaurants/1").await;
    assert_eq!(status, 200);
    assert!(page.contains("★★★★<"));
    assert!(page.contains("4.8"));
    assert!(page.contains("(2500 reviews)"));
    assert!(page.contains("30-45 min"));
    assert!(page.contains("π15.99"));
    assert!(page.contains("Pepperoni Pizza"));
}

#[tokio::test]
async fn test_restaurant_menu_search() {
    let ctx = TestContext::new().await;

    let (status, fragment) = get_text(&ctx, "/restaurants/1/menu?q=PEPPER").await;
    assert_eq!(status, 200);
    assert!(fragment.contains("Pepperoni Pizza"));
    assert!(!fragment.contains("Margherita Pizza"));

    let (_, fragment) = get_text(&ctx, "/restaurants/1/menu?q=").await;
    assert!(fragment.contains("Pepperoni Pizza"));
    assert!(fragment.contains("Margherita Pizza"));
}

#[tokio::test]
async fn test_unknown_restaurant_page() {
    let ctx = TestContext::new().await;

    let (status, page) = get_text(&ctx, "/restaurants/999").await;
    assert_eq!(status, 404);
    assert!(page.contains("Restaurant not found"));
}

#[tokio::test]
async fn test_security_headers() {
    let ctx = TestContext::new().await;

    let resp = ctx.client.get(ctx.url("/")).send().await.unwrap();
    let headers = resp.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert!(headers.get("x-request-id").is_some());
    let csp = headers
        .get("content-security-policy")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(csp.contains("https://sdk.minepi.com"));
}

// ============================================================================
// Offline Assets
// ============================================================================

#[tokio::test]
async fn test_static_asset() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/static/css/styles.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.starts_with("text/css"), "{content_type}");
    assert_eq!(
        resp.headers().get("cache-control").unwrap(),
        "public, max-age=3600"
    );
}

#[tokio::test]
async fn test_missing_static_asset() {
    let ctx = TestContext::new().await;

    let (status, _) = get_text(&ctx, "/static/css/missing.css").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_static_path_traversal() {
    let ctx = TestContext::new().await;

    let (status, _) = get_text(&ctx, "/static/%2E%2E/Cargo.toml").await;
    assert_ne!(status, 200);
}

#[tokio::test]
async fn test_precache_manifest() {
    let ctx = TestContext::new().await;

    let (status, body) = ctx.get_json("/precache.json").await;
    assert_eq!(status, 200);
    assert_eq!(body["cacheName"], "foodpihub-v1");
    let assets = body["assets"].as_array().unwrap();
    assert!(assets.iter().any(|a| a == "/static/offline.html"));
    assert!(assets.iter().any(|a| a == "https://sdk.minepi.com/pi-sdk.js"));
}

#[tokio::test]
async fn test_web_app_manifest() {
    let ctx = TestContext::new().await;

    let resp = ctx
        .client
        .get(ctx.url("/manifest.webmanifest"))
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("content-type").unwrap(),
        "application/manifest+json"
    );
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["name"], "FoodPi Hub");
    assert_eq!(body["icons"].as_array().unwrap().len(), 10);
}
