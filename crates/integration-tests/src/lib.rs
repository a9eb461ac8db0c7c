//! Integration tests for `FoodPi` Hub.
//!
//! Each test starts the real storefront router on an ephemeral port, with the
//! Pi Platform API replaced by a `wiremock` server, and drives it over HTTP
//! with a cookie-keeping `reqwest` client.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p foodpi-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `storefront_api` - JSON API (restaurants, orders, reviews)
//! - `storefront_payments` - Pi SDK payment callbacks
//! - `storefront_cart` - Wallet connection and session cart
//! - `storefront_pages` - Rendered pages and offline assets

use std::net::SocketAddr;
use std::path::PathBuf;

use foodpi_storefront::config::{DEFAULT_OFFLINE_CACHE_NAME, PiConfig, StorefrontConfig};
use foodpi_storefront::state::AppState;
use reqwest::Client;
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Access token accepted by [`TestContext::mock_user`].
pub const ACCESS_TOKEN: &str = "pi-access-token";

/// Uid of the mocked Pi user.
pub const USER_UID: &str = "uid_abc";

/// A running storefront wired to a mock Pi Platform.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pi: MockServer,
}

impl TestContext {
    /// Start a storefront on an ephemeral port.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn new() -> Self {
        let pi = MockServer::start().await;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        let base_url = format!("http://{addr}");

        let config = StorefrontConfig {
            host: addr.ip(),
            port: addr.port(),
            base_url: base_url.clone(),
            pi: PiConfig {
                api_base_url: pi.uri(),
                api_key: SecretString::from("test_pi_server_key_9f8e7d"),
                sandbox: true,
            },
            catalog_path: None,
            static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
            offline_cache_name: DEFAULT_OFFLINE_CACHE_NAME.to_string(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let state = AppState::new(config).expect("Failed to build application state");
        let app = foodpi_storefront::app(state);
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Test server error");
        });

        let client = Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url,
            pi,
        }
    }

    /// Absolute URL for a path on the storefront.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Make `GET /v2/me` accept [`ACCESS_TOKEN`].
    pub async fn mock_user(&self) {
        Mock::given(method("GET"))
            .and(path("/v2/me"))
            .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"uid": USER_UID, "username": "pioneer"})),
            )
            .mount(&self.pi)
            .await;
    }

    /// Make `GET /v2/payments/{id}` return a payment.
    pub async fn mock_payment(&self, id: &str, amount: f64, completed: bool) {
        Mock::given(method("GET"))
            .and(path(format!("/v2/payments/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json(id, amount, completed)))
            .mount(&self.pi)
            .await;
    }

    /// Connect the client's session to the mocked Pi user.
    ///
    /// # Panics
    ///
    /// Panics if the wallet connection fails.
    pub async fn connect_wallet(&self) {
        self.mock_user().await;
        let resp = self
            .client
            .post(self.url("/auth/pi"))
            .json(&json!({"accessToken": ACCESS_TOKEN}))
            .send()
            .await
            .expect("Failed to connect wallet");
        assert!(resp.status().is_success(), "connect failed: {}", resp.status());
    }

    /// POST JSON and return the status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn post_json(&self, path: &str, body: &Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Request failed");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("Response is not JSON"))
    }

    /// GET and return the status and JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails or the body is not JSON.
    pub async fn get_json(&self, path: &str) -> (u16, Value) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Request failed");
        let status = resp.status().as_u16();
        (status, resp.json().await.expect("Response is not JSON"))
    }
}

/// A Pi Platform payment body.
#[must_use]
pub fn payment_json(id: &str, amount: f64, completed: bool) -> Value {
    json!({
        "identifier": id,
        "user_uid": USER_UID,
        "amount": amount,
        "memo": "FoodPi Hub order",
        "metadata": {"restaurantId": "1"},
        "from_address": "GA...FROM",
        "to_address": "GA...TO",
        "direction": "user_to_app",
        "created_at": "2024-01-15T12:00:00Z",
        "network": "Pi Testnet",
        "status": {
            "developer_approved": true,
            "transaction_verified": completed,
            "developer_completed": completed,
            "cancelled": false,
            "user_cancelled": false
        },
        "transaction": if completed {
            json!({"txid": "tx_789", "verified": true, "_link": "https://api.testnet.minepi.com/transactions/tx_789"})
        } else {
            Value::Null
        }
    })
}

/// A cart line as the browser posts it with an order.
#[must_use]
pub fn cart_line(item_id: &str, name: &str, price: f64) -> Value {
    json!({
        "id": item_id,
        "name": name,
        "description": "",
        "price": price,
        "image": "",
        "category": "Pizza",
        "timestamp": "2024-01-15T12:00:00Z",
        "userId": USER_UID
    })
}
