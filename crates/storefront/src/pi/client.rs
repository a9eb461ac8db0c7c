//! Pi Platform API client implementation.
//!
//! Uses `reqwest` for HTTP. Verified access tokens are cached with `moka`
//! (5-minute TTL) so a page load does not cost a round trip per request.

use std::sync::Arc;
use std::time::Duration;

use foodpi_core::PaymentId;
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::PiError;
use super::types::{Payment, PaymentArgs, PiUser, PlatformErrorBody};
use crate::config::PiConfig;

/// Longest response body excerpt carried in errors and logs.
const BODY_EXCERPT_LEN: usize = 200;

/// Client for the Pi Platform API.
///
/// Cheap to clone; all clones share one connection pool and token cache.
#[derive(Clone)]
pub struct PiClient {
    inner: Arc<PiClientInner>,
}

struct PiClientInner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    users: Cache<String, PiUser>,
}

impl PiClient {
    /// Create a new Pi Platform API client.
    #[must_use]
    pub fn new(config: &PiConfig) -> Self {
        let users = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(PiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_base_url.trim_end_matches('/').to_string(),
                api_key: config.api_key.expose_secret().to_string(),
                users,
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Attach the server API key.
    fn with_key(&self, request: RequestBuilder) -> RequestBuilder {
        request.header("Authorization", format!("Key {}", self.inner.api_key))
    }

    /// Send a request and decode the JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        resource: &str,
    ) -> Result<T, PiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(PiError::RateLimited(retry_after));
        }

        let body = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(PiError::NotFound(resource.to_string()));
        }

        if status == StatusCode::UNAUTHORIZED {
            return Err(PiError::Unauthorized);
        }

        if !status.is_success() {
            let message = serde_json::from_str::<PlatformErrorBody>(&body)
                .ok()
                .and_then(|e| e.error_message.or(e.error))
                .unwrap_or_else(|| body.chars().take(BODY_EXCERPT_LEN).collect());
            warn!(status = %status, %message, resource, "Pi API returned non-success status");
            return Err(PiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(
                error = %e,
                body = %body.chars().take(BODY_EXCERPT_LEN).collect::<String>(),
                "Failed to parse Pi API response"
            );
            PiError::Parse(e)
        })
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Verify a `Pi.authenticate` access token and return the user it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `PiError::Unauthorized` if the token is rejected, or another
    /// error if the request fails.
    #[instrument(skip_all)]
    pub async fn authenticate(&self, access_token: &str) -> Result<PiUser, PiError> {
        if let Some(user) = self.inner.users.get(access_token).await {
            debug!("Cache hit for access token");
            return Ok(user);
        }

        let request = self
            .inner
            .client
            .get(self.url("/v2/me"))
            .bearer_auth(access_token);
        let user: PiUser = self.send(request, "user").await?;

        self.inner
            .users
            .insert(access_token.to_string(), user.clone())
            .await;

        Ok(user)
    }

    // =========================================================================
    // Payments
    // =========================================================================

    /// Fetch a payment by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment does not exist or the request fails.
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn get_payment(&self, id: &PaymentId) -> Result<Payment, PiError> {
        let request = self
            .with_key(self.inner.client.get(self.url(&format!("/v2/payments/{id}"))));
        self.send(request, &format!("payment {id}")).await
    }

    /// Approve a payment so the user can submit its blockchain transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the approval.
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn approve_payment(&self, id: &PaymentId) -> Result<Payment, PiError> {
        let request = self.with_key(
            self.inner
                .client
                .post(self.url(&format!("/v2/payments/{id}/approve"))),
        );
        self.send(request, &format!("payment {id}")).await
    }

    /// Complete a payment with the transaction ID the user submitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the completion.
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn complete_payment(&self, id: &PaymentId, txid: &str) -> Result<Payment, PiError> {
        let request = self.with_key(
            self.inner
                .client
                .post(self.url(&format!("/v2/payments/{id}/complete")))
                .json(&serde_json::json!({ "txid": txid })),
        );
        self.send(request, &format!("payment {id}")).await
    }

    /// Cancel a payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the cancellation.
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn cancel_payment(&self, id: &PaymentId) -> Result<Payment, PiError> {
        let request = self.with_key(
            self.inner
                .client
                .post(self.url(&format!("/v2/payments/{id}/cancel"))),
        );
        self.send(request, &format!("payment {id}")).await
    }

    /// List app-to-user payments that were created but never completed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn incomplete_server_payments(&self) -> Result<Vec<Payment>, PiError> {
        #[derive(serde::Deserialize)]
        struct Incomplete {
            incomplete_server_payments: Vec<Payment>,
        }

        let request = self.with_key(
            self.inner
                .client
                .get(self.url("/v2/payments/incomplete_server_payments")),
        );
        let body: Incomplete = self.send(request, "incomplete payments").await?;
        Ok(body.incomplete_server_payments)
    }

    /// Create an app-to-user payment record.
    ///
    /// Only the platform record is created; the transaction itself is signed
    /// and submitted by the app wallet outside this server.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform rejects the payment.
    #[instrument(skip(self, args), fields(uid = %args.uid, amount = %args.amount))]
    pub async fn create_payment(&self, args: &PaymentArgs) -> Result<Payment, PiError> {
        let request = self.with_key(
            self.inner
                .client
                .post(self.url("/v2/payments"))
                .json(&serde_json::json!({ "payment": args })),
        );
        self.send(request, "payment").await
    }

    /// Fetch a payment and return it only if it has fully completed.
    ///
    /// Platform failures are logged and treated as "not completed".
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn completed_payment(&self, id: &PaymentId) -> Option<Payment> {
        match self.get_payment(id).await {
            Ok(payment) if payment.is_completed() => Some(payment),
            Ok(payment) => {
                debug!(status = ?payment.status, "Payment is not completed");
                None
            }
            Err(e) => {
                warn!(error = %e, "Payment validation error");
                None
            }
        }
    }

    /// Whether a payment has fully completed on the platform.
    pub async fn validate_payment(&self, id: &PaymentId) -> bool {
        self.completed_payment(id).await.is_some()
    }

    /// Resolve a payment the SDK reported as incomplete by completing it
    /// with its submitted transaction.
    ///
    /// # Errors
    ///
    /// Returns `PiError::MissingTransaction` if the user never submitted a
    /// transaction, or the platform error if completion fails.
    #[instrument(skip(self, payment), fields(payment_id = %payment.identifier))]
    pub async fn handle_incomplete_payment(&self, payment: &Payment) -> Result<Payment, PiError> {
        let txid = payment
            .txid()
            .ok_or_else(|| PiError::MissingTransaction(payment.identifier.to_string()))?;

        self.complete_payment(&payment.identifier, txid)
            .await
            .inspect_err(|e| warn!(error = %e, "Error completing payment"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pi::fixtures::payment_json;
    use foodpi_core::{PiAmount, UserId};
    use secrecy::SecretString;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> PiClient {
        PiClient::new(&PiConfig {
            api_base_url: server.uri(),
            api_key: SecretString::from("test-server-key"),
            sandbox: true,
        })
    }

    #[tokio::test]
    async fn test_get_payment_sends_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/payments/pay_123"))
            .and(header("Authorization", "Key test-server-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json(true)))
            .expect(1)
            .mount(&server)
            .await;

        let payment = client_for(&server)
            .get_payment(&PaymentId::new("pay_123"))
            .await
            .unwrap();
        assert_eq!(payment.identifier.as_str(), "pay_123");
        assert!(payment.is_completed());
    }

    #[tokio::test]
    async fn test_validate_payment() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/payments/done"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json(true)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/payments/pending"))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json(false)))
            .mount(&server)
            .await;

        let client = client_for(&server);
        assert!(client.validate_payment(&PaymentId::new("done")).await);
        assert!(!client.validate_payment(&PaymentId::new("pending")).await);
    }

    #[tokio::test]
    async fn test_validate_payment_swallows_platform_errors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/payments/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        assert!(
            !client_for(&server)
                .validate_payment(&PaymentId::new("broken"))
                .await
        );
    }

    #[tokio::test]
    async fn test_unknown_payment_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/payments/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": "payment_not_found",
                "error_message": "Payment not found"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_payment(&PaymentId::new("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, PiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_api_error_uses_platform_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/payments/pay_123/approve"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": "already_approved",
                "error_message": "Payment already approved"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .approve_payment(&PaymentId::new("pay_123"))
            .await
            .unwrap_err();
        match err {
            PiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Payment already approved");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_rate_limited_reads_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/payments/pay_123"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_payment(&PaymentId::new("pay_123"))
            .await
            .unwrap_err();
        assert!(matches!(err, PiError::RateLimited(30)));
    }

    #[tokio::test]
    async fn test_complete_payment_posts_txid() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/payments/pay_123/complete"))
            .and(body_json(serde_json::json!({ "txid": "tx_789" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json(true)))
            .expect(1)
            .mount(&server)
            .await;

        let payment = client_for(&server)
            .complete_payment(&PaymentId::new("pay_123"), "tx_789")
            .await
            .unwrap();
        assert!(payment.status.developer_completed);
    }

    #[tokio::test]
    async fn test_authenticate_is_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/me"))
            .and(header("Authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "uid": "uid_abc",
                "username": "pioneer",
                "credentials": {"scopes": ["payments"]}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let first = client.authenticate("token-1").await.unwrap();
        let second = client.authenticate("token-1").await.unwrap();

        assert_eq!(first.uid, UserId::new("uid_abc"));
        assert_eq!(second.username.as_deref(), Some("pioneer"));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/me"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client_for(&server).authenticate("bad").await.unwrap_err();
        assert!(matches!(err, PiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_handle_incomplete_payment_requires_transaction() {
        let server = MockServer::start().await;
        let payment: Payment = serde_json::from_value(payment_json(false)).unwrap();

        let err = client_for(&server)
            .handle_incomplete_payment(&payment)
            .await
            .unwrap_err();
        assert!(matches!(err, PiError::MissingTransaction(id) if id == "pay_123"));
    }

    #[tokio::test]
    async fn test_create_payment_wraps_args() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/payments"))
            .and(body_json(serde_json::json!({
                "payment": {
                    "amount": 1.5,
                    "memo": "Refund",
                    "metadata": {"orderId": "order_1"},
                    "uid": "uid_abc"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(payment_json(false)))
            .expect(1)
            .mount(&server)
            .await;

        let args = PaymentArgs {
            amount: PiAmount::from_hundredths(150),
            memo: "Refund".to_string(),
            metadata: serde_json::json!({"orderId": "order_1"}),
            uid: UserId::new("uid_abc"),
        };
        let payment = client_for(&server).create_payment(&args).await.unwrap();
        assert_eq!(payment.identifier.as_str(), "pay_123");
    }
}
