//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//! Responses carry a JSON body of the form `{"error": "..."}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::pi::PiError;
use crate::store::StoreError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Pi Platform API operation failed.
    #[error("Pi error: {0}")]
    Pi(#[from] PiError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The payment attached to an order did not validate.
    #[error("Invalid payment")]
    InvalidPayment,

    /// Rate limited.
    #[error("Rate limited")]
    RateLimited,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// Server-side failure reported to the client with a fixed message.
    #[error("{message}: {detail}")]
    Failed {
        /// Message shown to the client.
        message: &'static str,
        /// Logged cause.
        detail: String,
    },
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Store(_) | Self::Internal(_) | Self::Failed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Pi(err) => match err {
                PiError::NotFound(_) => StatusCode::NOT_FOUND,
                PiError::Unauthorized => StatusCode::UNAUTHORIZED,
                PiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
                PiError::MissingTransaction(_) => StatusCode::BAD_REQUEST,
                PiError::Http(_) | PiError::Api { .. } | PiError::Parse(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) | Self::InvalidPayment => StatusCode::BAD_REQUEST,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        }
    }

    /// Message shown to the client.
    ///
    /// Internal error details are never exposed.
    #[must_use]
    pub fn client_message(&self) -> String {
        match self {
            Self::Store(_) | Self::Internal(_) => "Internal server error".to_string(),
            Self::Pi(err) => match err {
                PiError::NotFound(what) => format!("{what} not found"),
                PiError::Unauthorized => "Invalid access token".to_string(),
                PiError::RateLimited(_) => "Payment service is busy, try again later".to_string(),
                PiError::MissingTransaction(_) => err.to_string(),
                PiError::Http(_) | PiError::Api { .. } | PiError::Parse(_) => {
                    "Payment service error".to_string()
                }
            },
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::InvalidPayment => "Invalid payment".to_string(),
            Self::Failed { message, .. } => (*message).to_string(),
            Self::RateLimited => "Too many requests".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = serde_json::json!({ "error": self.client_message() });
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a Pi user.
///
/// Call this after a wallet connects to associate errors with the user.
pub fn set_sentry_user(uid: &impl ToString, username: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(uid.to_string()),
            username: username.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added item", Some(&[("item_id", "1")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
