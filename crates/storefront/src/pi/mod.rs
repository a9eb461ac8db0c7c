//! Pi Network platform integration.
//!
//! # Architecture
//!
//! The browser runs the Pi SDK (`Pi.authenticate`, `Pi.createPayment`). The
//! SDK calls back into this server at each step of a payment, and the server
//! talks to the Pi Platform REST API to approve, complete and verify it:
//!
//! ```text
//! browser SDK                     storefront                 Pi Platform API
//! onReadyForServerApproval  -->   POST /api/payments/approve  -->  /v2/payments/{id}/approve
//! onReadyForServerCompletion -->  POST /api/payments/complete -->  /v2/payments/{id}/complete
//! onIncompletePaymentFound  -->   POST /api/payments/incomplete
//! place order               -->   POST /api/restaurants/orders --> GET /v2/payments/{id}
//! ```
//!
//! Access tokens from `Pi.authenticate` are verified with `GET /v2/me`; the
//! result is cached in-memory via `moka` (5 minute TTL).

mod client;
pub mod types;

pub use client::PiClient;
pub use types::{
    Payment, PaymentArgs, PaymentDirection, PaymentStatus, PaymentTransaction, PiUser,
};

use thiserror::Error;

/// Errors that can occur when interacting with the Pi Platform API.
#[derive(Debug, Error)]
pub enum PiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("Pi API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Platform error message or a body excerpt.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The access token was rejected.
    #[error("Invalid access token")]
    Unauthorized,

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// An incomplete payment has no blockchain transaction to complete with.
    #[error("Payment {0} has no transaction to complete")]
    MissingTransaction(String),
}
