//! Pi Platform API data transfer objects.
//!
//! Field names follow the platform's snake_case JSON.

use chrono::{DateTime, Utc};
use foodpi_core::{PaymentId, PiAmount, UserId};
use serde::{Deserialize, Serialize};

/// An authenticated Pi user, as returned by `GET /v2/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiUser {
    pub uid: UserId,
    #[serde(default)]
    pub username: Option<String>,
}

/// Direction of a payment relative to this app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentDirection {
    UserToApp,
    AppToUser,
}

/// Server-side progress flags of a payment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentStatus {
    pub developer_approved: bool,
    pub transaction_verified: bool,
    pub developer_completed: bool,
    pub cancelled: bool,
    pub user_cancelled: bool,
}

/// Blockchain transaction attached to a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransaction {
    pub txid: String,
    pub verified: bool,
    #[serde(rename = "_link", default)]
    pub link: String,
}

/// A payment as returned by `/v2/payments/*`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub identifier: PaymentId,
    pub user_uid: UserId,
    pub amount: PiAmount,
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub from_address: Option<String>,
    #[serde(default)]
    pub to_address: Option<String>,
    pub direction: PaymentDirection,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub network: Option<String>,
    pub status: PaymentStatus,
    #[serde(default)]
    pub transaction: Option<PaymentTransaction>,
}

impl Payment {
    /// Whether the payment has been approved, verified on chain, completed
    /// by this app and not cancelled by either side.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        let s = self.status;
        s.developer_approved
            && s.transaction_verified
            && s.developer_completed
            && !s.cancelled
            && !s.user_cancelled
    }

    /// Transaction ID, if the user has submitted the blockchain transaction.
    #[must_use]
    pub fn txid(&self) -> Option<&str> {
        self.transaction.as_ref().map(|tx| tx.txid.as_str())
    }
}

/// Body of an app-to-user payment creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentArgs {
    pub amount: PiAmount,
    pub memo: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub uid: UserId,
}

/// Error body returned by the platform on failures.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PlatformErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}
