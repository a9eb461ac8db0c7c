//! Pi SDK payment callbacks.
//!
//! The browser SDK hands the server a payment at each step; the server
//! forwards it to the Pi Platform and returns the platform's view of the
//! payment.

use axum::{Json, extract::State};
use foodpi_core::{PaymentId, PiAmount};
use serde::Deserialize;
use tracing::{info, instrument};

use super::ApiJson;
use crate::error::AppError;
use crate::middleware::RequireWallet;
use crate::pi::{Payment, PaymentArgs};
use crate::state::AppState;

/// Body carrying a payment identifier.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIdRequest {
    pub payment_id: PaymentId,
}

/// Completion callback body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub payment_id: PaymentId,
    pub txid: String,
}

/// Incomplete payment callback body.
#[derive(Debug, Deserialize)]
pub struct IncompleteRequest {
    pub payment: Payment,
}

/// App-to-user payment request body. The recipient is the connected wallet.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: PiAmount,
    pub memo: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

/// `onReadyForServerApproval`: approve the payment.
///
/// # Errors
///
/// Propagates Pi Platform failures.
#[instrument(skip(state))]
pub async fn approve(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PaymentIdRequest>,
) -> Result<Json<Payment>, AppError> {
    let payment = state.pi().approve_payment(&body.payment_id).await?;
    info!(payment_id = %body.payment_id, "Payment approved");
    Ok(Json(payment))
}

/// `onReadyForServerCompletion`: complete the payment with its transaction.
///
/// # Errors
///
/// Propagates Pi Platform failures.
#[instrument(skip(state))]
pub async fn complete(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CompleteRequest>,
) -> Result<Json<Payment>, AppError> {
    let payment = state
        .pi()
        .complete_payment(&body.payment_id, &body.txid)
        .await?;
    info!(payment_id = %body.payment_id, txid = %body.txid, "Payment completed");
    Ok(Json(payment))
}

/// `onCancel`: cancel the payment on the platform.
///
/// # Errors
///
/// Propagates Pi Platform failures.
#[instrument(skip(state))]
pub async fn cancel(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<PaymentIdRequest>,
) -> Result<Json<Payment>, AppError> {
    let payment = state.pi().cancel_payment(&body.payment_id).await?;
    info!(payment_id = %body.payment_id, "Payment cancelled");
    Ok(Json(payment))
}

/// `onIncompletePaymentFound`: finish a payment left over from a previous visit.
///
/// # Errors
///
/// - 400 when the payment has no transaction yet
/// - other Pi Platform failures propagate
#[instrument(skip(state, body), fields(payment_id = %body.payment.identifier))]
pub async fn incomplete(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<IncompleteRequest>,
) -> Result<Json<Payment>, AppError> {
    let payment = state.pi().handle_incomplete_payment(&body.payment).await?;
    info!("Incomplete payment completed");
    Ok(Json(payment))
}

/// Create an app-to-user payment to the connected wallet.
///
/// Only available against the Pi sandbox.
///
/// # Errors
///
/// - 404 outside sandbox mode
/// - 401 without a connected wallet
/// - Pi Platform failures propagate
#[instrument(skip(state, user, body))]
pub async fn create(
    State(state): State<AppState>,
    RequireWallet(user): RequireWallet,
    ApiJson(body): ApiJson<CreatePaymentRequest>,
) -> Result<Json<Payment>, AppError> {
    if !state.config().pi.sandbox {
        return Err(AppError::NotFound("Not found".to_string()));
    }
    if body.amount <= PiAmount::ZERO {
        return Err(AppError::BadRequest("amount must be positive".to_string()));
    }

    let args = PaymentArgs {
        amount: body.amount,
        memo: body.memo,
        metadata: body.metadata,
        uid: user.uid,
    };
    let payment = state.pi().create_payment(&args).await?;
    info!(payment_id = %payment.identifier, uid = %args.uid, "App-to-user payment created");
    Ok(Json(payment))
}
