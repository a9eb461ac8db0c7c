//! Pi wallet connection route handlers.
//!
//! The browser runs `Pi.authenticate` and posts the resulting access token
//! here. The token is verified against the Pi Platform (`GET /v2/me`) and the
//! user is stored in the session.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use super::api::ApiJson;
use super::cart::clear_cart;
use crate::error::{AppError, clear_sentry_user, set_sentry_user};
use crate::middleware::{RequireWallet, clear_pi_user, set_pi_user};
use crate::pi::PiUser;
use crate::state::AppState;

/// Wallet connection request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub access_token: String,
}

/// Connect a Pi wallet.
///
/// # Errors
///
/// - 401 when the platform rejects the access token
/// - 502 when the platform cannot be reached
#[instrument(skip(state, session, body))]
pub async fn connect(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<ConnectRequest>,
) -> Result<Json<PiUser>, AppError> {
    let user = state.pi().authenticate(&body.access_token).await?;

    // New identity, new session ID
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    set_pi_user(&session, &user)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    set_sentry_user(&user.uid, user.username.as_deref());
    info!(uid = %user.uid, "Pi wallet connected");

    Ok(Json(user))
}

/// Disconnect the wallet and drop its cart.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Response, AppError> {
    clear_pi_user(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_cart(&session)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;
    clear_sentry_user();

    Ok(StatusCode::NO_CONTENT.into_response())
}

/// The connected Pi user.
///
/// # Errors
///
/// 401 when no wallet is connected.
pub async fn me(RequireWallet(user): RequireWallet) -> Json<PiUser> {
    Json(user)
}
