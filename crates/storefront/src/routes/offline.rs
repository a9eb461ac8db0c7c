//! Static asset and precache route handlers.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::offline::{AssetManifest, STATIC_PREFIX};
use crate::state::AppState;

/// Serve a static asset through the offline cache (cache-first).
///
/// # Errors
///
/// Returns an error if the asset is not cached and cannot be read.
#[instrument(skip(state))]
pub async fn asset(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, AppError> {
    let url = format!("{STATIC_PREFIX}{path}");
    let response = state
        .offline()
        .fetch(&url)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(response.into_response())
}

/// The precache manifest.
pub async fn precache(State(state): State<AppState>) -> Json<AssetManifest> {
    Json(state.offline().manifest().clone())
}
