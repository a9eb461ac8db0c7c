//! Restaurant API handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use foodpi_core::{MenuItem, Restaurant, RestaurantId};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Look up a restaurant or fail with 404 `Restaurant not found`.
pub(crate) fn find_restaurant<'a>(
    state: &'a AppState,
    id: &RestaurantId,
) -> Result<&'a Restaurant, AppError> {
    state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))
}

/// Restaurant details including the menu.
///
/// # Errors
///
/// 404 for an unknown restaurant.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> Result<Json<Restaurant>, AppError> {
    Ok(Json(find_restaurant(&state, &id)?.clone()))
}

/// The restaurant's menu.
///
/// # Errors
///
/// 404 for an unknown restaurant.
#[instrument(skip(state))]
pub async fn menu(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    Ok(Json(find_restaurant(&state, &id)?.menu.clone()))
}
