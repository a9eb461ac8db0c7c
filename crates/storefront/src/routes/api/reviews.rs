//! Review API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use foodpi_core::{Rating, RestaurantId, Review, ReviewId, UserId};
use serde::Deserialize;
use tracing::{info, instrument};

use super::ApiJson;
use super::restaurants::find_restaurant;
use crate::error::AppError;
use crate::state::AppState;

/// Review submission body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub user_id: UserId,
    #[serde(default)]
    pub user_name: Option<String>,
    pub rating: i64,
    pub comment: String,
    #[serde(default)]
    pub ordered_items: Vec<String>,
}

/// Reviews for a restaurant, oldest first.
///
/// # Errors
///
/// 404 for an unknown restaurant.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
) -> Result<Json<Vec<Review>>, AppError> {
    find_restaurant(&state, &id)?;
    Ok(Json(state.reviews().list(&id).await))
}

/// Submit a review.
///
/// # Errors
///
/// - 404 for an unknown restaurant
/// - 400 for a rating outside 1..=5
#[instrument(skip(state, body))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<RestaurantId>,
    ApiJson(body): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    find_restaurant(&state, &id)?;
    let rating = Rating::try_from(body.rating).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let review = Review {
        id: ReviewId::generate(),
        user_id: body.user_id,
        user_name: body.user_name,
        restaurant_id: Some(id.clone()),
        rating,
        comment: body.comment,
        created_at: Utc::now(),
        ordered_items: body.ordered_items,
    };
    state.reviews().add(id, review.clone()).await;

    info!(review_id = %review.id, rating = rating.value(), "Review submitted");
    Ok((StatusCode::CREATED, Json(review)))
}
