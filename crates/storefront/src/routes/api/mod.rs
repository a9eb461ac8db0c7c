//! JSON API route handlers.
//!
//! Every error is a JSON body `{"error": "..."}` (see `AppError`), including
//! malformed request bodies.

pub mod orders;
pub mod payments;
pub mod restaurants;
pub mod reviews;

use axum::{
    Json, Router,
    extract::FromRequest,
    routing::{get, post},
};

use crate::error::AppError;
use crate::middleware::payments_rate_limiter;
use crate::state::AppState;

/// JSON body extractor whose rejection is an `AppError`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Pi SDK payment callbacks, rate limited per client IP.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/approve", post(payments::approve))
        .route("/complete", post(payments::complete))
        .route("/cancel", post(payments::cancel))
        .route("/incomplete", post(payments::incomplete))
        .route("/create", post(payments::create))
        .layer(payments_rate_limiter())
}

/// Create the API router (mounted at `/api`).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/restaurants/orders", post(orders::create))
        .route("/restaurants/{id}", get(restaurants::show))
        .route("/restaurants/{id}/menu", get(restaurants::menu))
        .route(
            "/restaurants/{id}/reviews",
            get(reviews::index).post(reviews::create),
        )
        .route("/orders/{id}", get(orders::show))
        .nest("/payments", payment_routes())
}
