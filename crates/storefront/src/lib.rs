//! `FoodPi` Hub storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod offline;
pub mod pi;
pub mod routes;
pub mod state;
pub mod store;

use axum::Router;

use crate::state::AppState;

/// Build the full application router with its middleware stack.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so the
/// rate limiter can fall back to the peer address.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    let router = routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(session_layer);

    middleware::with_request_id(router)
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}
