//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                            - Restaurant list
//! GET  /health                      - Health check
//!
//! # Restaurants
//! GET  /restaurants/{id}            - Restaurant page (?q= filters the menu)
//! GET  /restaurants/{id}/menu       - Menu items fragment (HTMX live search)
//!
//! # Cart (HTMX fragments, session-backed)
//! GET  /cart                        - Cart page
//! POST /cart/add                    - Add to cart (requires wallet, triggers cart-updated)
//! POST /cart/remove                 - Remove line by index (returns cart_items fragment)
//! GET  /cart/count                  - Cart count badge (fragment)
//!
//! # Pi wallet
//! POST /auth/pi                     - Connect with a Pi access token
//! POST /auth/logout                 - Disconnect
//! GET  /auth/me                     - Connected user
//!
//! # Offline assets
//! GET  /static/{*path}              - Static files, cache-first
//! GET  /precache.json               - Precache manifest
//! GET  /manifest.webmanifest        - Web app manifest
//!
//! # JSON API
//! GET  /api/restaurants/{id}        - Restaurant
//! GET  /api/restaurants/{id}/menu   - Menu
//! POST /api/restaurants/orders      - Place order (validated Pi payment)
//! GET  /api/orders/{id}             - Order
//! GET  /api/restaurants/{id}/reviews  - Reviews
//! POST /api/restaurants/{id}/reviews  - Submit review
//! POST /api/payments/{approve,complete,cancel,incomplete,create} - Pi SDK callbacks
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod home;
pub mod manifest;
pub mod offline;
pub mod restaurants;
pub mod views;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the restaurant page routes router.
pub fn restaurant_routes() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(restaurants::show))
        .route("/{id}/menu", get(restaurants::menu))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
}

/// Create the wallet routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/pi", post(auth::connect))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Health check.
pub async fn health() -> &'static str {
    "ok"
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .nest("/restaurants", restaurant_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .route("/static/{*path}", get(offline::asset))
        .route("/precache.json", get(offline::precache))
        .route("/manifest.webmanifest", get(manifest::webmanifest))
        .nest("/api", api::routes())
}
