//! Restaurant page route handlers.
//!
//! The menu search box re-requests the menu fragment on every keystroke
//! (HTMX), so the page and the fragment share one filter.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use foodpi_core::{Restaurant, RestaurantId};
use serde::Deserialize;
use tracing::instrument;

use super::views::{MenuItemView, RestaurantView, WalletView};
use crate::middleware::OptionalWallet;
use crate::state::AppState;

/// Menu search query.
#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    #[serde(default)]
    pub q: String,
}

/// Restaurant page template.
#[derive(Template, WebTemplate)]
#[template(path = "restaurants/show.html")]
pub struct RestaurantShowTemplate {
    pub wallet: Option<WalletView>,
    pub sandbox: bool,
    pub restaurant: RestaurantView,
    pub items: Vec<MenuItemView>,
    pub query: String,
}

/// Menu items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/menu_items.html")]
pub struct MenuItemsTemplate {
    pub restaurant_id: String,
    pub items: Vec<MenuItemView>,
    pub query: String,
}

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "errors/404.html")]
pub struct NotFoundTemplate {
    pub wallet: Option<WalletView>,
    pub sandbox: bool,
    pub message: String,
}

/// Render the 404 page.
pub fn not_found(wallet: Option<WalletView>, sandbox: bool, message: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        NotFoundTemplate {
            wallet,
            sandbox,
            message: message.to_string(),
        },
    )
        .into_response()
}

fn filtered_menu(restaurant: &Restaurant, query: &str) -> Vec<MenuItemView> {
    restaurant
        .search_menu(query)
        .into_iter()
        .map(MenuItemView::from)
        .collect()
}

/// Display a restaurant with its (optionally filtered) menu.
#[instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MenuQuery>,
    OptionalWallet(user): OptionalWallet,
) -> Response {
    let wallet = WalletView::from_user(user.as_ref());
    let sandbox = state.config().pi.sandbox;
    let Some(restaurant) = state.catalog().get(&RestaurantId::new(id)) else {
        return not_found(wallet, sandbox, "Restaurant not found");
    };

    RestaurantShowTemplate {
        wallet,
        sandbox,
        restaurant: RestaurantView::from(restaurant),
        items: filtered_menu(restaurant, &query.q),
        query: query.q,
    }
    .into_response()
}

/// Menu items fragment for live search (HTMX).
#[instrument(skip(state))]
pub async fn menu(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<MenuQuery>,
) -> Response {
    let Some(restaurant) = state.catalog().get(&RestaurantId::new(id)) else {
        return (StatusCode::NOT_FOUND, "Restaurant not found").into_response();
    };

    MenuItemsTemplate {
        restaurant_id: restaurant.id.to_string(),
        items: filtered_menu(restaurant, &query.q),
        query: query.q,
    }
    .into_response()
}
