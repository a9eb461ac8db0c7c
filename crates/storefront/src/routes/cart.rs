//! Cart route handlers.
//!
//! Cart operations use HTMX for dynamic updates without full page reloads.
//! The cart lives in the session next to the connected wallet; adding items
//! requires a connected wallet.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use foodpi_core::{Cart, MenuItemId, RestaurantId};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use super::views::{CartView, WalletView};
use crate::error::{AppError, add_breadcrumb};
use crate::middleware::{OptionalWallet, session_keys};
use crate::state::AppState;

/// Shown when adding to the cart without a connected wallet.
pub const CONNECT_WALLET_MESSAGE: &str = "Please connect your Pi Wallet to add items to cart";

// =============================================================================
// Session Helpers
// =============================================================================

/// Get the cart from the session (empty when absent).
pub async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Get the restaurant of the most recently added item.
pub async fn get_cart_restaurant(session: &Session) -> Option<RestaurantId> {
    session
        .get::<RestaurantId>(session_keys::CART_RESTAURANT)
        .await
        .ok()
        .flatten()
}

/// Save the cart to the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_cart(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Remove the cart from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_cart(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<Cart>(session_keys::CART).await?;
    session
        .remove::<RestaurantId>(session_keys::CART_RESTAURANT)
        .await?;
    Ok(())
}

async fn cart_view(session: &Session, cart: &Cart) -> CartView {
    let restaurant = get_cart_restaurant(session).await;
    CartView::new(cart, restaurant.map(RestaurantId::into_inner))
}

fn session_error(err: &tower_sessions::session::Error) -> AppError {
    AppError::Internal(format!("session error: {err}"))
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub restaurant_id: String,
    pub item_id: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub index: usize,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub wallet: Option<WalletView>,
    pub sandbox: bool,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: usize,
}

/// Display cart page.
#[instrument(skip(state, session, user))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    OptionalWallet(user): OptionalWallet,
) -> impl IntoResponse {
    let cart = get_cart(&session).await;
    CartShowTemplate {
        wallet: WalletView::from_user(user.as_ref()),
        sandbox: state.config().pi.sandbox,
        cart: cart_view(&session, &cart).await,
    }
}

/// Add item to cart (HTMX).
///
/// Returns the new count badge with an HTMX trigger to refresh other cart
/// elements.
///
/// # Errors
///
/// - 401 when no wallet is connected
/// - 404 for an unknown restaurant or menu item
#[instrument(skip(state, session, user))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    OptionalWallet(user): OptionalWallet,
    Form(form): Form<AddToCartForm>,
) -> Result<Response, AppError> {
    let user = user.ok_or_else(|| AppError::Unauthorized(CONNECT_WALLET_MESSAGE.to_string()))?;

    let restaurant_id = RestaurantId::new(form.restaurant_id);
    let restaurant = state
        .catalog()
        .get(&restaurant_id)
        .ok_or_else(|| AppError::NotFound("Restaurant not found".to_string()))?;
    let item = restaurant
        .menu_item(&MenuItemId::new(form.item_id))
        .ok_or_else(|| AppError::NotFound("Menu item not found".to_string()))?;

    let mut cart = get_cart(&session).await;
    cart.add(item.clone(), user.uid);
    set_cart(&session, &cart)
        .await
        .map_err(|e| session_error(&e))?;
    session
        .insert(session_keys::CART_RESTAURANT, &restaurant_id)
        .await
        .map_err(|e| session_error(&e))?;

    add_breadcrumb(
        "cart",
        "Added item",
        Some(&[("item_id", item.id.as_str()), ("restaurant_id", restaurant_id.as_str())]),
    );

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartCountTemplate { count: cart.len() },
    )
        .into_response())
}

/// Remove the line at `index` from the cart (HTMX).
///
/// An out-of-range index leaves the cart unchanged.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response, AppError> {
    let mut cart = get_cart(&session).await;
    if cart.remove(form.index).is_some() {
        set_cart(&session, &cart)
            .await
            .map_err(|e| session_error(&e))?;
    }

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        CartItemsTemplate {
            cart: cart_view(&session, &cart).await,
        },
    )
        .into_response())
}

/// Get cart count badge (HTMX).
#[instrument(skip(session))]
pub async fn count(session: Session) -> impl IntoResponse {
    CartCountTemplate {
        count: get_cart(&session).await.len(),
    }
}
