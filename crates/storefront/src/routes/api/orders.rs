//! Order API handlers.
//!
//! An order is only accepted with a completed Pi payment from the ordering
//! user that covers the menu price of its items, and each payment pays for
//! one order. Prices always come from the catalog. The payment object from the browser is echoed back on the
//! order; only its identifier is trusted, and the payment itself is looked up
//! on the Pi Platform.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use foodpi_core::{
    CartItem, Order, OrderId, OrderStatus, PaymentId, PiAmount, Restaurant, RestaurantId, UserId,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use super::ApiJson;
use super::restaurants::find_restaurant;
use crate::error::AppError;
use crate::pi::{Payment, PaymentDirection};
use crate::routes::cart::clear_cart;
use crate::state::AppState;

/// Order creation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub items: Vec<CartItem>,
    pub payment: serde_json::Value,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
}

/// Payment identifier from a browser payment object.
///
/// The SDK calls it `identifier`; older clients send `paymentId` or `id`.
#[must_use]
pub fn payment_identifier(payment: &serde_json::Value) -> Option<PaymentId> {
    ["identifier", "paymentId", "id"]
        .iter()
        .find_map(|key| payment.get(key).and_then(serde_json::Value::as_str))
        .filter(|id| !id.is_empty())
        .map(PaymentId::new)
}

/// Re-price order lines from the restaurant's menu.
///
/// Only the item IDs sent by the browser are trusted; every other field of
/// a line's menu item is replaced with the catalog entry.
///
/// # Errors
///
/// 400 for an empty order or an item that is not on the menu.
pub fn price_lines(restaurant: &Restaurant, lines: Vec<CartItem>) -> Result<Vec<CartItem>, AppError> {
    if lines.is_empty() {
        return Err(AppError::BadRequest("Order has no items".to_string()));
    }

    lines
        .into_iter()
        .map(|line| {
            let item = restaurant.menu_item(&line.item.id).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown menu item '{}'", line.item.id))
            })?;
            Ok(CartItem {
                item: item.clone(),
                ..line
            })
        })
        .collect()
}

/// Whether a completed payment pays `total` from `user` to this app.
#[must_use]
pub fn payment_covers(payment: &Payment, user: &UserId, total: PiAmount) -> bool {
    if payment.direction != PaymentDirection::UserToApp {
        warn!(payment_id = %payment.identifier, "Payment is not user-to-app");
        return false;
    }
    if &payment.user_uid != user {
        warn!(payment_id = %payment.identifier, payer = %payment.user_uid, "Payment belongs to another user");
        return false;
    }
    if payment.amount < total {
        warn!(payment_id = %payment.identifier, paid = %payment.amount, %total, "Payment does not cover order total");
        return false;
    }
    true
}

/// Place an order.
///
/// # Errors
///
/// - 400 `Invalid payment` when the payment is missing, not completed, from
///   another user, smaller than the menu total, or already paid for an order
/// - 400 for an empty order or an item not on the menu
/// - 404 for an unknown restaurant
/// - 500 `Failed to process order` when the session cart cannot be cleared
#[instrument(skip(state, session, body), fields(user_id = %body.user_id, restaurant_id = %body.restaurant_id))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let restaurant = find_restaurant(&state, &body.restaurant_id)?;
    let items = price_lines(restaurant, body.items)?;
    let total: PiAmount = items.iter().map(|line| line.item.price).sum();

    let payment_id = payment_identifier(&body.payment).ok_or(AppError::InvalidPayment)?;
    if state.orders().is_payment_used(&payment_id).await {
        warn!(%payment_id, "Payment already used");
        return Err(AppError::InvalidPayment);
    }
    let Some(payment) = state.pi().completed_payment(&payment_id).await else {
        return Err(AppError::InvalidPayment);
    };
    if !payment_covers(&payment, &body.user_id, total) {
        return Err(AppError::InvalidPayment);
    }

    // The cart has been paid for
    clear_cart(&session).await.map_err(|e| AppError::Failed {
        message: "Failed to process order",
        detail: e.to_string(),
    })?;

    let order = Order {
        id: OrderId::generate(),
        items,
        user_id: body.user_id,
        restaurant_id: body.restaurant_id,
        payment: body.payment,
        status: OrderStatus::Confirmed,
        created_at: Utc::now(),
    };
    if let Err(existing) = state.orders().place(payment_id.clone(), order.clone()).await {
        warn!(%payment_id, order_id = %existing, "Payment already used");
        return Err(AppError::InvalidPayment);
    }

    info!(order_id = %order.id, %payment_id, total = %total, "Order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

/// Look up an order.
///
/// # Errors
///
/// 404 `Order not found`.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>, AppError> {
    state
        .orders()
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
}
