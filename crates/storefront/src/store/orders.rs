//! Orders placed since startup.

use std::collections::HashMap;

use foodpi_core::{Order, OrderId, PaymentId};
use tokio::sync::RwLock;

/// In-memory order storage keyed by order ID.
///
/// Each Pi payment pays for at most one order.
#[derive(Debug, Default)]
pub struct OrderBook {
    inner: RwLock<OrderBookInner>,
}

#[derive(Debug, Default)]
struct OrderBookInner {
    orders: HashMap<OrderId, Order>,
    payments: HashMap<PaymentId, OrderId>,
}

impl OrderBook {
    /// Create an empty order book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an order paid by `payment`.
    ///
    /// # Errors
    ///
    /// Returns the ID of the order the payment already paid for; nothing is
    /// stored in that case.
    pub async fn place(&self, payment: PaymentId, order: Order) -> Result<(), OrderId> {
        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.payments.get(&payment) {
            return Err(existing.clone());
        }
        inner.payments.insert(payment, order.id.clone());
        inner.orders.insert(order.id.clone(), order);
        Ok(())
    }

    /// Look up an order by ID.
    pub async fn get(&self, id: &OrderId) -> Option<Order> {
        self.inner.read().await.orders.get(id).cloned()
    }

    /// Whether a payment has already paid for an order.
    pub async fn is_payment_used(&self, payment: &PaymentId) -> bool {
        self.inner.read().await.payments.contains_key(payment)
    }

    /// Number of stored orders.
    pub async fn len(&self) -> usize {
        self.inner.read().await.orders.len()
    }

    /// Whether no orders have been placed yet.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.orders.is_empty()
    }
}
