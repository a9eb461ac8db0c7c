//! The per-visitor shopping cart.
//!
//! A cart is an ordered list of lines. Adding the same dish twice adds two
//! lines; there is no quantity field. Lines are addressed by position, which
//! is what the cart page's remove buttons send back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::MenuItem;
use crate::types::{PiAmount, UserId};

/// A menu item placed in a cart by a connected Pi user.
///
/// Serializes as the menu item's fields flattened together with
/// `timestamp` and `userId`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub item: MenuItem,
    pub timestamp: DateTime<Utc>,
    pub user_id: UserId,
}

/// An ordered list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Append a menu item for `user`, stamped with the current time.
    pub fn add(&mut self, item: MenuItem, user: UserId) {
        self.add_at(item, user, Utc::now());
    }

    /// Append a menu item with an explicit timestamp.
    pub fn add_at(&mut self, item: MenuItem, user: UserId, timestamp: DateTime<Utc>) {
        self.items.push(CartItem {
            item,
            timestamp,
            user_id: user,
        });
    }

    /// Remove the line at `index`. Out-of-range indices leave the cart untouched.
    pub fn remove(&mut self, index: usize) -> Option<CartItem> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of lines in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Cart lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Sum of every line's price.
    #[must_use]
    pub fn total(&self) -> PiAmount {
        self.items.iter().map(|line| line.item.price).sum()
    }
}
