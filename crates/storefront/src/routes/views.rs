//! Display data shared by page templates.

use foodpi_core::{Cart, CartItem, MenuItem, Restaurant, stars};

use crate::pi::PiUser;

/// Restaurant header data for templates.
#[derive(Clone)]
pub struct RestaurantView {
    pub id: String,
    pub name: String,
    pub cover_image: String,
    pub stars: String,
    pub rating: String,
    pub review_count: u32,
    pub cuisine_type: String,
    pub delivery_time: String,
}

impl From<&Restaurant> for RestaurantView {
    fn from(restaurant: &Restaurant) -> Self {
        Self {
            id: restaurant.id.to_string(),
            name: restaurant.name.clone(),
            cover_image: restaurant.cover_image.clone(),
            stars: stars(restaurant.rating),
            rating: format!("{:.1}", restaurant.rating),
            review_count: restaurant.review_count,
            cuisine_type: restaurant.cuisine_type.clone(),
            delivery_time: restaurant.delivery_time.clone(),
        }
    }
}

/// Menu card data for templates.
#[derive(Clone)]
pub struct MenuItemView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: String,
    pub image: String,
    pub category: String,
}

impl From<&MenuItem> for MenuItemView {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price.to_string(),
            image: item.image.clone(),
            category: item.category.clone(),
        }
    }
}

/// Cart line data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub index: usize,
    pub name: String,
    pub price: String,
    pub image: String,
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    /// Total without the currency sign, for the Pi SDK.
    pub amount: String,
    pub count: usize,
    pub restaurant_id: Option<String>,
    /// Cart lines as JSON, posted back with the order.
    pub items_json: String,
}

impl CartView {
    /// Build the view for a cart.
    #[must_use]
    pub fn new(cart: &Cart, restaurant_id: Option<String>) -> Self {
        let total = cart.total();
        Self {
            items: cart
                .items()
                .iter()
                .enumerate()
                .map(|(index, line)| CartItemView::new(index, line))
                .collect(),
            total: total.to_string(),
            amount: format!("{:.2}", total.amount()),
            count: cart.len(),
            restaurant_id,
            items_json: serde_json::to_string(cart.items()).unwrap_or_else(|_| "[]".to_string()),
        }
    }
}

impl CartItemView {
    fn new(index: usize, line: &CartItem) -> Self {
        Self {
            index,
            name: line.item.name.clone(),
            price: line.item.price.to_string(),
            image: line.item.image.clone(),
        }
    }
}

/// Connected wallet shown in the header.
#[derive(Clone)]
pub struct WalletView {
    pub uid: String,
    pub username: String,
}

impl WalletView {
    /// Header data for an optional connected user.
    #[must_use]
    pub fn from_user(user: Option<&PiUser>) -> Option<Self> {
        user.map(|user| Self {
            uid: user.uid.to_string(),
            username: user
                .username
                .clone()
                .unwrap_or_else(|| user.uid.to_string()),
        })
    }
}
