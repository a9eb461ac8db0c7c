//! Restaurant, menu, review and order records.
//!
//! These are flat records that serialize with camelCase field names, the
//! shape the browser and the JSON API exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{
    MenuItemId, OrderId, OrderStatus, PiAmount, Rating, RestaurantId, ReviewId, UserId,
};

/// A restaurant and its menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub cover_image: String,
    /// Average rating, e.g. `4.8`.
    pub rating: f64,
    pub review_count: u32,
    pub cuisine_type: String,
    /// Delivery window in minutes, e.g. `"30-45"`.
    pub delivery_time: String,
    #[serde(default)]
    pub menu: Vec<MenuItem>,
}

/// A dish on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: PiAmount,
    #[serde(default)]
    pub image: String,
    pub category: String,
}

impl Restaurant {
    /// Look up a menu item by ID.
    #[must_use]
    pub fn menu_item(&self, id: &MenuItemId) -> Option<&MenuItem> {
        self.menu.iter().find(|item| &item.id == id)
    }

    /// Filter the menu by a free-text query.
    ///
    /// Matches case-insensitively against item names and descriptions. A
    /// blank query returns the whole menu, preserving menu order.
    #[must_use]
    pub fn search_menu(&self, query: &str) -> Vec<&MenuItem> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.menu.iter().collect();
        }

        self.menu
            .iter()
            .filter(|item| {
                item.name.to_lowercase().contains(&query)
                    || item.description.to_lowercase().contains(&query)
            })
            .collect()
    }
}

/// A customer review of a restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<RestaurantId>,
    pub rating: Rating,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ordered_items: Vec<String>,
}

/// A placed order.
///
/// `payment` is the payment object the client submitted, echoed back as-is
/// once the Pi platform has confirmed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<CartItem>,
    pub user_id: UserId,
    pub restaurant_id: RestaurantId,
    pub payment: serde_json::Value,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Sum of the item prices.
    #[must_use]
    pub fn total(&self) -> PiAmount {
        self.items.iter().map(|item| item.item.price).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza_paradise() -> Restaurant {
        serde_json::from_value(serde_json::json!({
            "id": "1",
            "name": "Pizza Paradise",
            "coverImage": "https://images.unsplash.com/photo-1555396273-367ea4eb4db5",
            "rating": 4.8,
            "reviewCount": 2500,
            "cuisineType": "Italian",
            "deliveryTime": "30-45",
            "menu": [
                {
                    "id": "1",
                    "name": "Margherita Pizza",
                    "description": "Fresh tomatoes, mozzarella, basil",
                    "price": 15.99,
                    "image": "https://images.unsplash.com/photo-1513104890138-7c749659a591",
                    "category": "Pizza"
                },
                {
                    "id": "2",
                    "name": "Pepperoni Pizza",
                    "description": "Classic pepperoni with mozzarella",
                    "price": 16.99,
                    "image": "https://images.unsplash.com/photo-1534308983496-4fabb1a015ee",
                    "category": "Pizza"
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_restaurant_camel_case_round_trip() {
        let restaurant = pizza_paradise();
        assert_eq!(restaurant.review_count, 2500);
        assert_eq!(restaurant.menu[0].price, PiAmount::from_hundredths(1599));

        let json = serde_json::to_value(&restaurant).unwrap();
        assert_eq!(json["cuisineType"], "Italian");
        assert_eq!(json["menu"][1]["name"], "Pepperoni Pizza");
    }

    #[test]
    fn test_menu_item_lookup() {
        let restaurant = pizza_paradise();
        assert_eq!(
            restaurant.menu_item(&MenuItemId::new("2")).unwrap().name,
            "Pepperoni Pizza"
        );
        assert!(restaurant.menu_item(&MenuItemId::new("99")).is_none());
    }

    #[test]
    fn test_search_menu_matches_name_and_description() {
        let restaurant = pizza_paradise();

        let by_name: Vec<_> = restaurant.search_menu("PEPPERONI");
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id.as_str(), "2");

        let by_description = restaurant.search_menu("basil");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id.as_str(), "1");

        assert_eq!(restaurant.search_menu("mozzarella").len(), 2);
        assert!(restaurant.search_menu("sushi").is_empty());
    }

    #[test]
    fn test_search_menu_blank_returns_all_in_order() {
        let restaurant = pizza_paradise();
        let all = restaurant.search_menu("   ");
        let ids: Vec<&str> = all.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, ["1", "2"]);
    }

    #[test]
    fn test_review_optional_fields_skipped() {
        let review = Review {
            id: ReviewId::new("review_1"),
            user_id: UserId::new("user1"),
            user_name: None,
            restaurant_id: Some(RestaurantId::new("1")),
            rating: Rating::try_from(5).unwrap(),
            comment: "Great".to_string(),
            created_at: Utc::now(),
            ordered_items: Vec::new(),
        };

        let json = serde_json::to_value(&review).unwrap();
        assert!(json.get("userName").is_none());
        assert!(json.get("orderedItems").is_none());
        assert_eq!(json["restaurantId"], "1");
        assert_eq!(json["rating"], 5);
    }
}
