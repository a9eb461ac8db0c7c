//! Restaurant reviews.

use std::collections::HashMap;

use foodpi_core::{RestaurantId, Review};
use tokio::sync::RwLock;

/// In-memory review storage grouped by restaurant.
///
/// Reviews for a restaurant are kept in submission order.
#[derive(Debug, Default)]
pub struct ReviewBoard {
    reviews: RwLock<HashMap<RestaurantId, Vec<Review>>>,
}

impl ReviewBoard {
    /// Create a board holding the given seed reviews.
    ///
    /// Reviews without a restaurant are dropped; catalog validation rejects
    /// them before they get here.
    #[must_use]
    pub fn with_reviews(seed: Vec<Review>) -> Self {
        let mut reviews: HashMap<RestaurantId, Vec<Review>> = HashMap::new();
        for review in seed {
            if let Some(restaurant_id) = review.restaurant_id.clone() {
                reviews.entry(restaurant_id).or_default().push(review);
            }
        }
        Self {
            reviews: RwLock::new(reviews),
        }
    }

    /// All reviews for a restaurant, oldest first.
    pub async fn list(&self, restaurant_id: &RestaurantId) -> Vec<Review> {
        self.reviews
            .read()
            .await
            .get(restaurant_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a review to a restaurant.
    pub async fn add(&self, restaurant_id: RestaurantId, review: Review) {
        self.reviews
            .write()
            .await
            .entry(restaurant_id)
            .or_default()
            .push(review);
    }
}
