//! Restaurant catalog loaded from YAML.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use foodpi_core::{Restaurant, RestaurantId, Review};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::StoreError;

/// Sample catalog compiled into the binary.
const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.yaml");

/// On-disk catalog format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogFile {
    pub restaurants: Vec<Restaurant>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl CatalogFile {
    /// Parse a catalog from YAML without validating it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if the YAML does not match the schema.
    pub fn from_yaml(content: &str) -> Result<Self, StoreError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read and parse a catalog file without validating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }
}

/// Check a catalog for inconsistencies.
///
/// Returns every problem found; an empty list means the catalog is valid.
#[must_use]
pub fn validate_catalog(file: &CatalogFile) -> Vec<String> {
    let mut errors = Vec::new();
    let mut restaurant_ids = HashSet::new();

    for restaurant in &file.restaurants {
        if !restaurant_ids.insert(&restaurant.id) {
            errors.push(format!("duplicate restaurant id '{}'", restaurant.id));
        }
        if restaurant.name.trim().is_empty() {
            errors.push(format!("restaurant '{}' has an empty name", restaurant.id));
        }

        let mut item_ids = HashSet::new();
        for item in &restaurant.menu {
            if !item_ids.insert(&item.id) {
                errors.push(format!(
                    "restaurant '{}': duplicate menu item id '{}'",
                    restaurant.id, item.id
                ));
            }
            if item.name.trim().is_empty() {
                errors.push(format!(
                    "restaurant '{}': menu item '{}' has an empty name",
                    restaurant.id, item.id
                ));
            }
            if item.price.is_negative() {
                errors.push(format!(
                    "restaurant '{}': menu item '{}' has a negative price",
                    restaurant.id, item.id
                ));
            }
        }
    }

    for review in &file.reviews {
        match &review.restaurant_id {
            None => errors.push(format!("review '{}' has no restaurantId", review.id)),
            Some(id) if !restaurant_ids.contains(id) => errors.push(format!(
                "review '{}' refers to unknown restaurant '{id}'",
                review.id
            )),
            Some(_) => {}
        }
    }

    errors
}

/// Read-only restaurant catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    restaurants: Vec<Restaurant>,
    index: HashMap<RestaurantId, usize>,
}

impl Catalog {
    /// Build a catalog from a validated catalog file.
    ///
    /// Returns the catalog and the seeded reviews.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Invalid` listing every validation problem.
    pub fn from_file(file: CatalogFile) -> Result<(Self, Vec<Review>), StoreError> {
        let errors = validate_catalog(&file);
        if !errors.is_empty() {
            return Err(StoreError::Invalid(errors));
        }

        let index = file
            .restaurants
            .iter()
            .enumerate()
            .map(|(i, restaurant)| (restaurant.id.clone(), i))
            .collect();

        Ok((
            Self {
                restaurants: file.restaurants,
                index,
            },
            file.reviews,
        ))
    }

    /// Load the catalog from `path`, or the built-in sample when `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed or validated.
    pub fn load(path: Option<&Path>) -> Result<(Self, Vec<Review>), StoreError> {
        let file = match path {
            Some(path) => {
                info!(path = %path.display(), "Loading catalog from file");
                CatalogFile::read(path)?
            }
            None => {
                info!("Loading built-in sample catalog");
                CatalogFile::from_yaml(BUILTIN_CATALOG)?
            }
        };

        let (catalog, reviews) = Self::from_file(file)?;
        info!(
            restaurants = catalog.restaurants.len(),
            reviews = reviews.len(),
            "Catalog loaded"
        );
        Ok((catalog, reviews))
    }

    /// Look up a restaurant by ID.
    #[must_use]
    pub fn get(&self, id: &RestaurantId) -> Option<&Restaurant> {
        self.index.get(id).and_then(|&i| self.restaurants.get(i))
    }

    /// All restaurants in catalog order.
    #[must_use]
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }
}
