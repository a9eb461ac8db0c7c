//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::offline::{AssetFetcher, AssetManifest, OfflineCache, OfflineError};
use crate::pi::PiClient;
use crate::store::{Catalog, OrderBook, ReviewBoard, StoreError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Offline(#[from] OfflineError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the stores, the Pi Platform client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    orders: OrderBook,
    reviews: ReviewBoard,
    pi: PiClient,
    offline: OfflineCache,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Loads the catalog from `config.catalog_path` (or the built-in sample).
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the base URL is invalid.
    pub fn new(config: StorefrontConfig) -> Result<Self, StateError> {
        let (catalog, seed_reviews) = Catalog::load(config.catalog_path.as_deref())?;
        let pi = PiClient::new(&config.pi);
        let offline = OfflineCache::new(
            AssetManifest::new(config.offline_cache_name.clone()),
            AssetFetcher::new(&config.static_dir, &config.base_url)?,
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders: OrderBook::new(),
                reviews: ReviewBoard::with_reviews(seed_reviews),
                pi,
                offline,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the restaurant catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the order book.
    #[must_use]
    pub fn orders(&self) -> &OrderBook {
        &self.inner.orders
    }

    /// Get a reference to the review board.
    #[must_use]
    pub fn reviews(&self) -> &ReviewBoard {
        &self.inner.reviews
    }

    /// Get a reference to the Pi Platform API client.
    #[must_use]
    pub fn pi(&self) -> &PiClient {
        &self.inner.pi
    }

    /// Get a reference to the offline asset cache.
    #[must_use]
    pub fn offline(&self) -> &OfflineCache {
        &self.inner.offline
    }
}
