//! Precache manifest.

use serde::{Deserialize, Serialize};

/// Assets fetched into the offline cache on install.
///
/// Relative entries are resolved against the storefront origin; `/static/`
/// entries are read straight from the static directory.
pub const DEFAULT_ASSETS: &[&str] = &[
    "/static/offline.html",
    "/static/css/styles.css",
    "/static/js/app.js",
    "/static/js/cart.js",
    "/static/images/logo.svg",
    "/manifest.webmanifest",
    "https://sdk.minepi.com/pi-sdk.js",
];

/// A named, versioned list of assets to precache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetManifest {
    pub cache_name: String,
    pub assets: Vec<String>,
}

impl AssetManifest {
    /// Create a manifest for the default asset list.
    #[must_use]
    pub fn new(cache_name: impl Into<String>) -> Self {
        Self::with_assets(cache_name, DEFAULT_ASSETS.iter().map(ToString::to_string))
    }

    /// Create a manifest with a custom asset list.
    #[must_use]
    pub fn with_assets(
        cache_name: impl Into<String>,
        assets: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            cache_name: cache_name.into(),
            assets: assets.into_iter().collect(),
        }
    }
}
