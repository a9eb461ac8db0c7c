//! Offline asset cache with a cache-first strategy.
//!
//! # Lifecycle
//!
//! - `install` fetches every asset in the [`AssetManifest`] and stores them in
//!   the cache named by the manifest. It is all-or-nothing: if one asset fails,
//!   nothing is stored.
//! - `activate` deletes every cache whose name is not the current one, so
//!   bumping the cache name (`foodpihub-v1` to `foodpihub-v2`) retires old
//!   assets.
//! - `fetch` answers from any cache first and falls back to the network. Only
//!   successful same-origin responses are written back.

mod fetcher;
mod manifest;
mod storage;

pub use fetcher::{AssetFetcher, AssetResponse, ResponseKind, STATIC_PREFIX};
pub use manifest::{AssetManifest, DEFAULT_ASSETS};
pub use storage::CacheStorage;

use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Errors that can occur while filling or reading the offline cache.
#[derive(Debug, Error)]
pub enum OfflineError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A static file body could not be read.
    #[error("Failed to read static asset: {0}")]
    Body(#[from] axum::Error),

    /// An asset URL could not be resolved.
    #[error("Invalid asset URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// An asset answered with a non-success status during install.
    #[error("Asset {asset} returned status {status}")]
    BadStatus { asset: String, status: u16 },
}

/// Cache-first asset store.
#[derive(Debug)]
pub struct OfflineCache {
    manifest: AssetManifest,
    storage: CacheStorage,
    fetcher: AssetFetcher,
}

impl OfflineCache {
    /// Create an offline cache for a manifest.
    #[must_use]
    pub fn new(manifest: AssetManifest, fetcher: AssetFetcher) -> Self {
        Self {
            manifest,
            storage: CacheStorage::new(),
            fetcher,
        }
    }

    /// The precache manifest.
    #[must_use]
    pub fn manifest(&self) -> &AssetManifest {
        &self.manifest
    }

    /// The underlying named caches.
    #[must_use]
    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// Fetch every manifest asset into the current cache.
    ///
    /// # Errors
    ///
    /// Returns the first failure; in that case nothing is stored.
    #[instrument(skip(self), fields(cache = %self.manifest.cache_name))]
    pub async fn install(&self) -> Result<usize, OfflineError> {
        let mut fetched = Vec::with_capacity(self.manifest.assets.len());
        for asset in &self.manifest.assets {
            let response = self.fetcher.fetch(asset).await?;
            if !(200..300).contains(&response.status) {
                return Err(OfflineError::BadStatus {
                    asset: asset.clone(),
                    status: response.status,
                });
            }
            fetched.push((asset.clone(), response));
        }

        let cache = self.storage.open(&self.manifest.cache_name).await;
        let count = fetched.len();
        for (asset, response) in fetched {
            cache.insert(asset, response).await;
        }

        info!(assets = count, "Offline cache installed");
        Ok(count)
    }

    /// Delete every cache other than the current one.
    ///
    /// Returns the names of the deleted caches.
    #[instrument(skip(self), fields(cache = %self.manifest.cache_name))]
    pub async fn activate(&self) -> Vec<String> {
        let mut deleted = Vec::new();
        for name in self.storage.keys().await {
            if name != self.manifest.cache_name && self.storage.delete(&name).await {
                deleted.push(name);
            }
        }

        if !deleted.is_empty() {
            info!(?deleted, "Deleted stale offline caches");
        }
        deleted
    }

    /// Install, then activate. Failures are logged and leave the server running.
    pub async fn bootstrap(&self) {
        if let Err(e) = self.install().await {
            warn!(error = %e, "Offline cache install failed, serving from network");
        }
        self.activate().await;
    }

    /// Serve an asset cache-first.
    ///
    /// # Errors
    ///
    /// Returns an error only when the asset is not cached and the network
    /// fetch fails.
    #[instrument(skip(self))]
    pub async fn fetch(&self, url: &str) -> Result<AssetResponse, OfflineError> {
        if let Some(cached) = self.storage.match_path(url).await {
            debug!("Offline cache hit");
            return Ok(cached);
        }

        let response = self.fetcher.fetch(url).await?;
        if response.is_cacheable() {
            self.storage
                .open(&self.manifest.cache_name)
                .await
                .insert(url.to_string(), response.clone())
                .await;
        }
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::path::Path;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn static_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("css")).unwrap();
        std::fs::create_dir_all(dir.path().join("js")).unwrap();
        std::fs::write(dir.path().join("css/styles.css"), "body{}").unwrap();
        std::fs::write(dir.path().join("js/app.js"), "init()").unwrap();
        dir
    }

    fn offline(dir: &Path, assets: &[&str]) -> OfflineCache {
        let manifest =
            AssetManifest::with_assets("foodpihub-v1", assets.iter().map(ToString::to_string));
        OfflineCache::new(
            manifest,
            AssetFetcher::new(dir, "http://localhost:3000").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_install_stores_all_assets() {
        let dir = static_dir();
        let cache = offline(dir.path(), &["/static/css/styles.css", "/static/js/app.js"]);

        assert_eq!(cache.install().await.unwrap(), 2);

        // Served from cache even after the file is gone
        std::fs::remove_file(dir.path().join("js/app.js")).unwrap();
        let response = cache.fetch("/static/js/app.js").await.unwrap();
        assert_eq!(response.body.as_ref(), b"init()");
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let dir = static_dir();
        let cache = offline(dir.path(), &["/static/css/styles.css", "/static/missing.js"]);

        let err = cache.install().await.unwrap_err();
        assert!(matches!(err, OfflineError::BadStatus { status: 404, .. }));
        assert!(cache.storage().match_path("/static/css/styles.css").await.is_none());
    }

    #[tokio::test]
    async fn test_activate_deletes_other_caches() {
        let dir = static_dir();
        let cache = offline(dir.path(), &[]);
        cache.storage().open("foodpihub-v0").await;
        cache.storage().open("foodpihub-v1").await;

        assert_eq!(cache.activate().await, ["foodpihub-v0"]);
        assert_eq!(cache.storage().keys().await, ["foodpihub-v1"]);
    }

    #[tokio::test]
    async fn test_fetch_caches_successful_same_origin() {
        let dir = static_dir();
        let cache = offline(dir.path(), &[]);

        let first = cache.fetch("/static/css/styles.css").await.unwrap();
        assert_eq!(first.status, 200);
        std::fs::write(dir.path().join("css/styles.css"), "changed{}").unwrap();

        let second = cache.fetch("/static/css/styles.css").await.unwrap();
        assert_eq!(second.body.as_ref(), b"body{}");
    }

    #[tokio::test]
    async fn test_fetch_does_not_cache_errors() {
        let dir = static_dir();
        let cache = offline(dir.path(), &[]);

        let missing = cache.fetch("/static/late.js").await.unwrap();
        assert_eq!(missing.status, 404);

        std::fs::write(dir.path().join("late.js"), "late()").unwrap();
        let found = cache.fetch("/static/late.js").await.unwrap();
        assert_eq!(found.status, 200);
    }

    #[tokio::test]
    async fn test_fetch_does_not_cache_cross_origin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/pi-sdk.js"))
            .respond_with(ResponseTemplate::new(200).set_body_string("window.Pi={}"))
            .expect(2)
            .mount(&server)
            .await;

        let dir = static_dir();
        let cache = offline(dir.path(), &[]);
        let url = format!("{}/pi-sdk.js", server.uri());

        cache.fetch(&url).await.unwrap();
        let response = cache.fetch(&url).await.unwrap();
        assert_eq!(response.kind, ResponseKind::Cors);
        assert!(cache.storage().match_path(&url).await.is_none());
    }
}
