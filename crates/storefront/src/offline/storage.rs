//! Named response caches.

use std::collections::HashMap;

use moka::future::Cache;
use tokio::sync::RwLock;

use super::fetcher::AssetResponse;

/// Maximum number of responses held per named cache.
const MAX_ENTRIES_PER_CACHE: u64 = 1_000;

/// A set of named caches, each mapping an asset URL to its response.
#[derive(Debug, Default)]
pub struct CacheStorage {
    caches: RwLock<HashMap<String, Cache<String, AssetResponse>>>,
}

impl CacheStorage {
    /// Create empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the cache with the given name, creating it if needed.
    pub async fn open(&self, name: &str) -> Cache<String, AssetResponse> {
        if let Some(cache) = self.caches.read().await.get(name) {
            return cache.clone();
        }

        self.caches
            .write()
            .await
            .entry(name.to_string())
            .or_insert_with(|| Cache::builder().max_capacity(MAX_ENTRIES_PER_CACHE).build())
            .clone()
    }

    /// Names of all caches, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut names: Vec<_> = self.caches.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Delete a cache. Returns whether it existed.
    pub async fn delete(&self, name: &str) -> bool {
        self.caches.write().await.remove(name).is_some()
    }

    /// Look up a URL in every cache.
    pub async fn match_path(&self, url: &str) -> Option<AssetResponse> {
        let caches: Vec<_> = self.caches.read().await.values().cloned().collect();
        for cache in caches {
            if let Some(response) = cache.get(url).await {
                return Some(response);
            }
        }
        None
    }
}
