//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, UrlCache};
use async_trait::async_trait;
use tracing::debug;

/// A cache that stores nothing and always misses.
///
/// Used when Redis is unavailable or caching is explicitly disabled; every
/// lookup falls through to the durable store.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for NullCache {
    async fn get_url(&self, _slug: &str) -> CacheResult<Option<String>> {
        Ok(None)
    }

    async fn set_url(
        &self,
        _slug: &str,
        _long_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        Ok(())
    }

    async fn evict(&self, _slug: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_null_cache_always_misses() {
        let cache = NullCache::new();
        cache
            .set_url("ab12Cd", "https://example.com", None)
            .await
            .unwrap();
        assert_eq!(cache.get_url("ab12Cd").await.unwrap(), None);
        cache.evict("ab12Cd").await.unwrap();
        assert!(cache.health_check().await);
    }
}
