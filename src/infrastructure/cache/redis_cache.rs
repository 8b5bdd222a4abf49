//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, UrlCache};
use async_trait::async_trait;
use metrics::counter;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis cache for fast slug lookups.
///
/// Uses `ConnectionManager` for connection reuse. Every operation is bounded
/// by `op_timeout` and fail-open: timeouts and errors are logged and reported
/// as misses/no-ops, never as request failures.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
    op_timeout: Duration,
    key_prefix: String,
}

impl RedisCache {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379"`)
    /// - `default_ttl_seconds` - TTL applied when [`UrlCache::set_url`] is
    ///   called with `ttl_seconds = None` (`CACHE_TTL_SECONDS`, default 24h)
    /// - `op_timeout` - bound on every cache call (`STORE_TIMEOUT_MS`)
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::ConnectionError`] if the URL is invalid, the
    /// connection cannot be established, or the PING fails.
    pub async fn connect(
        redis_url: &str,
        default_ttl_seconds: u64,
        op_timeout: Duration,
    ) -> CacheResult<Self> {
        let client = Client::open(redis_url).map_err(|e| {
            CacheError::ConnectionError(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            CacheError::ConnectionError(format!("Failed to connect to Redis: {}", e))
        })?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::ConnectionError(format!("Redis PING failed: {}", e)))?;

        info!("Connected to Redis cache");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
            op_timeout,
            key_prefix: "url:".to_string(),
        })
    }

    fn build_key(&self, slug: &str) -> String {
        format!("{}{}", self.key_prefix, slug)
    }
}

#[async_trait]
impl UrlCache for RedisCache {
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>> {
        let key = self.build_key(slug);
        let mut conn = self.client.clone();

        let fetch = conn.get::<_, Option<String>>(&key);
        match tokio::time::timeout(self.op_timeout, fetch).await {
            Ok(Ok(Some(url))) => {
                debug!("Cache HIT: {}", slug);
                counter!("snaplink_cache_hits_total").increment(1);
                Ok(Some(url))
            }
            Ok(Ok(None)) => {
                debug!("Cache MISS: {}", slug);
                counter!("snaplink_cache_misses_total").increment(1);
                Ok(None)
            }
            Ok(Err(e)) => {
                warn!("Redis GET error for {}: {}", slug, e);
                Ok(None)
            }
            Err(_) => {
                warn!("Redis GET timed out for {}", slug);
                Ok(None)
            }
        }
    }

    async fn set_url(
        &self,
        slug: &str,
        long_url: &str,
        ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        let key = self.build_key(slug);
        let mut conn = self.client.clone();
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);

        let store = conn.set_ex::<_, _, ()>(&key, long_url, ttl);
        match tokio::time::timeout(self.op_timeout, store).await {
            Ok(Ok(())) => {
                debug!("Cache SET: {} (TTL: {}s)", slug, ttl);
            }
            Ok(Err(e)) => warn!("Redis SET error for {}: {}", slug, e),
            Err(_) => warn!("Redis SET timed out for {}", slug),
        }
        Ok(())
    }

    async fn evict(&self, slug: &str) -> CacheResult<()> {
        let key = self.build_key(slug);
        let mut conn = self.client.clone();

        let remove = conn.del::<_, i64>(&key);
        match tokio::time::timeout(self.op_timeout, remove).await {
            Ok(Ok(deleted)) => {
                if deleted > 0 {
                    debug!("Cache EVICT: {}", slug);
                }
            }
            Ok(Err(e)) => warn!("Redis DEL error for {}: {}", slug, e),
            Err(_) => warn!("Redis DEL timed out for {}", slug),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        matches!(
            tokio::time::timeout(self.op_timeout, conn.ping::<()>()).await,
            Ok(Ok(()))
        )
    }
}
