//! Cache service trait and error types.

use async_trait::async_trait;
use std::fmt;

/// Errors that can occur during cache operations.
///
/// These never propagate past the cache layer: every failure mode collapses
/// into a miss or a no-op from the caller's point of view.
#[derive(Debug)]
pub enum CacheError {
    ConnectionError(String),
    OperationError(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::ConnectionError(e) => write!(f, "Cache connection error: {}", e),
            Self::OperationError(e) => write!(f, "Cache operation error: {}", e),
        }
    }
}

impl std::error::Error for CacheError {}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for caching slug -> long URL mappings.
///
/// The durable store is always the source of truth; cache entries are derived
/// data bounded by TTL, plus explicit eviction on delete. Cache
/// unavailability degrades performance, never correctness - all callers must
/// be able to proceed to the durable store on a miss.
#[async_trait]
pub trait UrlCache: Send + Sync {
    /// Retrieves the destination URL for a slug.
    ///
    /// Returns `Ok(None)` on miss *and* on store errors (fail-open). Errors
    /// are logged inside the implementation.
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>>;

    /// Stores a slug -> URL mapping with optional TTL override.
    ///
    /// Best-effort: implementations log failures and return `Ok(())` so the
    /// request flow is never disrupted.
    async fn set_url(&self, slug: &str, long_url: &str, ttl_seconds: Option<u64>)
    -> CacheResult<()>;

    /// Removes a cached mapping. Called on link deletion so a cached URL
    /// never survives its record. Best-effort.
    async fn evict(&self, slug: &str) -> CacheResult<()>;

    /// Checks if the cache backend is reachable.
    async fn health_check(&self) -> bool;
}
