//! Redis sorted-set sliding-window rate limiter.

use super::service::RateLimiter;
use crate::error::AppError;
use async_trait::async_trait;
use metrics::counter;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Rate limiter over a shared Redis sorted set per identifier.
///
/// Each call runs one atomic MULTI/EXEC pipeline: trim events older than the
/// window, record the current event, read the cardinality, refresh the key
/// expiry. Because the store is shared, limits hold across multiple service
/// instances.
pub struct RedisRateLimiter {
    client: ConnectionManager,
    window: Duration,
    max_requests: u64,
    op_timeout: Duration,
}

impl RedisRateLimiter {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Dependency`] if the connection cannot be
    /// established; the limiter is integral to abuse protection, so startup
    /// without it is refused rather than silently degraded.
    pub async fn connect(
        redis_url: &str,
        window: Duration,
        max_requests: u64,
        op_timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|e| AppError::dependency(format!("Failed to create Redis client: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| AppError::dependency(format!("Failed to connect to Redis: {e}")))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| AppError::dependency(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis rate limiter");

        Ok(Self {
            client: manager,
            window,
            max_requests,
            op_timeout,
        })
    }

    fn build_key(identifier: &str) -> String {
        format!("ratelimit:{identifier}")
    }

    fn now_seconds() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, identifier: &str) -> Result<(), AppError> {
        let key = Self::build_key(identifier);
        let now = Self::now_seconds();
        let window_secs = self.window.as_secs();
        let window_start = now.saturating_sub(window_secs);
        let mut conn = self.client.clone();

        // Unique member per event so multiple requests landing on the same
        // second are all counted.
        let mut nonce = [0u8; 8];
        getrandom::fill(&mut nonce)
            .map_err(|e| AppError::dependency(format!("random source failed: {e}")))?;
        let member = format!("{}-{}", now, hex::encode(nonce));

        let mut pipe = redis::pipe();
        pipe.atomic()
            .zrembyscore(&key, 0, window_start as f64)
            .zadd(&key, member, now as f64)
            .zcard(&key)
            .expire(&key, window_secs as i64);

        let mutate = pipe.query_async::<(i64, i64, i64, i64)>(&mut conn);
        tokio::time::timeout(self.op_timeout, mutate)
            .await
            .map_err(|_| AppError::dependency("rate limiter store timed out"))?
            .map_err(|e| AppError::dependency(format!("rate limiter store error: {e}")))?;

        // Separate read, but it reflects the just-committed mutation: EXEC
        // has already run by the time this call is issued.
        let count: u64 = tokio::time::timeout(self.op_timeout, conn.zcard(&key))
            .await
            .map_err(|_| AppError::dependency("rate limiter store timed out"))?
            .map_err(|e| AppError::dependency(format!("rate limiter store error: {e}")))?;

        if count > self.max_requests {
            let oldest: Vec<(String, f64)> =
                tokio::time::timeout(self.op_timeout, conn.zrange_withscores(&key, 0, 0))
                    .await
                    .map_err(|_| AppError::dependency("rate limiter store timed out"))?
                    .unwrap_or_default();

            let retry_after = oldest
                .first()
                .map(|(_, score)| (*score as u64 + window_secs).saturating_sub(now))
                .unwrap_or(window_secs)
                .max(1);

            warn!(identifier, count, "rate limit exceeded");
            counter!("snaplink_rate_limited_total").increment(1);
            return Err(AppError::rate_limited(retry_after));
        }

        Ok(())
    }
}
