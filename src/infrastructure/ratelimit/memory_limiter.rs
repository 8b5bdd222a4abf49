//! In-process sliding-window rate limiter.

use super::service::RateLimiter;
use crate::error::AppError;
use async_trait::async_trait;
use metrics::counter;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

/// Per-identifier sliding window over an in-process map.
///
/// Fallback for deployments without Redis. Limits are per service instance:
/// running replicas behind a load balancer multiplies the effective limit by
/// the replica count, which the Redis-backed limiter avoids.
pub struct MemoryRateLimiter {
    windows: Mutex<HashMap<String, Vec<Instant>>>,
    window: Duration,
    max_requests: u64,
}

impl MemoryRateLimiter {
    pub fn new(window: Duration, max_requests: u64) -> Self {
        Self {
            windows: Mutex::new(HashMap::new()),
            window,
            max_requests,
        }
    }
}

#[async_trait]
impl RateLimiter for MemoryRateLimiter {
    async fn check(&self, identifier: &str) -> Result<(), AppError> {
        let now = Instant::now();

        let mut windows = self
            .windows
            .lock()
            .map_err(|_| AppError::dependency("rate limiter state poisoned"))?;

        // Drop identifiers whose whole window has expired, the in-process
        // analogue of the Redis key EXPIRE. Identifiers come from
        // caller-controlled forwarding headers, so without this sweep the
        // map grows without bound. Events are appended in time order, so
        // checking the newest one is enough.
        windows.retain(|_, events| {
            events
                .last()
                .is_some_and(|t| now.duration_since(*t) < self.window)
        });

        let events = windows.entry(identifier.to_string()).or_default();

        // Same order as the store-backed limiter: trim, record, then count.
        events.retain(|t| now.duration_since(*t) < self.window);
        events.push(now);

        if events.len() as u64 > self.max_requests {
            let oldest = events.first().copied().unwrap_or(now);
            let retry_after = self
                .window
                .saturating_sub(now.duration_since(oldest))
                .as_secs()
                .max(1);

            warn!(identifier, count = events.len(), "rate limit exceeded");
            counter!("snaplink_rate_limited_total").increment(1);
            return Err(AppError::rate_limited(retry_after));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_admits_up_to_limit() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(10), 10);

        for _ in 0..10 {
            assert!(limiter.check("id-1").await.is_ok());
        }
    }

    #[tokio::test]
    async fn test_rejects_past_limit_with_positive_retry_after() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(10), 10);

        for _ in 0..10 {
            limiter.check("id-1").await.unwrap();
        }

        let err = limiter.check("id-1").await.unwrap_err();
        match err {
            AppError::RateLimited { retry_after } => assert!(retry_after >= 1),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_identifiers_are_independent() {
        let limiter = MemoryRateLimiter::new(Duration::from_secs(10), 2);

        limiter.check("id-1").await.unwrap();
        limiter.check("id-1").await.unwrap();
        assert!(limiter.check("id-1").await.is_err());

        // A different caller still gets through.
        assert!(limiter.check("id-2").await.is_ok());
    }

    #[tokio::test]
    async fn test_expired_identifiers_are_dropped_from_the_map() {
        let limiter = MemoryRateLimiter::new(Duration::from_millis(10), 10);

        for i in 0..1000 {
            limiter.check(&format!("origin-{i}")).await.unwrap();
        }
        assert_eq!(limiter.windows.lock().unwrap().len(), 1000);

        tokio::time::sleep(Duration::from_millis(50)).await;

        // The next call sweeps every identifier whose window has expired.
        limiter.check("fresh").await.unwrap();

        let windows = limiter.windows.lock().unwrap();
        assert_eq!(windows.len(), 1);
        assert!(windows.contains_key("fresh"));
    }

    #[tokio::test]
    async fn test_window_expiry_admits_again() {
        let limiter = MemoryRateLimiter::new(Duration::from_millis(100), 2);

        limiter.check("id-1").await.unwrap();
        limiter.check("id-1").await.unwrap();
        assert!(limiter.check("id-1").await.is_err());

        tokio::time::sleep(Duration::from_millis(150)).await;

        assert!(limiter.check("id-1").await.is_ok());
    }
}
