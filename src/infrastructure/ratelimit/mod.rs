//! Sliding-window rate limiting backed by a shared counter store.
//!
//! Provides a [`RateLimiter`] trait with two implementations:
//! - [`RedisRateLimiter`] - Redis sorted-set window, correct across instances
//! - [`MemoryRateLimiter`] - in-process fallback, single-instance only

mod memory_limiter;
mod redis_limiter;
mod service;

pub use memory_limiter::MemoryRateLimiter;
pub use redis_limiter::RedisRateLimiter;
pub use service::{MAX_REQUESTS, RateLimiter, WINDOW_SIZE_SECONDS};

#[cfg(test)]
pub use service::MockRateLimiter;
