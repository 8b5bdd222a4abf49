//! Rate limiter trait and window constants.

use crate::error::AppError;
use async_trait::async_trait;

/// Default sliding window length in seconds.
pub const WINDOW_SIZE_SECONDS: u64 = 10;

/// Default maximum requests per identifier per window.
pub const MAX_REQUESTS: u64 = 10;

/// Sliding-window admission check keyed by caller identity.
///
/// The window is best-effort, not exact: the decision is taken on the count
/// *after* inserting the current event, which makes the limiter slightly
/// stricter than a perfectly lazy window. Callers must not rely on exact
/// boundary timing.
///
/// Unlike the cache, the limiter is integral to abuse protection and fails
/// closed: if the counter store is unreachable the request is rejected with
/// [`AppError::Dependency`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Records an event for `identifier` and admits or rejects the request.
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimited`] with a positive `retry_after` when the
    ///   window count exceeds the limit
    /// - [`AppError::Dependency`] when the counter store fails or times out
    async fn check(&self, identifier: &str) -> Result<(), AppError>;
}
