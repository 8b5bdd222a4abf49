//! Repository trait for API token lookups.

use crate::error::AppError;
use async_trait::async_trait;

/// Token storage interface consumed by the authentication service.
///
/// Only hashed tokens ever cross this boundary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Resolves a token hash to its owner id, skipping revoked tokens.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_owner_by_hash(&self, token_hash: &str) -> Result<Option<String>, AppError>;

    /// Records that the token was just used. Best-effort; callers ignore
    /// failures.
    async fn touch(&self, token_hash: &str) -> Result<(), AppError>;
}
