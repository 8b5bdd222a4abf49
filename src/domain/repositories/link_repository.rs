//! Repository trait for short link data access.

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Minimal interface the registry requires from the durable record store.
///
/// Slug uniqueness is enforced here, not in application code: two concurrent
/// inserts for the same slug must yield exactly one success and one
/// [`AppError::Conflict`].
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new short link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug already exists and
    /// [`AppError::Internal`] on other database errors.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its slug.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError>;

    /// Atomically increments the visit counter and returns the updated
    /// record, or `None` if no record exists.
    ///
    /// The increment happens inside the store so concurrent redirects never
    /// lose counts to read-modify-write races.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_visits_returning(&self, slug: &str) -> Result<Option<ShortLink>, AppError>;

    /// Deletes a link. Returns `true` if a record was removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_by_slug(&self, slug: &str) -> Result<bool, AppError>;

    /// Lists all links created by `owner_id`, newest first.
    ///
    /// Pagination and search are a UI concern and deliberately absent here.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError>;

    /// Cheap connectivity probe for the health endpoint.
    async fn health_check(&self) -> Result<(), AppError>;
}
