//! Link registry: the authoritative operations on short links.
//!
//! Every operation runs the same admission pipeline: rate-limit check first,
//! then validation, then the durable store. The store's unique constraint on
//! the slug is the only serialization point for creation races; this layer
//! never retries on collision, it surfaces `Conflict` and lets the caller
//! resubmit.

use std::sync::Arc;

use crate::domain::entities::{NewShortLink, ShortLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::UrlCache;
use crate::infrastructure::ratelimit::RateLimiter;
use crate::utils::reserved::is_reserved_slug;
use crate::utils::slug::{generate_slug, validate_custom_slug};
use crate::utils::url_check::validate_long_url;
use metrics::counter;
use serde_json::json;

/// Result of a successful creation: the slug plus the externally visible
/// short URL composed from the configured base URL.
#[derive(Debug, Clone)]
pub struct CreatedLink {
    pub slug: String,
    pub short_url: String,
}

/// Authoritative CRUD and visit counting over short links.
pub struct LinkRegistry {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn UrlCache>,
    limiter: Arc<dyn RateLimiter>,
    base_url: String,
}

impl LinkRegistry {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn UrlCache>,
        limiter: Arc<dyn RateLimiter>,
        base_url: String,
    ) -> Self {
        Self {
            links,
            cache,
            limiter,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Composes the externally visible short URL for a slug.
    pub fn short_url(&self, slug: &str) -> String {
        format!("{}/{}", self.base_url, slug)
    }

    /// Creates a link under a generated random slug.
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimited`] / [`AppError::Dependency`] from the limiter
    /// - [`AppError::Validation`] for a malformed destination URL
    /// - [`AppError::Conflict`] if the generated slug collides; rare but
    ///   expected, the caller retries the whole operation
    pub async fn create_random(
        &self,
        long_url: String,
        owner: Option<String>,
        rate_key: &str,
    ) -> Result<CreatedLink, AppError> {
        self.limiter.check(rate_key).await?;

        validate_long_url(&long_url)?;

        let slug = generate_slug();

        // Unreachable in practice at this alphabet and length, but a reserved
        // slug must never be admitted through any path.
        if is_reserved_slug(&slug) {
            return Err(AppError::conflict(
                "Generated slug is unavailable, please retry",
                json!({ "slug": slug }),
            ));
        }

        let link = self
            .links
            .insert(NewShortLink {
                slug,
                long_url,
                created_by: owner,
            })
            .await?;

        self.prime_cache(&link).await;
        counter!("snaplink_links_created_total").increment(1);

        Ok(CreatedLink {
            short_url: self.short_url(&link.slug),
            slug: link.slug,
        })
    }

    /// Creates a link under a caller-chosen slug. Requires an authenticated
    /// owner.
    ///
    /// The existence pre-check keeps the common "already taken" case cheap;
    /// the unique constraint still catches the check-then-insert race and is
    /// reported identically as [`AppError::Conflict`].
    pub async fn create_custom(
        &self,
        long_url: String,
        slug: String,
        owner: String,
        rate_key: &str,
    ) -> Result<CreatedLink, AppError> {
        self.limiter.check(rate_key).await?;

        validate_long_url(&long_url)?;
        validate_custom_slug(&slug)?;

        if is_reserved_slug(&slug) {
            return Err(AppError::ReservedSlug { slug });
        }

        if self.links.find_by_slug(&slug).await?.is_some() {
            return Err(AppError::conflict(
                "This custom slug is already taken",
                json!({ "slug": slug }),
            ));
        }

        let link = self
            .links
            .insert(NewShortLink {
                slug,
                long_url,
                created_by: Some(owner),
            })
            .await?;

        self.prime_cache(&link).await;
        counter!("snaplink_links_created_total").increment(1);

        Ok(CreatedLink {
            short_url: self.short_url(&link.slug),
            slug: link.slug,
        })
    }

    /// Resolves a slug for the redirect path, counting the visit.
    ///
    /// The increment always reaches the durable store - the cache is only a
    /// side channel for the URL itself and is repopulated on miss. A cache
    /// entry that outlived its record (the store says gone) is actively
    /// evicted here.
    ///
    /// # Errors
    ///
    /// - [`AppError::RateLimited`] / [`AppError::Dependency`] from the limiter
    /// - [`AppError::NotFound`] if no record exists
    pub async fn resolve(&self, slug: &str, rate_key: &str) -> Result<ShortLink, AppError> {
        self.limiter.check(rate_key).await?;

        let cached = self.cache.get_url(slug).await.unwrap_or(None);

        let Some(link) = self.links.increment_visits_returning(slug).await? else {
            if cached.is_some() {
                let _ = self.cache.evict(slug).await;
            }
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "slug": slug }),
            ));
        };

        if cached.is_none() {
            let _ = self.cache.set_url(slug, &link.long_url, None).await;
        }

        counter!("snaplink_redirects_total").increment(1);
        Ok(link)
    }

    /// Deletes a link. Only the owner may delete; anonymous links have no
    /// owner and therefore cannot be deleted at all.
    ///
    /// Deletion actively evicts the cache entry - TTL expiry alone is not the
    /// coherence guarantee.
    pub async fn delete(&self, slug: &str, requester: &str) -> Result<(), AppError> {
        let link = self.links.find_by_slug(slug).await?.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "slug": slug }))
        })?;

        if !link.is_owned_by(requester) {
            return Err(AppError::forbidden(
                "You can only delete your own links",
                json!({ "slug": slug }),
            ));
        }

        // A concurrent delete may have won the race; treat as already gone.
        if !self.links.delete_by_slug(slug).await? {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "slug": slug }),
            ));
        }

        let _ = self.cache.evict(slug).await;

        Ok(())
    }

    /// Lists an owner's links, newest first.
    pub async fn list_for_owner(&self, owner: &str) -> Result<Vec<ShortLink>, AppError> {
        self.links.list_by_owner(owner).await
    }

    /// Best-effort cache priming after creation so the first redirect is
    /// already a hit.
    async fn prime_cache(&self, link: &ShortLink) {
        let _ = self.cache.set_url(&link.slug, &link.long_url, None).await;
    }
}
