//! Redirect resolver: public entry point for inbound slugs.
//!
//! A thin adapter over [`LinkRegistry::resolve`]. Its only logic is mapping
//! registry outcomes onto the three terminal states of the redirect path.
//! The fourth case - a slug that matches one of the application's own routes
//! - never reaches this type: the router registers those paths ahead of the
//! slug catch-all.

use std::sync::Arc;

use super::link_registry::LinkRegistry;
use crate::error::AppError;
use crate::utils::client_ip::redirect_rate_key;

/// Terminal state of a redirect request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    /// The slug resolved; send the visitor to this URL.
    Redirect(String),
    NotFound,
    RateLimited { retry_after: u64 },
}

pub struct RedirectResolver {
    registry: Arc<LinkRegistry>,
}

impl RedirectResolver {
    pub fn new(registry: Arc<LinkRegistry>) -> Self {
        Self { registry }
    }

    /// Resolves an inbound slug into a redirect decision.
    ///
    /// Redirect traffic is public, so rate limiting is keyed by network
    /// origin, never by authenticated identity.
    ///
    /// # Errors
    ///
    /// Propagates unexpected failures ([`AppError::Dependency`],
    /// [`AppError::Internal`]); expected outcomes are folded into
    /// [`RedirectOutcome`].
    pub async fn resolve(&self, slug: &str, origin: &str) -> Result<RedirectOutcome, AppError> {
        let rate_key = redirect_rate_key(origin);

        match self.registry.resolve(slug, &rate_key).await {
            Ok(link) => Ok(RedirectOutcome::Redirect(link.long_url)),
            Err(AppError::NotFound { .. }) => Ok(RedirectOutcome::NotFound),
            Err(AppError::RateLimited { retry_after }) => {
                Ok(RedirectOutcome::RateLimited { retry_after })
            }
            Err(e) => Err(e),
        }
    }
}
