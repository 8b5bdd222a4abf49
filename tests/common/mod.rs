//! Shared fixtures for integration tests.
//!
//! Handlers are exercised through in-memory implementations of the storage
//! traits, so the full HTTP surface runs without PostgreSQL or Redis.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::routing::{get, post};
use axum::{Router, middleware};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use snaplink::api;
use snaplink::api::handlers::{health_handler, redirect_handler, shorten_handler};
use snaplink::api::middleware::auth;
use snaplink::application::services::{
    AuthService, LinkRegistry, RedirectResolver, hash_token,
};
use snaplink::domain::entities::{NewShortLink, ShortLink};
use snaplink::domain::repositories::{LinkRepository, TokenRepository};
use snaplink::error::AppError;
use snaplink::infrastructure::cache::{CacheResult, UrlCache};
use snaplink::infrastructure::ratelimit::{MemoryRateLimiter, RateLimiter};
use snaplink::state::AppState;

/// Signing secret shared by fixtures and the handlers under test.
pub const TEST_SIGNING_SECRET: &str = "integration-test-secret";

/// Base URL used when composing short URLs in tests.
pub const TEST_BASE_URL: &str = "http://snap.test";

/// In-memory [`LinkRepository`] over a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<HashMap<String, ShortLink>>,
}

impl InMemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Direct read access for assertions, bypassing the visit counter.
    pub fn get(&self, slug: &str) -> Option<ShortLink> {
        self.links.lock().unwrap().get(slug).cloned()
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    /// Removes a record synchronously, simulating out-of-band deletion.
    pub fn remove(&self, slug: &str) {
        self.links.lock().unwrap().remove(slug);
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        let mut links = self.links.lock().unwrap();
        if links.contains_key(&new_link.slug) {
            return Err(AppError::conflict(
                "Slug already exists",
                serde_json::json!({ "slug": new_link.slug }),
            ));
        }

        let link = ShortLink {
            slug: new_link.slug.clone(),
            long_url: new_link.long_url,
            created_by: new_link.created_by,
            created_at: Utc::now(),
            visits: 0,
        };
        links.insert(new_link.slug, link.clone());
        Ok(link)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.lock().unwrap().get(slug).cloned())
    }

    async fn increment_visits_returning(&self, slug: &str) -> Result<Option<ShortLink>, AppError> {
        let mut links = self.links.lock().unwrap();
        Ok(links.get_mut(slug).map(|link| {
            link.visits += 1;
            link.clone()
        }))
    }

    async fn delete_by_slug(&self, slug: &str) -> Result<bool, AppError> {
        Ok(self.links.lock().unwrap().remove(slug).is_some())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<ShortLink>, AppError> {
        let links = self.links.lock().unwrap();
        let mut owned: Vec<ShortLink> = links
            .values()
            .filter(|link| link.created_by.as_deref() == Some(owner_id))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

/// In-memory [`UrlCache`] with inspection helpers for eviction assertions.
#[derive(Default)]
pub struct InMemoryUrlCache {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryUrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.entries.lock().unwrap().contains_key(slug)
    }

    pub fn cached_url(&self, slug: &str) -> Option<String> {
        self.entries.lock().unwrap().get(slug).cloned()
    }
}

#[async_trait]
impl UrlCache for InMemoryUrlCache {
    async fn get_url(&self, slug: &str) -> CacheResult<Option<String>> {
        Ok(self.entries.lock().unwrap().get(slug).cloned())
    }

    async fn set_url(
        &self,
        slug: &str,
        long_url: &str,
        _ttl_seconds: Option<u64>,
    ) -> CacheResult<()> {
        self.entries
            .lock()
            .unwrap()
            .insert(slug.to_string(), long_url.to_string());
        Ok(())
    }

    async fn evict(&self, slug: &str) -> CacheResult<()> {
        self.entries.lock().unwrap().remove(slug);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// In-memory [`TokenRepository`] mapping token hashes to owner ids.
#[derive(Default)]
pub struct InMemoryTokenRepository {
    owners: Mutex<HashMap<String, String>>,
}

impl InMemoryTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, token_hash: &str, owner_id: &str) {
        self.owners
            .lock()
            .unwrap()
            .insert(token_hash.to_string(), owner_id.to_string());
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn find_owner_by_hash(&self, token_hash: &str) -> Result<Option<String>, AppError> {
        Ok(self.owners.lock().unwrap().get(token_hash).cloned())
    }

    async fn touch(&self, _token_hash: &str) -> Result<(), AppError> {
        Ok(())
    }
}

/// Everything a test needs: the wired state plus handles to the in-memory
/// backends for seeding and assertions.
pub struct TestContext {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub cache: Arc<InMemoryUrlCache>,
    pub tokens: Arc<InMemoryTokenRepository>,
}

impl TestContext {
    /// Seeds a bearer token for `owner` and returns the raw token value.
    pub fn seed_token(&self, owner: &str) -> String {
        let raw = format!("token-for-{owner}");
        self.tokens.add(&hash_token(TEST_SIGNING_SECRET, &raw), owner);
        raw
    }

    /// Seeds a link directly into the store, bypassing the rate limiter.
    pub async fn seed_link(&self, slug: &str, long_url: &str, owner: Option<&str>) {
        self.links
            .insert(NewShortLink {
                slug: slug.to_string(),
                long_url: long_url.to_string(),
                created_by: owner.map(String::from),
            })
            .await
            .unwrap();
    }
}

/// Builds a test context with a generous rate limit that tests will not hit.
pub fn create_test_context() -> TestContext {
    create_test_context_with_limit(10_000)
}

/// Builds a test context with the given per-window request limit
/// (10-second window, matching the production default).
pub fn create_test_context_with_limit(max_requests: u64) -> TestContext {
    let links = Arc::new(InMemoryLinkRepository::new());
    let cache = Arc::new(InMemoryUrlCache::new());
    let tokens = Arc::new(InMemoryTokenRepository::new());

    let limiter: Arc<dyn RateLimiter> =
        Arc::new(MemoryRateLimiter::new(Duration::from_secs(10), max_requests));

    let registry = Arc::new(LinkRegistry::new(
        links.clone(),
        cache.clone(),
        limiter,
        TEST_BASE_URL.to_string(),
    ));
    let resolver = Arc::new(RedirectResolver::new(registry.clone()));
    let auth = Arc::new(AuthService::new(
        tokens.clone(),
        TEST_SIGNING_SECRET.to_string(),
    ));

    let state = AppState {
        registry,
        resolver,
        auth,
        links: links.clone(),
        cache: cache.clone(),
    };

    TestContext {
        state,
        links,
        cache,
        tokens,
    }
}

/// Full application router minus the trailing-slash normalization wrapper,
/// which `TestServer` does not need.
pub fn test_router(state: AppState) -> Router {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let api_router = Router::new()
        .route("/shorten", post(shorten_handler))
        .merge(protected);

    Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api", api_router)
        .route("/{slug}", get(redirect_handler))
        .with_state(state)
}
