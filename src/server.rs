//! HTTP server initialization and runtime setup.
//!
//! Handles database connections, migrations, cache and rate limiter setup,
//! and the Axum server lifecycle.

use crate::config::Config;
use crate::application::services::{AuthService, LinkRegistry, RedirectResolver};
use crate::infrastructure::cache::{NullCache, RedisCache, UrlCache};
use crate::infrastructure::persistence::{PgLinkRepository, PgTokenRepository};
use crate::infrastructure::ratelimit::{MemoryRateLimiter, RateLimiter, RedisRateLimiter};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL connection pool (with per-statement timeout)
/// - Migrations
/// - Redis cache (or NullCache fallback)
/// - Redis rate limiter (or in-process fallback when Redis is absent)
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - The Redis rate limiter is configured but unreachable
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let connect_options = PgConnectOptions::from_str(&config.database_url)
        .context("Invalid DATABASE_URL")?
        .options([(
            "statement_timeout",
            config.db_statement_timeout_ms.to_string(),
        )]);

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect_with(connect_options)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let store_timeout = Duration::from_millis(config.store_timeout_ms);
    let window = Duration::from_secs(config.rate_limit_window_seconds);

    let cache: Arc<dyn UrlCache> = if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds, store_timeout).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    };

    // Unlike the cache, the limiter does not degrade silently: a configured
    // but unreachable Redis refuses startup (fail closed).
    let limiter: Arc<dyn RateLimiter> = if let Some(redis_url) = &config.redis_url {
        let redis = RedisRateLimiter::connect(
            redis_url,
            window,
            config.rate_limit_max_requests,
            store_timeout,
        )
        .await
        .context("Failed to connect rate limiter to Redis")?;
        tracing::info!("Rate limiter enabled (Redis, cross-instance)");
        Arc::new(redis)
    } else {
        tracing::warn!(
            "Rate limiter running in-process; limits are not shared across instances"
        );
        Arc::new(MemoryRateLimiter::new(
            window,
            config.rate_limit_max_requests,
        ))
    };

    let pool_arc = Arc::new(pool);
    let link_repository = Arc::new(PgLinkRepository::new(pool_arc.clone()));
    let token_repository = Arc::new(PgTokenRepository::new(pool_arc));

    let registry = Arc::new(LinkRegistry::new(
        link_repository.clone(),
        cache.clone(),
        limiter,
        config.base_url.clone(),
    ));
    let resolver = Arc::new(RedirectResolver::new(registry.clone()));
    let auth = Arc::new(AuthService::new(
        token_repository,
        config.token_signing_secret.clone(),
    ));

    let state = AppState {
        registry,
        resolver,
        auth,
        links: link_repository,
        cache,
    };

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
