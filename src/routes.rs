//! Top-level router composition.
//!
//! # Route Structure
//!
//! - `GET  /{slug}`              - Short link redirect (public)
//! - `GET  /healthz`             - Health check: durable store + cache (public)
//! - `POST /api/shorten`         - Create link, random slug (optional bearer)
//! - `/api/*` protected routes   - Custom slugs, listing, deletion (bearer)
//!
//! Registering `/api` and `/healthz` before the `/{slug}` catch-all is what
//! makes reserved paths pass through instead of being treated as slugs; the
//! reserved-word filter keeps custom slugs from ever claiming those names.

use crate::api;
use crate::api::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::api::middleware::{auth, tracing};
use crate::state::AppState;
use axum::routing::{get, post};
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let protected = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));

    let api_router = Router::new()
        .route("/shorten", post(shorten_handler))
        .merge(protected);

    let router = Router::new()
        .route("/healthz", get(health_handler))
        .nest("/api", api_router)
        .route("/{slug}", get(redirect_handler))
        .with_state(state)
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
