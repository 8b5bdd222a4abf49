//! Handlers for link creation endpoints.

use axum::{Json, extract::State, http::HeaderMap};
use validator::Validate;

use crate::api::dto::shorten::{CreateCustomLinkRequest, CreateLinkRequest, LinkCreatedResponse};
use crate::api::middleware::auth::{self, OwnerId};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::{client_origin, create_rate_key};
use axum::Extension;

/// Creates a short link under a generated random slug.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// Authentication is optional: with a valid bearer token the link is owned
/// by the caller, otherwise it is anonymous (and rate limiting falls back to
/// network origin).
///
/// # Errors
///
/// - 400 for a malformed destination URL
/// - 401 for a present-but-invalid bearer token
/// - 409 on a (rare) generated-slug collision; clients retry the request
/// - 429 when the creation rate limit is exceeded
pub async fn shorten_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<LinkCreatedResponse>, AppError> {
    payload.validate()?;

    let owner = auth::maybe_owner(&state, &headers).await?;
    let origin = client_origin(&headers);
    let rate_key = create_rate_key(owner.as_deref(), &origin);

    let created = state
        .registry
        .create_random(payload.long_url, owner, &rate_key)
        .await?;

    Ok(Json(LinkCreatedResponse {
        slug: created.slug,
        short_url: created.short_url,
    }))
}

/// Creates a short link under a caller-chosen slug.
///
/// # Endpoint
///
/// `POST /api/shorten/custom` (bearer token required)
///
/// # Errors
///
/// - 400 for a malformed URL, malformed slug, or reserved slug
/// - 409 if the slug is already taken (including check-then-insert races)
/// - 429 when the owner's creation rate limit is exceeded
pub async fn shorten_custom_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner)): Extension<OwnerId>,
    Json(payload): Json<CreateCustomLinkRequest>,
) -> Result<Json<LinkCreatedResponse>, AppError> {
    payload.validate()?;

    let rate_key = create_rate_key(Some(&owner), "");

    let created = state
        .registry
        .create_custom(payload.long_url, payload.slug, owner, &rate_key)
        .await?;

    Ok(Json(LinkCreatedResponse {
        slug: created.slug,
        short_url: created.short_url,
    }))
}
