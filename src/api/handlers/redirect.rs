//! Handler for short link redirects.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::json;

use crate::application::services::RedirectOutcome;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_ip::client_origin;

/// Redirects a slug to its destination URL.
///
/// # Endpoint
///
/// `GET /{slug}`
///
/// The application's own routes (`/api`, `/healthz`, ...) are registered
/// ahead of this catch-all, so reserved paths never arrive here.
///
/// # Responses
///
/// - **307 Temporary Redirect** to the destination URL; the visit counter is
///   incremented atomically in the durable store
/// - **404 Not Found** for unknown slugs
/// - **429 Too Many Requests** with `Retry-After` when the origin exceeds
///   the redirect rate limit
/// - **503** if the rate limiter's counter store is unreachable (fail closed)
pub async fn redirect_handler(
    Path(slug): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let origin = client_origin(&headers);

    let response = match state.resolver.resolve(&slug, &origin).await? {
        RedirectOutcome::Redirect(long_url) => Redirect::temporary(&long_url).into_response(),
        RedirectOutcome::NotFound => {
            AppError::not_found("Short link not found", json!({ "slug": slug })).into_response()
        }
        RedirectOutcome::RateLimited { retry_after } => {
            AppError::rate_limited(retry_after).into_response()
        }
    };

    Ok(response)
}
