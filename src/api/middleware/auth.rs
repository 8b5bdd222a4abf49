//! Bearer token authentication middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Authenticated owner identity, inserted into request extensions by
/// [`layer`] and read by protected handlers.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

/// Requires a valid `Authorization: Bearer <token>` header.
///
/// On success the resolved [`OwnerId`] is attached to the request for
/// downstream handlers.
///
/// # Errors
///
/// Returns 401 Unauthorized if the header is missing or malformed, or the
/// token is unknown or revoked.
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is missing or invalid" }),
            )
        })?;

    let owner_id = st.auth.authenticate(&token).await?;

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(OwnerId(owner_id));

    Ok(next.run(req).await)
}

/// Resolves the caller's identity when a bearer token is present.
///
/// Anonymous creation is allowed, so a missing header yields `None`; a
/// present-but-invalid token is still a hard 401 rather than a silent
/// downgrade to anonymous.
pub async fn maybe_owner(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(|raw| raw.strip_prefix("Bearer "))
        .ok_or_else(|| {
            AppError::unauthorized(
                "Unauthorized",
                json!({ "reason": "Authorization header is malformed" }),
            )
        })?;

    state.auth.authenticate(token).await.map(Some)
}
