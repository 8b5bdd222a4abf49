//! Handlers for owner link management (list, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::dto::links::{DeleteResponse, LinkSummary};
use crate::api::middleware::auth::OwnerId;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the caller's links, newest first.
///
/// # Endpoint
///
/// `GET /api/links` (bearer token required)
///
/// Pagination, sorting and search belong to the UI layer; this endpoint
/// returns the full owned set.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner)): Extension<OwnerId>,
) -> Result<Json<Vec<LinkSummary>>, AppError> {
    let links = state.registry.list_for_owner(&owner).await?;

    let summaries = links
        .into_iter()
        .map(|link| {
            let short_url = state.registry.short_url(&link.slug);
            LinkSummary::from_link(link, short_url)
        })
        .collect();

    Ok(Json(summaries))
}

/// Deletes one of the caller's links.
///
/// # Endpoint
///
/// `DELETE /api/links/{slug}` (bearer token required)
///
/// Deletion is irreversible and evicts the slug's cache entry so a cached
/// URL never outlives its record.
///
/// # Errors
///
/// - 404 if the slug does not exist
/// - 403 if the caller does not own the link
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(OwnerId(owner)): Extension<OwnerId>,
    Path(slug): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    state.registry.delete(&slug, &owner).await?;

    Ok(Json(DeleteResponse { success: true }))
}
