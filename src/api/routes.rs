//! API route configuration.

use crate::api::handlers::{delete_link_handler, list_links_handler, shorten_custom_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{delete, get, post},
};

/// Routes that require Bearer token authentication.
///
/// # Endpoints
///
/// - `POST   /shorten/custom` - Create a link under a caller-chosen slug
/// - `GET    /links`          - List the caller's links, newest first
/// - `DELETE /links/{slug}`   - Delete a link (owner only)
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten/custom", post(shorten_custom_handler))
        .route("/links", get(list_links_handler))
        .route("/links/{slug}", delete(delete_link_handler))
}
