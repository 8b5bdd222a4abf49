//! DTOs for link management endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::entities::ShortLink;

/// A link as presented in the owner's listing.
#[derive(Debug, Serialize)]
pub struct LinkSummary {
    pub slug: String,
    pub long_url: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub visits: i64,
}

impl LinkSummary {
    pub fn from_link(link: ShortLink, short_url: String) -> Self {
        Self {
            slug: link.slug,
            long_url: link.long_url,
            short_url,
            created_at: link.created_at,
            visits: link.visits,
        }
    }
}

/// Response for a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}
