//! DTOs for link creation endpoints.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Compiled regex for custom slug validation.
///
/// The registry re-validates; this just rejects obviously malformed input at
/// the edge.
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,20}$").unwrap());

/// Request to shorten a URL under a generated slug.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The destination URL (must be a valid absolute URL).
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,
}

/// Request to shorten a URL under a caller-chosen slug.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCustomLinkRequest {
    #[validate(url(message = "Invalid URL format"))]
    pub long_url: String,

    /// Desired slug: 3-20 characters from `[A-Za-z0-9_-]`.
    #[validate(regex(path = "*SLUG_REGEX", message = "Invalid slug"))]
    pub slug: String,
}

/// Response for both creation endpoints.
#[derive(Debug, Serialize)]
pub struct LinkCreatedResponse {
    pub slug: String,
    pub short_url: String,
}
