//! Reserved-word filter for custom slugs.
//!
//! These identifiers collide with the application's own routes, so accepting
//! them as slugs would shadow the management endpoints. The check is
//! case-insensitive: `API` and `Dashboard` are just as reserved as their
//! lowercase forms.

/// Slugs that can never be claimed.
const RESERVED_SLUGS: &[&str] = &[
    // Application routes
    "api",
    "auth",
    "login",
    "signup",
    "dashboard",
    "profile",
    "settings",
    "404",
    // Service endpoints
    "healthz",
    "links",
    "shorten",
    // Well-known static files
    "favicon.ico",
    "robots.txt",
];

/// Case-insensitive membership test against the reserved set.
///
/// Must be checked before accepting any custom slug. Generated random slugs
/// are also run through this check defensively, even though the generator's
/// alphabet and length make collisions with the reserved set all but
/// unreachable.
pub fn is_reserved_slug(candidate: &str) -> bool {
    let lowered = candidate.to_ascii_lowercase();
    RESERVED_SLUGS.contains(&lowered.as_str())
}
