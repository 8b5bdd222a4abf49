//! Caller identity extraction for rate limiting.
//!
//! Rate-limit identifiers are namespaced per endpoint category so a burst of
//! redirects never starves an owner's ability to create links, and vice
//! versa.

use axum::http::HeaderMap;

/// Bucket for requests whose network origin cannot be determined.
const ANONYMOUS_ORIGIN: &str = "anonymous";

/// Derives the caller's network origin from forwarding headers.
///
/// Takes the first entry of `X-Forwarded-For`, then `X-Real-IP`, then a
/// shared anonymous bucket. The service is expected to run behind a reverse
/// proxy that sets these headers; direct traffic all lands in the anonymous
/// bucket and shares one rate window.
pub fn client_origin(headers: &HeaderMap) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok())
        && let Some(first) = forwarded.split(',').next()
    {
        let first = first.trim();
        if !first.is_empty() {
            return first.to_string();
        }
    }

    if let Some(real_ip) = headers.get("x-real-ip").and_then(|v| v.to_str().ok()) {
        let real_ip = real_ip.trim();
        if !real_ip.is_empty() {
            return real_ip.to_string();
        }
    }

    ANONYMOUS_ORIGIN.to_string()
}

/// Rate-limit key for creation traffic: owner identity when authenticated,
/// otherwise network origin.
pub fn create_rate_key(owner: Option<&str>, origin: &str) -> String {
    match owner {
        Some(owner) => format!("create:{owner}"),
        None => format!("create:ip_{origin}"),
    }
}

/// Rate-limit key for redirect traffic.
///
/// Redirect traffic is public and always keyed by origin, never by identity,
/// even when the visitor happens to be authenticated.
pub fn redirect_rate_key(origin: &str) -> String {
    format!("redirect:{origin}")
}
