//! Destination URL validation.
//!
//! Stored URLs are kept exactly as submitted; this module only decides
//! whether a destination is acceptable at all.

use crate::error::AppError;
use serde_json::json;
use url::Url;

/// Validates that `input` is a well-formed absolute HTTP(S) URL.
///
/// # Rules
///
/// 1. Must parse as an absolute URL
/// 2. Scheme must be `http` or `https`; `javascript:`, `data:`, `file:` and
///    friends are rejected
/// 3. Must have a host
///
/// # Errors
///
/// Returns [`AppError::Validation`] describing the violated rule.
pub fn validate_long_url(input: &str) -> Result<(), AppError> {
    let url = Url::parse(input)
        .map_err(|e| AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() })))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::bad_request(
                "Only HTTP and HTTPS URLs are allowed",
                json!({ "scheme": other }),
            ));
        }
    }

    if url.host_str().is_none() {
        return Err(AppError::bad_request(
            "URL must have a host",
            json!({ "url": input }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_long_url("http://example.com").is_ok());
        assert!(validate_long_url("https://example.com/page?q=1#frag").is_ok());
    }

    #[test]
    fn test_rejects_relative_url() {
        assert!(validate_long_url("/just/a/path").is_err());
        assert!(validate_long_url("not-a-url").is_err());
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        assert!(validate_long_url("javascript:alert(1)").is_err());
        assert!(validate_long_url("data:text/html,hi").is_err());
        assert!(validate_long_url("file:///etc/passwd").is_err());
        assert!(validate_long_url("ftp://example.com/file").is_err());
    }
}
