//! Slug generation and validation.
//!
//! Random slugs are short enough to type and long enough that collisions
//! across realistic volumes are negligible but not zero. The generator never
//! checks uniqueness: the durable store's primary key is the only authority,
//! and a unique violation at insert time is an expected, retryable outcome.

use crate::error::AppError;
use serde_json::json;

/// URL-safe alphabet for generated slugs. 64 symbols, so a random byte
/// masked to 6 bits indexes it uniformly.
const SLUG_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Length of generated slugs.
const SLUG_LENGTH: usize = 6;

/// Custom slug shape limits.
pub const MIN_SLUG_LENGTH: usize = 3;
pub const MAX_SLUG_LENGTH: usize = 20;

/// Generates a random 6-character slug from the URL-safe alphabet.
///
/// Uses the operating system CSPRNG via `getrandom`. Pure generation with no
/// side effects and no uniqueness guarantee.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_slug() -> String {
    let mut buffer = [0u8; SLUG_LENGTH];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    buffer
        .iter()
        .map(|b| SLUG_ALPHABET[(b & 0x3f) as usize] as char)
        .collect()
}

/// Validates the shape of a user-provided custom slug.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters, digits, underscore, hyphen
///
/// Reserved-word filtering is a separate concern, see
/// [`crate::utils::reserved::is_reserved_slug`].
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if slug.len() < MIN_SLUG_LENGTH || slug.len() > MAX_SLUG_LENGTH {
        return Err(AppError::bad_request(
            "Slug must be 3-20 characters",
            json!({ "provided_length": slug.len() }),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(AppError::bad_request(
            "Slug can only contain letters, digits, underscores, and hyphens",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_slug_has_correct_length() {
        let slug = generate_slug();
        assert_eq!(slug.len(), 6);
    }

    #[test]
    fn test_generate_slug_url_safe_characters() {
        for _ in 0..100 {
            let slug = generate_slug();
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
                "unexpected character in {slug}"
            );
        }
    }

    #[test]
    fn test_generate_slug_produces_unique_slugs() {
        let mut slugs = HashSet::new();

        for _ in 0..1000 {
            slugs.insert(generate_slug());
        }

        assert_eq!(slugs.len(), 1000);
    }

    #[test]
    fn test_generated_slug_passes_custom_validation() {
        for _ in 0..100 {
            assert!(validate_custom_slug(&generate_slug()).is_ok());
        }
    }

    #[test]
    fn test_validate_minimum_length() {
        assert!(validate_custom_slug("abc").is_ok());
    }

    #[test]
    fn test_validate_maximum_length() {
        assert!(validate_custom_slug("a".repeat(20).as_str()).is_ok());
    }

    #[test]
    fn test_validate_too_short() {
        let err = validate_custom_slug("ab").unwrap_err();
        assert!(err.to_string().contains("3-20"));
    }

    #[test]
    fn test_validate_too_long() {
        assert!(validate_custom_slug("a".repeat(21).as_str()).is_err());
    }

    #[test]
    fn test_validate_mixed_case_allowed() {
        assert!(validate_custom_slug("My-Link_2024").is_ok());
    }

    #[test]
    fn test_validate_rejects_special_characters() {
        assert!(validate_custom_slug("my.link").is_err());
        assert!(validate_custom_slug("my link").is_err());
        assert!(validate_custom_slug("my/link").is_err());
        assert!(validate_custom_slug("liñk").is_err());
    }
}
