//! ShortLink entity: the mapping between a slug and a destination URL.

use chrono::{DateTime, Utc};

/// A short link record.
///
/// `slug`, `long_url`, `created_by` and `created_at` are immutable once the
/// record exists; `visits` only ever grows, and only through the durable
/// store's atomic increment on the redirect path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortLink {
    pub slug: String,
    pub long_url: String,
    /// Owner identity; `None` for anonymously created links. Ownership is
    /// exclusive: only the owner may delete, and an anonymous link has no
    /// owner at all.
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub visits: i64,
}

impl ShortLink {
    /// Returns true if `requester` owns this link.
    pub fn is_owned_by(&self, requester: &str) -> bool {
        self.created_by.as_deref() == Some(requester)
    }
}

/// Input data for creating a short link.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub slug: String,
    pub long_url: String,
    pub created_by: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(created_by: Option<&str>) -> ShortLink {
        ShortLink {
            slug: "ab12Cd".to_string(),
            long_url: "https://example.com/page".to_string(),
            created_by: created_by.map(str::to_string),
            created_at: Utc::now(),
            visits: 0,
        }
    }

    #[test]
    fn test_owned_link() {
        let link = link(Some("owner-1"));
        assert!(link.is_owned_by("owner-1"));
        assert!(!link.is_owned_by("owner-2"));
    }

    #[test]
    fn test_anonymous_link_has_no_owner() {
        let link = link(None);
        assert!(!link.is_owned_by("owner-1"));
    }
}
