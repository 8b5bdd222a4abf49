//! Utility functions shared across the application:
//!
//! - [`slug`] - Random slug generation and custom slug validation
//! - [`reserved`] - Reserved-word filter for application routes
//! - [`url_check`] - Destination URL validation
//! - [`client_ip`] - Caller identity extraction for rate limiting

pub mod client_ip;
pub mod reserved;
pub mod slug;
pub mod url_check;
