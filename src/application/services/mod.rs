//! Application services.

mod auth_service;
mod link_registry;
mod redirect_resolver;

pub use auth_service::{AuthService, hash_token};
pub use link_registry::{CreatedLink, LinkRegistry};
pub use redirect_resolver::{RedirectOutcome, RedirectResolver};
