//! Repository traits abstracting the durable store.

mod link_repository;
mod token_repository;

pub use link_repository::LinkRepository;
pub use token_repository::TokenRepository;

#[cfg(test)]
pub use link_repository::MockLinkRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
