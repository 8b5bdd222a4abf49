//! Authentication and request processing middleware.

pub mod auth;
pub mod tracing;
