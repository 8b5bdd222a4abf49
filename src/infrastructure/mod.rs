//! Infrastructure layer: database, cache, and counter-store integrations.

pub mod cache;
pub mod persistence;
pub mod ratelimit;
