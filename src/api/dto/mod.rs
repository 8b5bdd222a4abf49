//! Data Transfer Objects for request/response serialization.

pub mod health;
pub mod links;
pub mod shorten;
