//! Shared application state injected into all handlers.

use std::sync::Arc;

use crate::application::services::{AuthService, LinkRegistry, RedirectResolver};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::cache::UrlCache;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<LinkRegistry>,
    pub resolver: Arc<RedirectResolver>,
    pub auth: Arc<AuthService>,
    /// Kept alongside the registry for the health endpoint's probe.
    pub links: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn UrlCache>,
}
