//! Shared application state injected into all Axum handlers.

use crate::service::BannerService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Banner service for all reads and mutations.
    pub banner_service: BannerService,
}

impl AppState {
    /// Wraps a service.
    #[must_use]
    pub fn new(banner_service: BannerService) -> Self {
        Self { banner_service }
    }
}
