//! Service layer: business logic orchestration.
//!
//! [`BannerService`] puts the read-through cache in front of the
//! [`crate::resolver::BannerResolver`] and keeps the cache consistent
//! with every banner mutation.

pub mod banner_service;

pub use banner_service::BannerService;
