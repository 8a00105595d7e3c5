//! Persistence layer: the banner store contract and its implementations.
//!
//! [`BannerStore`] is the only seam between the resolver/service and the
//! storage backend. [`PostgresBannerStore`] is used in production;
//! [`MemoryBannerStore`] backs tests and persistence-disabled runs.

pub mod memory;
pub mod models;
pub mod postgres;

use async_trait::async_trait;

use crate::domain::{Banner, BannerId, BannerType, LegacyBanner};
use crate::error::GatewayError;

pub use memory::MemoryBannerStore;
pub use postgres::PostgresBannerStore;

/// Filter for administrative banner listings. `None` fields match all.
#[derive(Debug, Clone, Default)]
pub struct BannerFilter {
    /// Exact location match.
    pub location: Option<String>,
    /// Exact type match.
    pub banner_type: Option<BannerType>,
}

impl BannerFilter {
    /// Returns `true` if `banner` passes the filter.
    #[must_use]
    pub fn matches(&self, banner: &Banner) -> bool {
        self.location
            .as_deref()
            .is_none_or(|l| banner.location.as_deref() == Some(l))
            && self.banner_type.is_none_or(|t| banner.banner_type == t)
    }
}

/// Storage for both banner families.
///
/// Read methods may return inactive or unordered rows; the resolver
/// filters and orders regardless. Every method reports backend failures
/// as [`GatewayError::PersistenceError`].
#[async_trait]
pub trait BannerStore: Send + Sync + std::fmt::Debug {
    /// Promotional banners placed at `location`, plus unscoped ones when
    /// `include_unscoped` is set. A `None` location yields only unscoped
    /// banners.
    async fn fetch_by_location(
        &self,
        location: Option<&str>,
        include_unscoped: bool,
    ) -> Result<Vec<Banner>, GatewayError>;

    /// Legacy banners placed at `location` (exact match; `None` matches
    /// unscoped rows).
    async fn fetch_legacy_by_location(
        &self,
        location: Option<&str>,
    ) -> Result<Vec<LegacyBanner>, GatewayError>;

    /// Returns one promotional banner.
    ///
    /// Fails with [`GatewayError::BannerNotFound`] if it does not exist.
    async fn get(&self, id: BannerId) -> Result<Banner, GatewayError>;

    /// Lists promotional banners (active or not) ordered by location,
    /// type, order, and creation time.
    async fn list(&self, filter: &BannerFilter) -> Result<Vec<Banner>, GatewayError>;

    /// Persists a new promotional banner.
    async fn insert(&self, banner: Banner) -> Result<Banner, GatewayError>;

    /// Replaces a stored promotional banner, keeping `created_at`.
    ///
    /// Fails with [`GatewayError::BannerNotFound`] if it does not exist.
    async fn update(&self, banner: Banner) -> Result<Banner, GatewayError>;

    /// Deletes a promotional banner, returning the removed record.
    ///
    /// Fails with [`GatewayError::BannerNotFound`] if it does not exist.
    async fn delete(&self, id: BannerId) -> Result<Banner, GatewayError>;

    /// Lists legacy banners, optionally restricted to one location.
    async fn list_legacy(&self, location: Option<&str>) -> Result<Vec<LegacyBanner>, GatewayError>;

    /// Persists a new legacy banner.
    async fn insert_legacy(&self, banner: LegacyBanner) -> Result<LegacyBanner, GatewayError>;

    /// Deletes a legacy banner, returning the removed record.
    ///
    /// Fails with [`GatewayError::HomeBannerNotFound`] if it does not exist.
    async fn delete_legacy(&self, id: BannerId) -> Result<LegacyBanner, GatewayError>;
}
