//! Banner resolution: which active banners a placement location shows.
//!
//! [`BannerResolver`] reads both banner families from the store, adapts
//! legacy rows into carousel banners, drops inactive banners, and groups
//! the rest by [`BannerType`] in ascending `order`. It knows nothing
//! about caching; [`crate::service::BannerService`] layers the cache on top.

use std::sync::Arc;

use crate::domain::{Banner, ResolvedBanners};
use crate::error::GatewayError;
use crate::persistence::BannerStore;

/// Switches that shape which records take part in a resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Include unscoped (`location = NULL`) banners in every location.
    pub include_unscoped: bool,
    /// Include adapted `home_banners` rows in the carousel group.
    pub include_legacy: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            include_unscoped: true,
            include_legacy: true,
        }
    }
}

/// Resolves a placement location into grouped, ordered, active banners.
#[derive(Debug, Clone)]
pub struct BannerResolver {
    store: Arc<dyn BannerStore>,
    options: ResolverOptions,
}

impl BannerResolver {
    /// Creates a resolver over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn BannerStore>, options: ResolverOptions) -> Self {
        Self { store, options }
    }

    /// Returns the options this resolver was built with.
    #[must_use]
    pub const fn options(&self) -> ResolverOptions {
        self.options
    }

    /// Resolves `location` (already normalized; `None` is the unscoped
    /// slot).
    ///
    /// A location without banners yields five empty groups.
    ///
    /// # Errors
    ///
    /// Propagates any store failure unchanged.
    pub async fn resolve(&self, location: Option<&str>) -> Result<ResolvedBanners, GatewayError> {
        let mut banners = self
            .store
            .fetch_by_location(location, self.options.include_unscoped)
            .await?;

        if self.options.include_legacy {
            let legacy = self.store.fetch_legacy_by_location(location).await?;
            banners.extend(legacy.into_iter().map(Banner::from));
        }

        let resolved = group_active(banners);
        tracing::debug!(
            location = location.unwrap_or(""),
            banners = resolved.len(),
            "resolved banners"
        );
        Ok(resolved)
    }
}

/// Drops inactive banners, partitions by type, and orders each group by
/// (`order`, `created_at`, `id`).
#[must_use]
pub fn group_active(banners: Vec<Banner>) -> ResolvedBanners {
    let mut resolved = ResolvedBanners::default();
    for banner in banners.into_iter().filter(|b| b.is_active) {
        resolved.group_mut(banner.banner_type).push(banner);
    }
    for banner_type in crate::domain::BannerType::ALL {
        resolved.group_mut(banner_type).sort_by(|a, b| {
            a.order
                .cmp(&b.order)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
    }
    resolved
}
