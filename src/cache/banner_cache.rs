//! Server-side cache of resolved banners keyed by placement location.

use std::sync::Arc;
use std::time::Duration;

use super::TtlCache;
use crate::domain::ResolvedBanners;

/// Key under which the unscoped slot is cached.
const UNSCOPED_KEY: &str = "";

/// Resolution results per placement location.
///
/// The cache never evicts on its own beyond TTL expiry; every banner
/// mutation path must call [`BannerCache::invalidate`] (or
/// [`BannerCache::invalidate_all`]) before reporting success.
#[derive(Debug)]
pub struct BannerCache {
    inner: TtlCache<String, ResolvedBanners>,
}

impl BannerCache {
    /// Creates an empty cache. A zero `ttl` disables caching.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: TtlCache::new(ttl),
        }
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.inner.ttl()
    }

    /// Cached result for a normalized location.
    pub async fn get(&self, location: Option<&str>) -> Option<Arc<ResolvedBanners>> {
        self.inner.get(key(location)).await
    }

    /// Invalidation generation to pair with [`BannerCache::insert_resolved`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation()
    }

    /// Caches a resolution that started at `generation`, unless a
    /// mutation invalidated the cache in the meantime.
    pub async fn insert_resolved(
        &self,
        location: Option<&str>,
        resolved: ResolvedBanners,
        generation: u64,
    ) -> Arc<ResolvedBanners> {
        self.inner
            .insert_if_current(key(location).to_string(), resolved, generation)
            .await
    }

    /// Evicts one location. Returns `true` if an entry was present.
    pub async fn invalidate(&self, location: Option<&str>) -> bool {
        self.inner.invalidate(key(location)).await
    }

    /// Evicts every location. Returns how many entries were dropped.
    pub async fn invalidate_all(&self) -> usize {
        self.inner.invalidate_all().await
    }

    /// Drops expired entries. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.inner.purge_expired().await
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    /// Returns `true` if nothing is cached.
    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }
}

fn key(location: Option<&str>) -> &str {
    location.unwrap_or(UNSCOPED_KEY)
}
