//! In-process banner store.
//!
//! [`MemoryBannerStore`] keeps both banner families in `HashMap`s behind
//! [`tokio::sync::RwLock`]s. It is used when persistence is disabled and
//! as the store in tests, where [`MemoryBannerStore::read_count`] exposes
//! how often the resolver actually reached the store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use tokio::sync::{Mutex, RwLock};

use super::{BannerFilter, BannerStore};
use crate::domain::{Banner, BannerId, LegacyBanner};
use crate::error::GatewayError;

/// Banner store backed by process memory.
///
/// Timestamps are truncated to microseconds (the Postgres resolution)
/// and are strictly increasing across inserts, so creation time always
/// reflects insertion order.
#[derive(Debug, Default)]
pub struct MemoryBannerStore {
    banners: RwLock<HashMap<BannerId, Banner>>,
    legacy: RwLock<HashMap<BannerId, LegacyBanner>>,
    last_stamp: Mutex<Option<DateTime<Utc>>>,
    reads: AtomicU64,
}

impl MemoryBannerStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of location reads served so far (promotional and legacy
    /// counted separately).
    #[must_use]
    pub fn read_count(&self) -> u64 {
        self.reads.load(Ordering::Relaxed)
    }

    /// Number of stored promotional banners.
    pub async fn len(&self) -> usize {
        self.banners.read().await.len()
    }

    /// Returns `true` if no promotional banner is stored.
    pub async fn is_empty(&self) -> bool {
        self.banners.read().await.is_empty()
    }

    async fn next_stamp(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let now = now.duration_trunc(Duration::microseconds(1)).unwrap_or(now);
        let mut last = self.last_stamp.lock().await;
        let stamp = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(stamp);
        stamp
    }
}

fn sort_for_listing(banners: &mut [Banner]) {
    banners.sort_by(|a, b| {
        a.location
            .cmp(&b.location)
            .then(a.banner_type.cmp(&b.banner_type))
            .then(a.order.cmp(&b.order))
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
}

#[async_trait]
impl BannerStore for MemoryBannerStore {
    async fn fetch_by_location(
        &self,
        location: Option<&str>,
        include_unscoped: bool,
    ) -> Result<Vec<Banner>, GatewayError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let map = self.banners.read().await;
        Ok(map
            .values()
            .filter(|b| match (b.location.as_deref(), location) {
                (None, _) => include_unscoped || location.is_none(),
                (Some(own), Some(wanted)) => own == wanted,
                (Some(_), None) => false,
            })
            .cloned()
            .collect())
    }

    async fn fetch_legacy_by_location(
        &self,
        location: Option<&str>,
    ) -> Result<Vec<LegacyBanner>, GatewayError> {
        self.reads.fetch_add(1, Ordering::Relaxed);
        let map = self.legacy.read().await;
        Ok(map
            .values()
            .filter(|b| b.location.as_deref() == location)
            .cloned()
            .collect())
    }

    async fn get(&self, id: BannerId) -> Result<Banner, GatewayError> {
        let map = self.banners.read().await;
        map.get(&id)
            .cloned()
            .ok_or(GatewayError::BannerNotFound(*id.as_uuid()))
    }

    async fn list(&self, filter: &BannerFilter) -> Result<Vec<Banner>, GatewayError> {
        let map = self.banners.read().await;
        let mut banners: Vec<Banner> = map.values().filter(|b| filter.matches(b)).cloned().collect();
        sort_for_listing(&mut banners);
        Ok(banners)
    }

    async fn insert(&self, mut banner: Banner) -> Result<Banner, GatewayError> {
        let stamp = self.next_stamp().await;
        banner.created_at = stamp;
        banner.updated_at = stamp;

        let mut map = self.banners.write().await;
        if map.contains_key(&banner.id) {
            return Err(GatewayError::InvalidRequest(format!(
                "banner {} already exists",
                banner.id
            )));
        }
        map.insert(banner.id, banner.clone());
        Ok(banner)
    }

    async fn update(&self, mut banner: Banner) -> Result<Banner, GatewayError> {
        let stamp = self.next_stamp().await;
        let mut map = self.banners.write().await;
        let stored = map
            .get_mut(&banner.id)
            .ok_or(GatewayError::BannerNotFound(*banner.id.as_uuid()))?;
        banner.created_at = stored.created_at;
        banner.updated_at = stamp;
        *stored = banner.clone();
        Ok(banner)
    }

    async fn delete(&self, id: BannerId) -> Result<Banner, GatewayError> {
        let mut map = self.banners.write().await;
        map.remove(&id)
            .ok_or(GatewayError::BannerNotFound(*id.as_uuid()))
    }

    async fn list_legacy(&self, location: Option<&str>) -> Result<Vec<LegacyBanner>, GatewayError> {
        let map = self.legacy.read().await;
        let mut rows: Vec<LegacyBanner> = map
            .values()
            .filter(|b| location.is_none_or(|l| b.location.as_deref() == Some(l)))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(rows)
    }

    async fn insert_legacy(&self, mut banner: LegacyBanner) -> Result<LegacyBanner, GatewayError> {
        let stamp = self.next_stamp().await;
        banner.created_at = stamp;
        banner.updated_at = stamp;

        let mut map = self.legacy.write().await;
        if map.contains_key(&banner.id) {
            return Err(GatewayError::InvalidRequest(format!(
                "home banner {} already exists",
                banner.id
            )));
        }
        map.insert(banner.id, banner.clone());
        Ok(banner)
    }

    async fn delete_legacy(&self, id: BannerId) -> Result<LegacyBanner, GatewayError> {
        let mut map = self.legacy.write().await;
        map.remove(&id)
            .ok_or(GatewayError::HomeBannerNotFound(*id.as_uuid()))
    }
}
