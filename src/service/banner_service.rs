//! Banner service: read-through resolution and cache-invalidating
//! mutations.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::cache::BannerCache;
use crate::domain::banner::normalize_location;
use crate::domain::{
    Banner, BannerId, BannerPatch, LegacyBanner, NewBanner, NewLegacyBanner, ResolvedBanners,
};
use crate::error::GatewayError;
use crate::persistence::{BannerFilter, BannerStore};
use crate::resolver::{BannerResolver, ResolverOptions};

/// Orchestration layer for all banner operations.
///
/// Reads go cache → resolver → store. Every mutation follows the
/// pattern: validate → write to the store → evict affected cache
/// entries → return. Eviction happens before the call returns, and a
/// read that resolved before the eviction does not write its result
/// back, so a read issued after a successful write never observes the
/// old data. Updates are read-modify-write without a store-level lock;
/// two concurrent patches of one banner resolve last-write-wins.
#[derive(Debug, Clone)]
pub struct BannerService {
    store: Arc<dyn BannerStore>,
    resolver: BannerResolver,
    cache: Arc<BannerCache>,
}

impl BannerService {
    /// Creates a new `BannerService`. A zero `cache_ttl` disables caching.
    #[must_use]
    pub fn new(store: Arc<dyn BannerStore>, options: ResolverOptions, cache_ttl: Duration) -> Self {
        let resolver = BannerResolver::new(Arc::clone(&store), options);
        Self {
            store,
            resolver,
            cache: Arc::new(BannerCache::new(cache_ttl)),
        }
    }

    /// Returns a reference to the inner [`BannerCache`].
    #[must_use]
    pub fn cache(&self) -> &Arc<BannerCache> {
        &self.cache
    }

    /// Active banners for `location`, grouped by type.
    ///
    /// The location is trimmed; blank or absent means the unscoped slot.
    /// Within the cache TTL repeated calls do not reach the store.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the store fails on a
    /// cache miss. Failures are never cached.
    pub async fn banners_for_location(
        &self,
        location: Option<&str>,
    ) -> Result<Arc<ResolvedBanners>, GatewayError> {
        let location = normalize_location(location);
        let location = location.as_deref();

        if let Some(hit) = self.cache.get(location).await {
            tracing::debug!(location = location.unwrap_or(""), "banner cache hit");
            return Ok(hit);
        }

        tracing::debug!(location = location.unwrap_or(""), "banner cache miss");
        let generation = self.cache.generation();
        let resolved = self.resolver.resolve(location).await.inspect_err(|e| {
            tracing::warn!(location = location.unwrap_or(""), error = %e, "banner resolution failed");
        })?;
        Ok(self
            .cache
            .insert_resolved(location, resolved, generation)
            .await)
    }

    /// Lists promotional banners (active or not) for administration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn list_banners(&self, filter: &BannerFilter) -> Result<Vec<Banner>, GatewayError> {
        self.store.list(filter).await
    }

    /// Returns one promotional banner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BannerNotFound`] if it does not exist.
    pub async fn get_banner(&self, id: BannerId) -> Result<Banner, GatewayError> {
        self.store.get(id).await
    }

    /// Creates a promotional banner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the banner fails
    /// validation, or a store error.
    pub async fn create_banner(&self, new: NewBanner) -> Result<Banner, GatewayError> {
        let banner = new.into_banner(Utc::now());
        banner.validate()?;

        let banner = self.store.insert(banner).await?;
        self.invalidate_locations(&[banner.location.as_deref()]).await;

        tracing::info!(
            banner_id = %banner.id,
            banner_type = %banner.banner_type,
            location = banner.location.as_deref().unwrap_or(""),
            "banner created"
        );
        Ok(banner)
    }

    /// Applies a partial update to a promotional banner.
    ///
    /// Both the old and the new location are evicted. The current record
    /// is read, patched, and written back as a whole, so concurrent
    /// patches of the same banner are last-write-wins rather than merged.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BannerNotFound`] if it does not exist,
    /// [`GatewayError::InvalidRequest`] if the result fails validation,
    /// or a store error.
    pub async fn update_banner(
        &self,
        id: BannerId,
        patch: BannerPatch,
    ) -> Result<Banner, GatewayError> {
        let current = self.store.get(id).await?;
        let old_location = current.location.clone();

        let mut next = current;
        patch.apply(&mut next);
        next.validate()?;

        let banner = self.store.update(next).await?;
        self.invalidate_locations(&[old_location.as_deref(), banner.location.as_deref()])
            .await;

        tracing::info!(
            banner_id = %banner.id,
            is_active = banner.is_active,
            location = banner.location.as_deref().unwrap_or(""),
            "banner updated"
        );
        Ok(banner)
    }

    /// Activates or deactivates a promotional banner. Deactivation is a
    /// soft state change; the record stays in the store.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BannerNotFound`] if it does not exist, or
    /// a store error.
    pub async fn set_active(&self, id: BannerId, is_active: bool) -> Result<Banner, GatewayError> {
        self.update_banner(id, BannerPatch::activation(is_active))
            .await
    }

    /// Deletes a promotional banner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::BannerNotFound`] if it does not exist, or
    /// a store error.
    pub async fn delete_banner(&self, id: BannerId) -> Result<Banner, GatewayError> {
        let banner = self.store.delete(id).await?;
        self.invalidate_locations(&[banner.location.as_deref()]).await;

        tracing::info!(banner_id = %banner.id, "banner deleted");
        Ok(banner)
    }

    /// Lists legacy home banners.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] on store failure.
    pub async fn list_legacy_banners(
        &self,
        location: Option<&str>,
    ) -> Result<Vec<LegacyBanner>, GatewayError> {
        let location = normalize_location(location);
        self.store.list_legacy(location.as_deref()).await
    }

    /// Creates a legacy home banner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the title or image URL
    /// is blank, or a store error.
    pub async fn create_legacy_banner(
        &self,
        new: NewLegacyBanner,
    ) -> Result<LegacyBanner, GatewayError> {
        let banner = new.into_legacy(Utc::now())?;
        let banner = self.store.insert_legacy(banner).await?;
        self.invalidate_locations(&[banner.location.as_deref()]).await;

        tracing::info!(banner_id = %banner.id, "home banner created");
        Ok(banner)
    }

    /// Deletes a legacy home banner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::HomeBannerNotFound`] if it does not exist,
    /// or a store error.
    pub async fn delete_legacy_banner(&self, id: BannerId) -> Result<LegacyBanner, GatewayError> {
        let banner = self.store.delete_legacy(id).await?;
        self.invalidate_locations(&[banner.location.as_deref()]).await;

        tracing::info!(banner_id = %banner.id, "home banner deleted");
        Ok(banner)
    }

    /// Evicts one location, or the whole cache when `location` is `None`.
    /// Returns the number of entries dropped.
    pub async fn invalidate(&self, location: Option<&str>) -> usize {
        let dropped = match normalize_location(location) {
            Some(location) => usize::from(self.cache.invalidate(Some(location.as_str())).await),
            None => self.cache.invalidate_all().await,
        };
        tracing::info!(
            location = location.unwrap_or("*"),
            dropped,
            "banner cache invalidated"
        );
        dropped
    }

    /// Drops expired cache entries.
    pub async fn purge_expired(&self) -> usize {
        self.cache.purge_expired().await
    }

    /// Evicts every cache entry a write at `locations` can affect: each
    /// location and the unscoped slot, or everything when an unscoped
    /// banner changed and unscoped banners appear in every location.
    async fn invalidate_locations(&self, locations: &[Option<&str>]) {
        if self.resolver.options().include_unscoped && locations.iter().any(Option::is_none) {
            self.cache.invalidate_all().await;
            return;
        }
        for location in locations.iter().flatten().copied() {
            self.cache.invalidate(Some(location)).await;
        }
        self.cache.invalidate(None).await;
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::BannerType;
    use crate::persistence::MemoryBannerStore;

    const TTL: Duration = Duration::from_secs(300);

    fn new_banner(location: Option<&str>, banner_type: BannerType, order: i32) -> NewBanner {
        NewBanner {
            title: format!("{banner_type} #{order}"),
            description: "promo".to_string(),
            banner_type,
            media: Vec::new(),
            cta_label: None,
            cta_link: None,
            location: location.map(str::to_string),
            is_active: true,
            order,
        }
    }

    fn make_service() -> (BannerService, Arc<MemoryBannerStore>) {
        let store = Arc::new(MemoryBannerStore::new());
        let dyn_store: Arc<dyn BannerStore> = Arc::clone(&store) as Arc<dyn BannerStore>;
        (
            BannerService::new(dyn_store, ResolverOptions::default(), TTL),
            store,
        )
    }

    /// Store whose reads always fail.
    #[derive(Debug)]
    struct UnavailableStore;

    #[async_trait]
    impl BannerStore for UnavailableStore {
        async fn fetch_by_location(
            &self,
            _: Option<&str>,
            _: bool,
        ) -> Result<Vec<Banner>, GatewayError> {
            Err(GatewayError::PersistenceError("connection refused".into()))
        }
        async fn fetch_legacy_by_location(
            &self,
            _: Option<&str>,
        ) -> Result<Vec<LegacyBanner>, GatewayError> {
            Err(GatewayError::PersistenceError("connection refused".into()))
        }
        async fn get(&self, id: BannerId) -> Result<Banner, GatewayError> {
            Err(GatewayError::BannerNotFound(*id.as_uuid()))
        }
        async fn list(&self, _: &BannerFilter) -> Result<Vec<Banner>, GatewayError> {
            Ok(Vec::new())
        }
        async fn insert(&self, banner: Banner) -> Result<Banner, GatewayError> {
            Ok(banner)
        }
        async fn update(&self, banner: Banner) -> Result<Banner, GatewayError> {
            Ok(banner)
        }
        async fn delete(&self, id: BannerId) -> Result<Banner, GatewayError> {
            Err(GatewayError::BannerNotFound(*id.as_uuid()))
        }
        async fn list_legacy(&self, _: Option<&str>) -> Result<Vec<LegacyBanner>, GatewayError> {
            Ok(Vec::new())
        }
        async fn insert_legacy(&self, banner: LegacyBanner) -> Result<LegacyBanner, GatewayError> {
            Ok(banner)
        }
        async fn delete_legacy(&self, id: BannerId) -> Result<LegacyBanner, GatewayError> {
            Err(GatewayError::HomeBannerNotFound(*id.as_uuid()))
        }
    }

    /// Store whose first promotional read takes its snapshot and then
    /// waits for `release` before returning.
    #[derive(Debug)]
    struct ParkedStore {
        inner: MemoryBannerStore,
        armed: std::sync::atomic::AtomicBool,
        parked: tokio::sync::Notify,
        release: tokio::sync::Notify,
    }

    #[async_trait]
    impl BannerStore for ParkedStore {
        async fn fetch_by_location(
            &self,
            location: Option<&str>,
            include_unscoped: bool,
        ) -> Result<Vec<Banner>, GatewayError> {
            let snapshot = self.inner.fetch_by_location(location, include_unscoped).await;
            if self.armed.swap(false, std::sync::atomic::Ordering::SeqCst) {
                self.parked.notify_one();
                self.release.notified().await;
            }
            snapshot
        }
        async fn fetch_legacy_by_location(
            &self,
            location: Option<&str>,
        ) -> Result<Vec<LegacyBanner>, GatewayError> {
            self.inner.fetch_legacy_by_location(location).await
        }
        async fn get(&self, id: BannerId) -> Result<Banner, GatewayError> {
            self.inner.get(id).await
        }
        async fn list(&self, filter: &BannerFilter) -> Result<Vec<Banner>, GatewayError> {
            self.inner.list(filter).await
        }
        async fn insert(&self, banner: Banner) -> Result<Banner, GatewayError> {
            self.inner.insert(banner).await
        }
        async fn update(&self, banner: Banner) -> Result<Banner, GatewayError> {
            self.inner.update(banner).await
        }
        async fn delete(&self, id: BannerId) -> Result<Banner, GatewayError> {
            self.inner.delete(id).await
        }
        async fn list_legacy(&self, location: Option<&str>) -> Result<Vec<LegacyBanner>, GatewayError> {
            self.inner.list_legacy(location).await
        }
        async fn insert_legacy(&self, banner: LegacyBanner) -> Result<LegacyBanner, GatewayError> {
            self.inner.insert_legacy(banner).await
        }
        async fn delete_legacy(&self, id: BannerId) -> Result<LegacyBanner, GatewayError> {
            self.inner.delete_legacy(id).await
        }
    }

    #[tokio::test]
    async fn read_racing_a_write_does_not_repopulate_stale_data() {
        let store = Arc::new(ParkedStore {
            inner: MemoryBannerStore::new(),
            armed: std::sync::atomic::AtomicBool::new(true),
            parked: tokio::sync::Notify::new(),
            release: tokio::sync::Notify::new(),
        });
        let dyn_store: Arc<dyn BannerStore> = Arc::clone(&store) as Arc<dyn BannerStore>;
        let service = BannerService::new(dyn_store, ResolverOptions::default(), TTL);

        let reader = service.clone();
        let racing_read =
            tokio::spawn(async move { reader.banners_for_location(Some("home")).await });
        store.parked.notified().await;

        let created = service
            .create_banner(new_banner(Some("home"), BannerType::Type1, 1))
            .await;
        assert!(created.is_ok());

        store.release.notify_one();
        let Ok(stale) = racing_read.await else {
            panic!("reader task failed");
        };
        assert_eq!(stale.map(|r| r.type1.len()).ok(), Some(0));
        assert!(service.cache().is_empty().await);

        let fresh = service.banners_for_location(Some("home")).await;
        assert_eq!(fresh.map(|r| r.type1.len()).ok(), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn second_read_within_ttl_skips_store() {
        let (service, store) = make_service();
        let _ = service
            .create_banner(new_banner(Some("home"), BannerType::Carousel, 1))
            .await;

        let first = service.banners_for_location(Some("home")).await;
        let reads_after_first = store.read_count();
        assert!(reads_after_first > 0);

        let second = service.banners_for_location(Some("home")).await;
        assert_eq!(store.read_count(), reads_after_first);
        assert_eq!(first.ok(), second.ok());

        tokio::time::advance(TTL + Duration::from_secs(1)).await;
        let _ = service.banners_for_location(Some("home")).await;
        assert!(store.read_count() > reads_after_first);
    }

    #[tokio::test]
    async fn location_is_trimmed_before_lookup() {
        let (service, store) = make_service();
        let _ = service.banners_for_location(Some("home")).await;
        let reads = store.read_count();
        let _ = service.banners_for_location(Some("  home ")).await;
        assert_eq!(store.read_count(), reads);
    }

    #[tokio::test]
    async fn store_failure_propagates_and_is_not_cached() {
        let service = BannerService::new(Arc::new(UnavailableStore), ResolverOptions::default(), TTL);
        let result = service.banners_for_location(Some("home")).await;
        assert!(matches!(result, Err(GatewayError::PersistenceError(_))));
        assert!(service.cache().is_empty().await);
    }

    #[tokio::test]
    async fn create_evicts_location_synchronously() {
        let (service, _) = make_service();
        let before = service.banners_for_location(Some("home")).await;
        assert_eq!(before.map(|r| r.is_empty()).ok(), Some(true));

        let _ = service
            .create_banner(new_banner(Some("home"), BannerType::Type1, 1))
            .await;
        let after = service.banners_for_location(Some("home")).await;
        assert_eq!(after.map(|r| r.type1.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn deactivate_hides_banner_immediately() {
        let (service, store) = make_service();
        let Ok(banner) = service
            .create_banner(new_banner(Some("home"), BannerType::Type3, 2))
            .await
        else {
            panic!("create failed");
        };
        let visible = service.banners_for_location(Some("home")).await;
        assert_eq!(visible.map(|r| r.type3.len()).ok(), Some(1));

        let Ok(updated) = service.set_active(banner.id, false).await else {
            panic!("deactivate failed");
        };
        assert!(!updated.is_active);
        assert_eq!(store.len().await, 1);

        let hidden = service.banners_for_location(Some("home")).await;
        assert_eq!(hidden.map(|r| r.type3.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn moving_a_banner_evicts_both_locations() {
        let (service, _) = make_service();
        let Ok(banner) = service
            .create_banner(new_banner(Some("home"), BannerType::Type2, 1))
            .await
        else {
            panic!("create failed");
        };
        let _ = service.banners_for_location(Some("home")).await;
        let _ = service.banners_for_location(Some("cart")).await;

        let patch = BannerPatch {
            location: Some(Some("cart".to_string())),
            ..BannerPatch::default()
        };
        let _ = service.update_banner(banner.id, patch).await;

        let home = service.banners_for_location(Some("home")).await;
        assert_eq!(home.map(|r| r.type2.len()).ok(), Some(0));
        let cart = service.banners_for_location(Some("cart")).await;
        assert_eq!(cart.map(|r| r.type2.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn unscoped_write_clears_every_location() {
        let (service, _) = make_service();
        let _ = service.banners_for_location(Some("home")).await;
        let _ = service.banners_for_location(Some("cart")).await;
        assert_eq!(service.cache().len().await, 2);

        let _ = service
            .create_banner(new_banner(None, BannerType::Type4, 1))
            .await;
        assert!(service.cache().is_empty().await);

        let home = service.banners_for_location(Some("home")).await;
        assert_eq!(home.map(|r| r.type4.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn invalid_banner_is_rejected_before_store() {
        let (service, store) = make_service();
        let mut input = new_banner(Some("home"), BannerType::Type1, 1);
        input.cta_label = Some("Shop".to_string());
        let result = service.create_banner(input).await;
        assert!(matches!(result, Err(GatewayError::InvalidRequest(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn delete_missing_banner_is_not_found() {
        let (service, _) = make_service();
        let result = service.delete_banner(BannerId::new()).await;
        assert!(matches!(result, Err(GatewayError::BannerNotFound(_))));
    }

    #[tokio::test]
    async fn legacy_create_and_delete_refresh_carousel() {
        let (service, _) = make_service();
        let _ = service.banners_for_location(Some("home")).await;
        let Ok(legacy) = service
            .create_legacy_banner(NewLegacyBanner {
                title: "Hero".to_string(),
                description: String::new(),
                image_url: "https://cdn.example.com/hero.png".to_string(),
                location: Some("home".to_string()),
                url: None,
                title_font: None,
                description_font: None,
            })
            .await
        else {
            panic!("create failed");
        };
        let with_legacy = service.banners_for_location(Some("home")).await;
        assert_eq!(with_legacy.map(|r| r.carousel.len()).ok(), Some(1));

        let _ = service.delete_legacy_banner(legacy.id).await;
        let without = service.banners_for_location(Some("home")).await;
        assert_eq!(without.map(|r| r.carousel.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn manual_invalidation() {
        let (service, _) = make_service();
        let _ = service.banners_for_location(Some("home")).await;
        let _ = service.banners_for_location(None).await;
        assert_eq!(service.invalidate(Some("home")).await, 1);
        assert_eq!(service.invalidate(None).await, 1);
        assert!(service.cache().is_empty().await);
    }
}
