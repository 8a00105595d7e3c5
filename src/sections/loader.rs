//! Loads section views with a client-side cache and the fail-quiet
//! policy.

use std::sync::Arc;
use std::time::Duration;

use crate::cache::TtlCache;
use crate::domain::{BannerType, ResolvedBanners};

use super::section::{LocationSection, SectionView};
use super::source::BannerSource;

/// Resolves [`LocationSection`]s into [`SectionView`]s.
///
/// Successful reads are kept per location for the cache TTL so a
/// remounted section, or a sibling section at the same location, does
/// not refetch. Failed reads are not cached.
#[derive(Debug)]
pub struct SectionLoader {
    source: Arc<dyn BannerSource>,
    cache: TtlCache<String, ResolvedBanners>,
}

impl SectionLoader {
    /// Creates a loader over `source` with a client-side cache of `ttl`.
    #[must_use]
    pub fn new(source: Arc<dyn BannerSource>, ttl: Duration) -> Self {
        Self {
            source,
            cache: TtlCache::new(ttl),
        }
    }

    /// Loads one section. Never fails: errors become
    /// [`SectionView::Hidden`] once the retry policy is exhausted.
    pub async fn load(&self, section: &LocationSection) -> SectionView {
        match self.resolved(section).await {
            Some(resolved) => SectionView::from_group(resolved.group(section.banner_type)),
            None => SectionView::Hidden,
        }
    }

    /// Loads every banner type at `location`, skipping hidden sections.
    pub async fn load_location(&self, location: &str) -> Vec<(BannerType, SectionView)> {
        let mut views = Vec::new();
        for section in LocationSection::all_for(location) {
            let view = self.load(&section).await;
            if !view.is_hidden() {
                views.push((section.banner_type, view));
            }
        }
        views
    }

    /// Drops the cached result for `location`.
    pub async fn forget(&self, location: &str) -> bool {
        self.cache.invalidate(location).await
    }

    async fn resolved(&self, section: &LocationSection) -> Option<Arc<ResolvedBanners>> {
        if let Some(hit) = self.cache.get(section.location.as_str()).await {
            return Some(hit);
        }

        let attempts = section.retry.attempts();
        for attempt in 1..=attempts {
            match self.source.fetch(&section.location).await {
                Ok(resolved) => {
                    return Some(self.cache.insert(section.location.clone(), resolved).await);
                }
                Err(e) if attempt < attempts => {
                    tracing::debug!(
                        location = %section.location,
                        banner_type = %section.banner_type,
                        attempt,
                        error = %e,
                        "banner read failed, retrying"
                    );
                    tokio::time::sleep(section.retry.delay).await;
                }
                Err(e) => {
                    tracing::warn!(
                        location = %section.location,
                        banner_type = %section.banner_type,
                        attempts,
                        error = %e,
                        "banner read failed, hiding section"
                    );
                }
            }
        }
        None
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;
    use crate::domain::{Banner, NewBanner};
    use crate::error::GatewayError;
    use crate::sections::section::{RetryPolicy, TYPE3_RETRY_DELAY};

    const TTL: Duration = Duration::from_secs(300);

    /// Fails the first `failures` calls, then serves `resolved`.
    #[derive(Debug)]
    struct FlakySource {
        failures: u32,
        calls: AtomicU32,
        resolved: ResolvedBanners,
    }

    impl FlakySource {
        fn new(failures: u32, resolved: ResolvedBanners) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
                resolved,
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl BannerSource for FlakySource {
        async fn fetch(&self, _location: &str) -> Result<ResolvedBanners, GatewayError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(GatewayError::Upstream("503 Service Unavailable".into()))
            } else {
                Ok(self.resolved.clone())
            }
        }
    }

    fn banner(banner_type: BannerType) -> Banner {
        NewBanner {
            title: banner_type.to_string(),
            description: String::new(),
            banner_type,
            media: Vec::new(),
            cta_label: None,
            cta_link: None,
            location: Some("home".to_string()),
            is_active: true,
            order: 1,
        }
        .into_banner(Utc::now())
    }

    fn resolved_with(types: &[BannerType]) -> ResolvedBanners {
        let mut resolved = ResolvedBanners::default();
        for t in types {
            resolved.group_mut(*t).push(banner(*t));
        }
        resolved
    }

    fn loader(source: &Arc<FlakySource>) -> SectionLoader {
        let dyn_source: Arc<dyn BannerSource> = Arc::clone(source) as Arc<dyn BannerSource>;
        SectionLoader::new(dyn_source, TTL)
    }

    #[tokio::test]
    async fn renders_group_for_section_type() {
        let source = FlakySource::new(0, resolved_with(&[BannerType::Carousel]));
        let loader = loader(&source);

        let view = loader
            .load(&LocationSection::new("home", BannerType::Carousel))
            .await;
        assert_eq!(view.banners().len(), 1);

        let empty = loader
            .load(&LocationSection::new("home", BannerType::Type1))
            .await;
        assert!(empty.is_hidden());
    }

    #[tokio::test]
    async fn plain_section_fails_quiet_after_one_attempt() {
        let source = FlakySource::new(1, resolved_with(&[BannerType::Type2]));
        let loader = loader(&source);

        let view = loader
            .load(&LocationSection::new("home", BannerType::Type2))
            .await;
        assert!(view.is_hidden());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn type3_retries_with_fixed_delay() {
        let source = FlakySource::new(3, resolved_with(&[BannerType::Type3]));
        let loader = loader(&source);

        let started = tokio::time::Instant::now();
        let view = loader
            .load(&LocationSection::new("home", BannerType::Type3))
            .await;
        assert_eq!(view.banners().len(), 1);
        assert_eq!(source.calls(), 4);
        assert_eq!(started.elapsed(), TYPE3_RETRY_DELAY * 3);
    }

    #[tokio::test(start_paused = true)]
    async fn type3_gives_up_silently() {
        let source = FlakySource::new(u32::MAX, ResolvedBanners::default());
        let loader = loader(&source);

        let view = loader
            .load(&LocationSection::new("home", BannerType::Type3))
            .await;
        assert!(view.is_hidden());
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test]
    async fn remount_within_ttl_does_not_refetch() {
        let source = FlakySource::new(0, resolved_with(&[BannerType::Type1, BannerType::Type4]));
        let loader = loader(&source);

        let views = loader.load_location("home").await;
        let types: Vec<BannerType> = views.iter().map(|(t, _)| *t).collect();
        assert_eq!(types, [BannerType::Type1, BannerType::Type4]);
        assert_eq!(source.calls(), 1);

        let _ = loader
            .load(&LocationSection::new("home", BannerType::Type1))
            .await;
        assert_eq!(source.calls(), 1);

        assert!(loader.forget("home").await);
        let _ = loader
            .load(&LocationSection::new("home", BannerType::Type1))
            .await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn custom_retry_policy_is_honored() {
        let source = FlakySource::new(1, resolved_with(&[BannerType::Type1]));
        let loader = loader(&source);
        let section = LocationSection::new("home", BannerType::Type1)
            .with_retry(RetryPolicy::fixed(1, Duration::from_millis(1)));

        let view = loader.load(&section).await;
        assert_eq!(view.banners().len(), 1);
        assert_eq!(source.calls(), 2);
    }
}
