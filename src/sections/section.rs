//! Section descriptors and the view states they render.

use std::time::Duration;

use serde::Serialize;

use crate::domain::{Banner, BannerType};

/// Retries `type3` makes after its first failed attempt.
pub const TYPE3_RETRIES: u32 = 3;

/// Fixed pause between `type3` attempts.
pub const TYPE3_RETRY_DELAY: Duration = Duration::from_secs(1);

/// How often a section re-issues a failed read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one.
    pub retries: u32,
    /// Pause before each extra attempt.
    pub delay: Duration,
}

impl RetryPolicy {
    /// A single attempt.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            retries: 0,
            delay: Duration::ZERO,
        }
    }

    /// `retries` extra attempts, each after `delay`.
    #[must_use]
    pub const fn fixed(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    /// Total number of attempts.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}

/// What a section renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "banners", rename_all = "snake_case")]
pub enum SectionView {
    /// Placeholder shown while the first read is in flight.
    Loading,
    /// Render nothing: no banners, or the read failed.
    Hidden,
    /// Banners to render, in display order.
    Banners(Vec<Banner>),
}

impl SectionView {
    /// Builds the view for one group; an empty group is hidden.
    #[must_use]
    pub fn from_group(banners: &[Banner]) -> Self {
        if banners.is_empty() {
            Self::Hidden
        } else {
            Self::Banners(banners.to_vec())
        }
    }

    /// Banners to render; empty for [`SectionView::Loading`] and
    /// [`SectionView::Hidden`].
    #[must_use]
    pub fn banners(&self) -> &[Banner] {
        match self {
            Self::Banners(banners) => banners,
            Self::Loading | Self::Hidden => &[],
        }
    }

    /// Returns `true` if the section renders nothing at all.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }
}

/// One banner section placed at a fixed location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSection {
    /// Placement location the section reads.
    pub location: String,
    /// Group the section renders.
    pub banner_type: BannerType,
    /// Read retry behavior.
    pub retry: RetryPolicy,
    /// Whether a loading placeholder is shown before the first result.
    pub shows_placeholder: bool,
}

impl LocationSection {
    /// Creates the section for `banner_type` at `location`.
    ///
    /// `type3` retries [`TYPE3_RETRIES`] times with [`TYPE3_RETRY_DELAY`]
    /// and shows a placeholder; every other type makes one silent attempt.
    #[must_use]
    pub fn new(location: impl Into<String>, banner_type: BannerType) -> Self {
        let (retry, shows_placeholder) = match banner_type {
            BannerType::Type3 => (RetryPolicy::fixed(TYPE3_RETRIES, TYPE3_RETRY_DELAY), true),
            _ => (RetryPolicy::none(), false),
        };
        Self {
            location: location.into(),
            banner_type,
            retry,
            shows_placeholder,
        }
    }

    /// Overrides the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// One section per banner type at `location`, in display order.
    #[must_use]
    pub fn all_for(location: &str) -> Vec<Self> {
        BannerType::ALL
            .into_iter()
            .map(|t| Self::new(location, t))
            .collect()
    }

    /// The view before any read completes.
    #[must_use]
    pub fn initial_view(&self) -> SectionView {
        if self.shows_placeholder {
            SectionView::Loading
        } else {
            SectionView::Hidden
        }
    }
}
