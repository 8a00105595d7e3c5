//! Resolution result: active banners for one location grouped by type.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::banner::{Banner, BannerType};

/// Active banners for one placement location, one ordered group per
/// [`BannerType`].
///
/// Every group is always present on the wire; an unconfigured location
/// serializes as five empty arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResolvedBanners {
    /// Hero carousel banners.
    #[serde(default)]
    pub carousel: Vec<Banner>,
    /// `type1` banners.
    #[serde(default)]
    pub type1: Vec<Banner>,
    /// `type2` banners.
    #[serde(default)]
    pub type2: Vec<Banner>,
    /// `type3` banners.
    #[serde(default)]
    pub type3: Vec<Banner>,
    /// `type4` banners.
    #[serde(default)]
    pub type4: Vec<Banner>,
}

impl ResolvedBanners {
    /// Returns the group for `banner_type`.
    #[must_use]
    pub fn group(&self, banner_type: BannerType) -> &[Banner] {
        match banner_type {
            BannerType::Carousel => &self.carousel,
            BannerType::Type1 => &self.type1,
            BannerType::Type2 => &self.type2,
            BannerType::Type3 => &self.type3,
            BannerType::Type4 => &self.type4,
        }
    }

    /// Returns the mutable group for `banner_type`.
    pub fn group_mut(&mut self, banner_type: BannerType) -> &mut Vec<Banner> {
        match banner_type {
            BannerType::Carousel => &mut self.carousel,
            BannerType::Type1 => &mut self.type1,
            BannerType::Type2 => &mut self.type2,
            BannerType::Type3 => &mut self.type3,
            BannerType::Type4 => &mut self.type4,
        }
    }

    /// Total number of banners across all groups.
    #[must_use]
    pub fn len(&self) -> usize {
        BannerType::ALL.iter().map(|t| self.group(*t).len()).sum()
    }

    /// Returns `true` if no group holds a banner.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
