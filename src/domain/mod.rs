//! Domain layer: banner identity, the unified banner model, the legacy
//! adapter, and the grouped resolution result.

pub mod banner;
pub mod banner_id;
pub mod legacy;
pub mod resolved;

pub use banner::{Banner, BannerFamily, BannerMedia, BannerPatch, BannerType, NewBanner};
pub use banner_id::BannerId;
pub use legacy::{LegacyBanner, NewLegacyBanner};
pub use resolved::ResolvedBanners;
