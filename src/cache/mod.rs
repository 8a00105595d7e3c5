//! Read-through caching for resolved banners.
//!
//! [`TtlCache`] is a keyed map with per-entry expiry; [`BannerCache`]
//! specializes it to placement locations on the server, and the section
//! client reuses it for its own client-side cache.

pub mod banner_cache;
pub mod ttl;

pub use banner_cache::BannerCache;
pub use ttl::TtlCache;
