//! Storefront location sections: the client side of banner resolution.
//!
//! A [`LocationSection`] asks a [`BannerSource`] for one placement
//! location and turns the group for its banner type into a
//! [`SectionView`]. Decorative content fails quiet: an empty group or a
//! failed request renders nothing. The `type3` section shows a loading
//! placeholder and retries before giving up.

pub mod loader;
pub mod section;
pub mod source;

pub use loader::SectionLoader;
pub use section::{LocationSection, RetryPolicy, SectionView};
pub use source::{BannerSource, HttpBannerSource, ServiceBannerSource};
