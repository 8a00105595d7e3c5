//! # banner-gateway
//!
//! REST service that decides which promotional banners a storefront
//! placement shows, caches those decisions per location, and exposes the
//! administrative endpoints that keep the cache honest.
//!
//! ## Architecture
//!
//! ```text
//! Storefront sections (sections/)
//!     │  HTTP
//!     ├── REST Handlers (api/)
//!     │
//!     ├── BannerService (service/)
//!     ├── BannerCache (cache/)
//!     │
//!     ├── BannerResolver (resolver)
//!     │
//!     └── BannerStore (persistence/): PostgreSQL or in-memory
//! ```
//!
//! Reads go through the cache; on a miss the resolver groups the active
//! banners of a location by type and orders them. Every mutation evicts
//! the affected cache entries before it returns.

pub mod api;
pub mod app_state;
pub mod cache;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod resolver;
pub mod sections;
pub mod service;
