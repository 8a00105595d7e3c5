//! Promotional banner model shared by the store, the resolver, the HTTP
//! layer, and the section client.
//!
//! [`Banner`] is the single wire schema: the server serializes it and the
//! section client deserializes the same type, so a payload that does not
//! match is rejected at the boundary instead of reaching view code.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::BannerId;
use crate::error::GatewayError;

/// Display style of a banner; decides which section renders it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum BannerType {
    /// Hero carousel.
    Carousel,
    /// First promotional strip.
    Type1,
    /// Second promotional strip.
    Type2,
    /// Third promotional strip (the retrying section).
    Type3,
    /// Fourth promotional strip.
    Type4,
}

impl BannerType {
    /// Every banner type, in display order.
    pub const ALL: [Self; 5] = [
        Self::Carousel,
        Self::Type1,
        Self::Type2,
        Self::Type3,
        Self::Type4,
    ];

    /// Returns the wire name of this type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Carousel => "carousel",
            Self::Type1 => "type1",
            Self::Type2 => "type2",
            Self::Type3 => "type3",
            Self::Type4 => "type4",
        }
    }
}

impl fmt::Display for BannerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BannerType {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carousel" => Ok(Self::Carousel),
            "type1" => Ok(Self::Type1),
            "type2" => Ok(Self::Type2),
            "type3" => Ok(Self::Type3),
            "type4" => Ok(Self::Type4),
            _ => Err(GatewayError::InvalidBannerType(s.to_string())),
        }
    }
}

/// Which table a banner originates from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum BannerFamily {
    /// Row from `home_banners`, adapted at read time.
    Legacy,
    /// Row from `promotional_banners`.
    #[default]
    Promotional,
}

/// One image of a banner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerMedia {
    /// Image URL.
    pub url: String,
    /// Alternative text for the image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
}

/// A banner as stored, resolved, and sent on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Banner {
    /// Unique identifier.
    pub id: BannerId,
    /// Headline text.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Display style.
    #[serde(rename = "type")]
    pub banner_type: BannerType,
    /// Ordered images; may be empty.
    #[serde(default)]
    pub media: Vec<BannerMedia>,
    /// Call-to-action label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_label: Option<String>,
    /// Call-to-action link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta_link: Option<String>,
    /// Placement location; `None` means unscoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Only active banners are resolved.
    pub is_active: bool,
    /// Sort key within a (location, type) group; lower first.
    pub order: i32,
    /// Set by the store on insert.
    pub created_at: DateTime<Utc>,
    /// Set by the store on every write.
    pub updated_at: DateTime<Utc>,
    /// Source table.
    #[serde(default)]
    pub family: BannerFamily,
}

impl Banner {
    /// Checks the invariants every persisted promotional banner must hold.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] when the title is blank,
    /// a media URL is blank, the location is blank, or only one half of
    /// the call-to-action pair is set.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }
        if self.media.iter().any(|m| m.url.trim().is_empty()) {
            return Err(GatewayError::InvalidRequest(
                "media url must not be empty".to_string(),
            ));
        }
        if self
            .location
            .as_deref()
            .is_some_and(|l| l.trim().is_empty())
        {
            return Err(GatewayError::InvalidRequest(
                "location must not be blank; omit it for an unscoped banner".to_string(),
            ));
        }
        if self.cta_label.is_some() != self.cta_link.is_some() {
            return Err(GatewayError::InvalidRequest(
                "ctaLabel and ctaLink must be set together".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns `true` when the banner has no placement location.
    #[must_use]
    pub fn is_unscoped(&self) -> bool {
        self.location.is_none()
    }
}

/// Input for inserting a promotional banner. The store assigns the id
/// and timestamps.
#[derive(Debug, Clone)]
pub struct NewBanner {
    /// Headline text.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Display style.
    pub banner_type: BannerType,
    /// Ordered images.
    pub media: Vec<BannerMedia>,
    /// Call-to-action label.
    pub cta_label: Option<String>,
    /// Call-to-action link.
    pub cta_link: Option<String>,
    /// Placement location.
    pub location: Option<String>,
    /// Initial activation state.
    pub is_active: bool,
    /// Sort key.
    pub order: i32,
}

impl NewBanner {
    /// Materializes the record with a fresh id and `now` as both
    /// timestamps. The location is trimmed; a blank one is kept so that
    /// [`Banner::validate`] rejects it.
    #[must_use]
    pub fn into_banner(self, now: DateTime<Utc>) -> Banner {
        Banner {
            id: BannerId::new(),
            title: self.title,
            description: self.description,
            banner_type: self.banner_type,
            media: self.media,
            cta_label: self.cta_label,
            cta_link: self.cta_link,
            location: trim_location(self.location),
            is_active: self.is_active,
            order: self.order,
            created_at: now,
            updated_at: now,
            family: BannerFamily::Promotional,
        }
    }
}

/// Partial update of a promotional banner.
///
/// Outer `None` leaves a field untouched; for nullable fields
/// `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct BannerPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New display style.
    pub banner_type: Option<BannerType>,
    /// Replacement media list.
    pub media: Option<Vec<BannerMedia>>,
    /// New or cleared call-to-action label.
    pub cta_label: Option<Option<String>>,
    /// New or cleared call-to-action link.
    pub cta_link: Option<Option<String>>,
    /// New or cleared location.
    pub location: Option<Option<String>>,
    /// New activation state.
    pub is_active: Option<bool>,
    /// New sort key.
    pub order: Option<i32>,
}

impl BannerPatch {
    /// A patch that only flips the activation flag.
    #[must_use]
    pub fn activation(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    /// Applies the patch in place. Does not touch timestamps.
    pub fn apply(self, banner: &mut Banner) {
        if let Some(title) = self.title {
            banner.title = title;
        }
        if let Some(description) = self.description {
            banner.description = description;
        }
        if let Some(banner_type) = self.banner_type {
            banner.banner_type = banner_type;
        }
        if let Some(media) = self.media {
            banner.media = media;
        }
        if let Some(cta_label) = self.cta_label {
            banner.cta_label = cta_label;
        }
        if let Some(cta_link) = self.cta_link {
            banner.cta_link = cta_link;
        }
        if let Some(location) = self.location {
            banner.location = trim_location(location);
        }
        if let Some(is_active) = self.is_active {
            banner.is_active = is_active;
        }
        if let Some(order) = self.order {
            banner.order = order;
        }
    }
}

/// Trims a stored location without dropping it. Only an explicit
/// `None` makes a banner unscoped.
fn trim_location(location: Option<String>) -> Option<String> {
    location.map(|l| l.trim().to_string())
}

/// Trims a lookup location and maps blank input to `None`.
#[must_use]
pub fn normalize_location(location: Option<&str>) -> Option<String> {
    location
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
}
