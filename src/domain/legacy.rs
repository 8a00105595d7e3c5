//! Legacy `home_banners` rows and their read-time adapter.
//!
//! The old hero carousel stored one image per row with its own font
//! settings. Rows are kept in their original table and converted into
//! [`Banner`]s of type [`BannerType::Carousel`] whenever they are resolved.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::banner::{Banner, BannerFamily, BannerMedia, BannerType, normalize_location};
use super::BannerId;
use crate::error::GatewayError;

/// Font used when a legacy banner does not name one.
pub const DEFAULT_FONT: &str = "Inter";

/// A row from the `home_banners` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LegacyBanner {
    /// Unique identifier.
    pub id: BannerId,
    /// Headline text.
    pub title: String,
    /// Body text.
    pub description: String,
    /// The single banner image.
    pub image_url: String,
    /// Placement location; `None` means unscoped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Click-through link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Typography for the title.
    pub title_font: String,
    /// Typography for the description.
    pub description_font: String,
    /// Set by the store on insert.
    pub created_at: DateTime<Utc>,
    /// Set by the store on every write.
    pub updated_at: DateTime<Utc>,
}

impl From<LegacyBanner> for Banner {
    /// Legacy rows are always active, always carousel, and sort at order 0
    /// so they tie with the first promotional slot and fall back to
    /// creation time.
    fn from(legacy: LegacyBanner) -> Self {
        let alt_text = Some(legacy.title.clone());
        Self {
            id: legacy.id,
            title: legacy.title,
            description: legacy.description,
            banner_type: BannerType::Carousel,
            media: vec![BannerMedia {
                url: legacy.image_url,
                alt_text,
            }],
            cta_label: None,
            cta_link: legacy.url,
            location: legacy.location,
            is_active: true,
            order: 0,
            created_at: legacy.created_at,
            updated_at: legacy.updated_at,
            family: BannerFamily::Legacy,
        }
    }
}

/// Input for inserting a legacy banner.
#[derive(Debug, Clone)]
pub struct NewLegacyBanner {
    /// Headline text.
    pub title: String,
    /// Body text.
    pub description: String,
    /// The single banner image.
    pub image_url: String,
    /// Placement location.
    pub location: Option<String>,
    /// Click-through link.
    pub url: Option<String>,
    /// Title typography; defaults to [`DEFAULT_FONT`].
    pub title_font: Option<String>,
    /// Description typography; defaults to [`DEFAULT_FONT`].
    pub description_font: Option<String>,
}

impl NewLegacyBanner {
    /// Validates and materializes the row with a fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the title, image URL,
    /// or a supplied location is blank.
    pub fn into_legacy(self, now: DateTime<Utc>) -> Result<LegacyBanner, GatewayError> {
        if self.title.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "title must not be empty".to_string(),
            ));
        }
        if self.image_url.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "imageUrl must not be empty".to_string(),
            ));
        }
        if self.location.as_deref().is_some_and(|l| l.trim().is_empty()) {
            return Err(GatewayError::InvalidRequest(
                "location must not be blank; omit it for an unscoped banner".to_string(),
            ));
        }
        Ok(LegacyBanner {
            id: BannerId::new(),
            title: self.title,
            description: self.description,
            image_url: self.image_url,
            location: normalize_location(self.location.as_deref()),
            url: self.url,
            title_font: self.title_font.unwrap_or_else(|| DEFAULT_FONT.to_string()),
            description_font: self
                .description_font
                .unwrap_or_else(|| DEFAULT_FONT.to_string()),
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn new_legacy() -> NewLegacyBanner {
        NewLegacyBanner {
            title: "Welcome".to_string(),
            description: "New arrivals".to_string(),
            image_url: "https://cdn.example.com/hero.png".to_string(),
            location: Some("home".to_string()),
            url: Some("/new".to_string()),
            title_font: None,
            description_font: Some("Lora".to_string()),
        }
    }

    #[test]
    fn fonts_default_to_inter() {
        let Ok(legacy) = new_legacy().into_legacy(Utc::now()) else {
            panic!("valid legacy banner");
        };
        assert_eq!(legacy.title_font, DEFAULT_FONT);
        assert_eq!(legacy.description_font, "Lora");
    }

    #[test]
    fn blank_image_url_is_rejected() {
        let mut input = new_legacy();
        input.image_url = " ".to_string();
        assert!(input.into_legacy(Utc::now()).is_err());
    }

    #[test]
    fn blank_location_is_rejected() {
        let mut input = new_legacy();
        input.location = Some("  ".to_string());
        assert!(input.into_legacy(Utc::now()).is_err());
    }

    #[test]
    fn adapter_produces_active_carousel_banner() {
        let Ok(legacy) = new_legacy().into_legacy(Utc::now()) else {
            panic!("valid legacy banner");
        };
        let id = legacy.id;
        let banner = Banner::from(legacy);
        assert_eq!(banner.id, id);
        assert_eq!(banner.banner_type, BannerType::Carousel);
        assert_eq!(banner.family, BannerFamily::Legacy);
        assert!(banner.is_active);
        assert_eq!(banner.order, 0);
        assert_eq!(banner.cta_link.as_deref(), Some("/new"));
        assert_eq!(banner.media.len(), 1);
        assert_eq!(
            banner.media.first().map(|m| m.url.as_str()),
            Some("https://cdn.example.com/hero.png")
        );
    }
}
