//! Database row types for `promotional_banners` and `home_banners`.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::{Banner, BannerFamily, BannerId, BannerMedia, BannerType, LegacyBanner};
use crate::error::GatewayError;

/// Column list shared by every `promotional_banners` query.
pub const PROMOTIONAL_COLUMNS: &str = "id, title, description, type, media, cta_label, cta_link, \
     location, is_active, \"order\", created_at, updated_at";

/// Column list shared by every `home_banners` query.
pub const LEGACY_COLUMNS: &str = "id, title, description, image_url, location, url, title_font, \
     description_font, created_at, updated_at";

/// A row from the `promotional_banners` table.
#[derive(Debug, Clone, FromRow)]
pub struct PromotionalBannerRow {
    /// Primary key.
    pub id: Uuid,
    /// Headline text.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Banner type as stored text.
    #[sqlx(rename = "type")]
    pub banner_type: String,
    /// JSONB media list.
    pub media: Json<Vec<BannerMedia>>,
    /// Call-to-action label.
    pub cta_label: Option<String>,
    /// Call-to-action link.
    pub cta_link: Option<String>,
    /// Placement location.
    pub location: Option<String>,
    /// Activation flag.
    pub is_active: bool,
    /// Sort key (`"order"` column).
    #[sqlx(rename = "order")]
    pub sort_order: i32,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PromotionalBannerRow> for Banner {
    type Error = GatewayError;

    fn try_from(row: PromotionalBannerRow) -> Result<Self, Self::Error> {
        let banner_type: BannerType = row.banner_type.parse().map_err(|_| {
            GatewayError::PersistenceError(format!(
                "banner {} has unknown type {:?}",
                row.id, row.banner_type
            ))
        })?;
        Ok(Self {
            id: BannerId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            banner_type,
            media: row.media.0,
            cta_label: row.cta_label,
            cta_link: row.cta_link,
            location: row.location,
            is_active: row.is_active,
            order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
            family: BannerFamily::Promotional,
        })
    }
}

/// A row from the `home_banners` table.
#[derive(Debug, Clone, FromRow)]
pub struct HomeBannerRow {
    /// Primary key.
    pub id: Uuid,
    /// Headline text.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Banner image.
    pub image_url: String,
    /// Placement location.
    pub location: Option<String>,
    /// Click-through link.
    pub url: Option<String>,
    /// Title typography.
    pub title_font: String,
    /// Description typography.
    pub description_font: String,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
    /// Last write timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<HomeBannerRow> for LegacyBanner {
    fn from(row: HomeBannerRow) -> Self {
        Self {
            id: BannerId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            image_url: row.image_url,
            location: row.location,
            url: row.url,
            title_font: row.title_font,
            description_font: row.description_font,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Converts a batch of promotional rows, failing on the first bad row.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if a row holds an unknown
/// banner type.
pub fn banners_from_rows(rows: Vec<PromotionalBannerRow>) -> Result<Vec<Banner>, GatewayError> {
    rows.into_iter().map(Banner::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(banner_type: &str) -> PromotionalBannerRow {
        PromotionalBannerRow {
            id: Uuid::new_v4(),
            title: "t".to_string(),
            description: "d".to_string(),
            banner_type: banner_type.to_string(),
            media: Json(vec![BannerMedia {
                url: "https://cdn.example.com/a.png".to_string(),
                alt_text: None,
            }]),
            cta_label: None,
            cta_link: None,
            location: Some("home".to_string()),
            is_active: true,
            sort_order: 4,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn known_type_converts() {
        let banner = Banner::try_from(row("type4"));
        assert!(banner.is_ok());
        let banner = banner.ok();
        assert_eq!(banner.as_ref().map(|b| b.banner_type), Some(BannerType::Type4));
        assert_eq!(banner.map(|b| b.order), Some(4));
    }

    #[test]
    fn unknown_type_is_a_persistence_error() {
        let result = banners_from_rows(vec![row("carousel"), row("hero")]);
        assert!(matches!(result, Err(GatewayError::PersistenceError(_))));
    }
}
