//! Promotional banner request and response bodies.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::{PaginationMeta, deserialize_some};
use crate::domain::{Banner, BannerMedia, BannerPatch, BannerType, NewBanner};
use crate::error::GatewayError;

/// Query for `GET /promotional-banners/by-location`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ByLocationQuery {
    /// Placement location; absent or blank selects the unscoped slot.
    #[serde(default)]
    pub location: Option<String>,
}

/// Filter for `GET /promotional-banners`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BannerListQuery {
    /// Exact location match.
    #[serde(default)]
    pub location: Option<String>,
    /// Banner type (`carousel`, `type1` … `type4`).
    #[serde(default, rename = "type")]
    pub banner_type: Option<String>,
}

/// Query for `POST /promotional-banners/cache/invalidate`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvalidateQuery {
    /// Location to evict; absent clears the whole cache.
    #[serde(default)]
    pub location: Option<String>,
}

/// Request body for `POST /promotional-banners`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBannerRequest {
    /// Headline text.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub description: String,
    /// Banner type string.
    #[serde(rename = "type")]
    pub banner_type: String,
    /// Ordered images.
    #[serde(default)]
    pub media: Vec<BannerMedia>,
    /// Call-to-action label; requires `ctaLink`.
    #[serde(default)]
    pub cta_label: Option<String>,
    /// Call-to-action link; requires `ctaLabel`.
    #[serde(default)]
    pub cta_link: Option<String>,
    /// Placement location; omit for an unscoped banner.
    #[serde(default)]
    pub location: Option<String>,
    /// Initial activation state. Defaults to `true`.
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Sort key. Defaults to 0.
    #[serde(default)]
    pub order: i32,
}

fn default_active() -> bool {
    true
}

impl TryFrom<CreateBannerRequest> for NewBanner {
    type Error = GatewayError;

    fn try_from(req: CreateBannerRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            banner_type: req.banner_type.parse()?,
            title: req.title,
            description: req.description,
            media: req.media,
            cta_label: req.cta_label,
            cta_link: req.cta_link,
            location: req.location,
            is_active: req.is_active,
            order: req.order,
        })
    }
}

/// Request body for `PATCH /promotional-banners/{id}`.
///
/// Omitted fields are left unchanged; `null` clears `ctaLabel`,
/// `ctaLink`, and `location`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBannerRequest {
    /// New headline.
    #[serde(default)]
    pub title: Option<String>,
    /// New body text.
    #[serde(default)]
    pub description: Option<String>,
    /// New banner type string.
    #[serde(default, rename = "type")]
    pub banner_type: Option<String>,
    /// Replacement media list.
    #[serde(default)]
    pub media: Option<Vec<BannerMedia>>,
    /// New call-to-action label, or `null` to clear.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub cta_label: Option<Option<String>>,
    /// New call-to-action link, or `null` to clear.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub cta_link: Option<Option<String>>,
    /// New location, or `null` to make the banner unscoped.
    #[serde(default, deserialize_with = "deserialize_some")]
    #[schema(value_type = Option<String>)]
    pub location: Option<Option<String>>,
    /// New activation state.
    #[serde(default)]
    pub is_active: Option<bool>,
    /// New sort key.
    #[serde(default)]
    pub order: Option<i32>,
}

impl TryFrom<UpdateBannerRequest> for BannerPatch {
    type Error = GatewayError;

    fn try_from(req: UpdateBannerRequest) -> Result<Self, Self::Error> {
        let banner_type = req
            .banner_type
            .as_deref()
            .map(str::parse::<BannerType>)
            .transpose()?;
        Ok(Self {
            title: req.title,
            description: req.description,
            banner_type,
            media: req.media,
            cta_label: req.cta_label,
            cta_link: req.cta_link,
            location: req.location,
            is_active: req.is_active,
            order: req.order,
        })
    }
}

/// Paginated list response for `GET /promotional-banners`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BannerListResponse {
    /// Banners on this page.
    pub data: Vec<Banner>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

/// Catalog entry for `GET /config/banner-types`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BannerTypeInfo {
    /// Banner type wire name.
    #[serde(rename = "type")]
    pub banner_type: BannerType,
    /// What the section looks like.
    pub description: &'static str,
    /// Whether the section retries failed reads.
    pub retries_on_failure: bool,
}
