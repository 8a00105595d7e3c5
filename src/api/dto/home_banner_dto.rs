//! Legacy home banner request bodies.

use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::NewLegacyBanner;

/// Query for `GET /home-banners`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HomeBannerQuery {
    /// Exact location match.
    #[serde(default)]
    pub location: Option<String>,
}

/// Request body for `POST /home-banners`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateHomeBannerRequest {
    /// Headline text.
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub description: String,
    /// The single banner image.
    pub image_url: String,
    /// Placement location.
    #[serde(default)]
    pub location: Option<String>,
    /// Click-through link.
    #[serde(default)]
    pub url: Option<String>,
    /// Title typography. Defaults to `Inter`.
    #[serde(default)]
    pub title_font: Option<String>,
    /// Description typography. Defaults to `Inter`.
    #[serde(default)]
    pub description_font: Option<String>,
}

impl From<CreateHomeBannerRequest> for NewLegacyBanner {
    fn from(req: CreateHomeBannerRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            image_url: req.image_url,
            location: req.location,
            url: req.url,
            title_font: req.title_font,
            description_font: req.description_font,
        }
    }
}
