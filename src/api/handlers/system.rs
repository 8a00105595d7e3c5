//! System endpoints: health check and banner type catalog.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::BannerTypeInfo;
use crate::app_state::AppState;
use crate::domain::BannerType;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, and current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

/// `GET /config/banner-types` — List supported banner types.
#[utoipa::path(
    get,
    path = "/config/banner-types",
    tag = "System",
    summary = "List banner types",
    description = "Returns every banner type a section can render, in display order.",
    responses(
        (status = 200, description = "Banner type catalog", body = Vec<BannerTypeInfo>),
    )
)]
pub async fn banner_types_handler() -> impl IntoResponse {
    let types: Vec<BannerTypeInfo> = BannerType::ALL
        .into_iter()
        .map(|banner_type| BannerTypeInfo {
            banner_type,
            description: match banner_type {
                BannerType::Carousel => "Hero carousel; also fed by legacy home banners",
                BannerType::Type1 => "Full-width promotional strip",
                BannerType::Type2 => "Two-column promotional tiles",
                BannerType::Type3 => "Featured promotion with loading placeholder",
                BannerType::Type4 => "Compact promotional cards",
            },
            retries_on_failure: banner_type == BannerType::Type3,
        })
        .collect();
    (StatusCode::OK, Json(types))
}

/// System routes mounted at the root level (not under /api).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/banner-types", get(banner_types_handler))
}
