//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! Resource endpoints are mounted under `/api`; system endpoints at the
//! root.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// Path the OpenAPI document is served from.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI description of every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "banner-gateway",
        description = "Promotional banner resolution, caching, and administration."
    ),
    paths(
        handlers::banner::banners_by_location,
        handlers::banner::list_banners,
        handlers::banner::create_banner,
        handlers::banner::get_banner,
        handlers::banner::update_banner,
        handlers::banner::activate_banner,
        handlers::banner::deactivate_banner,
        handlers::banner::delete_banner,
        handlers::banner::invalidate_cache,
        handlers::home_banner::list_home_banners,
        handlers::home_banner::create_home_banner,
        handlers::home_banner::delete_home_banner,
        handlers::system::health_handler,
        handlers::system::banner_types_handler,
    ),
    components(schemas(
        crate::domain::Banner,
        crate::domain::BannerFamily,
        crate::domain::BannerMedia,
        crate::domain::BannerType,
        crate::domain::LegacyBanner,
        crate::domain::ResolvedBanners,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        dto::CreateBannerRequest,
        dto::UpdateBannerRequest,
        dto::CreateHomeBannerRequest,
        dto::BannerListResponse,
        dto::BannerTypeInfo,
        dto::PaginationMeta,
    )),
    tags(
        (name = "Banners", description = "Promotional banner resolution and administration"),
        (name = "Home Banners", description = "Legacy hero carousel banners"),
        (name = "System", description = "Health and catalog endpoints"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints and the
/// OpenAPI document.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api", handlers::routes())
        .merge(handlers::system::routes())
        .merge(docs_router())
}

#[cfg(feature = "swagger-ui")]
fn docs_router() -> Router<AppState> {
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url(OPENAPI_PATH, ApiDoc::openapi())
        .into()
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_router() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
