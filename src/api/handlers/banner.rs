//! Promotional banner handlers: the storefront read endpoint plus the
//! administrative CRUD that keeps the cache consistent.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    BannerListQuery, BannerListResponse, ByLocationQuery, CreateBannerRequest, InvalidateQuery,
    PaginationParams, UpdateBannerRequest,
};
use crate::app_state::AppState;
use crate::domain::{Banner, BannerId, BannerPatch, NewBanner, ResolvedBanners};
use crate::error::{ErrorResponse, GatewayError};
use crate::persistence::BannerFilter;

/// `GET /promotional-banners/by-location` — Active banners for a
/// placement location, grouped by type.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] if the store is unavailable.
#[utoipa::path(
    get,
    path = "/api/promotional-banners/by-location",
    tag = "Banners",
    summary = "Resolve banners for a location",
    description = "Returns the active banners for a placement location grouped by banner type. Each group is ordered by `order`, then creation time. Locations without banners return five empty groups.",
    params(ByLocationQuery),
    responses(
        (status = 200, description = "Grouped banners", body = ResolvedBanners),
        (status = 500, description = "Banner store unavailable", body = ErrorResponse),
    )
)]
pub async fn banners_by_location(
    State(state): State<AppState>,
    Query(query): Query<ByLocationQuery>,
) -> Result<Json<ResolvedBanners>, GatewayError> {
    let resolved = state
        .banner_service
        .banners_for_location(query.location.as_deref())
        .await?;
    Ok(Json(ResolvedBanners::clone(&resolved)))
}

/// `GET /promotional-banners` — List banners for administration.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidBannerType`] for an unknown `type`
/// filter, or a store error.
#[utoipa::path(
    get,
    path = "/api/promotional-banners",
    tag = "Banners",
    summary = "List promotional banners",
    description = "Returns a paginated list of promotional banners, active or not, optionally filtered by location and type.",
    params(BannerListQuery, PaginationParams),
    responses(
        (status = 200, description = "Paginated banner list", body = BannerListResponse),
        (status = 400, description = "Invalid type filter", body = ErrorResponse),
    )
)]
pub async fn list_banners(
    State(state): State<AppState>,
    Query(query): Query<BannerListQuery>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<BannerListResponse>, GatewayError> {
    let filter = BannerFilter {
        location: crate::domain::banner::normalize_location(query.location.as_deref()),
        banner_type: query
            .banner_type
            .as_deref()
            .map(str::parse)
            .transpose()?,
    };
    let banners = state.banner_service.list_banners(&filter).await?;
    let (data, pagination) = params.paginate(banners);
    Ok(Json(BannerListResponse { data, pagination }))
}

/// `POST /promotional-banners` — Create a banner.
///
/// # Errors
///
/// Returns [`GatewayError`] on validation failure or store error.
#[utoipa::path(
    post,
    path = "/api/promotional-banners",
    tag = "Banners",
    summary = "Create a promotional banner",
    description = "Creates a banner and evicts every cached location it can appear in before responding.",
    request_body = CreateBannerRequest,
    responses(
        (status = 201, description = "Banner created", body = Banner),
        (status = 400, description = "Invalid banner", body = ErrorResponse),
    )
)]
pub async fn create_banner(
    State(state): State<AppState>,
    Json(req): Json<CreateBannerRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let new = NewBanner::try_from(req)?;
    let banner = state.banner_service.create_banner(new).await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

/// `GET /promotional-banners/{id}` — Get one banner.
///
/// # Errors
///
/// Returns [`GatewayError::BannerNotFound`] if the banner does not exist.
#[utoipa::path(
    get,
    path = "/api/promotional-banners/{id}",
    tag = "Banners",
    summary = "Get a promotional banner",
    params(
        ("id" = uuid::Uuid, Path, description = "Banner UUID"),
    ),
    responses(
        (status = 200, description = "Banner", body = Banner),
        (status = 404, description = "Banner not found", body = ErrorResponse),
    )
)]
pub async fn get_banner(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<Banner>, GatewayError> {
    let banner = state
        .banner_service
        .get_banner(BannerId::from_uuid(id))
        .await?;
    Ok(Json(banner))
}

/// `PATCH /promotional-banners/{id}` — Partially update a banner.
///
/// # Errors
///
/// Returns [`GatewayError`] if the banner does not exist, the result is
/// invalid, or the store fails.
#[utoipa::path(
    patch,
    path = "/api/promotional-banners/{id}",
    tag = "Banners",
    summary = "Update a promotional banner",
    description = "Applies a partial update. Both the previous and the new location are evicted from the cache.",
    params(
        ("id" = uuid::Uuid, Path, description = "Banner UUID"),
    ),
    request_body = UpdateBannerRequest,
    responses(
        (status = 200, description = "Updated banner", body = Banner),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Banner not found", body = ErrorResponse),
    )
)]
pub async fn update_banner(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<UpdateBannerRequest>,
) -> Result<Json<Banner>, GatewayError> {
    let patch = BannerPatch::try_from(req)?;
    let banner = state
        .banner_service
        .update_banner(BannerId::from_uuid(id), patch)
        .await?;
    Ok(Json(banner))
}

/// `POST /promotional-banners/{id}/activate` — Make a banner eligible
/// for resolution.
///
/// # Errors
///
/// Returns [`GatewayError::BannerNotFound`] if the banner does not exist.
#[utoipa::path(
    post,
    path = "/api/promotional-banners/{id}/activate",
    tag = "Banners",
    summary = "Activate a promotional banner",
    params(
        ("id" = uuid::Uuid, Path, description = "Banner UUID"),
    ),
    responses(
        (status = 200, description = "Activated banner", body = Banner),
        (status = 404, description = "Banner not found", body = ErrorResponse),
    )
)]
pub async fn activate_banner(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<Banner>, GatewayError> {
    let banner = state
        .banner_service
        .set_active(BannerId::from_uuid(id), true)
        .await?;
    Ok(Json(banner))
}

/// `POST /promotional-banners/{id}/deactivate` — Soft-disable a banner.
///
/// # Errors
///
/// Returns [`GatewayError::BannerNotFound`] if the banner does not exist.
#[utoipa::path(
    post,
    path = "/api/promotional-banners/{id}/deactivate",
    tag = "Banners",
    summary = "Deactivate a promotional banner",
    description = "The banner stays stored but is no longer resolved.",
    params(
        ("id" = uuid::Uuid, Path, description = "Banner UUID"),
    ),
    responses(
        (status = 200, description = "Deactivated banner", body = Banner),
        (status = 404, description = "Banner not found", body = ErrorResponse),
    )
)]
pub async fn deactivate_banner(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<Json<Banner>, GatewayError> {
    let banner = state
        .banner_service
        .set_active(BannerId::from_uuid(id), false)
        .await?;
    Ok(Json(banner))
}

/// `DELETE /promotional-banners/{id}` — Remove a banner.
///
/// # Errors
///
/// Returns [`GatewayError::BannerNotFound`] if the banner does not exist.
#[utoipa::path(
    delete,
    path = "/api/promotional-banners/{id}",
    tag = "Banners",
    summary = "Delete a promotional banner",
    params(
        ("id" = uuid::Uuid, Path, description = "Banner UUID"),
    ),
    responses(
        (status = 204, description = "Banner deleted"),
        (status = 404, description = "Banner not found", body = ErrorResponse),
    )
)]
pub async fn delete_banner(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, GatewayError> {
    state
        .banner_service
        .delete_banner(BannerId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /promotional-banners/cache/invalidate` — Evict cached
/// resolutions.
#[utoipa::path(
    post,
    path = "/api/promotional-banners/cache/invalidate",
    tag = "Banners",
    summary = "Invalidate the banner cache",
    description = "Evicts one location, or every location when `location` is omitted.",
    params(InvalidateQuery),
    responses(
        (status = 204, description = "Cache invalidated"),
    )
)]
pub async fn invalidate_cache(
    State(state): State<AppState>,
    Query(query): Query<InvalidateQuery>,
) -> StatusCode {
    state
        .banner_service
        .invalidate(query.location.as_deref())
        .await;
    StatusCode::NO_CONTENT
}

/// Promotional banner routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/promotional-banners",
            get(list_banners).post(create_banner),
        )
        .route("/promotional-banners/by-location", get(banners_by_location))
        .route("/promotional-banners/cache/invalidate", post(invalidate_cache))
        .route(
            "/promotional-banners/{id}",
            get(get_banner).patch(update_banner).delete(delete_banner),
        )
        .route("/promotional-banners/{id}/activate", post(activate_banner))
        .route(
            "/promotional-banners/{id}/deactivate",
            post(deactivate_banner),
        )
}
