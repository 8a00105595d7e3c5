//! Legacy home banner handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use axum::{Json, Router};

use crate::api::dto::{CreateHomeBannerRequest, HomeBannerQuery};
use crate::app_state::AppState;
use crate::domain::{BannerId, LegacyBanner};
use crate::error::{ErrorResponse, GatewayError};

/// `GET /home-banners` — List legacy banners.
///
/// # Errors
///
/// Returns [`GatewayError::PersistenceError`] on store failure.
#[utoipa::path(
    get,
    path = "/api/home-banners",
    tag = "Home Banners",
    summary = "List legacy home banners",
    params(HomeBannerQuery),
    responses(
        (status = 200, description = "Legacy banners", body = Vec<LegacyBanner>),
        (status = 500, description = "Banner store unavailable", body = ErrorResponse),
    )
)]
pub async fn list_home_banners(
    State(state): State<AppState>,
    Query(query): Query<HomeBannerQuery>,
) -> Result<Json<Vec<LegacyBanner>>, GatewayError> {
    let banners = state
        .banner_service
        .list_legacy_banners(query.location.as_deref())
        .await?;
    Ok(Json(banners))
}

/// `POST /home-banners` — Create a legacy banner.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the title or image URL is
/// blank, or a store error.
#[utoipa::path(
    post,
    path = "/api/home-banners",
    tag = "Home Banners",
    summary = "Create a legacy home banner",
    description = "Legacy banners are resolved as active carousel banners at their location.",
    request_body = CreateHomeBannerRequest,
    responses(
        (status = 201, description = "Home banner created", body = LegacyBanner),
        (status = 400, description = "Invalid home banner", body = ErrorResponse),
    )
)]
pub async fn create_home_banner(
    State(state): State<AppState>,
    Json(req): Json<CreateHomeBannerRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let banner = state
        .banner_service
        .create_legacy_banner(req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(banner)))
}

/// `DELETE /home-banners/{id}` — Remove a legacy banner.
///
/// # Errors
///
/// Returns [`GatewayError::HomeBannerNotFound`] if it does not exist.
#[utoipa::path(
    delete,
    path = "/api/home-banners/{id}",
    tag = "Home Banners",
    summary = "Delete a legacy home banner",
    params(
        ("id" = uuid::Uuid, Path, description = "Home banner UUID"),
    ),
    responses(
        (status = 204, description = "Home banner deleted"),
        (status = 404, description = "Home banner not found", body = ErrorResponse),
    )
)]
pub async fn delete_home_banner(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<StatusCode, GatewayError> {
    state
        .banner_service
        .delete_legacy_banner(BannerId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Legacy home banner routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/home-banners",
            get(list_home_banners).post(create_home_banner),
        )
        .route("/home-banners/{id}", delete(delete_home_banner))
}
