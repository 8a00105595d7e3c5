//! PostgreSQL implementation of the banner store.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;

use super::models::{
    HomeBannerRow, LEGACY_COLUMNS, PROMOTIONAL_COLUMNS, PromotionalBannerRow, banners_from_rows,
};
use super::{BannerFilter, BannerStore};
use crate::config::GatewayConfig;
use crate::domain::{Banner, BannerId, LegacyBanner};
use crate::error::GatewayError;

/// PostgreSQL-backed banner store using `sqlx::PgPool`.
///
/// Timestamps come from `now()` inside each statement. Active filtering
/// and ordering are pushed into the location queries.
#[derive(Debug, Clone)]
pub struct PostgresBannerStore {
    pool: PgPool,
}

impl PostgresBannerStore {
    /// Creates a store over an existing connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool from `config` and applies the bundled
    /// migrations.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PersistenceError`] if the database is
    /// unreachable or a migration fails.
    pub async fn connect(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database_max_connections)
            .min_connections(config.database_min_connections)
            .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| GatewayError::PersistenceError(e.to_string()))?;

        tracing::info!(
            max_connections = config.database_max_connections,
            "connected to postgres and applied migrations"
        );
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl BannerStore for PostgresBannerStore {
    async fn fetch_by_location(
        &self,
        location: Option<&str>,
        include_unscoped: bool,
    ) -> Result<Vec<Banner>, GatewayError> {
        let sql = format!(
            "SELECT {PROMOTIONAL_COLUMNS} FROM promotional_banners \
             WHERE is_active \
               AND (location = $1 OR (location IS NULL AND ($2 OR $1 IS NULL))) \
             ORDER BY \"order\" ASC, created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, PromotionalBannerRow>(&sql)
            .bind(location)
            .bind(include_unscoped)
            .fetch_all(&self.pool)
            .await?;
        banners_from_rows(rows)
    }

    async fn fetch_legacy_by_location(
        &self,
        location: Option<&str>,
    ) -> Result<Vec<LegacyBanner>, GatewayError> {
        let sql = format!(
            "SELECT {LEGACY_COLUMNS} FROM home_banners \
             WHERE location IS NOT DISTINCT FROM $1 ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, HomeBannerRow>(&sql)
            .bind(location)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LegacyBanner::from).collect())
    }

    async fn get(&self, id: BannerId) -> Result<Banner, GatewayError> {
        let sql = format!("SELECT {PROMOTIONAL_COLUMNS} FROM promotional_banners WHERE id = $1");
        let row = sqlx::query_as::<_, PromotionalBannerRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(GatewayError::BannerNotFound(*id.as_uuid()))?;
        Banner::try_from(row)
    }

    async fn list(&self, filter: &BannerFilter) -> Result<Vec<Banner>, GatewayError> {
        let sql = format!(
            "SELECT {PROMOTIONAL_COLUMNS} FROM promotional_banners \
             WHERE ($1::text IS NULL OR location = $1) AND ($2::text IS NULL OR type = $2) \
             ORDER BY location ASC NULLS FIRST, type ASC, \"order\" ASC, created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, PromotionalBannerRow>(&sql)
            .bind(filter.location.as_deref())
            .bind(filter.banner_type.map(|t| t.as_str()))
            .fetch_all(&self.pool)
            .await?;
        banners_from_rows(rows)
    }

    async fn insert(&self, banner: Banner) -> Result<Banner, GatewayError> {
        let sql = format!(
            "INSERT INTO promotional_banners \
             (id, title, description, type, media, cta_label, cta_link, location, is_active, \"order\", created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, now(), now()) \
             RETURNING {PROMOTIONAL_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PromotionalBannerRow>(&sql)
            .bind(banner.id.as_uuid())
            .bind(&banner.title)
            .bind(&banner.description)
            .bind(banner.banner_type.as_str())
            .bind(Json(&banner.media))
            .bind(&banner.cta_label)
            .bind(&banner.cta_link)
            .bind(&banner.location)
            .bind(banner.is_active)
            .bind(banner.order)
            .fetch_one(&self.pool)
            .await?;
        Banner::try_from(row)
    }

    async fn update(&self, banner: Banner) -> Result<Banner, GatewayError> {
        let sql = format!(
            "UPDATE promotional_banners SET \
             title = $2, description = $3, type = $4, media = $5, cta_label = $6, cta_link = $7, \
             location = $8, is_active = $9, \"order\" = $10, updated_at = now() \
             WHERE id = $1 RETURNING {PROMOTIONAL_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PromotionalBannerRow>(&sql)
            .bind(banner.id.as_uuid())
            .bind(&banner.title)
            .bind(&banner.description)
            .bind(banner.banner_type.as_str())
            .bind(Json(&banner.media))
            .bind(&banner.cta_label)
            .bind(&banner.cta_link)
            .bind(&banner.location)
            .bind(banner.is_active)
            .bind(banner.order)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(GatewayError::BannerNotFound(*banner.id.as_uuid()))?;
        Banner::try_from(row)
    }

    async fn delete(&self, id: BannerId) -> Result<Banner, GatewayError> {
        let sql = format!(
            "DELETE FROM promotional_banners WHERE id = $1 RETURNING {PROMOTIONAL_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PromotionalBannerRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(GatewayError::BannerNotFound(*id.as_uuid()))?;
        Banner::try_from(row)
    }

    async fn list_legacy(&self, location: Option<&str>) -> Result<Vec<LegacyBanner>, GatewayError> {
        let sql = format!(
            "SELECT {LEGACY_COLUMNS} FROM home_banners \
             WHERE ($1::text IS NULL OR location = $1) ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, HomeBannerRow>(&sql)
            .bind(location)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(LegacyBanner::from).collect())
    }

    async fn insert_legacy(&self, banner: LegacyBanner) -> Result<LegacyBanner, GatewayError> {
        let sql = format!(
            "INSERT INTO home_banners \
             (id, title, description, image_url, location, url, title_font, description_font, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now()) \
             RETURNING {LEGACY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, HomeBannerRow>(&sql)
            .bind(banner.id.as_uuid())
            .bind(&banner.title)
            .bind(&banner.description)
            .bind(&banner.image_url)
            .bind(&banner.location)
            .bind(&banner.url)
            .bind(&banner.title_font)
            .bind(&banner.description_font)
            .fetch_one(&self.pool)
            .await?;
        Ok(LegacyBanner::from(row))
    }

    async fn delete_legacy(&self, id: BannerId) -> Result<LegacyBanner, GatewayError> {
        let sql = format!("DELETE FROM home_banners WHERE id = $1 RETURNING {LEGACY_COLUMNS}");
        let row = sqlx::query_as::<_, HomeBannerRow>(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(GatewayError::HomeBannerNotFound(*id.as_uuid()))?;
        Ok(LegacyBanner::from(row))
    }
}
