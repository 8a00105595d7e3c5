//! banner-gateway server entry point.
//!
//! Starts the Axum HTTP server with the banner REST endpoints.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use banner_gateway::api;
use banner_gateway::app_state::AppState;
use banner_gateway::config::GatewayConfig;
use banner_gateway::persistence::{BannerStore, MemoryBannerStore, PostgresBannerStore};
use banner_gateway::service::BannerService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = GatewayConfig::from_env().context("invalid LISTEN_ADDR")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting banner-gateway");

    // Build persistence layer
    let store: Arc<dyn BannerStore> = if config.persistence_enabled {
        Arc::new(
            PostgresBannerStore::connect(&config)
                .await
                .context("failed to open banner store")?,
        )
    } else {
        tracing::warn!("persistence disabled; banners are kept in memory");
        Arc::new(MemoryBannerStore::new())
    };

    // Build service layer
    let banner_service =
        BannerService::new(store, config.resolver_options(), config.cache_ttl());
    tracing::info!(
        ttl_secs = config.cache_ttl_secs,
        include_unscoped = config.include_unscoped,
        include_legacy = config.include_legacy,
        "banner cache configured"
    );

    if config.cache_sweep_interval_secs > 0 {
        spawn_cache_sweeper(
            banner_service.clone(),
            Duration::from_secs(config.cache_sweep_interval_secs),
        );
    }

    // Build router
    let app = api::build_router()
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState::new(banner_service));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

/// Periodically drops expired cache entries so locations that are no
/// longer requested do not linger.
fn spawn_cache_sweeper(service: BannerService, every: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let purged = service.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "expired banner cache entries purged");
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
