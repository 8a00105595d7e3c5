//! REST endpoint handlers organized by resource.

pub mod banner;
pub mod home_banner;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(banner::routes())
        .merge(home_banner::routes())
}
