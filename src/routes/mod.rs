// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod activity;
pub mod tracks;

use crate::AppState;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Prefix the routes were historically mounted under.
pub const LEGACY_PREFIX: &str = "/garmin";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
}

/// Health check response
async fn health_check() -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
    })
}

/// Success body shared by the ingest endpoints.
#[derive(Serialize)]
pub struct SuccessResponse {
    pub message: &'static str,
    pub status: &'static str,
}

impl SuccessResponse {
    pub fn new(message: &'static str) -> Self {
        Self {
            message,
            status: "success",
        }
    }
}

fn garmin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(activity::routes())
        .merge(tracks::routes())
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .merge(garmin_routes())
        .nest(LEGACY_PREFIX, garmin_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
