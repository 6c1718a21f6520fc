// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GeoJSON track routes.

use crate::db::TrackQuery;
use crate::error::{AppError, Result};
use crate::services::tracks::{load_tracks, to_feature_collection};
use crate::time_utils::parse_day;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use geojson::FeatureCollection;
use serde::Deserialize;
use std::sync::Arc;

/// Track routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/activity/geojson", get(get_daily_tracks))
}

#[derive(Deserialize)]
struct TracksQuery {
    #[serde(rename = "userId")]
    user_id: Option<String>,
    date: Option<String>,
}

/// Validate query parameters; blank values count as missing.
fn required<'a>(value: Option<&'a str>, message: &str) -> Result<&'a str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest(message.to_string()))
}

/// All GPS tracks recorded by a user on one UTC day.
async fn get_daily_tracks(
    State(state): State<Arc<AppState>>,
    params: std::result::Result<Query<TracksQuery>, QueryRejection>,
) -> Result<Json<FeatureCollection>> {
    let Query(params) = params?;
    let user_id = required(params.user_id.as_deref(), "userId is required")?;
    let date = required(params.date.as_deref(), "date (YYYY-MM-DD) is required")?;
    let day = parse_day(date).ok_or_else(|| {
        AppError::BadRequest(format!("Invalid date '{}': expected YYYY-MM-DD", date))
    })?;

    tracing::info!(user_id, date, "Retrieving GeoJSON tracks");

    let query = TrackQuery::daily(&state.config.influxdb_bucket, user_id, day);
    let tracks = load_tracks(state.store.as_ref(), &query).await?;

    tracing::info!(user_id, date, features = tracks.len(), "GeoJSON tracks built");
    Ok(Json(to_feature_collection(&tracks)))
}
