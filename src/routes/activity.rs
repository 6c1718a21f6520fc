// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ingest routes for Garmin activity pushes.

use super::SuccessResponse;
use crate::error::{AppError, Result};
use crate::models::{DetailBatch, SummaryBatch};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use std::sync::Arc;

/// Ingest routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/activity", post(ingest_summaries))
        .route("/activity/details", post(ingest_details))
}

/// Store activity summaries (one point each, single write).
async fn ingest_summaries(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SummaryBatch>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let Json(batch) = payload?;
    if batch.activities.is_empty() {
        return Err(AppError::BadRequest("No activities provided".to_string()));
    }

    let result = state.ingestor.ingest_summaries(&batch.activities).await?;
    tracing::info!(
        received = batch.activities.len(),
        written = result.summary_points,
        filtered = result.filtered,
        "Activity summaries processed"
    );

    Ok(Json(SuccessResponse::new(
        "Activity summaries processed successfully",
    )))
}

/// Store activity details: summary points, then sample points, batched.
async fn ingest_details(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<DetailBatch>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let Json(batch) = payload?;
    if batch.activity_details.is_empty() {
        return Err(AppError::BadRequest(
            "No activity details provided".to_string(),
        ));
    }

    let result = state.ingestor.ingest_details(&batch.activity_details).await?;
    tracing::info!(
        received = batch.activity_details.len(),
        summary_points = result.summary_points,
        sample_points = result.sample_points,
        write_calls = result.write_calls,
        filtered = result.filtered,
        "Activity details processed"
    );

    Ok(Json(SuccessResponse::new(
        "Activity details processed successfully",
    )))
}
