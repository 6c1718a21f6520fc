// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::db::StoreError;
use crate::services::points::PointError;
use crate::services::tracks::TrackError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Time-series store unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Time-series store error: {0}")]
    Store(String),

    #[error(transparent)]
    Point(#[from] PointError),

    #[error(transparent)]
    Track(#[from] TrackError),
}

impl AppError {
    /// Message returned to callers when the store reports 503.
    pub const UNAVAILABLE_MESSAGE: &'static str =
        "Service temporarily unavailable. Please try again later.";

    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) | AppError::Point(_) | AppError::Track(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => AppError::UpstreamUnavailable(msg),
            other => AppError::Store(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    #[serde(rename = "errorMessage")]
    error_message: String,
    status: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let error_message = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!(error = %msg, "Rejected request");
                msg.clone()
            }
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!(error = %msg, "Store unavailable");
                Self::UNAVAILABLE_MESSAGE.to_string()
            }
            other => {
                tracing::error!(error = %other, "Request failed");
                other.to_string()
            }
        };

        let body = ErrorResponse {
            error_message,
            status: "error",
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
