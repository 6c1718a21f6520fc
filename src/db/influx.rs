// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP connection to InfluxDB shared by both query dialects.
//!
//! Writes always go through the v2 write endpoint, which InfluxDB 3 also
//! serves, so only the query path differs between dialects.

use super::{line_protocol, StoreError};
use crate::config::Config;
use crate::models::{Point, WritePrecision};

/// Long-lived InfluxDB HTTP client. Cheap to clone; the underlying
/// connection pool is shared.
#[derive(Clone)]
pub struct InfluxConnection {
    pub(crate) http: reqwest::Client,
    pub(crate) base_url: String,
    pub(crate) token: String,
    pub(crate) org: String,
}

impl InfluxConnection {
    pub fn new(base_url: &str, token: &str, org: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            org: org.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.influxdb_url,
            &config.influxdb_token,
            &config.influxdb_org,
        )
    }

    /// Write points as line protocol.
    pub async fn write_points(
        &self,
        bucket: &str,
        points: &[Point],
        precision: WritePrecision,
    ) -> Result<(), StoreError> {
        let body = line_protocol::encode_batch(points);
        if body.is_empty() {
            tracing::debug!(bucket, "Nothing writable in batch, skipping write");
            return Ok(());
        }

        let url = format!("{}/api/v2/write", self.base_url);
        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, format!("Token {}", self.token))
            .header(reqwest::header::CONTENT_TYPE, "text/plain; charset=utf-8")
            .query(&[
                ("org", self.org.as_str()),
                ("bucket", bucket),
                ("precision", precision.as_str()),
            ])
            .body(body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        check_response(response).await?;
        Ok(())
    }
}

/// Map a non-success response to a [`StoreError`]; pass successes through.
pub(crate) async fn check_response(
    response: reqwest::Response,
) -> Result<reqwest::Response, StoreError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
        tracing::warn!("InfluxDB unavailable (503)");
        return Err(StoreError::Unavailable(body));
    }

    Err(StoreError::Rejected {
        status: status.as_u16(),
        body,
    })
}
