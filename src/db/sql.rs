// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! InfluxDB 3 store client (SQL queries, JSON results).

use super::influx::{check_response, InfluxConnection};
use super::{Row, StoreError, TimeSeriesStore, TrackQuery};
use crate::models::{Point, WritePrecision};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Clone)]
pub struct SqlStore {
    conn: InfluxConnection,
}

impl SqlStore {
    pub fn new(conn: InfluxConnection) -> Self {
        Self { conn }
    }
}

#[derive(Serialize)]
struct SqlQueryRequest<'a> {
    db: &'a str,
    q: &'a str,
    format: &'static str,
}

#[async_trait]
impl TimeSeriesStore for SqlStore {
    async fn write(
        &self,
        bucket: &str,
        points: &[Point],
        precision: WritePrecision,
    ) -> Result<(), StoreError> {
        self.conn.write_points(bucket, points, precision).await
    }

    async fn query(&self, query: &TrackQuery) -> Result<Vec<Row>, StoreError> {
        let sql = query.to_sql();
        tracing::debug!(query = %sql, "Executing SQL query");

        let response = self
            .conn
            .http
            .post(format!("{}/api/v3/query_sql", self.conn.base_url))
            .bearer_auth(&self.conn.token)
            .json(&SqlQueryRequest {
                db: &query.bucket,
                q: &sql,
                format: "json",
            })
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        check_response(response)
            .await?
            .json::<Vec<Row>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    fn dialect(&self) -> &'static str {
        "sql"
    }
}
