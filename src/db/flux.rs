// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! InfluxDB v2 store client (Flux queries, CSV results).

use super::influx::{check_response, InfluxConnection};
use super::{Row, StoreError, TimeSeriesStore, TrackQuery, TIME_COLUMN};
use crate::models::{Point, WritePrecision};
use async_trait::async_trait;
use serde_json::Value;

/// Columns Flux adds to every table that carry no sample data.
const BOOKKEEPING_COLUMNS: &[&str] = &["", "result", "table", "_start", "_stop", "_measurement"];

#[derive(Clone)]
pub struct FluxStore {
    conn: InfluxConnection,
}

impl FluxStore {
    pub fn new(conn: InfluxConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl TimeSeriesStore for FluxStore {
    async fn write(
        &self,
        bucket: &str,
        points: &[Point],
        precision: WritePrecision,
    ) -> Result<(), StoreError> {
        self.conn.write_points(bucket, points, precision).await
    }

    async fn query(&self, query: &TrackQuery) -> Result<Vec<Row>, StoreError> {
        let flux = query.to_flux();
        tracing::debug!(query = %flux, "Executing Flux query");

        let body = serde_json::json!({
            "query": flux,
            "type": "flux",
            "dialect": {
                "header": true,
                "annotations": [],
                "delimiter": ","
            }
        });

        let response = self
            .conn
            .http
            .post(format!("{}/api/v2/query", self.conn.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Token {}", self.conn.token),
            )
            .header(reqwest::header::ACCEPT, "application/csv")
            .query(&[("org", self.conn.org.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let text = check_response(response)
            .await?
            .text()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        parse_flux_csv(&text)
    }

    fn dialect(&self) -> &'static str {
        "flux"
    }
}

/// Parse un-annotated Flux CSV into rows.
///
/// A response holds one or more tables separated by blank lines, each
/// starting with its own header row.
pub fn parse_flux_csv(text: &str) -> Result<Vec<Row>, StoreError> {
    let mut rows = Vec::new();
    let mut header: Option<Vec<String>> = None;

    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            header = None;
            continue;
        }

        let cells = split_csv_line(line)?;
        let Some(columns) = header.as_ref() else {
            header = Some(cells);
            continue;
        };

        if cells.len() != columns.len() {
            return Err(StoreError::Decode(format!(
                "CSV row has {} cells, header has {}",
                cells.len(),
                columns.len()
            )));
        }

        let mut row = Row::new();
        for (column, cell) in columns.iter().zip(cells) {
            if BOOKKEEPING_COLUMNS.contains(&column.as_str()) {
                continue;
            }
            let key = if column == "_time" {
                TIME_COLUMN.to_string()
            } else {
                column.clone()
            };
            let value = if cell.is_empty() {
                Value::Null
            } else {
                Value::String(cell)
            };
            row.insert(key, value);
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Split one CSV record, honouring double-quoted cells with `""` escapes.
fn split_csv_line(line: &str) -> Result<Vec<String>, StoreError> {
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if cell.is_empty() => in_quotes = true,
            (',', false) => cells.push(std::mem::take(&mut cell)),
            (c, _) => cell.push(c),
        }
    }

    if in_quotes {
        return Err(StoreError::Decode("unterminated quoted CSV cell".to_string()));
    }
    cells.push(cell);
    Ok(cells)
}
