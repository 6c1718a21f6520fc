// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process store for tests and offline runs.

use super::{Row, StoreError, TimeSeriesStore, TrackQuery, TIME_COLUMN};
use crate::models::activity::USER_ID;
use crate::models::{Point, WritePrecision};
use crate::time_utils::format_utc_rfc3339;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

/// One recorded `write` call.
#[derive(Debug, Clone)]
pub struct WriteCall {
    pub bucket: String,
    pub precision: WritePrecision,
    pub points: Vec<Point>,
}

#[derive(Default)]
struct MemoryState {
    writes: Vec<WriteCall>,
    /// Fail the write call with this (zero-based) index.
    fail_write_at: Option<(usize, StoreError)>,
    write_attempts: usize,
    fail_queries: Option<StoreError>,
    /// Rows returned verbatim instead of the stored points.
    canned_rows: Option<Vec<Row>>,
}

/// Store that keeps every committed write in memory.
///
/// Clones share state, so a test can keep a handle while the app owns
/// another.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Committed write calls, in call order.
    pub fn writes(&self) -> Vec<WriteCall> {
        self.lock().writes.clone()
    }

    /// All committed points, in write order.
    pub fn points(&self) -> Vec<Point> {
        self.lock()
            .writes
            .iter()
            .flat_map(|w| w.points.iter().cloned())
            .collect()
    }

    /// Make the `index`-th write call (zero-based, counting failures) fail.
    pub fn fail_write_at(&self, index: usize, error: StoreError) {
        self.lock().fail_write_at = Some((index, error));
    }

    /// Make every query fail.
    pub fn fail_queries(&self, error: StoreError) {
        self.lock().fail_queries = Some(error);
    }

    /// Answer queries with these rows instead of stored points.
    pub fn set_query_rows(&self, rows: Vec<Row>) {
        self.lock().canned_rows = Some(rows);
    }
}

#[async_trait]
impl TimeSeriesStore for MemoryStore {
    async fn write(
        &self,
        bucket: &str,
        points: &[Point],
        precision: WritePrecision,
    ) -> Result<(), StoreError> {
        let mut state = self.lock();
        let attempt = state.write_attempts;
        state.write_attempts += 1;

        if let Some((index, error)) = &state.fail_write_at {
            if *index == attempt {
                return Err(error.clone());
            }
        }

        state.writes.push(WriteCall {
            bucket: bucket.to_string(),
            precision,
            points: points.to_vec(),
        });
        Ok(())
    }

    async fn query(&self, query: &TrackQuery) -> Result<Vec<Row>, StoreError> {
        let state = self.lock();
        if let Some(error) = &state.fail_queries {
            return Err(error.clone());
        }
        if let Some(rows) = &state.canned_rows {
            return Ok(rows.clone());
        }

        let start = query.start.timestamp();
        let stop = query.stop.timestamp();

        let mut matching: Vec<&Point> = state
            .writes
            .iter()
            .filter(|w| w.bucket == query.bucket)
            .flat_map(|w| w.points.iter())
            .filter(|p| p.measurement == query.measurement)
            .filter(|p| p.tag(USER_ID) == Some(query.user_id.as_str()))
            .filter(|p| p.time >= start && p.time < stop)
            .collect();
        // Stable sort keeps insertion order for equal timestamps.
        matching.sort_by_key(|p| p.time);

        Ok(matching.into_iter().map(|p| to_row(p, query)).collect())
    }

    fn dialect(&self) -> &'static str {
        "memory"
    }
}

fn to_row(point: &Point, query: &TrackQuery) -> Row {
    let mut row = Row::new();
    for (key, value) in &point.tags {
        row.insert(key.clone(), Value::from(value.as_str()));
    }
    for field in &query.fields {
        let value = point.field(field).map_or(Value::Null, |v| v.to_json());
        row.insert(field.to_string(), value);
    }
    let time = chrono::DateTime::from_timestamp(point.time, 0)
        .map_or(Value::Null, |t| Value::from(format_utc_rfc3339(t)));
    row.insert(TIME_COLUMN.to_string(), time);
    row
}
