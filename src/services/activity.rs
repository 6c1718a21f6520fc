// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity ingestion service.
//!
//! Handles the write workflow:
//! 1. Drop activities whose type is not allowed
//! 2. Build summary points (and sample points for details)
//! 3. Write them to the store

use crate::db::TimeSeriesStore;
use crate::error::Result;
use crate::models::{ActivityDetail, Point, Record, WritePrecision};
use crate::services::batch::write_in_batches;
use crate::services::points::{ACTIVITY_SUMMARY, DETAIL_SUMMARY, SAMPLE};
use crate::services::ActivityFilter;
use std::sync::Arc;

/// Turns Garmin pushes into points and writes them.
#[derive(Clone)]
pub struct ActivityIngestor {
    store: Arc<dyn TimeSeriesStore>,
    filter: ActivityFilter,
    bucket: String,
}

/// What an ingest call wrote.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestResult {
    pub summary_points: usize,
    pub sample_points: usize,
    /// Activities dropped by the allow-list
    pub filtered: usize,
    pub write_calls: usize,
}

impl ActivityIngestor {
    pub fn new(store: Arc<dyn TimeSeriesStore>, filter: ActivityFilter, bucket: String) -> Self {
        Self {
            store,
            filter,
            bucket,
        }
    }

    /// Write one `garmin_activity` point per allowed summary, in a single
    /// write call.
    pub async fn ingest_summaries(&self, activities: &[Record]) -> Result<IngestResult> {
        let mut result = IngestResult::default();
        let mut points = Vec::with_capacity(activities.len());

        for activity in activities {
            if !self.filter.allows(activity.activity_type()) {
                result.filtered += 1;
                continue;
            }
            points.push(ACTIVITY_SUMMARY.build(activity)?);
        }

        if !points.is_empty() {
            tracing::info!(points = points.len(), "Writing activity summary points");
            self.store
                .write(&self.bucket, &points, WritePrecision::Seconds)
                .await?;
            result.write_calls = 1;
        }

        result.summary_points = points.len();
        Ok(result)
    }

    /// Write a `garmin_activity_details` point per allowed detail and a
    /// `garmin_activity_samples` point per sample.
    ///
    /// Summaries are written (batched) before samples. A failure part-way
    /// leaves earlier batches committed.
    pub async fn ingest_details(&self, details: &[ActivityDetail]) -> Result<IngestResult> {
        let mut result = IngestResult::default();
        let mut summary_points: Vec<Point> = Vec::new();
        let mut sample_points: Vec<Point> = Vec::new();

        for detail in details {
            if !self.filter.allows(detail.summary.activity_type()) {
                result.filtered += 1;
                continue;
            }

            let tags = detail.tag_source();
            summary_points.push(DETAIL_SUMMARY.build_with_tags(&tags, &detail.summary)?);
            for sample in &detail.samples {
                sample_points.push(SAMPLE.build_with_tags(&tags, sample)?);
            }
        }

        if !summary_points.is_empty() {
            tracing::info!(points = summary_points.len(), "Writing summary points");
            result.write_calls += write_in_batches(
                self.store.as_ref(),
                &self.bucket,
                &summary_points,
                WritePrecision::Seconds,
            )
            .await?;
        }

        if !sample_points.is_empty() {
            tracing::info!(points = sample_points.len(), "Writing sample points");
            result.write_calls += write_in_batches(
                self.store.as_ref(),
                &self.bucket,
                &sample_points,
                WritePrecision::Seconds,
            )
            .await?;
        }

        result.summary_points = summary_points.len();
        result.sample_points = sample_points.len();
        Ok(result)
    }
}
