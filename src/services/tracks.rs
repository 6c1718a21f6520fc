// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GPS track reconstruction from stored samples.

use crate::db::{Row, TimeSeriesStore, TrackQuery, TIME_COLUMN};
use crate::error::Result;
use crate::models::activity::{ACTIVITY_ID, ACTIVITY_TYPE};
use crate::models::GeoTrack;
use crate::time_utils::parse_store_timestamp;
use geojson::FeatureCollection;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Instant;

pub const LATITUDE_FIELD: &str = "latitudeInDegree";
pub const LONGITUDE_FIELD: &str = "longitudeInDegree";

/// Errors from track aggregation. Any of these fails the whole request.
#[derive(Debug, thiserror::Error)]
pub enum TrackError {
    #[error("invalid {field} value {value} for activity {activity_id}")]
    InvalidCoordinate {
        activity_id: String,
        field: &'static str,
        value: String,
    },
}

/// Groups query rows into one track per activity.
///
/// Rows lacking an activity id, latitude or longitude are skipped.
/// Coordinates keep row order; tracks keep order of first appearance.
#[derive(Debug, Default)]
pub struct TrackAggregator {
    tracks: Vec<GeoTrack>,
    index: HashMap<String, usize>,
    skipped_rows: usize,
}

impl TrackAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: &Row) -> std::result::Result<(), TrackError> {
        let (Some(activity_id), Some(latitude), Some(longitude)) = (
            non_null(row, ACTIVITY_ID),
            non_null(row, LATITUDE_FIELD),
            non_null(row, LONGITUDE_FIELD),
        ) else {
            self.skipped_rows += 1;
            return Ok(());
        };

        let activity_id = match activity_id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let latitude = coordinate(&activity_id, LATITUDE_FIELD, latitude)?;
        let longitude = coordinate(&activity_id, LONGITUDE_FIELD, longitude)?;
        // NaN and infinities parse but are not positions; the row adds
        // neither a coordinate nor a timestamp.
        if !latitude.is_finite() || !longitude.is_finite() {
            self.skipped_rows += 1;
            return Ok(());
        }

        let tracks = &mut self.tracks;
        let slot = *self.index.entry(activity_id.clone()).or_insert_with(|| {
            tracks.push(GeoTrack::new(activity_id));
            tracks.len() - 1
        });
        let track = &mut self.tracks[slot];

        track.path.0.push((longitude, latitude).into());
        if track.activity_type.is_none() {
            track.activity_type = non_null(row, ACTIVITY_TYPE).map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            });
        }
        if let Some(time) = row
            .get(TIME_COLUMN)
            .and_then(Value::as_str)
            .and_then(parse_store_timestamp)
        {
            track.observe_time(time);
        }

        Ok(())
    }

    /// Rows ignored for lacking a required column or a finite position.
    pub fn skipped_rows(&self) -> usize {
        self.skipped_rows
    }

    /// Finished tracks, in order of first appearance.
    pub fn finish(self) -> Vec<GeoTrack> {
        self.tracks
            .into_iter()
            .filter(|track| !track.is_empty())
            .collect()
    }
}

/// Aggregate rows into tracks in one pass.
pub fn aggregate<'a, I>(rows: I) -> std::result::Result<Vec<GeoTrack>, TrackError>
where
    I: IntoIterator<Item = &'a Row>,
{
    let mut aggregator = TrackAggregator::new();
    for row in rows {
        aggregator.push(row)?;
    }
    Ok(aggregator.finish())
}

/// One LineString feature per track.
pub fn to_feature_collection(tracks: &[GeoTrack]) -> FeatureCollection {
    FeatureCollection {
        bbox: None,
        features: tracks.iter().map(GeoTrack::to_feature).collect(),
        foreign_members: None,
    }
}

/// Run `query` against the store and rebuild the tracks it covers.
pub async fn load_tracks(store: &dyn TimeSeriesStore, query: &TrackQuery) -> Result<Vec<GeoTrack>> {
    let started = Instant::now();
    let rows = store.query(query).await?;
    tracing::info!(
        dialect = store.dialect(),
        user_id = %query.user_id,
        rows = rows.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Track query executed"
    );

    let mut aggregator = TrackAggregator::new();
    for row in &rows {
        aggregator.push(row)?;
    }
    if aggregator.skipped_rows() > 0 {
        tracing::debug!(
            skipped = aggregator.skipped_rows(),
            "Skipped rows without activity id or coordinates"
        );
    }

    Ok(aggregator.finish())
}

fn non_null<'a>(row: &'a Row, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|v| !v.is_null())
}

fn coordinate(
    activity_id: &str,
    field: &'static str,
    value: &Value,
) -> std::result::Result<f64, TrackError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| TrackError::InvalidCoordinate {
        activity_id: activity_id.to_string(),
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => panic!("row must be an object"),
        }
    }

    fn coords(track: &GeoTrack) -> Vec<(f64, f64)> {
        track.path.0.iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_rows_grouped_by_activity_in_order() {
        let rows = vec![
            row(json!({"activityId": "a1", "activityType": "RUNNING", "latitudeInDegree": 1.0, "longitudeInDegree": 10.0, "time": "2024-11-28T10:00:00Z"})),
            row(json!({"activityId": "a2", "latitudeInDegree": 5.0, "longitudeInDegree": 50.0, "time": "2024-11-28T11:00:00Z"})),
            row(json!({"activityId": "a1", "latitudeInDegree": 2.0, "longitudeInDegree": 20.0, "time": "2024-11-28T10:00:01Z"})),
            row(json!({"activityId": "a1", "latitudeInDegree": 3.0, "longitudeInDegree": 30.0, "time": "2024-11-28T09:59:59Z"})),
        ];

        let tracks = aggregate(&rows).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].activity_id, "a1");
        assert_eq!(tracks[0].activity_type.as_deref(), Some("RUNNING"));
        assert_eq!(coords(&tracks[0]), vec![(10.0, 1.0), (20.0, 2.0), (30.0, 3.0)]);
        assert_eq!(
            tracks[0].start_time,
            parse_store_timestamp("2024-11-28T09:59:59Z")
        );
        assert_eq!(
            tracks[0].end_time,
            parse_store_timestamp("2024-11-28T10:00:01Z")
        );
        assert_eq!(tracks[1].activity_id, "a2");
        assert_eq!(tracks[1].activity_type, None);
    }

    #[test]
    fn test_rows_missing_required_columns_are_skipped() {
        let rows = vec![
            row(json!({"activityId": "a1", "latitudeInDegree": null, "longitudeInDegree": 10.0})),
            row(json!({"activityId": "a1", "longitudeInDegree": 10.0})),
            row(json!({"latitudeInDegree": 1.0, "longitudeInDegree": 10.0})),
            row(json!({"activityId": "a1", "latitudeInDegree": 0.0, "longitudeInDegree": 0.0})),
        ];

        let mut aggregator = TrackAggregator::new();
        for r in &rows {
            aggregator.push(r).unwrap();
        }
        assert_eq!(aggregator.skipped_rows(), 3);

        let tracks = aggregator.finish();
        assert_eq!(tracks.len(), 1);
        assert_eq!(coords(&tracks[0]), vec![(0.0, 0.0)]);
    }

    #[test]
    fn test_activity_without_valid_rows_produces_no_track() {
        let rows = vec![row(
            json!({"activityId": "a1", "latitudeInDegree": null, "longitudeInDegree": null}),
        )];
        assert!(aggregate(&rows).unwrap().is_empty());
    }

    #[test]
    fn test_string_coordinates_are_parsed() {
        let rows = vec![row(
            json!({"activityId": 77, "latitudeInDegree": "37.5", "longitudeInDegree": " -122.25 "}),
        )];
        let tracks = aggregate(&rows).unwrap();
        assert_eq!(tracks[0].activity_id, "77");
        assert_eq!(coords(&tracks[0]), vec![(-122.25, 37.5)]);
    }

    #[test]
    fn test_unparseable_coordinate_fails_everything() {
        let rows = vec![
            row(json!({"activityId": "a1", "latitudeInDegree": 1.0, "longitudeInDegree": 1.0})),
            row(json!({"activityId": "a1", "latitudeInDegree": "north", "longitudeInDegree": 1.0})),
        ];
        let err = aggregate(&rows).unwrap_err();
        assert!(err.to_string().contains("latitudeInDegree"));
    }

    #[test]
    fn test_non_finite_coordinates_are_dropped() {
        let rows = vec![
            row(json!({"activityId": "a1", "latitudeInDegree": "NaN", "longitudeInDegree": 1.0})),
            row(json!({"activityId": "a2", "latitudeInDegree": "inf", "longitudeInDegree": 1.0, "time": "2024-11-28T09:00:00Z"})),
            row(json!({"activityId": "a2", "latitudeInDegree": 2.0, "longitudeInDegree": 1.0, "time": "2024-11-28T10:00:00Z"})),
            row(json!({"activityId": "a2", "latitudeInDegree": "NaN", "longitudeInDegree": 1.0, "time": "2024-11-28T11:00:00Z"})),
        ];

        let mut aggregator = TrackAggregator::new();
        for r in &rows {
            aggregator.push(r).unwrap();
        }
        assert_eq!(aggregator.skipped_rows(), 3);

        let tracks = aggregator.finish();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].activity_id, "a2");
        assert_eq!(tracks[0].len(), 1);

        // Dropped rows do not widen the time span.
        let at_ten = parse_store_timestamp("2024-11-28T10:00:00Z");
        assert_eq!(tracks[0].start_time, at_ten);
        assert_eq!(tracks[0].end_time, at_ten);
    }

    // A single sample still yields a LineString with one position. GeoJSON
    // requires two positions for a valid LineString; consumers must cope.
    #[test]
    fn test_single_point_track_is_kept() {
        let rows = vec![row(
            json!({"activityId": "a1", "latitudeInDegree": 1.0, "longitudeInDegree": 2.0, "time": "2024-11-28T10:00:00Z"}),
        )];
        let tracks = aggregate(&rows).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].start_time, tracks[0].end_time);

        let collection = to_feature_collection(&tracks);
        assert_eq!(collection.features.len(), 1);
    }
}
