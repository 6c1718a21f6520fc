// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Reconstructed GPS path for one activity.

use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use geo::{BoundingRect, LineString};
use geojson::{Feature, Geometry, JsonObject};
use serde_json::Value;

/// Ordered coordinates for one activity plus the time span they cover.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTrack {
    pub activity_id: String,
    pub activity_type: Option<String>,
    /// x = longitude, y = latitude, in row order
    pub path: LineString<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl GeoTrack {
    pub fn new(activity_id: String) -> Self {
        Self {
            activity_id,
            activity_type: None,
            path: LineString::new(Vec::new()),
            start_time: None,
            end_time: None,
        }
    }

    /// Widen the observed time span to include `time`.
    pub fn observe_time(&mut self, time: DateTime<Utc>) {
        self.start_time = Some(self.start_time.map_or(time, |t| t.min(time)));
        self.end_time = Some(self.end_time.map_or(time, |t| t.max(time)));
    }

    pub fn len(&self) -> usize {
        self.path.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.0.is_empty()
    }

    /// GeoJSON LineString feature. A single-coordinate track still yields a
    /// (degenerate) LineString.
    pub fn to_feature(&self) -> Feature {
        let mut properties = JsonObject::new();
        properties.insert(
            "activityId".to_string(),
            Value::from(self.activity_id.as_str()),
        );
        properties.insert(
            "activityType".to_string(),
            self.activity_type.as_deref().map_or(Value::Null, Value::from),
        );
        properties.insert("startTime".to_string(), time_property(self.start_time));
        properties.insert("endTime".to_string(), time_property(self.end_time));

        let bbox = self
            .path
            .bounding_rect()
            .map(|rect| vec![rect.min().x, rect.min().y, rect.max().x, rect.max().y]);

        Feature {
            bbox,
            geometry: Some(Geometry::new(geojson::Value::from(&self.path))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

fn time_property(time: Option<DateTime<Utc>>) -> Value {
    time.map_or(Value::Null, |t| Value::from(format_utc_rfc3339(t)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_feature_carries_properties_and_bbox() {
        let mut track = GeoTrack::new("a1".to_string());
        track.activity_type = Some("RUNNING".to_string());
        track.path.0.push((-122.10, 37.40).into());
        track.path.0.push((-122.00, 37.45).into());
        track.observe_time(Utc.with_ymd_and_hms(2024, 11, 28, 10, 0, 5).unwrap());
        track.observe_time(Utc.with_ymd_and_hms(2024, 11, 28, 10, 0, 0).unwrap());

        let feature = track.to_feature();
        assert_eq!(feature.property("activityId"), Some(&Value::from("a1")));
        assert_eq!(
            feature.property("startTime"),
            Some(&Value::from("2024-11-28T10:00:00Z"))
        );
        assert_eq!(
            feature.property("endTime"),
            Some(&Value::from("2024-11-28T10:00:05Z"))
        );
        assert_eq!(feature.bbox, Some(vec![-122.10, 37.40, -122.00, 37.45]));

        match feature.geometry.map(|g| g.value) {
            Some(geojson::Value::LineString(coords)) => {
                assert_eq!(coords, vec![vec![-122.10, 37.40], vec![-122.00, 37.45]]);
            }
            other => panic!("expected LineString, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_times_serialize_as_null() {
        let mut track = GeoTrack::new("a2".to_string());
        track.path.0.push((1.0, 2.0).into());
        let feature = track.to_feature();
        assert_eq!(feature.property("startTime"), Some(&Value::Null));
        assert_eq!(feature.property("activityType"), Some(&Value::Null));
    }
}
