// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Point construction from activity records.
//!
//! Each measurement has a fixed shape: which keys become tags, which keys
//! are kept out of the field set, and whether the fields are stored as one
//! JSON blob or individually.

use crate::models::activity::{
    Record, ACTIVITY_ID, ACTIVITY_TYPE, DEVICE_NAME, START_TIME_IN_SECONDS, USER_ID,
};
use crate::models::{FieldValue, Measurement, Point};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Name of the single field holding a summary's JSON blob.
pub const DATA_FIELD: &str = "data";

const SUMMARY_TAGS: &[&str] = &[USER_ID, ACTIVITY_TYPE, ACTIVITY_ID, DEVICE_NAME];
const SAMPLE_TAGS: &[&str] = &[USER_ID, ACTIVITY_TYPE, ACTIVITY_ID];

/// How a record's remaining fields are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEncoding {
    /// All fields serialized into one JSON string field named `data`
    JsonBlob,
    /// One typed field per key
    Individual,
}

/// Fixed shape of the points written to one measurement.
#[derive(Debug, Clone, Copy)]
pub struct PointShape {
    pub measurement: Measurement,
    pub tag_keys: &'static [&'static str],
    pub excluded_fields: &'static [&'static str],
    pub encoding: FieldEncoding,
    pub time_key: &'static str,
}

/// `garmin_activity`: one point per pushed activity summary.
pub const ACTIVITY_SUMMARY: PointShape = PointShape {
    measurement: Measurement::Activity,
    tag_keys: SUMMARY_TAGS,
    excluded_fields: SUMMARY_TAGS,
    encoding: FieldEncoding::JsonBlob,
    time_key: START_TIME_IN_SECONDS,
};

/// `garmin_activity_details`: the summary half of an activity detail.
pub const DETAIL_SUMMARY: PointShape = PointShape {
    measurement: Measurement::ActivityDetails,
    tag_keys: SUMMARY_TAGS,
    excluded_fields: SUMMARY_TAGS,
    encoding: FieldEncoding::JsonBlob,
    time_key: START_TIME_IN_SECONDS,
};

/// `garmin_activity_samples`: one point per sample of an activity detail.
pub const SAMPLE: PointShape = PointShape {
    measurement: Measurement::ActivitySamples,
    tag_keys: SAMPLE_TAGS,
    excluded_fields: SAMPLE_TAGS,
    encoding: FieldEncoding::Individual,
    time_key: START_TIME_IN_SECONDS,
};

/// Errors from building a point.
#[derive(Debug, thiserror::Error)]
pub enum PointError {
    #[error("{measurement} record is missing required field '{field}'")]
    MissingTime {
        measurement: Measurement,
        field: &'static str,
    },

    #[error("{measurement} record has non-integer '{field}': {value}")]
    InvalidTime {
        measurement: Measurement,
        field: &'static str,
        value: String,
    },

    #[error("failed to encode {measurement} fields: {source}")]
    Encode {
        measurement: Measurement,
        #[source]
        source: serde_json::Error,
    },
}

impl PointShape {
    /// Build a point whose tags come from the record itself.
    pub fn build(&self, record: &Record) -> Result<Point, PointError> {
        self.build_with_tags(record, record)
    }

    /// Build a point with tags read from `tag_source` and fields and time
    /// read from `record`.
    pub fn build_with_tags(&self, tag_source: &Record, record: &Record) -> Result<Point, PointError> {
        let time = self.extract_time(record)?;

        let tags: BTreeMap<String, String> = self
            .tag_keys
            .iter()
            .filter_map(|key| tag_source.get(key).map(|v| (key.to_string(), tag_value(v))))
            .collect();

        let remaining = record.fields_excluding(self.excluded_fields);
        let fields = match self.encoding {
            FieldEncoding::JsonBlob => {
                let blob: Map<String, Value> =
                    remaining.map(|(k, v)| (k.clone(), v.clone())).collect();
                let encoded = serde_json::to_string(&blob).map_err(|source| PointError::Encode {
                    measurement: self.measurement,
                    source,
                })?;
                BTreeMap::from([(DATA_FIELD.to_string(), FieldValue::String(encoded))])
            }
            FieldEncoding::Individual => remaining
                .filter_map(|(k, v)| FieldValue::from_json(v).map(|fv| (k.clone(), fv)))
                .collect(),
        };

        Ok(Point {
            measurement: self.measurement,
            tags,
            fields,
            time,
        })
    }

    fn extract_time(&self, record: &Record) -> Result<i64, PointError> {
        let value = record.get(self.time_key).ok_or(PointError::MissingTime {
            measurement: self.measurement,
            field: self.time_key,
        })?;

        value
            .as_i64()
            .or_else(|| whole_seconds(value.as_f64()?))
            .ok_or_else(|| PointError::InvalidTime {
                measurement: self.measurement,
                field: self.time_key,
                value: value.to_string(),
            })
    }
}

/// Epoch seconds sent as a float, e.g. `1732788000.0`. Fractional values
/// are rejected since points are written at second precision.
fn whole_seconds(seconds: f64) -> Option<i64> {
    let in_range = seconds >= i64::MIN as f64 && seconds < i64::MAX as f64;
    (seconds.fract() == 0.0 && in_range).then_some(seconds as i64)
}

/// Tags are strings; Garmin sends some identifiers as numbers.
fn tag_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_summary_point_packs_fields_into_blob() {
        let activity = record(json!({
            "userId": "u1",
            "activityType": "RUNNING",
            "activityId": 5001968355_u64,
            "deviceName": null,
            "startTimeInSeconds": 1732788000,
            "durationInSeconds": 1800,
            "averageHeartRateInBeatsPerMinute": null
        }));

        let point = ACTIVITY_SUMMARY.build(&activity).unwrap();

        assert_eq!(point.measurement, Measurement::Activity);
        assert_eq!(point.time, 1732788000);
        assert_eq!(point.tag("userId"), Some("u1"));
        assert_eq!(point.tag("activityId"), Some("5001968355"));
        assert_eq!(point.tag("deviceName"), None);
        assert_eq!(point.fields.len(), 1);

        let Some(FieldValue::String(data)) = point.field(DATA_FIELD) else {
            panic!("expected string data field");
        };
        let blob: Value = serde_json::from_str(data).unwrap();
        assert_eq!(
            blob,
            json!({ "startTimeInSeconds": 1732788000, "durationInSeconds": 1800 })
        );
    }

    #[test]
    fn test_sample_point_keeps_typed_fields() {
        let tags = record(json!({ "userId": "u1", "activityId": "a1", "activityType": "CYCLING" }));
        let sample = record(json!({
            "startTimeInSeconds": 1732788001,
            "latitudeInDegree": 37.42,
            "longitudeInDegree": -122.08,
            "heartRate": 141,
            "powerInWatts": null,
            "activityId": "ignored"
        }));

        let point = SAMPLE.build_with_tags(&tags, &sample).unwrap();

        assert_eq!(point.measurement, Measurement::ActivitySamples);
        assert_eq!(point.tag("activityId"), Some("a1"));
        assert_eq!(point.tag("activityType"), Some("CYCLING"));
        assert_eq!(point.field("latitudeInDegree"), Some(&FieldValue::Float(37.42)));
        assert_eq!(point.field("heartRate"), Some(&FieldValue::Integer(141)));
        assert_eq!(
            point.field("startTimeInSeconds"),
            Some(&FieldValue::Integer(1732788001))
        );
        assert!(point.field("powerInWatts").is_none());
        assert!(point.field("activityId").is_none());
    }

    #[test]
    fn test_missing_time_is_an_error() {
        let activity = record(json!({ "userId": "u1", "startTimeInSeconds": null }));
        let err = ACTIVITY_SUMMARY.build(&activity).unwrap_err();
        assert!(matches!(err, PointError::MissingTime { .. }));
        assert!(err.to_string().contains("startTimeInSeconds"));
    }

    #[test]
    fn test_non_integer_time_is_an_error() {
        let activity = record(json!({ "startTimeInSeconds": "yesterday" }));
        assert!(matches!(
            ACTIVITY_SUMMARY.build(&activity),
            Err(PointError::InvalidTime { .. })
        ));
    }

    #[test]
    fn test_whole_float_time_is_accepted() {
        let activity = record(json!({ "startTimeInSeconds": 1732788000.0 }));
        assert_eq!(ACTIVITY_SUMMARY.build(&activity).unwrap().time, 1732788000);

        let activity = record(json!({ "startTimeInSeconds": 1732788000.5 }));
        assert!(matches!(
            ACTIVITY_SUMMARY.build(&activity),
            Err(PointError::InvalidTime { .. })
        ));
    }

    #[test]
    fn test_null_values_never_reach_the_point() {
        let tags = record(json!({ "userId": null, "activityId": null, "activityType": null }));
        let sample = record(json!({ "startTimeInSeconds": 1, "a": null, "b": null }));
        let point = SAMPLE.build_with_tags(&tags, &sample).unwrap();
        assert!(point.tags.is_empty());
        assert_eq!(point.fields.len(), 1);
    }
}
