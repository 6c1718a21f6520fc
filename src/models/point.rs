// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Time-series write unit.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The three measurements the gateway writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measurement {
    /// One point per activity summary
    Activity,
    /// One point per activity detail summary
    ActivityDetails,
    /// One point per sample inside an activity detail
    ActivitySamples,
}

impl Measurement {
    pub fn as_str(&self) -> &'static str {
        match self {
            Measurement::Activity => "garmin_activity",
            Measurement::ActivityDetails => "garmin_activity_details",
            Measurement::ActivitySamples => "garmin_activity_samples",
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timestamp precision sent with every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePrecision {
    #[default]
    Seconds,
}

impl WritePrecision {
    /// Value of the `precision` query parameter on the write API.
    pub fn as_str(&self) -> &'static str {
        match self {
            WritePrecision::Seconds => "s",
        }
    }
}

/// A typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Float(f64),
    Integer(i64),
    UInteger(u64),
    Boolean(bool),
    String(String),
}

impl FieldValue {
    /// Convert a non-null JSON value, keeping numbers numeric.
    ///
    /// Arrays and objects have no field representation and are kept as
    /// their JSON text.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(FieldValue::Integer(i))
                } else if let Some(u) = n.as_u64() {
                    Some(FieldValue::UInteger(u))
                } else {
                    n.as_f64().map(FieldValue::Float)
                }
            }
            Value::String(s) => Some(FieldValue::String(s.clone())),
            Value::Array(_) | Value::Object(_) => Some(FieldValue::String(value.to_string())),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Float(f) => Value::from(*f),
            FieldValue::Integer(i) => Value::from(*i),
            FieldValue::UInteger(u) => Value::from(*u),
            FieldValue::Boolean(b) => Value::from(*b),
            FieldValue::String(s) => Value::from(s.as_str()),
        }
    }
}

/// A single timestamped point: measurement, tags, fields, epoch seconds.
///
/// Tags and fields never hold null values; the builder drops them.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub measurement: Measurement,
    pub tags: BTreeMap<String, String>,
    pub fields: BTreeMap<String, FieldValue>,
    pub time: i64,
}

impl Point {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}
