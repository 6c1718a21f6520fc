// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Garmin activity payloads as pushed by the Garmin Health API.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const USER_ID: &str = "userId";
pub const ACTIVITY_TYPE: &str = "activityType";
pub const ACTIVITY_ID: &str = "activityId";
pub const DEVICE_NAME: &str = "deviceName";
pub const START_TIME_IN_SECONDS: &str = "startTimeInSeconds";

/// A flat activity or sample record.
///
/// Garmin adds measurement fields over time, so everything beyond the
/// handful of keys used for tagging is carried through untyped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(pub Map<String, Value>);

impl Record {
    /// Value for `key`, treating JSON `null` as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    /// Activity type, if present as a string.
    pub fn activity_type(&self) -> Option<&str> {
        self.get(ACTIVITY_TYPE).and_then(Value::as_str)
    }

    /// Entries whose key is not excluded and whose value is not null.
    pub fn fields_excluding<'a>(
        &'a self,
        excluded: &'a [&'a str],
    ) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.0
            .iter()
            .filter(move |(k, v)| !v.is_null() && !excluded.contains(&k.as_str()))
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        self.0.insert(key.to_string(), value);
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// One activity with its per-second samples.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetail {
    #[serde(default)]
    pub user_id: Option<Value>,
    #[serde(default)]
    pub activity_id: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: Record,
    #[serde(default, deserialize_with = "null_as_default")]
    pub samples: Vec<Record>,
}

impl ActivityDetail {
    /// Tag values shared by the detail summary point and every sample point.
    ///
    /// `userId` lives on the detail envelope, everything else on the summary.
    pub fn tag_source(&self) -> Record {
        let mut tags = Record::default();
        let user_id = self.user_id.clone().filter(|v| !v.is_null());
        if let Some(user_id) = user_id.or_else(|| self.summary.get(USER_ID).cloned()) {
            tags.insert(USER_ID, user_id);
        }
        let activity_id = self.summary.get(ACTIVITY_ID).cloned().or_else(|| {
            self.activity_id.clone().filter(|v| !v.is_null())
        });
        if let Some(activity_id) = activity_id {
            tags.insert(ACTIVITY_ID, activity_id);
        }
        for key in [ACTIVITY_TYPE, DEVICE_NAME] {
            if let Some(value) = self.summary.get(key) {
                tags.insert(key, value.clone());
            }
        }
        tags
    }
}

/// `POST /activity` body.
#[derive(Debug, Default, Deserialize)]
pub struct SummaryBatch {
    #[serde(default, deserialize_with = "null_as_default")]
    pub activities: Vec<Record>,
}

/// `POST /activity/details` body.
#[derive(Debug, Default, Deserialize)]
pub struct DetailBatch {
    #[serde(default, rename = "activityDetails", deserialize_with = "null_as_default")]
    pub activity_details: Vec<ActivityDetail>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
