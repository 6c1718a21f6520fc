// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Track query construction for both store dialects.

use crate::models::activity::{ACTIVITY_ID, ACTIVITY_TYPE, USER_ID};
use crate::models::Measurement;
use crate::services::tracks::{LATITUDE_FIELD, LONGITUDE_FIELD};
use crate::time_utils::{day_window, format_utc_rfc3339};
use chrono::{DateTime, NaiveDate, Utc};

/// Samples of one user inside a half-open time window.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackQuery {
    pub bucket: String,
    pub measurement: Measurement,
    pub user_id: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    /// Field columns to return, besides time and tags
    pub fields: Vec<&'static str>,
}

impl TrackQuery {
    /// GPS samples for `user_id` on the UTC calendar day `day`.
    pub fn daily(bucket: &str, user_id: &str, day: NaiveDate) -> Self {
        let (start, stop) = day_window(day);
        Self {
            bucket: bucket.to_string(),
            measurement: Measurement::ActivitySamples,
            user_id: user_id.to_string(),
            start,
            stop,
            fields: vec![LATITUDE_FIELD, LONGITUDE_FIELD],
        }
    }

    /// Render as Flux. Fields are pivoted into columns, one row per timestamp.
    pub fn to_flux(&self) -> String {
        let field_filter = self
            .fields
            .iter()
            .map(|f| format!("r[\"_field\"] == \"{}\"", flux_escape(f)))
            .collect::<Vec<_>>()
            .join(" or ");

        format!(
            r#"from(bucket: "{bucket}")
  |> range(start: {start}, stop: {stop})
  |> filter(fn: (r) => r["_measurement"] == "{measurement}")
  |> filter(fn: (r) => r["{user_tag}"] == "{user_id}")
  |> filter(fn: (r) => {field_filter})
  |> pivot(rowKey: ["_time"], columnKey: ["_field"], valueColumn: "_value")
  |> sort(columns: ["_time"])"#,
            bucket = flux_escape(&self.bucket),
            start = format_utc_rfc3339(self.start),
            stop = format_utc_rfc3339(self.stop),
            measurement = self.measurement,
            user_tag = USER_ID,
            user_id = flux_escape(&self.user_id),
            field_filter = field_filter,
        )
    }

    /// Render as SQL (InfluxDB 3). The bucket is the database, so it is not
    /// part of the statement.
    pub fn to_sql(&self) -> String {
        let mut columns: Vec<String> = self.fields.iter().map(|f| sql_ident(f)).collect();
        columns.push(sql_ident("time"));
        columns.push(sql_ident(ACTIVITY_ID));
        columns.push(sql_ident(ACTIVITY_TYPE));

        format!(
            "SELECT {columns}\nFROM {table}\nWHERE time >= TIMESTAMP '{start}'\n  AND time < TIMESTAMP '{stop}'\n  AND {user_tag} = '{user_id}'\nORDER BY time",
            columns = columns.join(", "),
            table = sql_ident(self.measurement.as_str()),
            start = format_utc_rfc3339(self.start),
            stop = format_utc_rfc3339(self.stop),
            user_tag = sql_ident(USER_ID),
            user_id = self.user_id.replace('\'', "''"),
        )
    }
}

fn flux_escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

fn sql_ident(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(user_id: &str) -> TrackQuery {
        TrackQuery::daily(
            "garmin",
            user_id,
            NaiveDate::from_ymd_opt(2024, 11, 28).unwrap(),
        )
    }

    #[test]
    fn test_flux_query_shape() {
        let flux = query("7b0b96a0").to_flux();
        assert!(flux.starts_with("from(bucket: \"garmin\")"));
        assert!(flux.contains("range(start: 2024-11-28T00:00:00Z, stop: 2024-11-29T00:00:00Z)"));
        assert!(flux.contains(r#"r["_measurement"] == "garmin_activity_samples""#));
        assert!(flux.contains(r#"r["userId"] == "7b0b96a0""#));
        assert!(flux.contains(
            r#"r["_field"] == "latitudeInDegree" or r["_field"] == "longitudeInDegree""#
        ));
        assert!(flux.contains("pivot(rowKey: [\"_time\"]"));
    }

    #[test]
    fn test_flux_escapes_user_id() {
        let flux = query(r#"u" or true or "x"#).to_flux();
        assert!(flux.contains(r#"r["userId"] == "u\" or true or \"x""#));
    }

    #[test]
    fn test_sql_query_shape() {
        let sql = query("u1").to_sql();
        assert!(sql.starts_with(
            r#"SELECT "latitudeInDegree", "longitudeInDegree", "time", "activityId", "activityType""#
        ));
        assert!(sql.contains(r#"FROM "garmin_activity_samples""#));
        assert!(sql.contains("time >= TIMESTAMP '2024-11-28T00:00:00Z'"));
        assert!(sql.contains("time < TIMESTAMP '2024-11-29T00:00:00Z'"));
        assert!(sql.contains(r#""userId" = 'u1'"#));
        assert!(sql.ends_with("ORDER BY time"));
    }

    #[test]
    fn test_sql_escapes_user_id() {
        let sql = query("o'brien").to_sql();
        assert!(sql.contains(r#""userId" = 'o''brien'"#));
    }
}
