// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Half-open UTC window `[start of day, start of next day)`.
pub fn day_window(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + TimeDelta::days(1))
}

/// Parse a timestamp as returned by the store.
///
/// Accepts RFC3339 (Flux CSV output) and naive ISO date-times, which
/// InfluxDB 3 emits in its JSON format and which are always UTC.
pub fn parse_store_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_window_spans_one_utc_day() {
        let day = parse_day("2024-11-28").unwrap();
        let (start, stop) = day_window(day);
        assert_eq!(format_utc_rfc3339(start), "2024-11-28T00:00:00Z");
        assert_eq!(format_utc_rfc3339(stop), "2024-11-29T00:00:00Z");
    }

    #[test]
    fn test_day_window_crosses_year_boundary() {
        let (_, stop) = day_window(parse_day("2024-12-31").unwrap());
        assert_eq!(format_utc_rfc3339(stop), "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_parse_day_rejects_other_formats() {
        assert!(parse_day("28/11/2024").is_none());
        assert!(parse_day("2024-13-01").is_none());
        assert!(parse_day("").is_none());
    }

    #[test]
    fn test_parse_store_timestamp_formats() {
        let expected = parse_store_timestamp("2024-11-28T10:15:00Z").unwrap();
        assert_eq!(
            parse_store_timestamp("2024-11-28T10:15:00").unwrap(),
            expected
        );
        assert_eq!(
            parse_store_timestamp("2024-11-28T11:15:00+01:00").unwrap(),
            expected
        );
        assert!(parse_store_timestamp("yesterday").is_none());
    }
}
