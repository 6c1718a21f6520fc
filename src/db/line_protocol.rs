// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! InfluxDB line protocol encoding.

use crate::models::{FieldValue, Point};
use std::fmt::Write as _;

/// Encode a batch of points, one line per point.
///
/// Points whose fields are all unrepresentable (non-finite floats) are
/// skipped, since a line without fields is rejected by the store.
pub fn encode_batch(points: &[Point]) -> String {
    let mut out = String::new();
    for point in points {
        if let Some(line) = encode_point(point) {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(&line);
        }
    }
    out
}

/// Encode a single point, or `None` if it has no writable field.
pub fn encode_point(point: &Point) -> Option<String> {
    let mut line = escape(point.measurement.as_str(), MEASUREMENT_SPECIAL);

    for (key, value) in &point.tags {
        // Empty tag values are not representable in line protocol.
        if value.is_empty() {
            continue;
        }
        line.push(',');
        line.push_str(&escape(key, KEY_SPECIAL));
        line.push('=');
        line.push_str(&escape(value, KEY_SPECIAL));
    }

    let fields: Vec<String> = point
        .fields
        .iter()
        .filter_map(|(key, value)| {
            encode_field_value(value)
                .map(|encoded| format!("{}={}", escape(key, KEY_SPECIAL), encoded))
        })
        .collect();

    if fields.is_empty() {
        return None;
    }

    line.push(' ');
    line.push_str(&fields.join(","));
    let _ = write!(line, " {}", point.time);
    Some(line)
}

fn encode_field_value(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Float(f) if f.is_finite() => Some(f.to_string()),
        FieldValue::Float(_) => None,
        FieldValue::Integer(i) => Some(format!("{}i", i)),
        FieldValue::UInteger(u) => Some(format!("{}u", u)),
        FieldValue::Boolean(b) => Some(b.to_string()),
        FieldValue::String(s) => Some(format!("\"{}\"", escape(s, STRING_SPECIAL))),
    }
}

/// Characters backslash-escaped in measurement names.
const MEASUREMENT_SPECIAL: &[char] = &['\\', ',', ' '];
/// Characters backslash-escaped in tag keys, tag values and field keys.
const KEY_SPECIAL: &[char] = &['\\', ',', '=', ' '];
/// Characters backslash-escaped inside quoted string field values.
const STRING_SPECIAL: &[char] = &['\\', '"'];

/// Escape `raw` for one line-protocol element.
///
/// Line breaks and tabs are always written as `\n`, `\r` and `\t` so a
/// point can never span more than one line.
fn escape(raw: &str, special: &[char]) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => {
                if special.contains(&c) {
                    out.push('\\');
                }
                out.push(c);
            }
        }
    }
    out
}
