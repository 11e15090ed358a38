//! Date coercion for mention cells.
//!
//! Warehouse exports are inconsistent about how they write timestamps, so we
//! accept a fixed, ordered list of formats. A value matching none of them is
//! treated as missing; the caller counts it and moves on.
//!
//! Whatever the input, only the wall-clock calendar date survives: offsets are
//! dropped without converting, so `2024-01-01T23:30:00-05:00` is 2024-01-01.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::FieldValue;

/// Offset-carrying formats, tried after RFC 3339.
const OFFSET_FMTS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    // Twitter v1.1 `created_at`.
    "%a %b %d %H:%M:%S %z %Y",
    "%a, %d %b %Y %H:%M:%S %z",
];

const NAIVE_DATETIME_FMTS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Coerce a cell to a calendar date, `None` when it cannot be read as one.
pub fn parse_calendar_date(value: &FieldValue) -> Option<NaiveDate> {
    match value {
        FieldValue::Null => None,
        FieldValue::Date(d) => Some(*d),
        FieldValue::Timestamp(ts) => Some(ts.date_naive()),
        FieldValue::Text(s) => parse_date_text(s),
    }
}

/// Parse free-form date text.
pub fn parse_date_text(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local().date());
    }
    for fmt in OFFSET_FMTS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_local().date());
        }
    }

    // `2024-01-01 10:00:00 UTC` (BigQuery CSV exports) and a bare trailing `Z`.
    let s = s
        .strip_suffix(" UTC")
        .or_else(|| s.strip_suffix('Z'))
        .unwrap_or(s)
        .trim_end();

    for fmt in NAIVE_DATETIME_FMTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    for fmt in DATE_FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    None
}
