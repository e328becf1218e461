//! Timestamp helpers for the procurement API's minute-precision format.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

/// Query parameter format, `yyyyMMddHHmm`.
pub const QUERY_FORMAT: &str = "%Y%m%d%H%M";

/// Date stamp used in export file names, `yyyyMMdd`.
pub const FILE_DATE_FORMAT: &str = "%Y%m%d";

const HUMAN_FORMATS: &[&str] = &[
    QUERY_FORMAT,
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Errors that can occur during timestamp parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    /// The timestamp string is empty.
    #[error("Empty timestamp string")]
    EmptyString,

    /// The timestamp value is invalid.
    #[error("Invalid timestamp: {0}")]
    InvalidFormat(String),
}

/// Returns the current local time truncated to the minute.
#[must_use]
pub fn now_local_minute() -> NaiveDateTime {
    truncate_to_minute(Local::now().naive_local())
}

/// Drops seconds and sub-second precision.
#[must_use]
pub fn truncate_to_minute(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_second(0)
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Formats a timestamp as a `yyyyMMddHHmm` query value.
///
/// ```
/// use chrono::NaiveDate;
/// use narasearch::utils::format_query_timestamp;
///
/// let dt = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap().and_hms_opt(9, 5, 0).unwrap();
/// assert_eq!(format_query_timestamp(dt), "202503010905");
/// ```
#[must_use]
pub fn format_query_timestamp(dt: NaiveDateTime) -> String {
    dt.format(QUERY_FORMAT).to_string()
}

/// Formats a date as `yyyyMMdd`.
#[must_use]
pub fn format_file_date(date: NaiveDate) -> String {
    date.format(FILE_DATE_FORMAT).to_string()
}

/// Parses a local timestamp.
///
/// Accepts `yyyyMMddHHmm`, `YYYY-MM-DD HH:MM` (with or without seconds, space
/// or `T` separated) and a bare `YYYY-MM-DD`, which is read as midnight.
pub fn parse_local_timestamp(input: &str) -> Result<NaiveDateTime, TimestampError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::EmptyString);
    }

    for format in HUMAN_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(dt);
        }
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| TimestampError::InvalidFormat(trimmed.to_string()))
}
