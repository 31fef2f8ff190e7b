//! ISO-8601 date handling at the collaborator boundary.
//!
//! Accepts a bare `YYYY-MM-DD` or a full timestamp (`T` or space
//! separator, optional fractional seconds, optional trailing `Z`).
//! Timestamps are kept naive; a trailing `Z` is accepted and dropped.

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Storage format. Fixed-width prefix keeps lexical order equal to time order.
const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateParseError {
    #[error("Unparseable date: {0:?}")]
    Unparseable(String),
}

/// Parse a boundary date string.
pub fn parse_iso_datetime(input: &str) -> Result<NaiveDateTime, DateParseError> {
    let trimmed = input.trim();
    let body = trimmed.strip_suffix('Z').unwrap_or(trimmed);

    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(body, format) {
            return Ok(parsed);
        }
    }

    // A bare date carries no UTC marker.
    if body.len() == trimmed.len() {
        if let Ok(date) = NaiveDate::parse_from_str(body, DATE_FORMAT) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(midnight);
            }
        }
    }

    Err(DateParseError::Unparseable(input.to_string()))
}

/// Render a timestamp for storage and display.
pub fn format_iso_datetime(value: &NaiveDateTime) -> String {
    value.format(STORAGE_FORMAT).to_string()
}

/// Whether `input` would be accepted by [`parse_iso_datetime`].
pub fn is_valid_date(input: &str) -> bool {
    parse_iso_datetime(input).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn bare_date_is_midnight() {
        assert_eq!(
            parse_iso_datetime("2024-03-15").unwrap(),
            ymd_hms(2024, 3, 15, 0, 0, 0)
        );
    }

    #[test]
    fn full_timestamp_with_t_separator() {
        assert_eq!(
            parse_iso_datetime("2024-03-15T08:30:00").unwrap(),
            ymd_hms(2024, 3, 15, 8, 30, 0)
        );
    }

    #[test]
    fn space_separator_accepted() {
        assert_eq!(
            parse_iso_datetime("2024-03-15 08:30:05").unwrap(),
            ymd_hms(2024, 3, 15, 8, 30, 5)
        );
    }

    #[test]
    fn fractional_seconds_kept() {
        let parsed = parse_iso_datetime("2024-03-15T08:30:00.250").unwrap();
        assert_eq!(parsed.nanosecond(), 250_000_000);
    }

    #[test]
    fn trailing_utc_marker_accepted() {
        assert_eq!(
            parse_iso_datetime("2024-03-15T08:30:00Z").unwrap(),
            ymd_hms(2024, 3, 15, 8, 30, 0)
        );
        assert!(parse_iso_datetime("2024-03-15T08:30:00.123456Z").is_ok());
    }

    #[test]
    fn malformed_dates_rejected() {
        for bad in ["", "yesterday", "2024/03/15", "2024-13-01", "2024-03-15T25:00:00", "2024-03-15Z"] {
            assert_eq!(
                parse_iso_datetime(bad),
                Err(DateParseError::Unparseable(bad.to_string())),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn storage_format_round_trips() {
        let original = parse_iso_datetime("2024-03-15T08:30:00.5").unwrap();
        let stored = format_iso_datetime(&original);
        assert_eq!(parse_iso_datetime(&stored).unwrap(), original);
        assert_eq!(format_iso_datetime(&ymd_hms(2024, 1, 2, 3, 4, 5)), "2024-01-02T03:04:05");
    }

    #[test]
    fn is_valid_date_mirrors_parser() {
        assert!(is_valid_date("2024-03-15"));
        assert!(!is_valid_date("15.03.2024"));
    }
}
