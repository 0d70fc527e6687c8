//! Timestamp parsing and display formatting.
//!
//! The backend stores every timestamp as a naive UTC string
//! (`YYYY-MM-DD HH:MM:SS`). These helpers always attach UTC before converting,
//! so a value is never misread as local time.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// Display zone used by the dashboard unless configured otherwise.
pub const EASTERN: Tz = chrono_tz::America::New_York;

/// Placeholder rendered for timestamps that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

/// Placeholder rendered by the compact formatter for empty input.
pub const UNKNOWN: &str = "Unknown";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Error type for timestamp parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimestampError {
    #[error("Timestamp is empty")]
    Empty,
    #[error("Unrecognized timestamp format: {0}")]
    InvalidFormat(String),
}

/// Parses a backend timestamp as UTC.
///
/// Accepts RFC 3339 strings with an explicit offset, and naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` strings (optional fractional
/// seconds, optional trailing `Z`). Naive values are taken as UTC.
pub fn parse_utc_timestamp(timestamp: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = timestamp.trim();
    if trimmed.is_empty() {
        return Err(TimestampError::Empty);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|dt| Utc.from_utc_datetime(&dt))
        .ok_or_else(|| TimestampError::InvalidFormat(trimmed.to_string()))
}

/// Formats a UTC timestamp as `MM/DD/YYYY, hh:mm:ss AM` in the given zone.
///
/// Never fails: unparseable input renders as [`INVALID_DATE`]. Use
/// [`parse_utc_timestamp`] when the caller needs to know.
pub fn format_local_time(timestamp: &str, tz: Tz) -> String {
    match parse_utc_timestamp(timestamp) {
        Ok(dt) => dt
            .with_timezone(&tz)
            .format("%m/%d/%Y, %I:%M:%S %p")
            .to_string(),
        Err(_) => INVALID_DATE.to_string(),
    }
}

/// [`format_local_time`] in America/New_York.
pub fn format_eastern_time(timestamp: &str) -> String {
    format_local_time(timestamp, EASTERN)
}

/// Short form used in notifications and log lines: `Dec 07, 06:34:00 AM`.
///
/// Empty input renders as [`UNKNOWN`]; unparseable input is echoed back.
pub fn format_compact_time(timestamp: &str, tz: Tz) -> String {
    if timestamp.trim().is_empty() {
        return UNKNOWN.to_string();
    }

    match parse_utc_timestamp(timestamp) {
        Ok(dt) => dt
            .with_timezone(&tz)
            .format("%b %d, %I:%M:%S %p")
            .to_string(),
        Err(_) => timestamp.to_string(),
    }
}
