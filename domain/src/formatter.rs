//! Human readable rendering of event timestamps, e.g. `3rd March 2024 - 05:30 PM UTC`.

use crate::error::{Error, PayloadErrorKind};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

/// Offset-carrying ISO-8601 layouts, most precise first. `%#z` accepts `Z`,
/// `+hh`, `+hhmm` and `+hh:mm`.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%#z",
    "%Y-%m-%dT%H:%M%#z",
    "%Y-%m-%d %H:%M:%S%.f%#z",
    "%Y-%m-%d %H:%M%#z",
];

/// Layouts without an offset; the wall time is read as UTC.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 timestamp into an absolute instant.
///
/// Accepts seconds or minute precision, optional fractional seconds, a `T` or
/// space separator, and offsets written as `Z`, `+hh:mm`, `+hhmm` or `+hh`.
/// Timestamps without any offset, including bare dates, are taken to be UTC.
pub fn parse_timestamp(timestamp: &str) -> Result<DateTime<FixedOffset>, Error> {
    let trimmed = timestamp.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant);
    }

    if let Some(instant) = OFFSET_FORMATS
        .iter()
        .find_map(|format| DateTime::parse_from_str(trimmed, format).ok())
    {
        return Ok(instant);
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
    {
        return Ok(naive.and_utc().fixed_offset());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc().fixed_offset())
        .map_err(|e| {
            Error::payload(
                PayloadErrorKind::InvalidTimestamp,
                format!("Invalid ISO-8601 timestamp {timestamp:?}: {e}"),
            )
        })
}

/// Renders `timestamp` in UTC as `{day}{suffix} {Month} {Year} - {hh}:{mm} {AM|PM} UTC`.
pub fn format_timestamp(timestamp: &str) -> Result<String, Error> {
    let instant = parse_timestamp(timestamp)?.with_timezone(&Utc);
    let day = instant.day();

    Ok(format!(
        "{day}{} {}",
        ordinal_suffix(day),
        instant.format("%B %Y - %I:%M %p UTC")
    ))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
