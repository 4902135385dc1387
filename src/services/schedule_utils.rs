use chrono::{DateTime, FixedOffset, NaiveTime, Timelike, Utc};
use serde_json::json;

use crate::error::{AppError, AppResult};

pub fn parse_datetime(value: &str) -> AppResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).map_err(|err| {
        AppError::validation_with_details(
            "invalid datetime format, expected RFC3339",
            json!({"value": value, "error": err.to_string()}),
        )
    })
}

pub fn parse_optional_datetime(value: Option<&String>) -> AppResult<Option<DateTime<FixedOffset>>> {
    match value {
        Some(raw) => Ok(Some(parse_datetime(raw)?)),
        None => Ok(None),
    }
}

/// Parses an `HH:MM` time-of-day string as used by working-hours templates.
pub fn parse_time_of_day(value: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").map_err(|err| {
        AppError::validation_with_details(
            "invalid time-of-day format, expected HH:MM",
            json!({"value": value, "error": err.to_string()}),
        )
    })
}

pub fn duration_minutes(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> i64 {
    end.signed_duration_since(start).num_minutes()
}

/// Whole hours from `reference` until `start`, floored at zero for slots that
/// have already begun.
pub fn hours_until(reference: DateTime<Utc>, start: DateTime<FixedOffset>) -> i64 {
    start
        .signed_duration_since(reference.fixed_offset())
        .num_hours()
        .max(0)
}

/// Strict interval intersection. Both ranges must be non-empty.
pub fn overlaps(
    a_start: DateTime<FixedOffset>,
    a_end: DateTime<FixedOffset>,
    b_start: DateTime<FixedOffset>,
    b_end: DateTime<FixedOffset>,
) -> AppResult<bool> {
    ensure_window(a_start, a_end)?;
    ensure_window(b_start, b_end)?;
    Ok(a_start < b_end && b_start < a_end)
}

pub fn ensure_window(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> AppResult<()> {
    if end <= start {
        Err(AppError::validation_with_details(
            "time window end must be after start",
            json!({"start": start.to_rfc3339(), "end": end.to_rfc3339()}),
        ))
    } else {
        Ok(())
    }
}

pub fn start_hour(dt: DateTime<FixedOffset>) -> u32 {
    dt.time().hour()
}
