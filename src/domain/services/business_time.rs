use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use crate::error::AppError;

pub fn utc_to_local(tz: &Tz, instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

/// Converts a requested wall-clock time. Ambiguous or skipped local times
/// (DST transitions) are rejected rather than guessed.
pub fn local_to_utc(tz: &Tz, local: NaiveDateTime) -> Result<DateTime<Utc>, AppError> {
    tz.from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(AppError::Validation("Invalid local time (ambiguous or skipped due to DST)".into()))
}

/// Maps a generated wall-clock time: a fold resolves to its earlier instant,
/// a gap has no instant at all.
pub fn resolve_local(tz: &Tz, local: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Start of `date` on the business clock, used for range queries. Where the
/// clocks skip midnight the day starts at the end of the gap.
pub fn day_start_utc(tz: &Tz, date: NaiveDate) -> Result<DateTime<Utc>, AppError> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=DAY_QUARTERS)
        .map(|q| midnight + Duration::minutes(15 * q))
        .find_map(|local| resolve_local(tz, local))
        .ok_or(AppError::Internal(format!("No local time exists on {}", date)))
}

const DAY_QUARTERS: i64 = 24 * 4;

pub fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format (YYYY-MM-DD)".into()))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, AppError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into()))
}
