//! Time helpers - business date conversion
//!
//! Dates arrive as `YYYY-MM-DD` or RFC 3339 strings and are stored as Unix
//! millis. Calendar-based conversions take the timezone as a parameter so
//! tests can pin it; the server passes `chrono::Local`.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

use super::{AppError, AppResult};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse a date string (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {}", date)))
}

/// Local midnight of `date` → Unix millis
///
/// When midnight falls in a DST gap the day starts at the first valid local
/// minute after it.
pub fn day_start_millis<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_time(chrono::NaiveTime::MIN);
    (0..MINUTES_PER_DAY)
        .map(|m| midnight + chrono::Duration::minutes(m))
        .find_map(|local| local.and_local_timezone(tz.clone()).earliest())
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

/// Midnight of the following day → Unix millis (exclusive bound)
pub fn day_end_millis<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> i64 {
    let next_day = date.succ_opt().unwrap_or(date);
    day_start_millis(next_day, tz)
}

/// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date (local midnight)
pub fn parse_timestamp_in<Tz: TimeZone>(input: &str, tz: &Tz) -> AppResult<i64> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.timestamp_millis());
    }
    let date = parse_date(input).map_err(|_| {
        AppError::validation(format!(
            "Invalid date '{input}', expected YYYY-MM-DD or an RFC 3339 timestamp"
        ))
    })?;
    Ok(day_start_millis(date, tz))
}

/// [`parse_timestamp_in`] using the server's local timezone
pub fn parse_timestamp(input: &str) -> AppResult<i64> {
    parse_timestamp_in(input, &chrono::Local)
}

/// First day of the month containing `date`
pub fn month_first_day(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// First day of the month `offset` months after the one containing `date`
///
/// Negative offsets go back in time.
pub fn shift_month(date: NaiveDate, offset: i32) -> NaiveDate {
    let first = month_first_day(date);
    let months = first.year() * 12 + first.month0() as i32 + offset;
    NaiveDate::from_ymd_opt(months.div_euclid(12), months.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or(first)
}

/// `[first of month 00:00, first of next month 00:00)` in millis
pub fn month_range_millis<Tz: TimeZone>(now: &DateTime<Tz>) -> (i64, i64) {
    let tz = now.timezone();
    let today = now.date_naive();
    let start = day_start_millis(month_first_day(today), &tz);
    let end = day_start_millis(shift_month(today, 1), &tz);
    (start, end)
}
