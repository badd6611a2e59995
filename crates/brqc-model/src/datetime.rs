//! Tolerant date/time parsing for workbook cell text.
//!
//! Upstream spreadsheets mix ISO dates, slash dates, bare times, and full
//! datetimes inside the same column, so every parser here tries a fixed list
//! of formats in priority order (ISO first) and returns `None` for anything
//! unrecognizable. Callers decide whether `None` means a row-level failure.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%m/%d/%y",
];

const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }
    // Date columns exported as full datetimes keep their calendar day.
    parse_datetime(trimmed).map(|dt| dt.date())
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in TIME_FORMATS {
        if let Ok(time) = NaiveTime::parse_from_str(trimmed, format) {
            return Some(time);
        }
    }
    parse_datetime(trimmed).map(|dt| dt.time())
}

pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    None
}

/// Combine a date cell and a time cell into one timestamp.
///
/// Falls back to reading the time cell as a full datetime when either part
/// fails on its own, since some deliveries put the complete timestamp in the
/// start/end column and leave the date column sparse.
pub fn combine_date_time(date_value: &str, time_value: &str) -> Option<NaiveDateTime> {
    match (parse_date(date_value), parse_time(time_value)) {
        (Some(date), Some(time)) => Some(date.and_time(time)),
        _ => parse_datetime(time_value),
    }
}

/// End timestamp for a broadcast, rolling past midnight when the end time of
/// day sorts before the start.
pub fn end_timestamp(start: NaiveDateTime, date_value: &str, end_value: &str) -> Option<NaiveDateTime> {
    let end = combine_date_time(date_value, end_value)?;
    if end < start {
        end.checked_add_days(Days::new(1))
    } else {
        Some(end)
    }
}

/// Duration in whole minutes from a directly-provided duration field:
/// `HH:MM:SS`, `HH:MM`, or plain minutes (`95`, `95.0`).
pub fn duration_field_minutes(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(time) = TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
    {
        use chrono::Timelike;
        return Some(i64::from(time.hour()) * 60 + i64::from(time.minute()));
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|minutes| minutes.is_finite() && *minutes >= 0.0)
        .map(|minutes| minutes.round() as i64)
}
