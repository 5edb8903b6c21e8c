//! Reference-epoch timestamp normalization
//!
//! Trade times are stored as whole seconds elapsed since
//! 2020-01-01T00:00:00Z, computed by an explicit calendar summation over
//! whole years, months and days rather than through a platform epoch.

use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};

use crate::common::errors::{ClientError, Result};

/// Year of the reference epoch
pub const REFERENCE_YEAR: i32 = 2020;

/// Gregorian leap-year rule: divisible by 400, or by 4 and not by 100
pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 4 == 0 && year % 100 != 0)
}

fn days_in_month(month: u32, leap: bool) -> i64 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if leap {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

/// Convert a UTC timestamp string into seconds since 2020-01-01T00:00:00Z.
///
/// Accepts the exchange's `created_at` format (`YYYY-MM-DDTHH:MM:SSZ`,
/// optionally with fractional seconds or a numeric offset). Timestamps
/// before the reference epoch cannot occur in live data and are rejected
/// as invalid.
pub fn calendar_seconds(timestamp: &str) -> Result<i64> {
    let utc = parse_utc(timestamp)?;

    let year = utc.year();
    if year < REFERENCE_YEAR {
        return Err(ClientError::InvalidResponse(format!(
            "Timestamp {} predates the reference epoch",
            timestamp
        )));
    }

    let mut days: i64 = 0;
    for y in REFERENCE_YEAR..year {
        days += if is_leap_year(y) { 366 } else { 365 };
    }
    let leap = is_leap_year(year);
    for m in 1..utc.month() {
        days += days_in_month(m, leap);
    }
    days += i64::from(utc.day()) - 1;

    Ok(days * 86_400
        + i64::from(utc.hour()) * 3_600
        + i64::from(utc.minute()) * 60
        + i64::from(utc.second()))
}

fn parse_utc(timestamp: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return Ok(parsed.with_timezone(&Utc));
    }

    // Tolerate a missing zone designator, assuming UTC
    if let Ok(naive) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S") {
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }

    Err(ClientError::InvalidResponse(format!(
        "Unparseable timestamp: {}",
        timestamp
    )))
}
