use chrono::prelude::*;
use chrono_tz::Tz;

pub const MILLIS_PER_DAY: i64 = 1000 * 60 * 60 * 24;

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 if is_leap_year(year) => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Adds whole years to a date. February 29th is clamped to February 28th
/// when the target year is not a leap year.
pub fn add_years(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let day = std::cmp::min(date.day(), get_month_length(year, date.month()));
    NaiveDate::from_ymd(year, date.month(), day)
}

/// The timestamp in millis at which the given calendar day starts in `tz`.
/// Local midnights that do not exist (DST gaps) fall back to UTC midnight.
pub fn start_of_day_millis(date: NaiveDate, tz: &Tz) -> i64 {
    let midnight = date.and_hms(0, 0, 0);
    match tz.from_local_datetime(&midnight).earliest() {
        Some(dt) => dt.timestamp_millis(),
        None => midnight.timestamp_millis(),
    }
}

/// The calendar date in `tz` at the instant `millis`
pub fn date_in_tz(millis: i64, tz: &Tz) -> NaiveDate {
    tz.timestamp_millis(millis).naive_local().date()
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
