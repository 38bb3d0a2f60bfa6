//! Local-calendar helpers shared by the board, metrics and reports.
//!
//! All day boundaries are evaluated in the reporting timezone, never in UTC.

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// Returns the calendar date of `instant` in `timezone`.
#[must_use]
pub fn local_date(instant: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    instant.with_timezone(&timezone).date_naive()
}

/// Returns the first day of the month containing `date`.
#[must_use]
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// Returns the first and last day of the month preceding `date`'s month.
#[must_use]
pub fn previous_month(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let current = month_start(date);
    let last = current.pred_opt().unwrap_or(current);
    (month_start(last), last)
}

/// Returns the Monday of the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Returns `true` for Monday to Friday.
#[must_use]
pub fn is_business_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Counts Monday-to-Friday days in `start..=end`.
///
/// Holidays are not considered. An inverted range counts zero days.
#[must_use]
pub fn business_days_inclusive(start: NaiveDate, end: NaiveDate) -> u32 {
    let count = start
        .iter_days()
        .take_while(|day| *day <= end)
        .filter(|day| is_business_day(*day))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Returns the pt-BR weekday name used in report titles.
#[must_use]
pub const fn weekday_name_pt_br(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "segunda-feira",
        Weekday::Tue => "terça-feira",
        Weekday::Wed => "quarta-feira",
        Weekday::Thu => "quinta-feira",
        Weekday::Fri => "sexta-feira",
        Weekday::Sat => "sábado",
        Weekday::Sun => "domingo",
    }
}
