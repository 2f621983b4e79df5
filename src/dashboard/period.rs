//! Calendar period boundaries.
//!
//! Every boundary is a local midnight in the configured timezone, using the
//! offset that applies on the boundary's own day, and every period is the
//! half-open range `[start, end)`.

use serde::Serialize;
use time::{Date, Duration, Month, OffsetDateTime};
use time_tz::Tz;

use crate::timezone::{local_date, local_midnight};

/// A calendar period that contains `now`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// The current day.
    Today,
    /// The current week, starting on Monday.
    Week,
    /// The current calendar month.
    Month,
    /// The current calendar year.
    Year,
}

/// A half-open `[start, end)` range of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    /// The first instant inside the range.
    pub start: OffsetDateTime,
    /// The first instant after the range.
    pub end: OffsetDateTime,
}

impl Bounds {
    /// Whether `instant` falls inside the range.
    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// The first instant of `period` around `now` in `timezone`.
pub fn start_of_period(period: Period, now: OffsetDateTime, timezone: &Tz) -> OffsetDateTime {
    let today = local_today(now, timezone);

    let start = match period {
        Period::Today => today,
        Period::Week => start_of_week(today),
        Period::Month => start_of_month(today),
        Period::Year => start_of_year(today),
    };

    local_midnight(start, timezone)
}

/// The first instant after `period` around `now` in `timezone`.
pub fn end_of_period(period: Period, now: OffsetDateTime, timezone: &Tz) -> OffsetDateTime {
    let today = local_today(now, timezone);

    let end = match period {
        Period::Today => next_day(today),
        Period::Week => start_of_week(today)
            .checked_add(Duration::days(7))
            .unwrap_or(Date::MAX),
        Period::Month => start_of_next_month(today),
        Period::Year => start_of_next_year(today),
    };

    local_midnight(end, timezone)
}

/// The `[start, end)` bounds of `period` around `now` in `timezone`.
pub fn period_bounds(period: Period, now: OffsetDateTime, timezone: &Tz) -> Bounds {
    Bounds {
        start: start_of_period(period, now, timezone),
        end: end_of_period(period, now, timezone),
    }
}

/// The local calendar day containing `now`.
pub fn local_today(now: OffsetDateTime, timezone: &Tz) -> Date {
    local_date(now, timezone).unwrap_or_else(|| now.date())
}

/// The day after `date`, saturating at [Date::MAX].
pub fn next_day(date: Date) -> Date {
    date.next_day().unwrap_or(Date::MAX)
}

/// The Monday on or before `date`.
pub fn start_of_week(date: Date) -> Date {
    let days_since_monday = date.weekday().number_days_from_monday();

    date.checked_sub(Duration::days(days_since_monday.into()))
        .unwrap_or(Date::MIN)
}

/// The first day of the month containing `date`.
pub fn start_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

/// The first day of the month after the one containing `date`.
pub fn start_of_next_month(date: Date) -> Date {
    let (year, month) = match date.month() {
        Month::December => (date.year() + 1, Month::January),
        month => (date.year(), month.next()),
    };

    Date::from_calendar_date(year, month, 1).unwrap_or(Date::MAX)
}

/// The first day of the year containing `date`.
pub fn start_of_year(date: Date) -> Date {
    Date::from_calendar_date(date.year(), Month::January, 1).unwrap_or(date)
}

/// The first day of the year after the one containing `date`.
pub fn start_of_next_year(date: Date) -> Date {
    Date::from_calendar_date(date.year() + 1, Month::January, 1).unwrap_or(Date::MAX)
}
