use time::{Date, Duration, OffsetDateTime, UtcOffset};
use time_tz::{Offset, OffsetResult, PrimitiveDateTimeExt, TimeZone, Tz};

use crate::Error;

/// Look up the timezone for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a known timezone.
pub fn get_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", canonical_timezone);
        Error::InvalidTimezoneError(canonical_timezone.to_owned())
    })
}

/// The current instant expressed in `timezone`.
pub(crate) fn local_now(timezone: &Tz) -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();

    now.checked_to_offset(offset_at(now, timezone))
        .unwrap_or(now)
}

/// The offset `timezone` observes at `instant`.
pub fn offset_at(instant: OffsetDateTime, timezone: &Tz) -> UtcOffset {
    timezone.get_offset_utc(&instant).to_utc()
}

/// The calendar day of `instant` in `timezone`.
///
/// `None` only when the conversion leaves the supported date range.
pub fn local_date(instant: OffsetDateTime, timezone: &Tz) -> Option<Date> {
    instant
        .checked_to_offset(offset_at(instant, timezone))
        .map(|local| local.date())
}

/// The first instant of `date` in `timezone`.
///
/// This is midnight with whatever offset applies on that day. If a DST change skips midnight,
/// the day starts at the transition.
pub fn local_midnight(date: Date, timezone: &Tz) -> OffsetDateTime {
    let midnight = date.midnight();

    match midnight.assume_timezone(timezone) {
        OffsetResult::Some(instant) => instant,
        OffsetResult::Ambiguous(earliest, _) => earliest,
        OffsetResult::None => {
            let day_before = midnight.assume_utc() - Duration::days(1);
            midnight.assume_offset(offset_at(day_before, timezone))
        }
    }
}
