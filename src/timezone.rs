//! Resolving the server's configured timezone to offsets and local dates.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

use crate::Error;

/// The UTC offset of `canonical_timezone` at `instant`, or `None` for an unknown timezone.
pub fn get_local_offset(canonical_timezone: &str, instant: OffsetDateTime) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&instant).to_utc())
}

/// The calendar date at `instant` in `canonical_timezone`.
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if `canonical_timezone` is not a known timezone.
pub fn local_date(canonical_timezone: &str, instant: OffsetDateTime) -> Result<Date, Error> {
    let offset = get_local_offset(canonical_timezone, instant)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))?;

    Ok(instant.to_offset(offset).date())
}
