//! Maps instants onto the local calendar of a named timezone.

use time::{Date, OffsetDateTime};
use time_tz::{Offset, TimeZone, Tz};

use crate::Error;

/// The timezone the admin console reports statistics in.
pub const DEFAULT_TIMEZONE: &str = "Asia/Dhaka";

/// Look up a timezone by its canonical name, e.g. "Asia/Dhaka".
///
/// # Errors
/// Returns [Error::InvalidTimezoneError] if the name is not a known timezone.
pub fn get_timezone(canonical_timezone: &str) -> Result<&'static Tz, Error> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .ok_or_else(|| Error::InvalidTimezoneError(canonical_timezone.to_owned()))
}

/// The calendar buckets an instant falls into, as seen from a particular timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarBucket {
    /// The local calendar year.
    pub year: i32,
    /// The local calendar month, 1-12.
    pub month: u8,
    /// The local calendar date, used as the day key.
    pub day: Date,
}

impl CalendarBucket {
    /// Compute the buckets for `instant` using the local calendar of `timezone`.
    ///
    /// The offset is resolved at `instant` rather than at the current time, so
    /// zones with daylight saving put records on the right side of midnight.
    ///
    /// Returns `None` if shifting `instant` into the zone leaves the supported
    /// date range.
    pub fn from_instant(instant: OffsetDateTime, timezone: &Tz) -> Option<Self> {
        let offset = timezone.get_offset_utc(&instant).to_utc();
        let local = instant.checked_to_offset(offset)?;

        Some(Self {
            year: local.year(),
            month: u8::from(local.month()),
            day: local.date(),
        })
    }

    /// The day key in `YYYY-MM-DD` form.
    pub fn day_key(&self) -> String {
        self.day.to_string()
    }

    /// Whether `self` is in the same local year as `other`.
    pub fn same_year(&self, other: &Self) -> bool {
        self.year == other.year
    }

    /// Whether `self` is in the same local month (and year) as `other`.
    pub fn same_month(&self, other: &Self) -> bool {
        self.same_year(other) && self.month == other.month
    }

    /// Whether `self` is on the same local day as `other`.
    pub fn same_day(&self, other: &Self) -> bool {
        self.same_month(other) && self.day == other.day
    }
}
