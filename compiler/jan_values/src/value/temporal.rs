//! Packed dates, datetimes and durations.
//!
//! Dates and datetimes are stored as a single decimal-packed `i64` rather
//! than a calendar struct:
//!
//! ```text
//! date      yyyy mm dd 00 00 00   = y * 10^10 + m * 10^8 + d * 10^6
//! datetime  yyyy mm dd HH MM SS   = date + H * 10^4 + M * 10^2 + S
//! ```
//!
//! Both share one scale, so packed values order chronologically and a date
//! compares against a datetime as midnight of that day. Packed `0` is the
//! empty date; it is falsy and unpacks to `None`.

use std::fmt;

use chrono::{Datelike, Duration as ChronoDuration, Months, NaiveDate, NaiveDateTime, Timelike};
use jan_ir::DurationUnit;

const DAY_SCALE: i64 = 1_000_000;
const MONTH_SCALE: i64 = 100_000_000;
const YEAR_SCALE: i64 = 10_000_000_000;

/// Calendar date without time of day.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Default)]
pub struct PackedDate(i64);

impl PackedDate {
    pub const EMPTY: PackedDate = PackedDate(0);

    /// Pack a date, rejecting days that do not exist in the calendar.
    pub fn new(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_naive)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        PackedDate(
            i64::from(date.year()) * YEAR_SCALE
                + i64::from(date.month()) * MONTH_SCALE
                + i64::from(date.day()) * DAY_SCALE,
        )
    }

    #[inline]
    pub const fn from_packed(packed: i64) -> Self {
        PackedDate(packed)
    }

    #[inline]
    pub const fn packed(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn to_naive(self) -> Option<NaiveDate> {
        if self.is_empty() {
            return None;
        }
        let (year, month, day) = self.parts();
        NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)
    }

    pub fn year(self) -> i64 {
        self.parts().0
    }

    pub fn month(self) -> u32 {
        self.parts().1
    }

    pub fn day(self) -> u32 {
        self.parts().2
    }

    /// Midnight of this day.
    pub fn start_of_day(self) -> PackedDateTime {
        PackedDateTime(self.0)
    }

    /// Add a calendar-unit duration. Time units are rejected; those turn a
    /// date into a datetime, see [`PackedDateTime::add`].
    pub fn add(self, duration: Duration) -> Option<PackedDate> {
        let date = self.to_naive()?;
        let shifted = match duration.unit {
            DurationUnit::Years => shift_months(date, duration.amount.checked_mul(12)?)?,
            DurationUnit::Months => shift_months(date, duration.amount)?,
            DurationUnit::Weeks => date.checked_add_signed(ChronoDuration::try_weeks(duration.amount)?)?,
            DurationUnit::Days => date.checked_add_signed(ChronoDuration::try_days(duration.amount)?)?,
            DurationUnit::Hours | DurationUnit::Minutes | DurationUnit::Seconds => return None,
        };
        Some(Self::from_naive(shifted))
    }

    /// Whole days from `other` to `self`.
    pub fn days_since(self, other: PackedDate) -> Option<i64> {
        Some((self.to_naive()? - other.to_naive()?).num_days())
    }

    fn parts(self) -> (i64, u32, u32) {
        let year = self.0 / YEAR_SCALE;
        let month = (self.0 / MONTH_SCALE % 100) as u32;
        let day = (self.0 / DAY_SCALE % 100) as u32;
        (year, month, day)
    }
}

impl fmt::Display for PackedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive() {
            Some(date) => write!(f, "@{}", date.format("%Y-%m-%d")),
            None => f.write_str("@0000-00-00"),
        }
    }
}

/// Calendar date plus time of day, second precision, no zone.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, Default)]
pub struct PackedDateTime(i64);

impl PackedDateTime {
    pub const EMPTY: PackedDateTime = PackedDateTime(0);

    pub fn new(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(Self::from_naive)
    }

    pub fn from_naive(dt: NaiveDateTime) -> Self {
        PackedDateTime(
            PackedDate::from_naive(dt.date()).0
                + i64::from(dt.hour()) * 10_000
                + i64::from(dt.minute()) * 100
                + i64::from(dt.second()),
        )
    }

    #[inline]
    pub const fn from_packed(packed: i64) -> Self {
        PackedDateTime(packed)
    }

    #[inline]
    pub const fn packed(self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The day part, dropping the time of day.
    pub fn date(self) -> PackedDate {
        PackedDate(self.0 - self.0 % DAY_SCALE)
    }

    pub fn to_naive(self) -> Option<NaiveDateTime> {
        if self.is_empty() {
            return None;
        }
        let time = self.0 % DAY_SCALE;
        let hour = (time / 10_000) as u32;
        let minute = (time / 100 % 100) as u32;
        let second = (time % 100) as u32;
        self.date().to_naive()?.and_hms_opt(hour, minute, second)
    }

    /// Seconds since the Unix epoch, reading this datetime as UTC.
    pub fn epoch_seconds(self) -> Option<i64> {
        Some(self.to_naive()?.and_utc().timestamp())
    }

    pub fn from_epoch_seconds(seconds: i64) -> Option<Self> {
        chrono::DateTime::from_timestamp(seconds, 0).map(|dt| Self::from_naive(dt.naive_utc()))
    }

    pub fn add(self, duration: Duration) -> Option<PackedDateTime> {
        let dt = self.to_naive()?;
        let shifted = match duration.unit {
            DurationUnit::Years => {
                let date = shift_months(dt.date(), duration.amount.checked_mul(12)?)?;
                date.and_time(dt.time())
            }
            DurationUnit::Months => shift_months(dt.date(), duration.amount)?.and_time(dt.time()),
            _ => dt.checked_add_signed(ChronoDuration::try_seconds(duration.seconds()?)?)?,
        };
        Some(Self::from_naive(shifted))
    }

    /// Whole seconds from `other` to `self`.
    pub fn seconds_since(self, other: PackedDateTime) -> Option<i64> {
        Some((self.to_naive()? - other.to_naive()?).num_seconds())
    }

    /// Format with a `chrono` strftime pattern.
    pub fn format(self, pattern: &str) -> Option<String> {
        use std::fmt::Write;

        let dt = self.to_naive()?;
        let mut out = String::new();
        write!(out, "{}", dt.format(pattern)).ok()?;
        Some(out)
    }
}

impl fmt::Display for PackedDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_naive() {
            Some(dt) => write!(f, "@{}", dt.format("%Y-%m-%d-%H:%M:%S")),
            None => f.write_str("@0000-00-00-00:00:00"),
        }
    }
}

fn shift_months(date: NaiveDate, months: i64) -> Option<NaiveDate> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

/// An amount of some unit.
///
/// Durations remember the unit they were written in (`@3d` displays as
/// `@3d`) but compare, hash and order by their length in seconds, so a
/// one-day duration equals an 86400-second one.
#[derive(Copy, Clone, Debug)]
pub struct Duration {
    pub amount: i64,
    pub unit: DurationUnit,
}

impl Duration {
    pub const fn new(amount: i64, unit: DurationUnit) -> Self {
        Duration { amount, unit }
    }

    /// Length in seconds, `None` on overflow.
    #[inline]
    pub const fn seconds(self) -> Option<i64> {
        self.amount.checked_mul(self.unit.seconds())
    }

    /// Length in seconds, saturating.
    #[inline]
    pub const fn saturating_seconds(self) -> i64 {
        self.amount.saturating_mul(self.unit.seconds())
    }

    /// Length expressed in `unit`, truncated toward zero.
    pub const fn in_unit(self, unit: DurationUnit) -> i64 {
        self.saturating_seconds() / unit.seconds()
    }

    /// The largest unit that expresses `seconds` exactly.
    pub fn from_seconds(seconds: i64) -> Self {
        for unit in DurationUnit::ALL {
            if seconds % unit.seconds() == 0 {
                return Duration::new(seconds / unit.seconds(), unit);
            }
        }
        Duration::new(seconds, DurationUnit::Seconds)
    }
}

impl PartialEq for Duration {
    fn eq(&self, other: &Self) -> bool {
        self.saturating_seconds() == other.saturating_seconds()
    }
}

impl Eq for Duration {}

impl std::hash::Hash for Duration {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.saturating_seconds().hash(state);
    }
}

impl PartialOrd for Duration {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Duration {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.saturating_seconds().cmp(&other.saturating_seconds())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}{}", self.amount, self.unit.tag())
    }
}
