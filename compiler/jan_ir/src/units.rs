//! Duration units.

use std::fmt;

/// Unit tag of a duration literal or runtime duration value.
///
/// The seconds-per-unit table follows the proleptic Gregorian averages, so a
/// year is 365.2425 days and a month is one twelfth of that.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DurationUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl DurationUnit {
    /// Seconds in one unit.
    #[inline]
    pub const fn seconds(self) -> i64 {
        match self {
            DurationUnit::Years => 31_556_952,
            DurationUnit::Months => 2_629_746,
            DurationUnit::Weeks => 604_800,
            DurationUnit::Days => 86_400,
            DurationUnit::Hours => 3_600,
            DurationUnit::Minutes => 60,
            DurationUnit::Seconds => 1,
        }
    }

    /// Literal suffix, as in `@3mo`.
    #[inline]
    pub const fn tag(self) -> &'static str {
        match self {
            DurationUnit::Years => "y",
            DurationUnit::Months => "mo",
            DurationUnit::Weeks => "w",
            DurationUnit::Days => "d",
            DurationUnit::Hours => "h",
            DurationUnit::Minutes => "mi",
            DurationUnit::Seconds => "s",
        }
    }

    /// Parse a literal suffix.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "y" => Some(DurationUnit::Years),
            "mo" => Some(DurationUnit::Months),
            "w" => Some(DurationUnit::Weeks),
            "d" => Some(DurationUnit::Days),
            "h" => Some(DurationUnit::Hours),
            "mi" => Some(DurationUnit::Minutes),
            "s" => Some(DurationUnit::Seconds),
            _ => None,
        }
    }

    /// Whether adding this unit to a date keeps it a date (no time of day).
    #[inline]
    pub const fn is_calendar(self) -> bool {
        matches!(
            self,
            DurationUnit::Years | DurationUnit::Months | DurationUnit::Weeks | DurationUnit::Days
        )
    }

    /// All units, largest first.
    pub const ALL: [DurationUnit; 7] = [
        DurationUnit::Years,
        DurationUnit::Months,
        DurationUnit::Weeks,
        DurationUnit::Days,
        DurationUnit::Hours,
        DurationUnit::Minutes,
        DurationUnit::Seconds,
    ];
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}
