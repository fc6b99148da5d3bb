//! Elapsed-Time Decomposition
//!
//! Splits the span between a birth instant and "now" into calendar units
//! (years, months) followed by fixed units (days, hours, minutes, seconds,
//! milliseconds).
//!
//! Years and months have no fixed length, so they are found by calendar
//! addition: the largest count that can be added to the birth instant
//! without passing "now". Calendar addition keeps the day of month and
//! clamps it to the last day of the target month, so Feb 29 + 1 year is
//! Feb 28 and Jan 31 + 1 month is Feb 28 (or Feb 29 in a leap year).
//!
//! ```text
//! birth ──(+Y years)──▶ anchor ──(+M months)──▶ cursor ──(fixed)──▶ now
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, TimeDelta};
use thiserror::Error;

use crate::config::Precision;

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Months are searched in this range once whole years are removed
const MAX_MONTHS: i32 = 11;

// ============================================================================
// Errors
// ============================================================================

/// The sampled instant precedes the birth instant
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("current time {now} precedes birth instant {birth}")]
pub struct InvalidRangeError {
    /// Birth instant
    pub birth: NaiveDateTime,
    /// Sampled instant
    pub now: NaiveDateTime,
}

// ============================================================================
// Units
// ============================================================================

/// A displayable field of an [`ElapsedDuration`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Years,
    Months,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl Unit {
    const WITH_SECONDS: [Unit; 6] = [
        Unit::Years,
        Unit::Months,
        Unit::Days,
        Unit::Hours,
        Unit::Minutes,
        Unit::Seconds,
    ];

    const WITH_MILLIS: [Unit; 7] = [
        Unit::Years,
        Unit::Months,
        Unit::Days,
        Unit::Hours,
        Unit::Minutes,
        Unit::Seconds,
        Unit::Milliseconds,
    ];

    /// Units shown for a precision, largest first
    pub fn for_precision(precision: Precision) -> &'static [Unit] {
        match precision {
            Precision::Seconds => &Self::WITH_SECONDS,
            Precision::Millis => &Self::WITH_MILLIS,
        }
    }

    /// Upper-case label drawn above the unit's digits
    pub fn label(&self) -> &'static str {
        match self {
            Self::Years => "YEARS",
            Self::Months => "MONTHS",
            Self::Days => "DAYS",
            Self::Hours => "HOURS",
            Self::Minutes => "MINUTES",
            Self::Seconds => "SECONDS",
            Self::Milliseconds => "MILLISECONDS",
        }
    }

    /// Natural zero-padded digit count
    pub fn width(&self) -> usize {
        match self {
            Self::Years | Self::Milliseconds => 3,
            _ => 2,
        }
    }
}

// ============================================================================
// ElapsedDuration
// ============================================================================

/// Calendar-aware breakdown of the time between birth and now
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ElapsedDuration {
    pub years: u32,
    /// 0-11
    pub months: u32,
    pub days: u32,
    /// 0-23
    pub hours: u32,
    /// 0-59
    pub minutes: u32,
    /// 0-59
    pub seconds: u32,
    /// 0-999
    pub milliseconds: u32,
}

impl ElapsedDuration {
    /// All fields zero
    pub const ZERO: Self = Self {
        years: 0,
        months: 0,
        days: 0,
        hours: 0,
        minutes: 0,
        seconds: 0,
        milliseconds: 0,
    };

    /// Value of a single unit
    pub fn unit_value(&self, unit: Unit) -> u32 {
        match unit {
            Unit::Years => self.years,
            Unit::Months => self.months,
            Unit::Days => self.days,
            Unit::Hours => self.hours,
            Unit::Minutes => self.minutes,
            Unit::Seconds => self.seconds,
            Unit::Milliseconds => self.milliseconds,
        }
    }

    /// Zero-padded text of a unit (`007` years, `05` hours, ...)
    pub fn unit_text(&self, unit: Unit) -> String {
        format!("{:0width$}", self.unit_value(unit), width = unit.width())
    }

    /// Days through milliseconds as one fixed-length span
    pub fn fixed_part(&self) -> TimeDelta {
        TimeDelta::milliseconds(
            i64::from(self.days) * MILLIS_PER_DAY
                + i64::from(self.hours) * MILLIS_PER_HOUR
                + i64::from(self.minutes) * MILLIS_PER_MINUTE
                + i64::from(self.seconds) * MILLIS_PER_SECOND
                + i64::from(self.milliseconds),
        )
    }

    /// Add this duration back onto `birth` the same way [`decompose`] took
    /// it apart: years, then months from that anchor, then the fixed part
    ///
    /// Returns `None` only if the result leaves chrono's date range.
    pub fn apply_to(&self, birth: NaiveDateTime) -> Option<NaiveDateTime> {
        let anchor = add_calendar(birth, i32::try_from(self.years).ok()?, 0)?;
        let cursor = add_calendar(anchor, 0, i32::try_from(self.months).ok()?)?;
        cursor.checked_add_signed(self.fixed_part())
    }
}

// ============================================================================
// Calendar arithmetic
// ============================================================================

/// Add whole years and months, clamping the day to the target month's length
///
/// The time of day is preserved. Returns `None` outside chrono's date range.
pub fn add_calendar(instant: NaiveDateTime, years: i32, months: i32) -> Option<NaiveDateTime> {
    let total_months = i64::from(instant.year()) * 12
        + i64::from(instant.month0())
        + i64::from(years) * 12
        + i64::from(months);

    let year = i32::try_from(total_months.div_euclid(12)).ok()?;
    let month = u32::try_from(total_months.rem_euclid(12)).ok()? + 1;
    let day = instant.day().min(days_in_month(year, month)?);

    NaiveDate::from_ymd_opt(year, month, day).map(|date| date.and_time(instant.time()))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|last| last.day())
}

// ============================================================================
// Decomposition
// ============================================================================

/// Decompose the span from `birth` to `now`
///
/// Years and months are the largest whole counts that fit (floor); the rest
/// is split by fixed division. Sub-millisecond residue is dropped.
pub fn decompose(
    birth: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<ElapsedDuration, InvalidRangeError> {
    if now < birth {
        return Err(InvalidRangeError { birth, now });
    }

    // The calendar-year difference never underestimates, so only step back
    let mut years = (now.year() - birth.year()).max(0);
    let anchor = loop {
        match add_calendar(birth, years, 0) {
            Some(candidate) if candidate <= now => break candidate,
            _ if years > 0 => years -= 1,
            _ => break birth,
        }
    };

    let mut months = 0;
    let mut cursor = anchor;
    for m in 1..=MAX_MONTHS {
        match add_calendar(anchor, 0, m) {
            Some(candidate) if candidate <= now => {
                months = m;
                cursor = candidate;
            }
            _ => break,
        }
    }

    let mut rest = (now - cursor).num_milliseconds();
    let days = rest / MILLIS_PER_DAY;
    rest %= MILLIS_PER_DAY;
    let hours = rest / MILLIS_PER_HOUR;
    rest %= MILLIS_PER_HOUR;
    let minutes = rest / MILLIS_PER_MINUTE;
    rest %= MILLIS_PER_MINUTE;
    let seconds = rest / MILLIS_PER_SECOND;
    let milliseconds = rest % MILLIS_PER_SECOND;

    Ok(ElapsedDuration {
        years: years as u32,
        months: months as u32,
        days: days as u32,
        hours: hours as u32,
        minutes: minutes as u32,
        seconds: seconds as u32,
        milliseconds: milliseconds as u32,
    })
}
