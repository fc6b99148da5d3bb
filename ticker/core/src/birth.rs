//! Birth Record
//!
//! The validated date and time of birth every decomposition is measured
//! from, and the two-line text record it is persisted as:
//!
//! ```text
//! 07/09/1985
//! 14:30:00        (or 14:30:00.250 with millisecond precision)
//! ```

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

use crate::config::Precision;

/// Time used when a record carries a date but no time line
const DEFAULT_HOUR: u32 = 12;

// ============================================================================
// Errors
// ============================================================================

/// Reasons a date/time string or record cannot become a [`BirthRecord`]
///
/// Display strings double as the inline messages shown by the input prompt.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Date is not shaped like `dd/mm/yyyy`
    #[error("Invalid date. Use dd/mm/yyyy.")]
    DateFormat(String),

    /// Date is well-formed but does not exist on the calendar
    #[error("Invalid calendar date.")]
    CalendarDate {
        /// Day of month as entered
        day: u32,
        /// Month as entered
        month: u32,
        /// Year as entered
        year: i32,
    },

    /// Time is not shaped like `hh:mm:ss` or `hh:mm:ss.mmm`
    #[error("Invalid time. Use hh:mm:ss.")]
    TimeFormat(String),

    /// Time is well-formed but a field is out of range
    #[error("Time out of range.")]
    TimeRange {
        /// Hour as entered
        hour: u32,
        /// Minute as entered
        minute: u32,
        /// Second as entered
        second: u32,
        /// Millisecond as entered
        millisecond: u32,
    },

    /// Record text has no date line
    #[error("Birth record is empty.")]
    Empty,
}

// ============================================================================
// BirthRecord
// ============================================================================

/// Validated date and time of birth (naive local wall-clock time)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BirthRecord {
    date: NaiveDate,
    time: NaiveTime,
}

impl BirthRecord {
    /// Build a record from calendar fields, rejecting impossible dates/times
    pub fn new(
        day: u32,
        month: u32,
        year: i32,
        hour: u32,
        minute: u32,
        second: u32,
        millisecond: u32,
    ) -> Result<Self, RecordError> {
        let date = calendar_date(day, month, year)?;
        let time = clock_time(hour, minute, second, millisecond)?;
        Ok(Self { date, time })
    }

    /// Build a record from a date and time, dropping sub-millisecond precision
    pub fn from_parts(date: NaiveDate, time: NaiveTime) -> Self {
        let millis = time.nanosecond() / 1_000_000 % 1_000;
        let time = NaiveTime::from_hms_milli_opt(time.hour(), time.minute(), time.second(), millis)
            .unwrap_or(time);
        Self { date, time }
    }

    /// Noon, used when a date comes without a time
    pub fn default_time() -> NaiveTime {
        NaiveTime::from_hms_opt(DEFAULT_HOUR, 0, 0).unwrap_or_default()
    }

    /// The birth instant
    pub fn instant(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn millisecond(&self) -> u32 {
        self.time.nanosecond() / 1_000_000 % 1_000
    }

    /// `dd/mm/yyyy`
    pub fn date_string(&self) -> String {
        format!(
            "{:02}/{:02}/{:04}",
            self.date.day(),
            self.date.month(),
            self.date.year()
        )
    }

    /// `hh:mm:ss`, or `hh:mm:ss.mmm` with millisecond precision
    pub fn time_string(&self, precision: Precision) -> String {
        let base = format!(
            "{:02}:{:02}:{:02}",
            self.time.hour(),
            self.time.minute(),
            self.time.second()
        );
        match precision {
            Precision::Seconds => base,
            Precision::Millis => format!("{base}.{:03}", self.millisecond()),
        }
    }

    /// Serialize as the two-line persisted record
    pub fn to_record_text(&self, precision: Precision) -> String {
        format!("{}\n{}\n", self.date_string(), self.time_string(precision))
    }

    /// Parse the two-line persisted record
    ///
    /// Blank lines are ignored. A missing time line means noon. Besides the
    /// strict `hh:mm:ss[.mmm]` form, older `h:m:s.ms` and `h:m:s:ms` time
    /// lines are still accepted.
    pub fn from_record_text(text: &str) -> Result<Self, RecordError> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let date = Self::parse_date(lines.next().ok_or(RecordError::Empty)?)?;

        let time = match lines.next() {
            None => Self::default_time(),
            Some(line) => match Self::parse_time(line) {
                Ok(time) => time,
                Err(RecordError::TimeFormat(_)) => parse_legacy_time(line)?,
                Err(e) => return Err(e),
            },
        };

        Ok(Self { date, time })
    }

    /// Parse a strict `dd/mm/yyyy` date
    pub fn parse_date(text: &str) -> Result<NaiveDate, RecordError> {
        let format_error = || RecordError::DateFormat(text.to_string());
        let mut parts = text.split('/');
        let (Some(d), Some(m), Some(y), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format_error());
        };

        let day = fixed_digits(d, 2).ok_or_else(format_error)?;
        let month = fixed_digits(m, 2).ok_or_else(format_error)?;
        let year = fixed_digits(y, 4).ok_or_else(format_error)?;

        calendar_date(day, month, year as i32)
    }

    /// Parse a strict `hh:mm:ss` or `hh:mm:ss.mmm` time
    pub fn parse_time(text: &str) -> Result<NaiveTime, RecordError> {
        let format_error = || RecordError::TimeFormat(text.to_string());
        let (clock, millis) = match text.split_once('.') {
            Some((clock, ms)) => (clock, fixed_digits(ms, 3).ok_or_else(format_error)?),
            None => (text, 0),
        };

        let mut parts = clock.split(':');
        let (Some(h), Some(m), Some(s), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(format_error());
        };

        let hour = fixed_digits(h, 2).ok_or_else(format_error)?;
        let minute = fixed_digits(m, 2).ok_or_else(format_error)?;
        let second = fixed_digits(s, 2).ok_or_else(format_error)?;

        clock_time(hour, minute, second, millis)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse exactly `len` ASCII digits
fn fixed_digits(text: &str, len: usize) -> Option<u32> {
    if text.len() != len || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// Parse between 1 and `max_len` ASCII digits
fn loose_digits(text: &str, max_len: usize) -> Option<u32> {
    if text.is_empty() || text.len() > max_len || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// `h:m:s.ms` or `h:m:s:ms`, one or two digits per clock field
fn parse_legacy_time(text: &str) -> Result<NaiveTime, RecordError> {
    let format_error = || RecordError::TimeFormat(text.to_string());

    let fields: Vec<&str> = match text.split_once('.') {
        Some((clock, ms)) => clock.split(':').chain(std::iter::once(ms)).collect(),
        None => text.split(':').collect(),
    };
    let [h, m, s, ms] = fields.as_slice() else {
        return Err(format_error());
    };

    clock_time(
        loose_digits(h, 2).ok_or_else(format_error)?,
        loose_digits(m, 2).ok_or_else(format_error)?,
        loose_digits(s, 2).ok_or_else(format_error)?,
        loose_digits(ms, 3).ok_or_else(format_error)?,
    )
}

fn calendar_date(day: u32, month: u32, year: i32) -> Result<NaiveDate, RecordError> {
    // Years start at 0001, matching the four-digit record format
    if year < 1 {
        return Err(RecordError::CalendarDate { day, month, year });
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(RecordError::CalendarDate { day, month, year })
}

fn clock_time(
    hour: u32,
    minute: u32,
    second: u32,
    millisecond: u32,
) -> Result<NaiveTime, RecordError> {
    let range_error = RecordError::TimeRange {
        hour,
        minute,
        second,
        millisecond,
    };
    // Leap-second representations are not valid birth times
    if second > 59 || millisecond > 999 {
        return Err(range_error);
    }
    NaiveTime::from_hms_milli_opt(hour, minute, second, millisecond).ok_or(range_error)
}
