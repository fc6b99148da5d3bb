//! Property tests for the elapsed-time decomposition
//!
//! Birth instants are drawn from 1900-2100 at millisecond resolution and
//! "now" from up to ~120 years later.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use proptest::prelude::*;
use ticker_core::{add_calendar, decompose, ElapsedDuration};

const DAYS_1900_TO_2100: i64 = 73_049;
const MILLIS_PER_DAY: i64 = 86_400_000;
const MAX_SPAN_MILLIS: i64 = 120 * 366 * MILLIS_PER_DAY;

fn epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1900, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn instant(day_offset: i64, millis_of_day: i64) -> NaiveDateTime {
    epoch() + TimeDelta::days(day_offset) + TimeDelta::milliseconds(millis_of_day)
}

proptest! {
    #[test]
    fn fields_stay_within_bounds(
        day_offset in 0..DAYS_1900_TO_2100,
        millis_of_day in 0..MILLIS_PER_DAY,
        span in 0..MAX_SPAN_MILLIS,
    ) {
        let birth = instant(day_offset, millis_of_day);
        let now = birth + TimeDelta::milliseconds(span);
        let elapsed = decompose(birth, now).unwrap();

        prop_assert!(elapsed.months <= 11);
        prop_assert!(elapsed.days <= 31);
        prop_assert!(elapsed.hours <= 23);
        prop_assert!(elapsed.minutes <= 59);
        prop_assert!(elapsed.seconds <= 59);
        prop_assert!(elapsed.milliseconds <= 999);
    }

    #[test]
    fn reconstruction_is_exact(
        day_offset in 0..DAYS_1900_TO_2100,
        millis_of_day in 0..MILLIS_PER_DAY,
        span in 0..MAX_SPAN_MILLIS,
    ) {
        let birth = instant(day_offset, millis_of_day);
        let now = birth + TimeDelta::milliseconds(span);
        let elapsed = decompose(birth, now).unwrap();

        prop_assert_eq!(elapsed.apply_to(birth), Some(now));
    }

    #[test]
    fn calendar_units_are_maximal(
        day_offset in 0..DAYS_1900_TO_2100,
        millis_of_day in 0..MILLIS_PER_DAY,
        span in 0..MAX_SPAN_MILLIS,
    ) {
        let birth = instant(day_offset, millis_of_day);
        let now = birth + TimeDelta::milliseconds(span);
        let elapsed = decompose(birth, now).unwrap();
        let years = elapsed.years as i32;
        let months = elapsed.months as i32;

        let next_year = add_calendar(birth, years + 1, 0).unwrap();
        prop_assert!(next_year > now);

        if months < 11 {
            let anchor = add_calendar(birth, years, 0).unwrap();
            let next_month = add_calendar(anchor, 0, months + 1).unwrap();
            prop_assert!(next_month > now);
        }
    }

    #[test]
    fn earlier_now_is_rejected(
        day_offset in 1..DAYS_1900_TO_2100,
        millis_of_day in 0..MILLIS_PER_DAY,
        back in 1..MILLIS_PER_DAY,
    ) {
        let birth = instant(day_offset, millis_of_day);
        let now = birth - TimeDelta::milliseconds(back);
        prop_assert!(decompose(birth, now).is_err());
    }

    #[test]
    fn same_instant_is_zero(
        day_offset in 0..DAYS_1900_TO_2100,
        millis_of_day in 0..MILLIS_PER_DAY,
    ) {
        let birth = instant(day_offset, millis_of_day);
        prop_assert_eq!(decompose(birth, birth).unwrap(), ElapsedDuration::ZERO);
    }
}
