//! Clock port for wall-clock sampling
//!
//! The ticker never calls the system clock directly, so tests can pin or
//! step time deterministically.

use chrono::{NaiveDateTime, TimeDelta};
use parking_lot::Mutex;

/// Source of the current naive local instant
pub trait Clock {
    /// Returns the current local wall-clock time (no timezone attached)
    fn now(&self) -> NaiveDateTime;
}

/// Local wall-clock time from the operating system
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}

/// Always returns the same instant
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Returns `start`, then advances by `step` on every call
#[derive(Debug)]
pub struct SteppingClock {
    current: Mutex<NaiveDateTime>,
    step: TimeDelta,
}

impl SteppingClock {
    pub fn new(start: NaiveDateTime, step: TimeDelta) -> Self {
        Self {
            current: Mutex::new(start),
            step,
        }
    }

    /// The instant the next call to [`Clock::now`] will return
    pub fn peek(&self) -> NaiveDateTime {
        *self.current.lock()
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        let mut current = self.current.lock();
        let now = *current;
        *current = now.checked_add_signed(self.step).unwrap_or(now);
        now
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}
