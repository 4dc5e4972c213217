//! Wall-clock seam used for daily bonus eligibility
use std::cell::Cell;

use chrono::{DateTime, FixedOffset, Local, TimeDelta};

/// Source of the current local time, including its UTC offset.
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;
}

/// The host's local clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Cell<DateTime<FixedOffset>>,
}

impl ManualClock {
    #[must_use]
    pub const fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, delta: TimeDelta) {
        self.now.set(self.now.get() + delta);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}
