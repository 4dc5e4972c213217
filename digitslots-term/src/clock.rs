use chrono::{DateTime, FixedOffset};
use digitslots_game::{Clock, SystemClock};

/// Local clock, or a pinned instant for scripted runs.
#[derive(Debug, Clone, Copy)]
pub enum HostClock {
    System,
    Pinned(DateTime<FixedOffset>),
}

impl HostClock {
    pub const fn from_pinned(now: Option<DateTime<FixedOffset>>) -> Self {
        match now {
            Some(now) => Self::Pinned(now),
            None => Self::System,
        }
    }
}

impl Clock for HostClock {
    fn now(&self) -> DateTime<FixedOffset> {
        match self {
            Self::System => SystemClock.now(),
            Self::Pinned(now) => *now,
        }
    }
}
