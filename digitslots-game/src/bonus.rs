//! Daily bonus eligibility and countdown
//!
//! Days are local calendar days: the stored claim time is converted into the
//! current UTC offset before dates are compared, so a claim at 23:59 and a
//! check at 00:01 fall on different days.
use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::constants::SECONDS_PER_DAY;

/// Receipt for a successful bonus claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusClaim {
    pub amount: u64,
    pub streak_before: u32,
    pub streak_after: u32,
    pub balance_after: u64,
}

/// Whether `last` falls on the same local calendar day as `now`.
#[must_use]
pub fn is_same_local_day(last: DateTime<FixedOffset>, now: DateTime<FixedOffset>) -> bool {
    last.with_timezone(now.offset()).date_naive() == now.date_naive()
}

/// A bonus may be claimed once per local calendar day.
#[must_use]
pub fn can_claim(last_claim: Option<DateTime<FixedOffset>>, now: DateTime<FixedOffset>) -> bool {
    last_claim.is_none_or(|last| !is_same_local_day(last, now))
}

/// Time left until the day after the last claim begins, never negative.
#[must_use]
pub fn time_until_next(
    last_claim: Option<DateTime<FixedOffset>>,
    now: DateTime<FixedOffset>,
) -> TimeDelta {
    let Some(last) = last_claim else {
        return TimeDelta::zero();
    };
    let start_of_day = last
        .with_timezone(now.offset())
        .date_naive()
        .and_time(NaiveTime::MIN);
    let next_window = start_of_day + TimeDelta::seconds(SECONDS_PER_DAY);
    (next_window - now.naive_local()).max(TimeDelta::zero())
}

/// Render a duration as `HH:MM:SS`, clamping negatives to zero.
#[must_use]
pub fn format_countdown(remaining: TimeDelta) -> String {
    let total = remaining.num_seconds().max(0);
    let hours = total / 3_600;
    let minutes = (total % 3_600) / 60;
    let seconds = total % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ts: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(ts).unwrap()
    }

    #[test]
    fn never_claimed_is_always_eligible() {
        let now = at("2024-05-10T12:00:00+00:00");
        assert!(can_claim(None, now));
        assert_eq!(time_until_next(None, now), TimeDelta::zero());
    }

    #[test]
    fn same_day_blocks_until_midnight() {
        let claimed = at("2024-05-10T23:59:00+00:00");
        assert!(!can_claim(Some(claimed), at("2024-05-10T23:59:59+00:00")));
        assert!(can_claim(Some(claimed), at("2024-05-11T00:00:01+00:00")));
    }

    #[test]
    fn day_boundary_follows_current_offset() {
        // 22:30 UTC is already the next day at +02:00
        let claimed = at("2024-05-10T22:30:00+00:00");
        let now = at("2024-05-11T00:45:00+02:00");
        assert!(!can_claim(Some(claimed), now));
        assert!(can_claim(Some(claimed), at("2024-05-11T00:45:00+00:00")));
    }

    #[test]
    fn countdown_runs_to_local_midnight() {
        let claimed = at("2024-05-10T08:00:00+00:00");
        let now = at("2024-05-10T20:30:15+00:00");
        let remaining = time_until_next(Some(claimed), now);
        assert_eq!(remaining, TimeDelta::seconds(3 * 3_600 + 29 * 60 + 45));
        assert_eq!(format_countdown(remaining), "03:29:45");
    }

    #[test]
    fn countdown_is_zero_once_the_day_turns() {
        let claimed = at("2024-05-10T08:00:00+00:00");
        let now = at("2024-05-12T01:00:00+00:00");
        assert_eq!(time_until_next(Some(claimed), now), TimeDelta::zero());
    }

    #[test]
    fn format_clamps_and_pads() {
        assert_eq!(format_countdown(TimeDelta::zero()), "00:00:00");
        assert_eq!(format_countdown(TimeDelta::seconds(-5)), "00:00:00");
        assert_eq!(format_countdown(TimeDelta::seconds(86_399)), "23:59:59");
        assert_eq!(format_countdown(TimeDelta::hours(100)), "100:00:00");
    }
}
