//! Slot machine table and prize arithmetic
use serde::{Deserialize, Serialize};

use crate::constants::{DIGIT_MAX, DIGIT_MIN, MAX_DIGIT_COUNT};
use crate::numbers::u64_to_f64;

/// Cosmetic accent a renderer may use for a machine. Carries no game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
}

/// A single slot machine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub name: String,
    /// Coins deducted per spin
    pub cost: u64,
    /// Chance in `(0, 1]` that a spin pays out
    pub win_probability: f64,
    /// Number of digits drawn per spin
    pub digit_count: u8,
    #[serde(default)]
    pub accent: Accent,
}

impl Machine {
    #[must_use]
    pub fn new(name: &str, cost: u64, win_probability: f64, digit_count: u8) -> Self {
        Self {
            name: name.to_string(),
            cost,
            win_probability,
            digit_count,
            accent: Accent::default(),
        }
    }

    #[must_use]
    pub fn with_accent(mut self, accent: Accent) -> Self {
        self.accent = accent;
        self
    }

    /// Mean payout per spin, in coins.
    ///
    /// The mean of `n` uniform digits read as a numeral is `5 * (10^n - 1) / 9`.
    #[must_use]
    pub fn expected_return(&self) -> f64 {
        let repunit = (0..self.digit_count).fold(0u64, |acc, _| {
            acc.saturating_mul(10).saturating_add(1)
        });
        self.win_probability * 5.0 * u64_to_f64(repunit)
    }

    /// Expected return divided by cost.
    #[must_use]
    pub fn return_to_player(&self) -> f64 {
        if self.cost == 0 {
            return 0.0;
        }
        self.expected_return() / u64_to_f64(self.cost)
    }

    /// Smallest prize this machine can pay (all ones).
    #[must_use]
    pub fn min_prize(&self) -> u64 {
        prize_for(&vec![DIGIT_MIN; usize::from(self.digit_count)]).unwrap_or(0)
    }

    /// Largest prize this machine can pay (all nines).
    #[must_use]
    pub fn max_prize(&self) -> u64 {
        prize_for(&vec![DIGIT_MAX; usize::from(self.digit_count)]).unwrap_or(u64::MAX)
    }

    pub(crate) fn digit_count_in_range(&self) -> bool {
        (1..=MAX_DIGIT_COUNT).contains(&self.digit_count)
    }
}

/// The five stock machines, cheapest first. Cost and digit count escalate
/// while the odds fall.
#[must_use]
pub fn default_machines() -> Vec<Machine> {
    vec![
        Machine::new("Cherry", 10, 0.15, 2).with_accent(Accent::Red),
        Machine::new("Lucky Seven", 75, 0.12, 3).with_accent(Accent::Green),
        Machine::new("Golden Bar", 500, 0.08, 4).with_accent(Accent::Yellow),
        Machine::new("Diamond", 2_500, 0.04, 5).with_accent(Accent::Blue),
        Machine::new("Jackpot", 10_000, 0.015, 6).with_accent(Accent::Magenta),
    ]
}

/// Read a digit sequence as a base-10 numeral, leading digit most significant.
///
/// Returns `None` if the numeral does not fit in a `u64` or a digit is above 9.
#[must_use]
pub fn prize_for(digits: &[u8]) -> Option<u64> {
    digits.iter().try_fold(0u64, |acc, &digit| {
        if digit > 9 {
            return None;
        }
        acc.checked_mul(10)?.checked_add(u64::from(digit))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prize_reads_digits_most_significant_first() {
        assert_eq!(prize_for(&[7, 3]), Some(73));
        assert_eq!(prize_for(&[1, 2, 3, 4]), Some(1_234));
        assert_eq!(prize_for(&[9]), Some(9));
        assert_eq!(prize_for(&[]), Some(0));
    }

    #[test]
    fn prize_rejects_overflow_and_bad_digits() {
        assert_eq!(prize_for(&[9; 20]), None);
        assert_eq!(prize_for(&[1, 10]), None);
        assert_eq!(prize_for(&[9; 18]), Some(999_999_999_999_999_999));
    }

    #[test]
    fn stock_table_escalates() {
        let machines = default_machines();
        assert_eq!(machines.len(), 5);
        for pair in machines.windows(2) {
            assert!(pair[0].cost < pair[1].cost);
            assert!(pair[0].digit_count < pair[1].digit_count);
            assert!(pair[0].win_probability > pair[1].win_probability);
        }
    }

    #[test]
    fn expected_return_matches_closed_form() {
        let machine = Machine::new("two", 50, 0.5, 2);
        // mean of two uniform digits as a numeral is 55
        assert!((machine.expected_return() - 27.5).abs() < 1e-9);
        assert!((machine.return_to_player() - 0.55).abs() < 1e-9);
        assert_eq!(machine.min_prize(), 11);
        assert_eq!(machine.max_prize(), 99);
    }

    #[test]
    fn stock_machines_keep_the_house_edge() {
        for machine in default_machines() {
            let rtp = machine.return_to_player();
            assert!(rtp > 0.5 && rtp < 1.0, "{} rtp {rtp}", machine.name);
        }
    }
}
