//! Spin draws and outcomes
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DIGIT_MAX, DIGIT_MIN};
use crate::machines::{Machine, prize_for};

/// Randomness consumed by a spin: uniform digits and a uniform unit draw.
///
/// Every [`rand::Rng`] is a source; [`ScriptedSource`] replays fixed draws.
pub trait SpinSource {
    /// A digit in `1..=9`.
    fn next_digit(&mut self) -> u8;
    /// A real in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: Rng + ?Sized> SpinSource for R {
    fn next_digit(&mut self) -> u8 {
        self.gen_range(DIGIT_MIN..=DIGIT_MAX)
    }

    fn next_unit(&mut self) -> f64 {
        self.gen_range(0.0..1.0)
    }
}

/// Replays scripted digits and unit draws in a loop.
///
/// Digits are clamped into `1..=9`. An empty digit script yields ones and an
/// empty unit script yields `0.0`, which wins on every machine.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    digits: Vec<u8>,
    units: Vec<f64>,
    digit_cursor: usize,
    unit_cursor: usize,
}

impl ScriptedSource {
    #[must_use]
    pub fn new(digits: Vec<u8>, units: Vec<f64>) -> Self {
        Self {
            digits,
            units,
            digit_cursor: 0,
            unit_cursor: 0,
        }
    }

    /// Script that always shows `digits` and always wins.
    #[must_use]
    pub fn winning(digits: &[u8]) -> Self {
        Self::new(digits.to_vec(), vec![0.0])
    }

    /// Script that always shows `digits` and never wins.
    #[must_use]
    pub fn losing(digits: &[u8]) -> Self {
        Self::new(digits.to_vec(), vec![1.0])
    }
}

impl SpinSource for ScriptedSource {
    fn next_digit(&mut self) -> u8 {
        if self.digits.is_empty() {
            return DIGIT_MIN;
        }
        let digit = self.digits[self.digit_cursor % self.digits.len()];
        self.digit_cursor = self.digit_cursor.wrapping_add(1);
        digit.clamp(DIGIT_MIN, DIGIT_MAX)
    }

    fn next_unit(&mut self) -> f64 {
        if self.units.is_empty() {
            return 0.0;
        }
        let unit = self.units[self.unit_cursor % self.units.len()];
        self.unit_cursor = self.unit_cursor.wrapping_add(1);
        unit
    }
}

/// Digits and verdict of one spin before any coins move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draw {
    pub digits: Vec<u8>,
    pub won: bool,
    /// Numeral formed by `digits` when `won`, otherwise 0
    pub prize: u64,
}

impl Draw {
    /// Draw `digit_count` digits, then one unit value compared to the win chance.
    pub fn roll<R: SpinSource + ?Sized>(machine: &Machine, source: &mut R) -> Self {
        let digits: Vec<u8> = (0..machine.digit_count)
            .map(|_| source.next_digit())
            .collect();
        let won = source.next_unit() < machine.win_probability;
        let prize = if won {
            prize_for(&digits).unwrap_or_default()
        } else {
            0
        };
        Self { digits, won, prize }
    }
}

/// A paid spin whose outcome is fixed but not yet credited.
///
/// Hosts use it to run the reveal animation before settling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingSpin {
    pub machine: usize,
    pub cost: u64,
    pub draw: Draw,
    /// Balance right after the cost was deducted
    pub balance_after_cost: u64,
}

impl PendingSpin {
    #[must_use]
    pub fn digits(&self) -> &[u8] {
        &self.draw.digits
    }

    #[must_use]
    pub const fn won(&self) -> bool {
        self.draw.won
    }
}

/// Settled result of a spin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub machine: usize,
    pub digits: Vec<u8>,
    pub won: bool,
    pub prize: u64,
    pub cost: u64,
    pub balance_after: u64,
    /// The balance hit zero; cleared by the next bonus claim
    pub depleted: bool,
}

impl SpinOutcome {
    /// Coins gained (positive) or lost (negative) by this spin.
    #[must_use]
    pub fn net(&self) -> i128 {
        i128::from(self.prize) - i128::from(self.cost)
    }
}
