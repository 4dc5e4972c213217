//! Economy configuration: starting grant, daily bonus curve and machine table
use serde::{Deserialize, Serialize};

use crate::constants::{
    BONUS_BASE, BONUS_PER_STREAK_DAY, BONUS_STREAK_CAP, DEFAULT_STARTING_BALANCE,
};
use crate::machines::{Machine, default_machines};

/// Errors raised while loading or validating an [`EconomyConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("machine table is empty")]
    NoMachines,
    #[error("machine {index} ({name}) must cost at least one coin")]
    ZeroCost { index: usize, name: String },
    #[error("machine {index} ({name}) win probability {probability} is outside (0, 1]")]
    Probability {
        index: usize,
        name: String,
        probability: f64,
    },
    #[error("machine {index} ({name}) digit count {digits} is outside 1..=18")]
    DigitCount {
        index: usize,
        name: String,
        digits: u8,
    },
}

/// Daily bonus curve: `base + min(streak * per_streak, cap)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BonusConfig {
    #[serde(default = "default_bonus_base")]
    pub base: u64,
    #[serde(default = "default_bonus_per_streak")]
    pub per_streak: u64,
    #[serde(default = "default_bonus_cap")]
    pub cap: u64,
}

impl Default for BonusConfig {
    fn default() -> Self {
        Self {
            base: BONUS_BASE,
            per_streak: BONUS_PER_STREAK_DAY,
            cap: BONUS_STREAK_CAP,
        }
    }
}

impl BonusConfig {
    /// Bonus paid for a claim made while holding `streak` prior claims.
    #[must_use]
    pub fn amount_for_streak(&self, streak: u32) -> u64 {
        let streak_bonus = u64::from(streak).saturating_mul(self.per_streak).min(self.cap);
        self.base.saturating_add(streak_bonus)
    }
}

/// Complete tuning for one economy instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomyConfig {
    #[serde(default = "default_starting_balance")]
    pub starting_balance: u64,
    #[serde(default)]
    pub bonus: BonusConfig,
    #[serde(default = "default_machines")]
    pub machines: Vec<Machine>,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_balance: DEFAULT_STARTING_BALANCE,
            bonus: BonusConfig::default(),
            machines: default_machines(),
        }
    }
}

impl EconomyConfig {
    /// Parse and validate a JSON configuration. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the machine table is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the machine table for values the economy cannot honor.
    ///
    /// # Errors
    ///
    /// Returns the first offending machine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.machines.is_empty() {
            return Err(ConfigError::NoMachines);
        }
        for (index, machine) in self.machines.iter().enumerate() {
            if machine.cost == 0 {
                return Err(ConfigError::ZeroCost {
                    index,
                    name: machine.name.clone(),
                });
            }
            let p = machine.win_probability;
            if !(p > 0.0 && p <= 1.0) {
                return Err(ConfigError::Probability {
                    index,
                    name: machine.name.clone(),
                    probability: p,
                });
            }
            if !machine.digit_count_in_range() {
                return Err(ConfigError::DigitCount {
                    index,
                    name: machine.name.clone(),
                    digits: machine.digit_count,
                });
            }
        }
        Ok(())
    }
}

const fn default_bonus_base() -> u64 {
    BONUS_BASE
}

const fn default_bonus_per_streak() -> u64 {
    BONUS_PER_STREAK_DAY
}

const fn default_bonus_cap() -> u64 {
    BONUS_STREAK_CAP
}

const fn default_starting_balance() -> u64 {
    DEFAULT_STARTING_BALANCE
}
