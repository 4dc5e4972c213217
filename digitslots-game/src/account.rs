//! Persisted player account and sound settings
use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_HIGHSCORE, DEFAULT_SOUND_ENABLED, DEFAULT_SOUND_VOLUME, DEFAULT_STREAK,
    KEY_BALANCE, KEY_DAILY_STREAK, KEY_HIGHSCORE, KEY_LAST_CLAIM_DATE, KEY_SOUND_ENABLED,
    KEY_SOUND_VOLUME,
};
use crate::numbers::clamp_unit;
use crate::storage::KeyValueStore;

/// Coins, best run and daily streak for the single local player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub balance: u64,
    pub highscore: u64,
    /// Consecutive daily claims. Never decays on a missed day.
    pub streak: u32,
    /// `None` until the first bonus claim.
    pub last_claim: Option<DateTime<FixedOffset>>,
}

impl Account {
    /// Fresh account holding the starting grant.
    #[must_use]
    pub const fn new(starting_balance: u64) -> Self {
        Self {
            balance: starting_balance,
            highscore: DEFAULT_HIGHSCORE,
            streak: DEFAULT_STREAK,
            last_claim: None,
        }
    }

    /// Read the account from `store`, falling back to defaults for missing or
    /// unreadable keys.
    pub fn load<S: KeyValueStore>(store: &S, starting_balance: u64) -> Self {
        Self {
            balance: read_or(store, KEY_BALANCE, starting_balance),
            highscore: read_or(store, KEY_HIGHSCORE, DEFAULT_HIGHSCORE),
            streak: read_or(store, KEY_DAILY_STREAK, DEFAULT_STREAK),
            last_claim: read_timestamp(store, KEY_LAST_CLAIM_DATE),
        }
    }

    /// Write every account key.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn persist<S: KeyValueStore>(&self, store: &mut S) -> Result<(), S::Error> {
        store.set(KEY_BALANCE, self.balance.to_string())?;
        store.set(KEY_HIGHSCORE, self.highscore.to_string())?;
        store.set(KEY_DAILY_STREAK, self.streak.to_string())?;
        match self.last_claim {
            Some(ts) => store.set(KEY_LAST_CLAIM_DATE, ts.to_rfc3339()),
            None => store.remove(KEY_LAST_CLAIM_DATE),
        }
    }

    /// Raise the highscore to the current balance if it is higher.
    pub fn observe_balance(&mut self) {
        if self.balance > self.highscore {
            self.highscore = self.balance;
        }
    }

    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.balance == 0
    }
}

/// Sound preferences. Playback itself belongs to the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub sound_enabled: bool,
    /// Always within `0.0..=1.0`
    pub sound_volume: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: DEFAULT_SOUND_ENABLED,
            sound_volume: DEFAULT_SOUND_VOLUME,
        }
    }
}

impl Settings {
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        Self {
            sound_enabled: read_or(store, KEY_SOUND_ENABLED, DEFAULT_SOUND_ENABLED),
            sound_volume: clamp_unit(read_or(store, KEY_SOUND_VOLUME, DEFAULT_SOUND_VOLUME)),
        }
    }

    /// Write both sound keys.
    ///
    /// # Errors
    ///
    /// Returns the first storage error encountered.
    pub fn persist<S: KeyValueStore>(&self, store: &mut S) -> Result<(), S::Error> {
        store.set(KEY_SOUND_ENABLED, self.sound_enabled.to_string())?;
        store.set(KEY_SOUND_VOLUME, self.sound_volume.to_string())
    }
}

fn read_raw<S: KeyValueStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(err) => {
            log::warn!("reading `{key}` failed, using default: {err}");
            None
        }
    }
}

fn read_or<S, T>(store: &S, key: &str, default: T) -> T
where
    S: KeyValueStore,
    T: FromStr + Display,
{
    let Some(raw) = read_raw(store, key) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        log::warn!("stored `{key}` value {raw:?} is unreadable, using {default}");
        default
    })
}

fn read_timestamp<S: KeyValueStore>(store: &S, key: &str) -> Option<DateTime<FixedOffset>> {
    let raw = read_raw(store, key)?;
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(ts) => Some(ts),
        Err(err) => {
            log::warn!("stored `{key}` value {raw:?} is not a timestamp ({err}), treating as never");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn empty_store_loads_first_run_defaults() {
        let store = MemoryStore::new();
        let account = Account::load(&store, 1_000);
        assert_eq!(account, Account::new(1_000));
        assert_eq!(Settings::load(&store), Settings::default());
    }

    #[test]
    fn unreadable_values_fall_back() {
        let store = MemoryStore::with_values([
            (KEY_BALANCE, "-5"),
            (KEY_HIGHSCORE, "lots"),
            (KEY_DAILY_STREAK, " 4 "),
            (KEY_LAST_CLAIM_DATE, "yesterday"),
            (KEY_SOUND_ENABLED, "maybe"),
            (KEY_SOUND_VOLUME, "3.5"),
        ]);
        let account = Account::load(&store, 1_000);
        assert_eq!(account.balance, 1_000);
        assert_eq!(account.highscore, 0);
        assert_eq!(account.streak, 4);
        assert!(account.last_claim.is_none());
        let settings = Settings::load(&store);
        assert!(!settings.sound_enabled);
        assert!((settings.sound_volume - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn persist_writes_flat_keys() {
        let mut store = MemoryStore::new();
        let account = Account {
            balance: 123,
            highscore: 456,
            streak: 2,
            last_claim: Some(DateTime::parse_from_rfc3339("2024-01-02T03:04:05+01:00").unwrap()),
        };
        account.persist(&mut store).unwrap();
        assert_eq!(store.raw(KEY_BALANCE), Some("123"));
        assert_eq!(store.raw(KEY_HIGHSCORE), Some("456"));
        assert_eq!(store.raw(KEY_DAILY_STREAK), Some("2"));
        assert_eq!(
            store.raw(KEY_LAST_CLAIM_DATE),
            Some("2024-01-02T03:04:05+01:00")
        );
        assert_eq!(Account::load(&store, 1_000), account);

        Settings {
            sound_enabled: true,
            sound_volume: 0.25,
        }
        .persist(&mut store)
        .unwrap();
        assert_eq!(store.raw(KEY_SOUND_ENABLED), Some("true"));
        assert_eq!(store.raw(KEY_SOUND_VOLUME), Some("0.25"));
    }

    #[test]
    fn observe_balance_only_raises() {
        let mut account = Account::new(500);
        account.highscore = 800;
        account.observe_balance();
        assert_eq!(account.highscore, 800);
        account.balance = 900;
        account.observe_balance();
        assert_eq!(account.highscore, 900);
        assert!(!account.is_depleted());
    }
}
