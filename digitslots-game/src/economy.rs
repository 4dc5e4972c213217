//! The economy context: account, settings and the operations that move coins.
//!
//! Every mutation updates memory first and then writes the affected keys back
//! to the store. Write failures are logged and swallowed so a flaky store can
//! never block play.
use chrono::{DateTime, FixedOffset, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::account::{Account, Settings};
use crate::bonus::{self, BonusClaim, format_countdown};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, EconomyConfig};
use crate::error::EconomyError;
use crate::machines::Machine;
use crate::numbers::{clamp_unit, format_coins};
use crate::spin::{Draw, PendingSpin, SpinOutcome, SpinSource};
use crate::storage::KeyValueStore;

/// Read-only view of everything a renderer shows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub balance: u64,
    pub highscore: u64,
    pub streak: u32,
    pub last_claim: Option<DateTime<FixedOffset>>,
    pub can_claim_bonus: bool,
    pub next_bonus: u64,
    /// `HH:MM:SS` until the bonus unlocks, `00:00:00` when claimable
    pub next_bonus_in: String,
    pub depleted: bool,
    pub sound_enabled: bool,
    pub sound_volume: f64,
}

/// Single-player economy bound to a store and a clock.
///
/// A spin started with [`Economy::begin_spin`] always resolves: it is settled
/// by [`Economy::complete_spin`], by the next `begin_spin`, or when the
/// economy is dropped.
pub struct Economy<S: KeyValueStore, C: Clock = SystemClock> {
    config: EconomyConfig,
    account: Account,
    settings: Settings,
    pending: Option<PendingSpin>,
    store: S,
    clock: C,
}

impl<S: KeyValueStore> Economy<S, SystemClock> {
    /// Load an economy that reads the host's local clock.
    ///
    /// # Errors
    ///
    /// Returns an error if the machine table is invalid.
    pub fn with_system_clock(store: S, config: EconomyConfig) -> Result<Self, ConfigError> {
        Self::load(store, SystemClock, config)
    }
}

impl<S: KeyValueStore, C: Clock> Economy<S, C> {
    /// Load the account and settings from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the machine table is invalid.
    pub fn load(store: S, clock: C, config: EconomyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let account = Account::load(&store, config.starting_balance);
        let settings = Settings::load(&store);
        log::debug!(
            "loaded account: balance {} highscore {} streak {}",
            account.balance,
            account.highscore,
            account.streak
        );
        Ok(Self {
            config,
            account,
            settings,
            pending: None,
            store,
            clock,
        })
    }

    #[must_use]
    pub const fn account(&self) -> &Account {
        &self.account
    }

    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub const fn config(&self) -> &EconomyConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    #[must_use]
    pub fn machines(&self) -> &[Machine] {
        &self.config.machines
    }

    /// Look up a machine by table index.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::UnknownMachine`] for an out-of-range index.
    pub fn machine(&self, index: usize) -> Result<&Machine, EconomyError> {
        self.config
            .machines
            .get(index)
            .ok_or(EconomyError::UnknownMachine {
                index,
                available: self.config.machines.len(),
            })
    }

    #[must_use]
    pub const fn balance(&self) -> u64 {
        self.account.balance
    }

    #[must_use]
    pub const fn highscore(&self) -> u64 {
        self.account.highscore
    }

    #[must_use]
    pub const fn streak(&self) -> u32 {
        self.account.streak
    }

    /// The balance is zero; only a bonus claim can restart play.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.account.is_depleted()
    }

    #[must_use]
    pub fn can_afford(&self, index: usize) -> bool {
        self.machine(index)
            .is_ok_and(|machine| self.account.balance >= machine.cost)
    }

    /// Whether at least one machine is affordable.
    #[must_use]
    pub fn can_afford_any(&self) -> bool {
        self.config
            .machines
            .iter()
            .any(|machine| self.account.balance >= machine.cost)
    }

    #[must_use]
    pub const fn pending_spin(&self) -> Option<&PendingSpin> {
        self.pending.as_ref()
    }

    /// Spin with no presentation delay.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InsufficientFunds`] when the balance is below
    /// the machine's cost, leaving the account untouched.
    pub fn spin<R: SpinSource + ?Sized>(
        &mut self,
        index: usize,
        source: &mut R,
    ) -> Result<SpinOutcome, EconomyError> {
        self.complete_spin();
        let pending = self.pay_and_draw(index, source)?;
        Ok(self.settle(pending))
    }

    /// Pay for a spin and fix its outcome without crediting the prize.
    ///
    /// Any spin still pending is settled first.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::InsufficientFunds`] or
    /// [`EconomyError::UnknownMachine`] without touching the account.
    pub fn begin_spin<R: SpinSource + ?Sized>(
        &mut self,
        index: usize,
        source: &mut R,
    ) -> Result<PendingSpin, EconomyError> {
        self.complete_spin();
        let pending = self.pay_and_draw(index, source)?;
        self.pending = Some(pending.clone());
        Ok(pending)
    }

    /// Credit the pending spin, if any.
    pub fn complete_spin(&mut self) -> Option<SpinOutcome> {
        let pending = self.pending.take()?;
        Some(self.settle(pending))
    }

    /// Spin, wait out the presentation `delay`, then settle.
    ///
    /// Dropping the future mid-delay leaves the spin pending; it still
    /// resolves on the next spin or when the economy is dropped.
    ///
    /// # Errors
    ///
    /// Same as [`Economy::begin_spin`].
    #[cfg(feature = "async")]
    pub async fn spin_revealed<R: SpinSource + ?Sized>(
        &mut self,
        index: usize,
        source: &mut R,
        delay: std::time::Duration,
    ) -> Result<SpinOutcome, EconomyError> {
        let pending = self.begin_spin(index, source)?;
        tokio::time::sleep(delay).await;
        let pending = self.pending.take().unwrap_or(pending);
        Ok(self.settle(pending))
    }

    fn pay_and_draw<R: SpinSource + ?Sized>(
        &mut self,
        index: usize,
        source: &mut R,
    ) -> Result<PendingSpin, EconomyError> {
        let machine = self.machine(index)?;
        let cost = machine.cost;
        if self.account.balance < cost {
            return Err(EconomyError::InsufficientFunds {
                cost,
                balance: self.account.balance,
            });
        }
        let draw = Draw::roll(machine, source);
        self.account.balance = self.account.balance.saturating_sub(cost);
        self.persist_account();
        Ok(PendingSpin {
            machine: index,
            cost,
            draw,
            balance_after_cost: self.account.balance,
        })
    }

    fn settle(&mut self, pending: PendingSpin) -> SpinOutcome {
        let PendingSpin {
            machine, cost, draw, ..
        } = pending;
        if draw.won {
            self.account.balance = self.account.balance.saturating_add(draw.prize);
            self.account.observe_balance();
            self.persist_account();
        }
        let balance_after = self.account.balance;
        log::debug!(
            "spin on machine {machine}: digits {:?} won {} prize {} balance {balance_after}",
            draw.digits,
            draw.won,
            draw.prize
        );
        SpinOutcome {
            machine,
            digits: draw.digits,
            won: draw.won,
            prize: draw.prize,
            cost,
            balance_after,
            depleted: balance_after == 0,
        }
    }

    /// True unless a bonus was already claimed during the current local day.
    #[must_use]
    pub fn can_claim_bonus(&self) -> bool {
        bonus::can_claim(self.account.last_claim, self.clock.now())
    }

    /// What the next claim would pay at the current streak.
    #[must_use]
    pub fn next_bonus_amount(&self) -> u64 {
        self.config.bonus.amount_for_streak(self.account.streak)
    }

    /// Claim the daily bonus.
    ///
    /// # Errors
    ///
    /// Returns [`EconomyError::NotEligibleYet`] if a bonus was already
    /// claimed today; nothing changes in that case.
    pub fn claim_bonus(&mut self) -> Result<BonusClaim, EconomyError> {
        let now = self.clock.now();
        if !bonus::can_claim(self.account.last_claim, now) {
            return Err(EconomyError::NotEligibleYet {
                remaining: bonus::time_until_next(self.account.last_claim, now),
            });
        }
        let streak_before = self.account.streak;
        let amount = self.config.bonus.amount_for_streak(streak_before);
        self.account.balance = self.account.balance.saturating_add(amount);
        self.account.observe_balance();
        self.account.streak = streak_before.saturating_add(1);
        self.account.last_claim = Some(now);
        self.persist_account();
        log::debug!(
            "bonus claimed: {amount} coins, streak {streak_before} -> {}",
            self.account.streak
        );
        Ok(BonusClaim {
            amount,
            streak_before,
            streak_after: self.account.streak,
            balance_after: self.account.balance,
        })
    }

    pub fn reset_highscore(&mut self) {
        self.account.highscore = 0;
        self.persist_account();
    }

    /// Time until the next bonus unlocks; zero when claimable.
    #[must_use]
    pub fn time_until_next_bonus(&self) -> TimeDelta {
        bonus::time_until_next(self.account.last_claim, self.clock.now())
    }

    /// [`Economy::time_until_next_bonus`] as `HH:MM:SS`.
    #[must_use]
    pub fn bonus_countdown(&self) -> String {
        format_countdown(self.time_until_next_bonus())
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.settings.sound_enabled = enabled;
        self.persist_settings();
    }

    /// Store the volume clamped into `0.0..=1.0` and return what was stored.
    pub fn set_sound_volume(&mut self, volume: f64) -> f64 {
        self.settings.sound_volume = clamp_unit(volume);
        self.persist_settings();
        self.settings.sound_volume
    }

    #[must_use]
    pub fn snapshot(&self) -> AccountSnapshot {
        let now = self.clock.now();
        AccountSnapshot {
            balance: self.account.balance,
            highscore: self.account.highscore,
            streak: self.account.streak,
            last_claim: self.account.last_claim,
            can_claim_bonus: bonus::can_claim(self.account.last_claim, now),
            next_bonus: self.next_bonus_amount(),
            next_bonus_in: format_countdown(bonus::time_until_next(self.account.last_claim, now)),
            depleted: self.account.is_depleted(),
            sound_enabled: self.settings.sound_enabled,
            sound_volume: self.settings.sound_volume,
        }
    }

    /// Brag line handed to a share sheet.
    #[must_use]
    pub fn share_text(&self) -> String {
        format!(
            "I hit a highscore of {} coins in Digit Slots!",
            format_coins(self.account.highscore)
        )
    }

    fn persist_account(&mut self) {
        if let Err(err) = self.account.persist(&mut self.store) {
            log::warn!("saving account failed: {err}");
        }
    }

    fn persist_settings(&mut self) {
        if let Err(err) = self.settings.persist(&mut self.store) {
            log::warn!("saving settings failed: {err}");
        }
    }
}

impl<S: KeyValueStore, C: Clock> Drop for Economy<S, C> {
    fn drop(&mut self) {
        if let Some(outcome) = self.complete_spin() {
            log::debug!("settled pending spin on shutdown: prize {}", outcome.prize);
        }
    }
}
