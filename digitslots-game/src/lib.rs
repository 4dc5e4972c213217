//! Digit Slots Economy
//!
//! Platform-agnostic core logic for the Digit Slots game: five slot machines
//! that pay the numeral their digits spell, and a once-a-day bonus that grows
//! with the claim streak. This crate carries no UI or platform dependencies;
//! hosts supply a [`KeyValueStore`] and optionally a [`Clock`].

pub mod account;
pub mod bonus;
pub mod clock;
pub mod config;
pub mod constants;
pub mod economy;
pub mod error;
pub mod machines;
pub mod numbers;
pub mod reveal;
pub mod spin;
pub mod storage;

// Re-export commonly used types
pub use account::{Account, Settings};
pub use bonus::{BonusClaim, can_claim, format_countdown, is_same_local_day, time_until_next};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BonusConfig, ConfigError, EconomyConfig};
pub use economy::{AccountSnapshot, Economy};
pub use error::EconomyError;
pub use machines::{Accent, Machine, default_machines, prize_for};
pub use reveal::Flicker;
pub use spin::{Draw, PendingSpin, ScriptedSource, SpinOutcome, SpinSource};
pub use storage::{KeyValueStore, MemoryStore};
