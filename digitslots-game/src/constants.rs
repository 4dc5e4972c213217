//! Centralized economy constants for Digit Slots.
//!
//! Defaults live here so the persisted layout and the bonus math can only be
//! adjusted through reviewed code changes. Machine tuning lives in
//! [`crate::machines`].

// Persisted keys -----------------------------------------------------------
pub const KEY_BALANCE: &str = "balance";
pub const KEY_HIGHSCORE: &str = "highscore";
pub const KEY_DAILY_STREAK: &str = "dailyStreak";
pub const KEY_LAST_CLAIM_DATE: &str = "lastClaimDate";
pub const KEY_SOUND_ENABLED: &str = "soundEnabled";
pub const KEY_SOUND_VOLUME: &str = "soundVolume";

/// Every key the economy reads or writes, in persistence order.
pub const PERSISTED_KEYS: [&str; 6] = [
    KEY_BALANCE,
    KEY_HIGHSCORE,
    KEY_DAILY_STREAK,
    KEY_LAST_CLAIM_DATE,
    KEY_SOUND_ENABLED,
    KEY_SOUND_VOLUME,
];

// Account defaults ---------------------------------------------------------
pub const DEFAULT_STARTING_BALANCE: u64 = 1_000;
pub const DEFAULT_HIGHSCORE: u64 = 0;
pub const DEFAULT_STREAK: u32 = 0;
pub const DEFAULT_SOUND_ENABLED: bool = false;
pub const DEFAULT_SOUND_VOLUME: f64 = 0.0;

// Daily bonus --------------------------------------------------------------
pub const BONUS_BASE: u64 = 100;
pub const BONUS_PER_STREAK_DAY: u64 = 50;
pub const BONUS_STREAK_CAP: u64 = 500;
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

// Digits -------------------------------------------------------------------
pub const DIGIT_MIN: u8 = 1;
pub const DIGIT_MAX: u8 = 9;
/// Widest numeral whose every value (up to 999_999_999_999_999_999) fits in a `u64`.
pub const MAX_DIGIT_COUNT: u8 = 18;
