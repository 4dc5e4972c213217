//! Recoverable, user-visible economy errors
use chrono::TimeDelta;

use crate::bonus::format_countdown;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EconomyError {
    #[error("not enough coins: spin costs {cost}, balance is {balance}")]
    InsufficientFunds { cost: u64, balance: u64 },
    #[error("daily bonus already claimed, next one in {}", countdown_label(.remaining))]
    NotEligibleYet { remaining: TimeDelta },
    #[error("no machine at index {index} ({available} available)")]
    UnknownMachine { index: usize, available: usize },
}

fn countdown_label(remaining: &TimeDelta) -> String {
    format_countdown(*remaining)
}
