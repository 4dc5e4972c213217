use anyhow::{Context, Result};
use chrono::DateTime;
use digitslots_game::numbers::{ratio, usize_to_f64};
use digitslots_game::{
    Economy, EconomyConfig, EconomyError, ManualClock, MemoryStore, prize_for,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

/// What a simulation run should do.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub machine: usize,
    pub iterations: usize,
    pub seed: u64,
    /// Start with this many coins and stop when broke; `None` funds every spin.
    pub bankroll: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub machine: usize,
    pub machine_name: String,
    pub seed: u64,
    pub iterations_requested: usize,
    pub spins: usize,
    pub wins: usize,
    pub total_cost: u64,
    pub total_prize: u64,
    pub win_rate: f64,
    pub expected_win_rate: f64,
    pub return_to_player: f64,
    pub expected_return_to_player: f64,
    pub biggest_prize: u64,
    pub longest_losing_run: usize,
    pub final_balance: u64,
    pub highscore: u64,
    /// Spin number that left too few coins for another spin
    pub busted_after: Option<usize>,
    pub violations: Vec<String>,
    pub passed: bool,
}

/// Play `plan` against an in-memory store and check the economy invariants
/// after every spin.
///
/// # Errors
///
/// Returns an error for an unknown machine index or an invalid config.
pub fn run_simulation(config: &EconomyConfig, plan: &SimulationPlan) -> Result<SimulationReport> {
    let machine = config
        .machines
        .get(plan.machine)
        .cloned()
        .ok_or(EconomyError::UnknownMachine {
            index: plan.machine,
            available: config.machines.len(),
        })?;
    let funding = u64::try_from(plan.iterations)
        .unwrap_or(u64::MAX)
        .saturating_mul(machine.cost);
    let sim_config = EconomyConfig {
        starting_balance: plan.bankroll.unwrap_or(funding),
        ..config.clone()
    };
    let clock = ManualClock::new(DateTime::default());
    let mut economy = Economy::load(MemoryStore::new(), clock, sim_config)
        .context("simulation config rejected")?;
    let mut rng = ChaCha20Rng::seed_from_u64(plan.seed);

    let mut spins = 0usize;
    let mut wins = 0usize;
    let mut total_cost = 0u64;
    let mut total_prize = 0u64;
    let mut biggest_prize = 0u64;
    let mut losing_run = 0usize;
    let mut longest_losing_run = 0usize;
    let mut peak = 0u64;
    let mut busted_after = None;
    let mut violations = Vec::new();

    for _ in 0..plan.iterations {
        let before = economy.balance();
        let outcome = match economy.spin(plan.machine, &mut rng) {
            Ok(outcome) => outcome,
            Err(EconomyError::InsufficientFunds { .. }) => {
                busted_after = Some(spins);
                break;
            }
            Err(other) => return Err(other.into()),
        };
        spins += 1;
        total_cost = total_cost.saturating_add(outcome.cost);
        total_prize = total_prize.saturating_add(outcome.prize);

        if outcome.won {
            wins += 1;
            losing_run = 0;
            biggest_prize = biggest_prize.max(outcome.prize);
            peak = peak.max(outcome.balance_after);
            if prize_for(&outcome.digits) != Some(outcome.prize) {
                violations.push(format!(
                    "spin {spins}: prize {} does not match digits {:?}",
                    outcome.prize, outcome.digits
                ));
            }
        } else {
            losing_run += 1;
            longest_losing_run = longest_losing_run.max(losing_run);
            if outcome.prize != 0 {
                violations.push(format!("spin {spins}: losing spin paid {}", outcome.prize));
            }
        }
        let expected_balance = before
            .saturating_sub(outcome.cost)
            .saturating_add(outcome.prize);
        if outcome.balance_after != expected_balance {
            violations.push(format!(
                "spin {spins}: balance {} expected {expected_balance}",
                outcome.balance_after
            ));
        }
        if economy.highscore() < peak {
            violations.push(format!(
                "spin {spins}: highscore {} below peak {peak}",
                economy.highscore()
            ));
        }
    }

    let expected_rtp = machine.return_to_player();
    let report = SimulationReport {
        machine: plan.machine,
        machine_name: machine.name.clone(),
        seed: plan.seed,
        iterations_requested: plan.iterations,
        spins,
        wins,
        total_cost,
        total_prize,
        win_rate: if spins == 0 {
            0.0
        } else {
            usize_to_f64(wins) / usize_to_f64(spins)
        },
        expected_win_rate: machine.win_probability,
        return_to_player: ratio(total_prize, total_cost),
        expected_return_to_player: expected_rtp,
        biggest_prize,
        longest_losing_run,
        final_balance: economy.balance(),
        highscore: economy.highscore(),
        busted_after,
        passed: violations.is_empty(),
        violations,
    };
    log::debug!(
        "simulated {} spins on {}: rtp {:.3}",
        report.spins,
        report.machine_name,
        report.return_to_player
    );
    Ok(report)
}
