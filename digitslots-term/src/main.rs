mod clock;
mod countdown;
mod logic;
mod render;
mod store;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use digitslots_game::{Economy, EconomyConfig, EconomyError, Flicker};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clock::HostClock;
use logic::{SimulationPlan, run_simulation};
use store::JsonFileStore;

type HostEconomy = Economy<JsonFileStore, HostClock>;

const DEFAULT_SIMULATION_SEED: u64 = 1337;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "digitslots-term", version)]
#[command(about = "Digit Slots in the terminal: spin, claim the daily bonus, simulate machines")]
struct Args {
    /// Key-value store file holding the account
    #[arg(long, global = true, env = "DIGITSLOTS_STORE", default_value = "digitslots.json")]
    store: PathBuf,

    /// Optional JSON economy config (machine table, bonus curve)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed spins for a reproducible session
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Pin the clock to an RFC 3339 instant
    #[arg(long, global = true, hide = true, value_parser = parse_instant)]
    now: Option<DateTime<FixedOffset>>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Balance, highscore, streak, bonus and sound
    Status {
        #[arg(long)]
        json: bool,
    },
    /// List the machine table
    Machines,
    /// Spin a machine
    Spin {
        /// Machine index from `machines`
        machine: usize,
        #[arg(long, default_value_t = 1)]
        times: usize,
        /// Reveal delay per spin
        #[arg(long, default_value_t = 1000)]
        delay_ms: u64,
        /// Flicker frames shown before the result; 0 just waits out the delay
        #[arg(long, default_value_t = 8)]
        frames: usize,
    },
    /// Claim the daily bonus
    Claim,
    /// Time until the next daily bonus
    Countdown {
        /// Keep re-rendering every second until the bonus unlocks
        #[arg(long)]
        watch: bool,
    },
    /// Reset the highscore to zero
    ResetHighscore,
    /// Update sound settings
    Sound {
        #[arg(long, conflicts_with = "off")]
        on: bool,
        #[arg(long)]
        off: bool,
        #[arg(long)]
        volume: Option<f64>,
    },
    /// Print the share text
    Share,
    /// Monte-Carlo run of one machine against an in-memory store
    Simulate {
        #[arg(long)]
        machine: usize,
        #[arg(long, default_value_t = 10_000)]
        iterations: usize,
        /// Starting coins; spins stop when they run out
        #[arg(long)]
        bankroll: Option<u64>,
        #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
        report: ReportFormat,
        /// Optional path to write the report output instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_instant(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = load_config(args.config.as_deref())?;

    if let Command::Simulate {
        machine,
        iterations,
        bankroll,
        report,
        output,
    } = &args.command
    {
        let plan = SimulationPlan {
            machine: *machine,
            iterations: *iterations,
            seed: args.seed.unwrap_or(DEFAULT_SIMULATION_SEED),
            bankroll: *bankroll,
        };
        let passed = simulate(&config, &plan, *report, output.clone())?;
        if !passed {
            std::process::exit(1);
        }
        return Ok(());
    }

    let store = JsonFileStore::open(&args.store)
        .with_context(|| format!("failed to open store {}", args.store.display()))?;
    let mut economy = Economy::load(store, HostClock::from_pinned(args.now), config)
        .context("economy config rejected")?;
    log::debug!("account loaded from {}", economy.store().path().display());

    match args.command {
        Command::Status { json } => status(&economy, json)?,
        Command::Machines => {
            println!("{}", render::banner());
            println!(
                "{}",
                render::machine_table(economy.machines(), economy.balance())
            );
        }
        Command::Spin {
            machine,
            times,
            delay_ms,
            frames,
        } => {
            let seed = args.seed.unwrap_or_else(rand::random);
            log::debug!("spin seed {seed}");
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let delay = Duration::from_millis(delay_ms);
            spin(&mut economy, &mut rng, machine, times, delay, frames).await?;
        }
        Command::Claim => claim(&mut economy),
        Command::Countdown { watch } => {
            if watch && matches!(economy.clock(), HostClock::System) {
                countdown::watch(&economy, &mut stdout()).await?;
            } else {
                println!("⏳ Next daily bonus in {}", economy.bonus_countdown());
            }
        }
        Command::ResetHighscore => {
            economy.reset_highscore();
            println!("Highscore reset.");
        }
        Command::Sound { on, off, volume } => {
            if on || off {
                economy.set_sound_enabled(on);
            }
            if let Some(volume) = volume {
                economy.set_sound_volume(volume);
            }
            let settings = economy.settings();
            println!(
                "Sound {} at {:.0}% volume",
                if settings.sound_enabled { "on" } else { "off" },
                settings.sound_volume * 100.0
            );
        }
        Command::Share => println!("{}", economy.share_text()),
        Command::Simulate { .. } => {}
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EconomyConfig> {
    let Some(path) = path else {
        return Ok(EconomyConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EconomyConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn status(economy: &HostEconomy, json: bool) -> Result<()> {
    let snapshot = economy.snapshot();
    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        println!("{}", render::banner());
        println!("{}", render::status(&snapshot));
    }
    Ok(())
}

async fn spin(
    economy: &mut HostEconomy,
    rng: &mut ChaCha20Rng,
    machine: usize,
    times: usize,
    delay: Duration,
    frames: usize,
) -> Result<()> {
    let frame_delay = delay
        .checked_div(u32::try_from(frames.saturating_add(1)).unwrap_or(u32::MAX))
        .unwrap_or_default();
    let mut out = stdout();
    for _ in 0..times {
        let outcome = if frames == 0 {
            match economy.spin_revealed(machine, rng, delay).await {
                Ok(outcome) => outcome,
                Err(err) => {
                    report_refusal(economy, &err);
                    break;
                }
            }
        } else {
            let pending = match economy.begin_spin(machine, rng) {
                Ok(pending) => pending,
                Err(err) => {
                    report_refusal(economy, &err);
                    break;
                }
            };
            for row in Flicker::new(pending.digits(), frames, &mut *rng) {
                write!(out, "\r{}", render::reels(&row))?;
                out.flush()?;
                if !frame_delay.is_zero() {
                    tokio::time::sleep(frame_delay).await;
                }
            }
            writeln!(out)?;
            let Some(outcome) = economy.complete_spin() else {
                break;
            };
            outcome
        };
        let played = economy.machine(machine)?;
        println!("{}", render::spin_result(played, &outcome));
        if outcome.depleted {
            println!("{}", render::depleted_notice(&economy.bonus_countdown()));
            break;
        }
    }
    Ok(())
}

fn report_refusal(economy: &HostEconomy, err: &EconomyError) {
    if matches!(err, EconomyError::InsufficientFunds { .. }) {
        println!("{}", err.to_string().yellow());
        if economy.is_depleted() {
            println!("{}", render::depleted_notice(&economy.bonus_countdown()));
        }
    } else {
        println!("{}", err.to_string().red());
    }
}

fn claim(economy: &mut HostEconomy) {
    match economy.claim_bonus() {
        Ok(claim) => println!("{}", render::bonus_claimed(&claim).green()),
        Err(err) => println!("{}", err.to_string().yellow()),
    }
}

fn simulate(
    config: &EconomyConfig,
    plan: &SimulationPlan,
    format: ReportFormat,
    output: Option<PathBuf>,
) -> Result<bool> {
    let start_time = Instant::now();
    let report = run_simulation(config, plan)?;
    let mut output_target = OutputTarget::new(output)?;
    match format {
        ReportFormat::Console => logic::reports::generate_console_report(
            &mut output_target,
            &report,
            start_time.elapsed(),
        )?,
        ReportFormat::Json => logic::reports::generate_json_report(&mut output_target, &report)?,
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, &report)?;
        }
    }
    output_target.flush_inner()?;
    Ok(report.passed)
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "digitslots-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn parses_spin_with_global_flags() {
        let args = Args::try_parse_from([
            "digitslots-term",
            "--store",
            "x.json",
            "spin",
            "2",
            "--times",
            "3",
            "--delay-ms",
            "0",
            "--now",
            "2025-01-01T12:00:00+01:00",
        ])
        .unwrap();
        assert_eq!(args.store, PathBuf::from("x.json"));
        assert!(args.now.is_some());
        match args.command {
            Command::Spin {
                machine,
                times,
                delay_ms,
                frames,
            } => {
                assert_eq!((machine, times, delay_ms, frames), (2, 3, 0, 8));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn sound_flags_conflict() {
        assert!(Args::try_parse_from(["digitslots-term", "sound", "--on", "--off"]).is_err());
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.machines.len(), 5);
        assert!(load_config(Some(&temp_path("absent-config"))).is_err());
    }

    #[test]
    fn simulate_writes_json_to_file() {
        let path = temp_path("sim.json");
        let plan = SimulationPlan {
            machine: 0,
            iterations: 200,
            seed: 5,
            bankroll: None,
        };
        let passed = simulate(
            &EconomyConfig::default(),
            &plan,
            ReportFormat::Json,
            Some(path.clone()),
        )
        .unwrap();
        assert!(passed);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"machine_name\": \"Cherry\""));
        let _ = std::fs::remove_file(path);
    }
}
