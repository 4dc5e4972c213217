use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn temp_path(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "digitslots-cli-{label}-{}",
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ))
}

fn run(store: &Path, now: &str, args: &[&str]) -> Output {
    let exe = env!("CARGO_BIN_EXE_digitslots-term");
    Command::new(exe)
        .arg("--store")
        .arg(store)
        .args(["--now", now])
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("DIGITSLOTS_STORE")
        .output()
        .expect("run cli")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn status_json(store: &Path, now: &str) -> serde_json::Value {
    let output = run(store, now, &["status", "--json"]);
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).expect("status json")
}

const MORNING: &str = "2025-06-01T09:00:00+02:00";
const EVENING: &str = "2025-06-01T21:30:00+02:00";
const NEXT_DAY: &str = "2025-06-02T00:00:05+02:00";

#[test]
fn first_run_grants_starting_balance() {
    let store = temp_path("fresh.json");
    let status = status_json(&store, MORNING);
    assert_eq!(status["balance"], 1000);
    assert_eq!(status["highscore"], 0);
    assert_eq!(status["streak"], 0);
    assert_eq!(status["can_claim_bonus"], true);
    assert_eq!(status["next_bonus"], 100);
    let _ = std::fs::remove_file(store);
}

#[test]
fn bonus_is_once_per_local_day() {
    let store = temp_path("bonus.json");
    let first = run(&store, MORNING, &["claim"]);
    assert!(first.status.success());
    assert!(stdout(&first).contains("+100 coins"));

    let second = run(&store, EVENING, &["claim"]);
    assert!(second.status.success());
    assert!(stdout(&second).contains("already claimed, next one in 02:30:00"));

    let third = run(&store, NEXT_DAY, &["claim"]);
    assert!(stdout(&third).contains("+150 coins"));

    let status = status_json(&store, NEXT_DAY);
    assert_eq!(status["balance"], 1250);
    assert_eq!(status["highscore"], 1250);
    assert_eq!(status["streak"], 2);
    assert_eq!(status["can_claim_bonus"], false);
    let _ = std::fs::remove_file(store);
}

#[test]
fn seeded_spins_persist_between_runs() {
    let store = temp_path("spin.json");
    let output = run(
        &store,
        MORNING,
        &[
            "--seed", "99", "spin", "0", "--times", "5", "--delay-ms", "0", "--frames", "2",
        ],
    );
    assert!(output.status.success());
    let text = stdout(&output);
    assert_eq!(text.matches("Cherry [").count(), 5);

    let status = status_json(&store, MORNING);
    let balance = status["balance"].as_u64().expect("balance");
    assert!(balance >= 950);
    assert!(balance <= 950 + 5 * 99);
    let _ = std::fs::remove_file(store);
}

#[test]
fn unaffordable_spin_reports_and_exits_cleanly() {
    let store = temp_path("broke.json");
    let output = run(&store, MORNING, &["spin", "3", "--delay-ms", "0"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("not enough coins: spin costs 2500, balance is 1000"));
    assert_eq!(status_json(&store, MORNING)["balance"], 1000);
    let _ = std::fs::remove_file(store);
}

#[test]
fn frameless_spins_settle_after_the_delay() {
    let store = temp_path("frameless.json");
    let output = run(
        &store,
        MORNING,
        &[
            "--seed", "12", "spin", "1", "--times", "3", "--delay-ms", "5", "--frames", "0",
        ],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output).matches("Lucky Seven [").count(), 3);
    let balance = status_json(&store, MORNING)["balance"]
        .as_u64()
        .expect("balance");
    assert!(balance >= 1000 - 3 * 75);
    let _ = std::fs::remove_file(store);
}

#[test]
fn sound_settings_round_trip() {
    let store = temp_path("sound.json");
    let output = run(&store, MORNING, &["sound", "--on", "--volume", "1.7"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Sound on at 100% volume"));
    let status = status_json(&store, MORNING);
    assert_eq!(status["sound_enabled"], true);
    assert_eq!(status["sound_volume"], 1.0);
    let _ = std::fs::remove_file(store);
}

#[test]
fn share_and_reset_highscore() {
    let store = temp_path("share.json");
    run(&store, MORNING, &["claim"]);
    let share = run(&store, MORNING, &["share"]);
    assert!(stdout(&share).contains("I hit a highscore of 1,100 coins in Digit Slots!"));
    let reset = run(&store, MORNING, &["reset-highscore"]);
    assert!(reset.status.success());
    assert_eq!(status_json(&store, MORNING)["highscore"], 0);
    let _ = std::fs::remove_file(store);
}

#[test]
fn countdown_prints_time_left() {
    let store = temp_path("countdown.json");
    run(&store, MORNING, &["claim"]);
    let output = run(&store, "2025-06-01T23:59:00+02:00", &["countdown", "--watch"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Next daily bonus in 00:01:00"));
    let _ = std::fs::remove_file(store);
}

#[test]
fn corrupt_store_is_a_host_error() {
    let store = temp_path("corrupt.json");
    std::fs::write(&store, "not json").expect("write store");
    let output = run(&store, MORNING, &["status"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to open store"));
    let _ = std::fs::remove_file(store);
}

#[test]
fn simulate_writes_markdown_report() {
    let report = temp_path("sim.md");
    let exe = env!("CARGO_BIN_EXE_digitslots-term");
    let output = Command::new(exe)
        .args([
            "simulate",
            "--machine",
            "1",
            "--iterations",
            "2000",
            "--seed",
            "4",
            "--report",
            "markdown",
            "--output",
        ])
        .arg(&report)
        .output()
        .expect("run cli");
    assert!(output.status.success());
    let content = std::fs::read_to_string(&report).expect("read report");
    assert!(content.contains("# Digit Slots Simulation: Lucky Seven"));
    assert!(content.contains("**Spins**: 2000/2000"));
    let _ = std::fs::remove_file(report);
}
