use anyhow::Result;
use colored::Colorize;
use digitslots_game::numbers::format_coins;
use std::io::Write;
use std::time::Duration;

use super::SimulationReport;

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &SimulationReport,
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(
        writer,
        "{}",
        "📊 Machine Simulation Summary".bright_cyan().bold()
    )?;
    writeln!(writer, "{}", "==============================".cyan())?;

    let status = if report.passed {
        "✅ PASS".green()
    } else {
        "❌ FAIL".red()
    };
    writeln!(
        writer,
        "{} #{} {} (seed {})",
        status,
        report.machine,
        report.machine_name.bold(),
        report.seed
    )?;
    writeln!(
        writer,
        "   Spins: {}/{}",
        report.spins, report.iterations_requested
    )?;
    writeln!(
        writer,
        "   Win rate: {:.2}% (expected {:.2}%)",
        report.win_rate * 100.0,
        report.expected_win_rate * 100.0
    )?;
    writeln!(
        writer,
        "   Return to player: {:.1}% (expected {:.1}%)",
        report.return_to_player * 100.0,
        report.expected_return_to_player * 100.0
    )?;
    writeln!(
        writer,
        "   Paid in: {}  Paid out: {}",
        format_coins(report.total_cost),
        format_coins(report.total_prize)
    )?;
    writeln!(
        writer,
        "   Biggest prize: {}  Longest losing run: {}",
        format_coins(report.biggest_prize),
        report.longest_losing_run
    )?;
    writeln!(
        writer,
        "   Final balance: {}  Highscore: {}",
        format_coins(report.final_balance),
        format_coins(report.highscore)
    )?;
    if let Some(spins) = report.busted_after {
        writeln!(writer, "   {}", format!("Bankroll ran dry after {spins} spins").yellow())?;
    }
    if !report.violations.is_empty() {
        writeln!(writer, "   Violations:")?;
        for violation in &report.violations {
            writeln!(writer, "     • {}", violation.red())?;
        }
    }
    writeln!(writer)?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &SimulationReport,
) -> Result<()> {
    let json_output = serde_json::to_string_pretty(report)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    report: &SimulationReport,
) -> Result<()> {
    writeln!(writer, "# Digit Slots Simulation: {}\n", report.machine_name)?;
    let status = if report.passed { "✅" } else { "❌" };
    writeln!(writer, "## Summary {status}\n")?;
    writeln!(writer, "- **Seed**: {}", report.seed)?;
    writeln!(
        writer,
        "- **Spins**: {}/{}",
        report.spins, report.iterations_requested
    )?;
    writeln!(
        writer,
        "- **Win rate**: {:.2}% (expected {:.2}%)",
        report.win_rate * 100.0,
        report.expected_win_rate * 100.0
    )?;
    writeln!(
        writer,
        "- **Return to player**: {:.1}% (expected {:.1}%)",
        report.return_to_player * 100.0,
        report.expected_return_to_player * 100.0
    )?;
    writeln!(writer, "- **Biggest prize**: {}", report.biggest_prize)?;
    writeln!(
        writer,
        "- **Longest losing run**: {}",
        report.longest_losing_run
    )?;
    if let Some(spins) = report.busted_after {
        writeln!(writer, "- **Bankroll ran dry after**: {spins} spins")?;
    }
    if !report.violations.is_empty() {
        writeln!(writer, "\n## Violations\n")?;
        for violation in &report.violations {
            writeln!(writer, "- {violation}")?;
        }
    }
    Ok(())
}
