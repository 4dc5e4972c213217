//! Plain-text views of the economy. One renderer serves every machine; the
//! machine's accent only picks a color.
use colored::{ColoredString, Colorize};
use digitslots_game::numbers::format_coins;
use digitslots_game::{Accent, AccountSnapshot, BonusClaim, Machine, SpinOutcome};

pub fn paint(text: &str, accent: Accent) -> ColoredString {
    match accent {
        Accent::Red => text.red(),
        Accent::Green => text.green(),
        Accent::Yellow => text.yellow(),
        Accent::Blue => text.blue(),
        Accent::Magenta => text.magenta(),
    }
}

pub fn banner() -> String {
    format!(
        "{}\n{}",
        "🎰 Digit Slots".bright_cyan().bold(),
        "==============".cyan()
    )
}

/// Reel window, e.g. `[ 7 | 3 ]`.
pub fn reels(digits: &[u8]) -> String {
    let cells: Vec<String> = digits.iter().map(u8::to_string).collect();
    format!("[ {} ]", cells.join(" | "))
}

pub fn status(snapshot: &AccountSnapshot) -> String {
    let bonus = if snapshot.can_claim_bonus {
        format!("ready (+{} coins)", format_coins(snapshot.next_bonus))
            .green()
            .to_string()
    } else {
        format!("in {}", snapshot.next_bonus_in).yellow().to_string()
    };
    let sound = if snapshot.sound_enabled {
        format!("on ({:.0}%)", snapshot.sound_volume * 100.0)
    } else {
        "off".to_string()
    };
    let mut lines = vec![
        format!("Balance:    {} coins", format_coins(snapshot.balance).bold()),
        format!("Highscore:  {} coins", format_coins(snapshot.highscore)),
        format!("Streak:     {} day(s)", snapshot.streak),
        format!("Bonus:      {bonus}"),
        format!("Sound:      {sound}"),
    ];
    if snapshot.depleted {
        lines.push(depleted_notice(&snapshot.next_bonus_in));
    }
    lines.join("\n")
}

pub fn machine_table(machines: &[Machine], balance: u64) -> String {
    let mut lines = vec![format!(
        "{:<4} {:<12} {:>8} {:>7} {:>7} {:>6}",
        "#", "Machine", "Cost", "Odds", "Digits", "RTP"
    )];
    for (index, machine) in machines.iter().enumerate() {
        let row = format!(
            "{:<4} {:<12} {:>8} {:>6.1}% {:>7} {:>5.0}%",
            index,
            machine.name,
            format_coins(machine.cost),
            machine.win_probability * 100.0,
            machine.digit_count,
            machine.return_to_player() * 100.0
        );
        if balance >= machine.cost {
            lines.push(paint(&row, machine.accent).to_string());
        } else {
            lines.push(row.dimmed().to_string());
        }
    }
    lines.join("\n")
}

pub fn spin_result(machine: &Machine, outcome: &SpinOutcome) -> String {
    let window = paint(&reels(&outcome.digits), machine.accent).bold();
    let verdict = if outcome.won {
        format!("WIN +{} coins", format_coins(outcome.prize))
            .green()
            .bold()
            .to_string()
    } else {
        "no win".dimmed().to_string()
    };
    format!(
        "{} {window}  {verdict}  (balance {})",
        machine.name,
        format_coins(outcome.balance_after)
    )
}

pub fn bonus_claimed(claim: &BonusClaim) -> String {
    format!(
        "🎁 Daily bonus: +{} coins (streak {} → {}), balance {}",
        format_coins(claim.amount),
        claim.streak_before,
        claim.streak_after,
        format_coins(claim.balance_after)
    )
}

pub fn depleted_notice(countdown: &str) -> String {
    if countdown == "00:00:00" {
        "You're out of coins. Claim your daily bonus to keep playing."
            .red()
            .to_string()
    } else {
        format!("You're out of coins. Next daily bonus in {countdown}.")
            .red()
            .to_string()
    }
}
