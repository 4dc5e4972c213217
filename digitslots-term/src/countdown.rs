use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use digitslots_game::{Clock, Economy, KeyValueStore};

/// Re-render the bonus countdown once per second until it reaches zero.
///
/// Returns the number of lines written.
pub async fn watch<S, C, W>(economy: &Economy<S, C>, out: &mut W) -> Result<usize>
where
    S: KeyValueStore,
    C: Clock,
    W: Write + ?Sized,
{
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    let mut rendered = 0;
    loop {
        ticker.tick().await;
        write!(out, "\r⏳ Next daily bonus in {}", economy.bonus_countdown())?;
        out.flush()?;
        rendered += 1;
        if economy.can_claim_bonus() {
            writeln!(out)?;
            return Ok(rendered);
        }
    }
}
