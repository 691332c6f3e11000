//! cogni demo - a simulated player runs a whole session
//!
//! The demo never touches the state file; it plays against an in-memory
//! store and prints the final report.

use clap::Args;
use cogni_adapter::InMemorySessionStore;
use cogni_domain::{Report, UserData};
use cogni_usecase::{SessionEvent, SessionOrchestrator};
use console::style;
use tracing::info;

use crate::autoplay::AutoPlayer;
use crate::context::{AppContext, RngSource};
use crate::render;

/// Seed used when neither `--seed` nor the config provides one
const DEMO_SEED: u64 = 2024;

#[derive(Debug, Args)]
pub struct DemoCommand {
    /// Chance that the simulated player answers correctly (0 to 1)
    #[arg(long, default_value_t = 0.85, value_parser = parse_accuracy)]
    pub accuracy: f64,

    /// Show every game's final screen
    #[arg(short, long)]
    pub verbose: bool,
}

/// A probability; NaN and anything outside 0..=1 is refused
fn parse_accuracy(raw: &str) -> Result<f64, String> {
    let value = raw.parse::<f64>().map_err(|e| e.to_string())?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{} is not between 0 and 1", raw))
    }
}

impl DemoCommand {
    pub fn run(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let seed = ctx.config().seed.unwrap_or(DEMO_SEED);
        println!("Demo session (seed {})\n", seed);
        let orch = play_session(ctx, seed, self.accuracy, self.verbose)?;
        println!("\n{}", Report::new(orch.session()).render());
        Ok(())
    }
}

/// Play all six games with the simulated player
pub fn play_session(
    ctx: &AppContext,
    seed: u64,
    accuracy: f64,
    verbose: bool,
) -> anyhow::Result<SessionOrchestrator<InMemorySessionStore>> {
    let mut orch = ctx.scratch_orchestrator();
    let mut rngs = RngSource::new(Some(seed));
    let mut player = AutoPlayer::new(seed, accuracy);

    orch.start(UserData::from_form("Demo Player", "35", "masters")?)?;
    while let Some(mut unit) = orch.activate_unit(rngs.next_rng(), ctx.generator()) {
        player.play(&mut unit);
        if verbose {
            print!("{}", render::screen(&unit, true));
        }
        if let SessionEvent::GameCompleted { game, score, .. } = orch.complete_unit(unit.as_unit_mut())? {
            info!(game = %game, score, "Demo game finished");
            println!("{:<18} {:>5}", game.title(), style(score).bold());
        }
    }
    Ok(orch)
}
