//! cogni reset - remove the saved session

use clap::Args;

use crate::context::AppContext;

#[derive(Debug, Args)]
pub struct ResetCommand {}

impl ResetCommand {
    pub fn run(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let mut orch = ctx.orchestrator();
        orch.restart();
        if orch.is_degraded() {
            anyhow::bail!(
                "Could not clear {}",
                ctx.config().state_path.display()
            );
        }
        println!("✓ Session cleared");
        Ok(())
    }
}
