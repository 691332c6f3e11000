//! cogni status - print the saved session

use clap::Args;
use cogni_domain::Report;

use crate::context::AppContext;
use crate::render;

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Print the full report even if the session is not finished
    #[arg(long)]
    pub report: bool,
}

impl StatusCommand {
    pub fn run(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let orch = ctx.orchestrator();
        let snapshot = orch.snapshot();
        if snapshot.stage.is_complete() || self.report {
            print!("{}", Report::new(orch.session()).render());
        } else {
            print!("{}", render::snapshot(&snapshot));
        }
        Ok(())
    }
}
