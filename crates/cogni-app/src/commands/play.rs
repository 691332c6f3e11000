//! cogni play - the interactive session

use clap::Args;

use crate::context::AppContext;
use crate::interactive::InteractiveSession;

#[derive(Debug, Args, Default)]
pub struct PlayCommand {
    /// Throw away any saved session and start with a fresh intake
    #[arg(long)]
    pub fresh: bool,
}

impl PlayCommand {
    pub fn run(&self, ctx: &AppContext) -> anyhow::Result<()> {
        let mut orch = ctx.orchestrator();
        if self.fresh {
            orch.restart();
        }
        if !orch.discarded_keys().is_empty() {
            println!(
                "Some saved progress was unreadable and has been reset: {}",
                orch.discarded_keys().join(", ")
            );
        }

        let mut session = InteractiveSession::new(orch, ctx.generator(), ctx.rngs());
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(session.run())
    }
}
