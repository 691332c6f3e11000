//! Cognitive Games - Command-line entry point
//!
//! Usage:
//!   cogni                   - Play (resumes a saved session)
//!   cogni play --fresh      - Play, discarding any saved session
//!   cogni demo              - Watch a simulated player run all six games
//!   cogni status            - Print the saved session
//!   cogni reset             - Remove the saved session
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  main.rs (this file) - Dependency Injection & Wiring            │
//! │    │                                                            │
//! │    ├── Loads:   AppConfig (shared), CLI flags on top            │
//! │    ├── Creates: FileSessionStore | UnavailableStore (adapter)   │
//! │    ├── Creates: SessionOrchestrator (use case)                  │
//! │    └── Runs:    the chosen command                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod autoplay;
mod commands;
mod context;
mod input;
mod intake;
mod interactive;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shared::AppConfig;
use tracing_subscriber::EnvFilter;

use commands::{DemoCommand, PlayCommand, ResetCommand, StatusCommand};
use context::AppContext;

#[derive(Parser)]
#[command(name = "cogni")]
#[command(about = "Cognitive Games - a six-game cognitive assessment in the terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Where the session is saved between runs
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Seed every random draw (reproducible sessions)
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the assessment (default)
    Play(PlayCommand),
    /// Autoplay a whole session with a simulated player
    Demo(DemoCommand),
    /// Show the saved session
    Status(StatusCommand),
    /// Clear the saved session
    Reset(ResetCommand),
}

impl Cli {
    /// Config file values with the command-line flags on top
    fn app_config(&self) -> anyhow::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(state) = &self.state {
            config = config.with_state_path(state);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.app_config()?;

    // Initialize logging; stderr keeps it apart from the game screen
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = AppContext::new(config)?;

    match cli.command {
        Some(Commands::Play(cmd)) => cmd.run(&ctx),
        Some(Commands::Demo(cmd)) => cmd.run(&ctx),
        Some(Commands::Status(cmd)) => cmd.run(&ctx),
        Some(Commands::Reset(cmd)) => cmd.run(&ctx),
        None => PlayCommand::default().run(&ctx),
    }
}
