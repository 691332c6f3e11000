//! Application context - configuration and the adapters built from it

use cogni_adapter::{FileSessionStore, InMemorySessionStore, UnavailableStore};
use cogni_domain::{MazeGenerator, SessionStore};
use cogni_usecase::SessionOrchestrator;
use rand::rngs::StdRng;
use rand::SeedableRng;
use shared::AppConfig;
use tracing::{info, warn};

/// Store type used by every command
pub type BoxedStore = Box<dyn SessionStore>;

/// Everything a command needs, built once in `main`
#[derive(Debug, Clone)]
pub struct AppContext {
    config: AppConfig,
    generator: MazeGenerator,
}

impl AppContext {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let generator = MazeGenerator::new(config.maze_size)?;
        Ok(Self { config, generator })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn generator(&self) -> MazeGenerator {
        self.generator
    }

    /// Open the configured state file
    ///
    /// When the file cannot be opened the session still runs, but nothing
    /// is kept between runs.
    pub fn open_store(&self) -> BoxedStore {
        let path = &self.config.state_path;
        match FileSessionStore::open(path) {
            Ok(store) => {
                info!(path = %path.display(), "Using state file");
                Box::new(store)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "State file unavailable, progress will not be saved");
                Box::new(UnavailableStore::new(e.to_string()))
            }
        }
    }

    /// Orchestrator restored from the state file
    pub fn orchestrator(&self) -> SessionOrchestrator<BoxedStore> {
        SessionOrchestrator::load(self.open_store())
    }

    /// Orchestrator that never touches the disk
    pub fn scratch_orchestrator(&self) -> SessionOrchestrator<InMemorySessionStore> {
        SessionOrchestrator::new(InMemorySessionStore::new())
    }

    pub fn rngs(&self) -> RngSource {
        RngSource::new(self.config.seed)
    }
}

/// Hands out one generator per game
///
/// With a seed every draw is reproducible; without one each generator is
/// seeded from the OS.
#[derive(Debug, Clone)]
pub struct RngSource {
    seed: Option<u64>,
    draws: u64,
}

impl RngSource {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed, draws: 0 }
    }

    pub fn next_rng(&mut self) -> StdRng {
        self.draws += 1;
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.draws)),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_source_repeats() {
        let mut a = RngSource::new(Some(42));
        let mut b = RngSource::new(Some(42));
        for _ in 0..3 {
            let x: u64 = a.next_rng().gen();
            let y: u64 = b.next_rng().gen();
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_draws_differ() {
        let mut source = RngSource::new(Some(7));
        let first: u64 = source.next_rng().gen();
        let second: u64 = source.next_rng().gen();
        assert_ne!(first, second);
    }

    #[test]
    fn test_invalid_maze_size_rejected() {
        let config = AppConfig {
            maze_size: 10,
            ..AppConfig::default()
        };
        assert!(AppContext::new(config).is_err());
    }

    #[test]
    fn test_unopenable_state_file_degrades() {
        let dir = tempfile::TempDir::new().unwrap();
        // A directory cannot be read as a state file
        let config = AppConfig::default().with_state_path(dir.path());
        let ctx = AppContext::new(config).unwrap();

        let mut orch = ctx.orchestrator();
        let user = cogni_domain::UserData::from_form("Alex", "24", "phd").unwrap();
        orch.start(user).unwrap();
        assert!(orch.is_degraded());
    }
}
