//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::InvalidConfigError;

/// Side length used by the maze game when nothing else is configured
pub const DEFAULT_MAZE_SIZE: usize = 21;

/// Smallest maze that still has an interior to carve
pub const MIN_MAZE_SIZE: usize = 5;

/// Application configuration (config.json)
///
/// Every field has a default, so an empty object `{}` is a valid file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    /// Where the session snapshot is kept between runs
    pub state_path: PathBuf,

    /// Side length of the generated maze; must be odd
    pub maze_size: usize,

    /// Fixed seed for every random draw (reproducible sessions)
    pub seed: Option<u64>,

    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(".cognitive-session.json"),
            maze_size: DEFAULT_MAZE_SIZE,
            seed: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if self.maze_size < MIN_MAZE_SIZE {
            return Err(InvalidConfigError {
                field: "mazeSize".to_string(),
                reason: format!("must be at least {}", MIN_MAZE_SIZE),
            });
        }
        if self.maze_size % 2 == 0 {
            return Err(InvalidConfigError {
                field: "mazeSize".to_string(),
                reason: format!("must be odd, got {}", self.maze_size),
            });
        }
        Ok(())
    }

    /// Override the state file location
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// Override the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CogniError;
    use std::io::Write;

    #[test]
    fn test_config_parse() {
        let json = r#"{
            "statePath": "/tmp/session.json",
            "mazeSize": 15,
            "seed": 42
        }"#;

        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.state_path, PathBuf::from("/tmp/session.json"));
        assert_eq!(config.maze_size, 15);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_empty_object_uses_defaults() {
        let config: AppConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_even_maze_size_rejected() {
        let config = AppConfig {
            maze_size: 20,
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "mazeSize");
    }

    #[test]
    fn test_tiny_maze_size_rejected() {
        let config = AppConfig {
            maze_size: 3,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"mazeSize": 8}}"#).unwrap();

        let result = AppConfig::from_file(file.path());
        assert!(matches!(result, Err(CogniError::InvalidConfig(_))));
    }

    #[test]
    fn test_from_file_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = AppConfig::from_file(file.path());
        assert!(matches!(result, Err(CogniError::Json(_))));
    }

    #[test]
    fn test_builder_overrides() {
        let config = AppConfig::default()
            .with_state_path("state.json")
            .with_seed(7);
        assert_eq!(config.state_path, PathBuf::from("state.json"));
        assert_eq!(config.seed, Some(7));
    }
}
