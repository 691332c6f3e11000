//! # Cognitive Games Domain Layer
//!
//! Pure rules of the assessment: the session state machine, the six game
//! units, maze generation and the report labels.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Domain Layer (This Crate)                     │
//! │  ┌─────────────────────────────────────────────────────────────┐│
//! │  │  model/     - Entities & Value Objects                      ││
//! │  │  repository/- Trait definitions (not implementations)       ││
//! │  │  service/   - Maze generator, game units, report            ││
//! │  └─────────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Golden Rule
//!
//! **No I/O in this crate.** Storage is reached through the `SessionStore`
//! port and randomness is always passed in, so every rule here can be driven
//! by a seeded generator in tests.

pub mod model;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use model::{
    countdown::{Countdown, Tick},
    game::{GameId, Stage},
    maze::{Cell, Direction, Maze, Position},
    metrics::{MetricValue, Metrics},
    session::{Session, SessionError},
    user::{Education, IntakeError, UserData},
};

pub use repository::session_store::{SessionStore, StoreError};

pub use service::maze_generator::{MazeError, MazeGenerator};
pub use service::report::{AreaStrength, CognitiveLevel, Report};
pub use service::units::{AnyUnit, GameUnit, Phase, UnitError, UnitOutcome};
