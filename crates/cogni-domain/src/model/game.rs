//! GameId and Stage - Where a session is in the fixed game sequence
//!
//! Both are Value Objects. The sequence is fixed:
//!
//! ```text
//! form → stroop → hanoi → pattern → maze → memory → word → complete
//! ```

use serde::{Deserialize, Serialize};

/// The six mini-games, in play order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameId {
    /// Attention and processing speed
    Stroop,
    /// Problem solving
    Hanoi,
    /// Visual memory
    Pattern,
    /// Spatial reasoning
    Maze,
    /// Visual recognition and memory
    Memory,
    /// Verbal skills
    Word,
}

impl GameId {
    /// All games in play order
    pub fn all() -> &'static [GameId] {
        &[
            GameId::Stroop,
            GameId::Hanoi,
            GameId::Pattern,
            GameId::Maze,
            GameId::Memory,
            GameId::Word,
        ]
    }

    /// Tag used in persisted state
    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Stroop => "stroop",
            GameId::Hanoi => "hanoi",
            GameId::Pattern => "pattern",
            GameId::Maze => "maze",
            GameId::Memory => "memory",
            GameId::Word => "word",
        }
    }

    /// Parse a persisted tag
    pub fn parse(tag: &str) -> Option<GameId> {
        GameId::all().iter().copied().find(|g| g.as_str() == tag)
    }

    /// Human readable title
    pub fn title(&self) -> &'static str {
        match self {
            GameId::Stroop => "Stroop Challenge",
            GameId::Hanoi => "Tower of Hanoi",
            GameId::Pattern => "Pattern Puzzler",
            GameId::Maze => "Maze Navigator",
            GameId::Memory => "Memory Match",
            GameId::Word => "Word Puzzle",
        }
    }

    /// The cognitive area the report attributes to this game
    pub fn area(&self) -> &'static str {
        match self {
            GameId::Stroop => "Attention and Processing Speed",
            GameId::Hanoi => "Problem Solving",
            GameId::Pattern => "Visual Memory",
            GameId::Maze => "Spatial Reasoning",
            GameId::Memory => "Visual Recognition and Memory",
            GameId::Word => "Verbal Skills",
        }
    }
}

impl core::fmt::Display for GameId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The stage a session is in
///
/// `Intake` is the pre-stage (user form), `Complete` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Stage {
    #[default]
    Intake,
    Playing(GameId),
    Complete,
}

impl Stage {
    /// The first playing stage
    pub const FIRST_GAME: Stage = Stage::Playing(GameId::Stroop);

    /// Every stage in order
    pub fn sequence() -> [Stage; 8] {
        [
            Stage::Intake,
            Stage::Playing(GameId::Stroop),
            Stage::Playing(GameId::Hanoi),
            Stage::Playing(GameId::Pattern),
            Stage::Playing(GameId::Maze),
            Stage::Playing(GameId::Memory),
            Stage::Playing(GameId::Word),
            Stage::Complete,
        ]
    }

    /// Position in the sequence
    pub fn index(&self) -> usize {
        match self {
            Stage::Intake => 0,
            Stage::Playing(game) => 1 + *game as usize,
            Stage::Complete => 7,
        }
    }

    /// The stage that follows this one; `Complete` stays `Complete`
    pub fn next(&self) -> Stage {
        let sequence = Stage::sequence();
        sequence
            .get(self.index() + 1)
            .copied()
            .unwrap_or(Stage::Complete)
    }

    /// The game being played, if any
    pub fn game(&self) -> Option<GameId> {
        match self {
            Stage::Playing(game) => Some(*game),
            _ => None,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Stage::Complete)
    }

    /// Tag used in persisted state
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Intake => "form",
            Stage::Playing(game) => game.as_str(),
            Stage::Complete => "complete",
        }
    }

    /// Parse a persisted tag
    pub fn parse(tag: &str) -> Option<Stage> {
        match tag {
            "form" => Some(Stage::Intake),
            "complete" => Some(Stage::Complete),
            other => GameId::parse(other).map(Stage::Playing),
        }
    }
}

impl core::fmt::Display for Stage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
