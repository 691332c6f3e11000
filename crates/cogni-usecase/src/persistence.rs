//! Persisted State - Keys and codecs for the session snapshot
//!
//! The store only sees strings. This module decides what goes under each
//! key and how to read it back. Decoding never panics: anything that fails
//! to parse comes back as a [`MalformedStateError`] so the caller can discard
//! the key and fall back to a default.

use std::collections::BTreeMap;

use cogni_domain::model::game::{GameId, Stage};
use cogni_domain::model::metrics::Metrics;
use cogni_domain::model::user::UserData;
use cogni_domain::service::maze_generator::MazeGenerator;
use cogni_domain::service::units::hanoi::HanoiState;
use cogni_domain::service::units::maze::MazeState;
use cogni_domain::service::units::memory::MemoryState;
use cogni_domain::service::units::pattern::PatternState;
use cogni_domain::service::units::stroop::StroopState;
use cogni_domain::service::units::word::WordState;
use cogni_domain::service::units::{
    AnyUnit, HanoiUnit, MazeUnit, MemoryUnit, PatternUnit, StroopUnit, WordUnit,
};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::error::MalformedStateError;

// ========== Session Keys ==========

pub const KEY_CURRENT_GAME: &str = "cognitive_current_game";
pub const KEY_TOTAL_SCORE: &str = "cognitive_total_score";
pub const KEY_GAME_SCORES: &str = "cognitive_game_scores";
pub const KEY_USER_DATA: &str = "cognitive_user_data";
pub const KEY_METRICS: &str = "cognitive_metrics";

/// The five keys that make up the session snapshot
pub const SESSION_KEYS: [&str; 5] = [
    KEY_CURRENT_GAME,
    KEY_TOTAL_SCORE,
    KEY_GAME_SCORES,
    KEY_USER_DATA,
    KEY_METRICS,
];

/// Key holding a game's in-progress state
pub fn working_state_key(game: GameId) -> &'static str {
    match game {
        GameId::Stroop => "stroop_state",
        GameId::Hanoi => "hanoi_state",
        GameId::Pattern => "pattern_state",
        GameId::Maze => "maze_game_state",
        GameId::Memory => "memory_state",
        GameId::Word => "word_puzzle_state",
    }
}

/// Every key this application writes
pub fn all_keys() -> Vec<&'static str> {
    let mut keys = SESSION_KEYS.to_vec();
    keys.extend(GameId::all().iter().map(|g| working_state_key(*g)));
    keys
}

// ========== Encoding ==========

pub fn encode_stage(stage: Stage) -> String {
    stage.as_str().to_string()
}

pub fn encode_total(total: u32) -> String {
    total.to_string()
}

pub fn encode_json<T: Serialize>(key: &str, value: &T) -> Result<String, MalformedStateError> {
    serde_json::to_string(value).map_err(|e| MalformedStateError {
        key: key.to_string(),
        reason: e.to_string(),
    })
}

// ========== Decoding ==========

fn malformed(key: &str, reason: impl Into<String>) -> MalformedStateError {
    MalformedStateError {
        key: key.to_string(),
        reason: reason.into(),
    }
}

pub fn decode_json<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, MalformedStateError> {
    serde_json::from_str(raw).map_err(|e| malformed(key, e.to_string()))
}

pub fn decode_stage(raw: &str) -> Result<Stage, MalformedStateError> {
    Stage::parse(raw.trim())
        .ok_or_else(|| malformed(KEY_CURRENT_GAME, format!("unknown stage '{}'", raw)))
}

pub fn decode_total(raw: &str) -> Result<u32, MalformedStateError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|e| malformed(KEY_TOTAL_SCORE, e.to_string()))
}

pub fn decode_user(raw: &str) -> Result<UserData, MalformedStateError> {
    let user: UserData = decode_json(KEY_USER_DATA, raw)?;
    if !user.is_valid() {
        return Err(malformed(KEY_USER_DATA, "empty name or zero age"));
    }
    Ok(user)
}

pub fn decode_scores(raw: &str) -> Result<BTreeMap<GameId, u32>, MalformedStateError> {
    decode_json(KEY_GAME_SCORES, raw)
}

pub fn decode_metrics(raw: &str) -> Result<BTreeMap<GameId, Metrics>, MalformedStateError> {
    decode_json(KEY_METRICS, raw)
}

// ========== Working State ==========

/// Serialize whichever unit is active
pub fn encode_unit<R: Rng>(unit: &AnyUnit<R>) -> Result<String, MalformedStateError> {
    let key = working_state_key(unit.game_id());
    match unit {
        AnyUnit::Stroop(u) => encode_json(key, u.state()),
        AnyUnit::Hanoi(u) => encode_json(key, u.state()),
        AnyUnit::Pattern(u) => encode_json(key, u.state()),
        AnyUnit::Maze(u) => encode_json(key, u.state()),
        AnyUnit::Memory(u) => encode_json(key, u.state()),
        AnyUnit::Word(u) => encode_json(key, u.state()),
    }
}

fn checked<T: DeserializeOwned>(
    key: &str,
    raw: &str,
    is_consistent: impl Fn(&T) -> bool,
) -> Result<T, MalformedStateError> {
    let state: T = decode_json(key, raw)?;
    if !is_consistent(&state) {
        return Err(malformed(key, "state contradicts itself"));
    }
    Ok(state)
}

/// A decoded working state, not yet attached to a random source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitState {
    Stroop(StroopState),
    Hanoi(HanoiState),
    Pattern(PatternState),
    Maze(MazeState),
    Memory(MemoryState),
    Word(WordState),
}

impl UnitState {
    /// Decode and check a game's saved working state
    ///
    /// A saved maze must match the size the generator produces now.
    pub fn decode(
        game: GameId,
        raw: &str,
        generator: MazeGenerator,
    ) -> Result<Self, MalformedStateError> {
        let key = working_state_key(game);
        let state = match game {
            GameId::Stroop => UnitState::Stroop(checked(key, raw, StroopState::is_consistent)?),
            GameId::Hanoi => UnitState::Hanoi(checked(key, raw, HanoiState::is_consistent)?),
            GameId::Pattern => UnitState::Pattern(checked(key, raw, PatternState::is_consistent)?),
            GameId::Maze => {
                let state: MazeState = checked(key, raw, MazeState::is_consistent)?;
                if let Some(size) = state.maze().map(|m| m.size()) {
                    if size != generator.size() {
                        return Err(malformed(
                            key,
                            format!("maze is {}x{}, expected {}", size, size, generator.size()),
                        ));
                    }
                }
                UnitState::Maze(state)
            }
            GameId::Memory => UnitState::Memory(checked(key, raw, MemoryState::is_consistent)?),
            GameId::Word => UnitState::Word(checked(key, raw, WordState::is_consistent)?),
        };
        Ok(state)
    }

    /// Resume the unit this state belongs to
    pub fn into_unit<R: Rng>(self, rng: R, generator: MazeGenerator) -> AnyUnit<R> {
        match self {
            UnitState::Stroop(state) => AnyUnit::Stroop(StroopUnit::from_state(state, rng)),
            UnitState::Hanoi(state) => AnyUnit::Hanoi(HanoiUnit::from_state(state)),
            UnitState::Pattern(state) => AnyUnit::Pattern(PatternUnit::from_state(state, rng)),
            UnitState::Maze(state) => AnyUnit::Maze(MazeUnit::from_state(state, generator, rng)),
            UnitState::Memory(state) => AnyUnit::Memory(MemoryUnit::from_state(state, rng)),
            UnitState::Word(state) => AnyUnit::Word(WordUnit::from_state(state, rng)),
        }
    }
}
