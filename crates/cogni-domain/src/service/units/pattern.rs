//! Pattern Puzzler - Repeat the highlighted cells in order
//!
//! A 3×3 board flashes a sequence of cells. The player re-enters it one cell
//! at a time. Every completed sequence scores and the next one is one cell
//! longer; a wrong cell costs a life and replays a fresh sequence of the same
//! length.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameUnit, Phase, Round, UnitError, UnitOutcome};
use crate::model::countdown::Tick;
use crate::model::game::GameId;
use crate::model::metrics::Metrics;

/// Round length in seconds
pub const PATTERN_SECONDS: u32 = 60;

/// Cells on the board (3×3)
pub const BOARD_CELLS: u8 = 9;

/// Length of the first sequence
pub const FIRST_LENGTH: usize = 3;

/// Mistakes allowed before the game ends
pub const LIVES: u8 = 3;

/// Points for each completed sequence
pub const POINTS_PER_PATTERN: u32 = 100;

/// What a single cell entry did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternStep {
    /// Right cell, sequence continues
    Correct { remaining: usize },
    /// Sequence finished; a longer one is ready
    Completed { next_length: usize },
    /// Wrong cell; a fresh sequence of the same length is ready
    Mistake { lives_left: u8 },
    /// Wrong cell and no lives left
    OutOfLives,
}

/// Persistable part of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternState {
    round: Round,
    sequence: Vec<u8>,
    entered: usize,
    lives: u8,
    points: u32,
    completed: u32,
    mistakes: u32,
}

impl PatternState {
    pub fn is_consistent(&self) -> bool {
        self.round.is_consistent()
            && self.lives <= LIVES
            && self.entered <= self.sequence.len()
            && self.sequence.iter().all(|c| *c < BOARD_CELLS)
            && self.points == self.completed * POINTS_PER_PATTERN
            && (self.round.phase() != Phase::Playing
                || (self.lives > 0 && self.sequence.len() >= FIRST_LENGTH))
    }
}

impl Default for PatternState {
    fn default() -> Self {
        Self {
            round: Round::new(),
            sequence: Vec::new(),
            entered: 0,
            lives: LIVES,
            points: 0,
            completed: 0,
            mistakes: 0,
        }
    }
}

/// The pattern recall game
#[derive(Debug)]
pub struct PatternUnit<R> {
    state: PatternState,
    rng: R,
}

impl<R: Rng> PatternUnit<R> {
    pub fn new(rng: R) -> Self {
        Self {
            state: PatternState::default(),
            rng,
        }
    }

    pub fn from_state(state: PatternState, rng: R) -> Self {
        Self { state, rng }
    }

    pub fn state(&self) -> &PatternState {
        &self.state
    }

    /// The sequence to reproduce
    pub fn sequence(&self) -> &[u8] {
        &self.state.sequence
    }

    /// How many cells of the sequence have been entered
    pub fn progress(&self) -> usize {
        self.state.entered
    }

    pub fn lives(&self) -> u8 {
        self.state.lives
    }

    /// Enter the next cell (0..9, row-major)
    pub fn pick(&mut self, cell: u8) -> Result<PatternStep, PatternError> {
        if !self.state.round.is_playing() {
            return Err(PatternError::NotPlaying);
        }
        if cell >= BOARD_CELLS {
            return Err(PatternError::NoSuchCell { cell });
        }

        let s = &mut self.state;
        if s.sequence.get(s.entered) == Some(&cell) {
            s.entered += 1;
            if s.entered < s.sequence.len() {
                return Ok(PatternStep::Correct {
                    remaining: s.sequence.len() - s.entered,
                });
            }
            s.points += POINTS_PER_PATTERN;
            s.completed += 1;
            let next_length = s.sequence.len() + 1;
            self.new_sequence(next_length);
            return Ok(PatternStep::Completed { next_length });
        }

        s.mistakes += 1;
        s.lives = s.lives.saturating_sub(1);
        if s.lives == 0 {
            s.round.end();
            return Ok(PatternStep::OutOfLives);
        }
        let lives_left = s.lives;
        let length = s.sequence.len();
        self.new_sequence(length);
        Ok(PatternStep::Mistake { lives_left })
    }

    fn new_sequence(&mut self, length: usize) {
        let rng = &mut self.rng;
        self.state.sequence = (0..length).map(|_| rng.gen_range(0..BOARD_CELLS)).collect();
        self.state.entered = 0;
    }
}

impl<R: Rng> GameUnit for PatternUnit<R> {
    fn game_id(&self) -> GameId {
        GameId::Pattern
    }

    fn phase(&self) -> Phase {
        self.state.round.phase()
    }

    fn start(&mut self) {
        self.state = PatternState::default();
        self.state.round.begin(Some(PATTERN_SECONDS));
        self.new_sequence(FIRST_LENGTH);
    }

    fn tick(&mut self) -> Tick {
        self.state.round.tick()
    }

    fn time_left(&self) -> Option<u32> {
        self.state.round.time_left()
    }

    fn current_score(&self) -> u32 {
        self.state.points
    }

    fn finish(&mut self) -> Result<UnitOutcome, UnitError> {
        self.state.round.claim_finish()?;
        let s = &self.state;
        let longest = if s.completed == 0 {
            0
        } else {
            FIRST_LENGTH as u32 + s.completed - 1
        };
        let metrics = Metrics::new()
            .with_count("patterns_completed", s.completed)
            .with_count("mistakes", s.mistakes)
            .with_count("longest_pattern", longest);
        Ok(UnitOutcome {
            score: s.points,
            metrics: Some(metrics),
        })
    }

    fn teardown(&mut self) {
        self.state.round.cancel();
    }
}

/// Why a cell entry was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternError {
    NotPlaying,
    NoSuchCell { cell: u8 },
}

impl core::fmt::Display for PatternError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            PatternError::NotPlaying => write!(f, "The game is not being played"),
            PatternError::NoSuchCell { cell } => {
                write!(f, "Cell {} is not on the board (0-{})", cell, BOARD_CELLS - 1)
            }
        }
    }
}

impl std::error::Error for PatternError {}
