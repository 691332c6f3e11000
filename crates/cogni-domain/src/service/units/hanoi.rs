//! Tower of Hanoi - Three disks, three towers, one minute
//!
//! Disks are numbered by size (1 = smallest). Each tower is a stack listed
//! bottom to top, so the start position is `[[3, 2, 1], [], []]`.

use serde::{Deserialize, Serialize};

use super::{GameUnit, Phase, Round, UnitError, UnitOutcome};
use crate::model::countdown::Tick;
use crate::model::game::GameId;
use crate::model::metrics::Metrics;

/// Round length in seconds
pub const HANOI_SECONDS: u32 = 60;

/// Number of disks
pub const DISKS: u8 = 3;

/// 2^3 - 1
pub const OPTIMAL_MOVES: u32 = (1 << DISKS) - 1;

/// Index of the goal tower
pub const GOAL_TOWER: usize = 2;

pub type Towers = [Vec<u8>; 3];

/// The start position
pub fn initial_towers() -> Towers {
    [(1..=DISKS).rev().collect(), Vec::new(), Vec::new()]
}

/// A move is legal when the source has a disk and the target is empty or
/// topped by a strictly larger disk
pub fn check_move(towers: &Towers, from: usize, to: usize) -> Result<u8, HanoiMoveError> {
    if from >= towers.len() {
        return Err(HanoiMoveError::NoSuchTower { index: from });
    }
    if to >= towers.len() {
        return Err(HanoiMoveError::NoSuchTower { index: to });
    }
    if from == to {
        return Err(HanoiMoveError::SameTower { index: from });
    }
    let disk = *towers[from]
        .last()
        .ok_or(HanoiMoveError::EmptySource { tower: from })?;
    match towers[to].last() {
        Some(&top) if top < disk => Err(HanoiMoveError::LargerOnSmaller { disk, onto: top }),
        _ => Ok(disk),
    }
}

/// Score for a solved puzzle
pub fn solved_score(moves: u32, time_left: u32) -> u32 {
    let excess = i64::from(moves) - i64::from(OPTIMAL_MOVES);
    let move_score = (100 - excess * 10).max(10);
    // move_score never exceeds 100 + 10 * OPTIMAL_MOVES, so this fits
    move_score as u32 + time_left * 2
}

/// Partial credit when the timer runs out
pub fn timeout_score(towers: &Towers) -> u32 {
    towers[GOAL_TOWER].len() as u32 * 30 + towers[1].len() as u32 * 10
}

/// What a click on a tower did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Click {
    Selected { tower: usize },
    Deselected,
    Moved(MoveResult),
    Rejected(HanoiMoveError),
}

/// A successful move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveResult {
    Moved { disk: u8 },
    Solved { score: u32 },
}

/// Persistable part of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HanoiState {
    round: Round,
    towers: Towers,
    selected: Option<usize>,
    moves: u32,
    invalid_moves: u32,
    score: u32,
}

impl HanoiState {
    /// Same three disks, each tower in decreasing order
    pub fn is_consistent(&self) -> bool {
        let mut disks: Vec<u8> = self.towers.iter().flatten().copied().collect();
        disks.sort_unstable();
        let stacked = self
            .towers
            .iter()
            .all(|t| t.windows(2).all(|w| w[0] > w[1]));
        let selection_ok = self.selected.map_or(true, |i| i < 3 && !self.towers[i].is_empty());
        self.round.is_consistent()
            && disks == (1..=DISKS).collect::<Vec<_>>()
            && stacked
            && selection_ok
    }
}

impl Default for HanoiState {
    fn default() -> Self {
        Self {
            round: Round::new(),
            towers: initial_towers(),
            selected: None,
            moves: 0,
            invalid_moves: 0,
            score: 0,
        }
    }
}

/// The Tower of Hanoi game
#[derive(Debug, Default)]
pub struct HanoiUnit {
    state: HanoiState,
}

impl HanoiUnit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_state(state: HanoiState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &HanoiState {
        &self.state
    }

    pub fn towers(&self) -> &Towers {
        &self.state.towers
    }

    pub fn moves(&self) -> u32 {
        self.state.moves
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected
    }

    pub fn is_solved(&self) -> bool {
        self.state.towers[GOAL_TOWER].len() == usize::from(DISKS)
    }

    /// Move the top disk of `from` onto `to`
    ///
    /// Illegal attempts are rejected, counted as invalid, and do not count as
    /// moves.
    pub fn move_disk(&mut self, from: usize, to: usize) -> Result<MoveResult, HanoiMoveError> {
        if !self.state.round.is_playing() {
            return Err(HanoiMoveError::NotPlaying);
        }
        self.state.selected = None;

        let disk = match check_move(&self.state.towers, from, to) {
            Ok(disk) => disk,
            Err(err) => {
                self.state.invalid_moves += 1;
                return Err(err);
            }
        };
        self.state.towers[from].pop();
        self.state.towers[to].push(disk);
        self.state.moves += 1;

        if self.is_solved() {
            let time_left = self.state.round.time_left().unwrap_or(0);
            self.state.score = solved_score(self.state.moves, time_left);
            self.state.round.end();
            return Ok(MoveResult::Solved {
                score: self.state.score,
            });
        }
        Ok(MoveResult::Moved { disk })
    }

    /// Click-style input: pick a source tower, then a target
    ///
    /// Clicking the selected tower again deselects it; an empty tower cannot
    /// be selected.
    pub fn click(&mut self, tower: usize) -> Click {
        if !self.state.round.is_playing() {
            return Click::Rejected(HanoiMoveError::NotPlaying);
        }
        match self.state.selected {
            None => {
                if tower >= 3 {
                    return Click::Rejected(HanoiMoveError::NoSuchTower { index: tower });
                }
                if self.state.towers[tower].is_empty() {
                    return Click::Rejected(HanoiMoveError::EmptySource { tower });
                }
                self.state.selected = Some(tower);
                Click::Selected { tower }
            }
            Some(selected) if selected == tower => {
                self.state.selected = None;
                Click::Deselected
            }
            Some(selected) => match self.move_disk(selected, tower) {
                Ok(result) => Click::Moved(result),
                Err(err) => Click::Rejected(err),
            },
        }
    }
}

impl GameUnit for HanoiUnit {
    fn game_id(&self) -> GameId {
        GameId::Hanoi
    }

    fn phase(&self) -> Phase {
        self.state.round.phase()
    }

    fn start(&mut self) {
        self.state = HanoiState::default();
        self.state.round.begin(Some(HANOI_SECONDS));
    }

    fn tick(&mut self) -> Tick {
        let tick = self.state.round.tick();
        if tick == Tick::Expired {
            self.state.selected = None;
            self.state.score = timeout_score(&self.state.towers);
        }
        tick
    }

    fn time_left(&self) -> Option<u32> {
        self.state.round.time_left()
    }

    fn current_score(&self) -> u32 {
        self.state.score
    }

    fn finish(&mut self) -> Result<UnitOutcome, UnitError> {
        self.state.round.claim_finish()?;
        let s = &self.state;
        let metrics = Metrics::new()
            .with_count("total_moves", s.moves)
            .with_count("optimal_moves", OPTIMAL_MOVES)
            .with_count("invalid_moves", s.invalid_moves)
            .with_flag("solved", self.is_solved())
            .with_count("time_left", s.round.time_left().unwrap_or(0));
        Ok(UnitOutcome {
            score: s.score,
            metrics: Some(metrics),
        })
    }

    fn teardown(&mut self) {
        self.state.round.cancel();
    }
}

/// Why a move was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HanoiMoveError {
    NotPlaying,
    NoSuchTower { index: usize },
    SameTower { index: usize },
    EmptySource { tower: usize },
    LargerOnSmaller { disk: u8, onto: u8 },
}

impl core::fmt::Display for HanoiMoveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HanoiMoveError::NotPlaying => write!(f, "The game is not being played"),
            HanoiMoveError::NoSuchTower { index } => write!(f, "There is no tower {}", index + 1),
            HanoiMoveError::SameTower { index } => {
                write!(f, "Tower {} is both source and target", index + 1)
            }
            HanoiMoveError::EmptySource { tower } => write!(f, "Tower {} is empty", tower + 1),
            HanoiMoveError::LargerOnSmaller { disk, onto } => {
                write!(f, "Disk {} cannot go on top of disk {}", disk, onto)
            }
        }
    }
}

impl std::error::Error for HanoiMoveError {}
