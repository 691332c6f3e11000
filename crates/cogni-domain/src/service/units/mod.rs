//! Game Units - The six mini-games behind one contract
//!
//! Every unit shares the same lifecycle:
//!
//! ```text
//! Ready ──start()──▶ Playing ──(timer expiry | task done)──▶ Over ──finish()──▶ outcome
//! ```
//!
//! The orchestrator only ever talks to `dyn GameUnit`. The host holds an
//! `AnyUnit` so it can route variant-specific input (a colour choice, a disk
//! move, a guess) to the right game.

pub mod hanoi;
pub mod maze;
pub mod memory;
pub mod pattern;
pub mod stroop;
pub mod word;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::countdown::{Countdown, Tick};
use crate::model::game::GameId;
use crate::model::metrics::Metrics;
use crate::service::maze_generator::MazeGenerator;

pub use hanoi::HanoiUnit;
pub use maze::MazeUnit;
pub use memory::MemoryUnit;
pub use pattern::PatternUnit;
pub use stroop::StroopUnit;
pub use word::WordUnit;

/// Where a unit is in its round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Ready,
    Playing,
    Over,
}

/// What a finished unit reports to the session
#[derive(Debug, Clone, PartialEq)]
pub struct UnitOutcome {
    pub score: u32,
    pub metrics: Option<Metrics>,
}

/// The common contract
pub trait GameUnit {
    /// Which game this is
    fn game_id(&self) -> GameId;

    /// Current phase
    fn phase(&self) -> Phase;

    /// Reset all per-round state and begin playing
    fn start(&mut self);

    /// Advance the one-second timer; untimed games never expire
    fn tick(&mut self) -> Tick {
        Tick::Stopped
    }

    /// Seconds left, for timed games
    fn time_left(&self) -> Option<u32> {
        None
    }

    /// Score accumulated so far
    fn current_score(&self) -> u32;

    /// True once the stopping condition has been met
    fn is_terminal(&self) -> bool {
        self.phase() == Phase::Over
    }

    /// Hand over the final score; succeeds exactly once, after the round ended
    fn finish(&mut self) -> Result<UnitOutcome, UnitError>;

    /// Stop the timer without ending the round (host shutdown, restart)
    fn teardown(&mut self);
}

/// Round bookkeeping shared by every unit
///
/// Owns the phase, the optional countdown and the finished flag, so timer
/// expiry and `finish()` behave the same way in all six games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    phase: Phase,
    countdown: Option<Countdown>,
    finished: bool,
}

impl Round {
    pub fn new() -> Self {
        Self {
            phase: Phase::Ready,
            countdown: None,
            finished: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Enter `Playing`, with a fresh timer when `seconds` is given
    pub fn begin(&mut self, seconds: Option<u32>) {
        self.phase = Phase::Playing;
        self.countdown = seconds.map(Countdown::start);
        self.finished = false;
    }

    /// Advance the timer; the round is over when this returns `Expired`
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::Playing {
            return Tick::Stopped;
        }
        let tick = match self.countdown.as_mut() {
            Some(countdown) => countdown.tick(),
            None => Tick::Stopped,
        };
        if tick == Tick::Expired {
            self.phase = Phase::Over;
        }
        tick
    }

    /// End the round early (task completed)
    pub fn end(&mut self) {
        self.cancel();
        self.phase = Phase::Over;
    }

    /// Stop the timer
    pub fn cancel(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.cancel();
        }
    }

    pub fn time_left(&self) -> Option<u32> {
        self.countdown.as_ref().map(Countdown::remaining)
    }

    /// Claim the single `finish()` for this round
    pub fn claim_finish(&mut self) -> Result<(), UnitError> {
        if self.phase != Phase::Over {
            return Err(UnitError::NotTerminal);
        }
        if self.finished {
            return Err(UnitError::AlreadyFinished);
        }
        self.finished = true;
        Ok(())
    }

    /// A round restored from storage must agree with itself
    pub fn is_consistent(&self) -> bool {
        match (self.phase, &self.countdown) {
            (Phase::Ready, _) => !self.finished,
            (Phase::Playing, Some(c)) => !self.finished && c.remaining() > 0,
            (Phase::Playing, None) => !self.finished,
            (Phase::Over, _) => true,
        }
    }
}

impl Default for Round {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors shared by every unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitError {
    /// Input arrived while the round was not playing
    NotPlaying,
    /// `finish()` before the round ended
    NotTerminal,
    /// `finish()` a second time
    AlreadyFinished,
}

impl core::fmt::Display for UnitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            UnitError::NotPlaying => write!(f, "The game is not being played"),
            UnitError::NotTerminal => write!(f, "The game has not ended yet"),
            UnitError::AlreadyFinished => write!(f, "The game result was already taken"),
        }
    }
}

impl std::error::Error for UnitError {}

/// Any of the six units
///
/// This is the tagged form the host keeps; `as_unit` / `as_unit_mut` give the
/// common contract.
#[derive(Debug)]
pub enum AnyUnit<R> {
    Stroop(StroopUnit<R>),
    Hanoi(HanoiUnit),
    Pattern(PatternUnit<R>),
    Maze(MazeUnit<R>),
    Memory(MemoryUnit<R>),
    Word(WordUnit<R>),
}

impl<R: Rng> AnyUnit<R> {
    /// A fresh, not yet started unit for `game`
    pub fn new(game: GameId, rng: R, generator: MazeGenerator) -> Self {
        match game {
            GameId::Stroop => AnyUnit::Stroop(StroopUnit::new(rng)),
            GameId::Hanoi => AnyUnit::Hanoi(HanoiUnit::new()),
            GameId::Pattern => AnyUnit::Pattern(PatternUnit::new(rng)),
            GameId::Maze => AnyUnit::Maze(MazeUnit::new(generator, rng)),
            GameId::Memory => AnyUnit::Memory(MemoryUnit::new(rng)),
            GameId::Word => AnyUnit::Word(WordUnit::new(rng)),
        }
    }

    pub fn as_unit(&self) -> &dyn GameUnit {
        match self {
            AnyUnit::Stroop(u) => u,
            AnyUnit::Hanoi(u) => u,
            AnyUnit::Pattern(u) => u,
            AnyUnit::Maze(u) => u,
            AnyUnit::Memory(u) => u,
            AnyUnit::Word(u) => u,
        }
    }

    pub fn as_unit_mut(&mut self) -> &mut dyn GameUnit {
        match self {
            AnyUnit::Stroop(u) => u,
            AnyUnit::Hanoi(u) => u,
            AnyUnit::Pattern(u) => u,
            AnyUnit::Maze(u) => u,
            AnyUnit::Memory(u) => u,
            AnyUnit::Word(u) => u,
        }
    }

    pub fn game_id(&self) -> GameId {
        self.as_unit().game_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_round_lifecycle() {
        let mut round = Round::new();
        assert_eq!(round.tick(), Tick::Stopped);

        round.begin(Some(2));
        assert_eq!(round.tick(), Tick::Running { remaining: 1 });
        assert_eq!(round.claim_finish(), Err(UnitError::NotTerminal));
        assert_eq!(round.tick(), Tick::Expired);
        assert_eq!(round.phase(), Phase::Over);
        assert_eq!(round.tick(), Tick::Stopped);

        assert_eq!(round.claim_finish(), Ok(()));
        assert_eq!(round.claim_finish(), Err(UnitError::AlreadyFinished));
    }

    #[test]
    fn test_end_cancels_timer() {
        let mut round = Round::new();
        round.begin(Some(60));
        round.tick();
        round.end();

        assert_eq!(round.tick(), Tick::Stopped);
        assert_eq!(round.time_left(), Some(59));
    }

    #[test]
    fn test_untimed_round_never_expires() {
        let mut round = Round::new();
        round.begin(None);
        for _ in 0..100 {
            assert_eq!(round.tick(), Tick::Stopped);
        }
        assert!(round.is_playing());
    }

    #[test]
    fn test_any_unit_dispatch() {
        for game in GameId::all() {
            let rng = StdRng::seed_from_u64(1);
            let mut unit = AnyUnit::new(*game, rng, MazeGenerator::new(9).unwrap());
            assert_eq!(unit.game_id(), *game);
            assert_eq!(unit.as_unit().phase(), Phase::Ready);

            unit.as_unit_mut().start();
            assert_eq!(unit.as_unit().phase(), Phase::Playing);
            assert!(!unit.as_unit().is_terminal());
            assert_eq!(unit.as_unit_mut().finish(), Err(UnitError::NotTerminal));
        }
    }
}
