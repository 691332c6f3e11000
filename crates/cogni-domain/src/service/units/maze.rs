//! Maze Runner - Walk from the start to the exit
//!
//! Untimed. The grid is carved by [`MazeGenerator`] when the round starts and
//! again on every reset. Reaching the exit is worth a flat score.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameUnit, Phase, Round, UnitError, UnitOutcome};
use crate::model::game::GameId;
use crate::model::maze::{Cell, Direction, Maze, Position};
use crate::model::metrics::Metrics;
use crate::service::maze_generator::MazeGenerator;

/// Score for reaching the exit
pub const EXIT_SCORE: u32 = 1000;

/// Result of one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Wall or grid edge; the player did not move
    Blocked,
    Moved { to: Position },
    ReachedExit,
}

/// Persistable part of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeState {
    round: Round,
    maze: Option<Maze>,
    player: Position,
    moves: u32,
    bumps: u32,
    resets: u32,
    reached_exit: bool,
}

impl MazeState {
    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn is_consistent(&self) -> bool {
        let grid_ok = match (&self.maze, self.round.phase()) {
            (None, Phase::Ready) => true,
            (None, _) => false,
            (Some(maze), _) => maze.is_well_formed() && maze.is_open(self.player),
        };
        let exit_ok = match &self.maze {
            Some(maze) => self.reached_exit == (self.player == maze.exit()),
            None => !self.reached_exit,
        };
        self.round.is_consistent()
            && grid_ok
            && exit_ok
            && (!self.reached_exit || self.round.phase() == Phase::Over)
    }
}

impl Default for MazeState {
    fn default() -> Self {
        Self {
            round: Round::new(),
            maze: None,
            player: Position::new(1, 1),
            moves: 0,
            bumps: 0,
            resets: 0,
            reached_exit: false,
        }
    }
}

/// The maze navigation game
#[derive(Debug)]
pub struct MazeUnit<R> {
    state: MazeState,
    generator: MazeGenerator,
    rng: R,
}

impl<R: Rng> MazeUnit<R> {
    pub fn new(generator: MazeGenerator, rng: R) -> Self {
        Self {
            state: MazeState::default(),
            generator,
            rng,
        }
    }

    pub fn from_state(state: MazeState, generator: MazeGenerator, rng: R) -> Self {
        Self {
            state,
            generator,
            rng,
        }
    }

    pub fn state(&self) -> &MazeState {
        &self.state
    }

    pub fn maze(&self) -> Option<&Maze> {
        self.state.maze.as_ref()
    }

    pub fn player(&self) -> Position {
        self.state.player
    }

    pub fn moves(&self) -> u32 {
        self.state.moves
    }

    /// Grid as text, player drawn as `@`
    pub fn render(&self) -> Option<String> {
        self.maze().map(|maze| maze.render(self.state.player))
    }

    /// Move one cell
    pub fn step(&mut self, direction: Direction) -> Result<StepOutcome, UnitError> {
        let s = &mut self.state;
        let maze = match (s.round.is_playing(), s.maze.as_ref()) {
            (true, Some(maze)) => maze,
            _ => return Err(UnitError::NotPlaying),
        };

        let target = match s.player.offset(direction, 1) {
            Some(pos) if maze.is_open(pos) => pos,
            _ => {
                s.bumps += 1;
                return Ok(StepOutcome::Blocked);
            }
        };

        s.player = target;
        s.moves += 1;
        if maze.cell(target) == Cell::Exit {
            s.reached_exit = true;
            s.round.end();
            return Ok(StepOutcome::ReachedExit);
        }
        Ok(StepOutcome::Moved { to: target })
    }

    /// Carve a brand-new maze and put the player back at the start
    pub fn reset(&mut self) -> Result<(), UnitError> {
        if !self.state.round.is_playing() {
            return Err(UnitError::NotPlaying);
        }
        self.regenerate();
        self.state.resets += 1;
        Ok(())
    }

    fn regenerate(&mut self) {
        let maze = self.generator.generate(&mut self.rng);
        self.state.player = maze.start();
        self.state.maze = Some(maze);
    }
}

impl<R: Rng> GameUnit for MazeUnit<R> {
    fn game_id(&self) -> GameId {
        GameId::Maze
    }

    fn phase(&self) -> Phase {
        self.state.round.phase()
    }

    fn start(&mut self) {
        self.state = MazeState::default();
        self.state.round.begin(None);
        self.regenerate();
    }

    fn current_score(&self) -> u32 {
        if self.state.reached_exit {
            EXIT_SCORE
        } else {
            0
        }
    }

    fn finish(&mut self) -> Result<UnitOutcome, UnitError> {
        self.state.round.claim_finish()?;
        let s = &self.state;
        let metrics = Metrics::new()
            .with_count("moves", s.moves)
            .with_count("blocked_moves", s.bumps)
            .with_count("resets", s.resets)
            .with_flag("reached_exit", s.reached_exit);
        Ok(UnitOutcome {
            score: self.current_score(),
            metrics: Some(metrics),
        })
    }

    fn teardown(&mut self) {
        self.state.round.cancel();
    }
}
