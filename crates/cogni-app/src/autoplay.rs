//! Simulated player for the demo
//!
//! Plays every game the way a sharp but imperfect person would: mostly right
//! answers, the odd slip, one answer per second of game time. Everything is
//! driven by a seeded generator so a demo run can be reproduced.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use cogni_domain::model::maze::{Direction, Maze, Position};
use cogni_domain::service::units::hanoi::HanoiUnit;
use cogni_domain::service::units::maze::MazeUnit;
use cogni_domain::service::units::memory::{Flip, MemoryUnit};
use cogni_domain::service::units::pattern::{PatternStep, PatternUnit, BOARD_CELLS};
use cogni_domain::service::units::stroop::{InkColor, StroopUnit};
use cogni_domain::service::units::word::WordUnit;
use cogni_domain::{AnyUnit, GameUnit, Tick};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Optimal solution for three disks
const HANOI_SOLUTION: [(usize, usize); 7] = [(0, 2), (0, 1), (2, 1), (0, 2), (1, 0), (1, 2), (0, 2)];

/// Seconds the player spends looking at the towers before moving
const HANOI_THINKING: u32 = 8;

/// Seconds per word guess
const WORD_THINKING: u32 = 3;

#[derive(Debug)]
pub struct AutoPlayer {
    rng: StdRng,
    accuracy: f64,
}

impl AutoPlayer {
    /// `accuracy` is the chance of each answer being right; NaN plays perfectly
    pub fn new(seed: u64, accuracy: f64) -> Self {
        let accuracy = if accuracy.is_nan() { 1.0 } else { accuracy.clamp(0.0, 1.0) };
        Self {
            rng: StdRng::seed_from_u64(seed),
            accuracy,
        }
    }

    fn slips(&mut self) -> bool {
        !self.rng.gen_bool(self.accuracy)
    }

    /// Play `unit` until its round is over
    pub fn play<R: Rng>(&mut self, unit: &mut AnyUnit<R>) {
        match unit {
            AnyUnit::Stroop(u) => self.stroop(u),
            AnyUnit::Hanoi(u) => self.hanoi(u),
            AnyUnit::Pattern(u) => self.pattern(u),
            AnyUnit::Maze(u) => self.maze(u),
            AnyUnit::Memory(u) => self.memory(u),
            AnyUnit::Word(u) => self.word(u),
        }
        // Whatever is left of the clock runs out
        run_out(unit.as_unit_mut());
        debug!(game = %unit.game_id(), score = unit.as_unit().current_score(), "Autoplay finished");
    }

    fn stroop<R: Rng>(&mut self, unit: &mut StroopUnit<R>) {
        while !unit.is_terminal() {
            let Some(challenge) = unit.challenge() else {
                break;
            };
            let answer = if self.slips() {
                let wrong: Vec<InkColor> = InkColor::all()
                    .iter()
                    .copied()
                    .filter(|c| *c != challenge.ink)
                    .collect();
                wrong.choose(&mut self.rng).copied().unwrap_or(challenge.ink)
            } else {
                challenge.ink
            };
            if unit.select(answer).is_err() {
                break;
            }
            unit.tick();
        }
    }

    fn hanoi(&mut self, unit: &mut HanoiUnit) {
        for _ in 0..HANOI_THINKING {
            unit.tick();
        }
        for (from, to) in HANOI_SOLUTION {
            if unit.is_terminal() || unit.move_disk(from, to).is_err() {
                break;
            }
            unit.tick();
        }
    }

    fn pattern<R: Rng>(&mut self, unit: &mut PatternUnit<R>) {
        while !unit.is_terminal() {
            let expected = match unit.sequence().get(unit.progress()) {
                Some(cell) => *cell,
                None => break,
            };
            let cell = if self.slips() {
                (expected + 1) % BOARD_CELLS
            } else {
                expected
            };
            match unit.pick(cell) {
                Ok(PatternStep::OutOfLives) | Err(_) => break,
                Ok(_) => {}
            }
            unit.tick();
        }
    }

    fn maze<R: Rng>(&mut self, unit: &mut MazeUnit<R>) {
        let steps = match unit.maze() {
            Some(maze) => route(maze, unit.player()),
            None => return,
        };
        for direction in steps {
            if unit.step(direction).is_err() || unit.is_terminal() {
                break;
            }
        }
    }

    fn memory<R: Rng>(&mut self, unit: &mut MemoryUnit<R>) {
        let mut seen: BTreeMap<usize, u8> = BTreeMap::new();
        let mut cleared: BTreeSet<usize> = BTreeSet::new();
        let cards = unit.card_count();

        while !unit.is_terminal() {
            let known_pair = seen.iter().find_map(|(a, sym)| {
                seen.iter()
                    .find(|(b, other)| a != *b && sym == *other)
                    .map(|_| *a)
            });
            let unknown = |seen: &BTreeMap<usize, u8>, cleared: &BTreeSet<usize>, skip: Option<usize>| {
                (0..cards).find(|c| !seen.contains_key(c) && !cleared.contains(c) && Some(*c) != skip)
            };

            let Some(first) = known_pair.or_else(|| unknown(&seen, &cleared, None)) else {
                break;
            };
            let Ok(flip) = unit.flip(first) else {
                break;
            };
            let Flip::First { symbol } = flip else {
                break;
            };
            seen.insert(first, symbol);

            let partner = seen
                .iter()
                .find(|(c, s)| **c != first && **s == symbol)
                .map(|(c, _)| *c);
            let Some(second) = partner.or_else(|| unknown(&seen, &cleared, Some(first))) else {
                break;
            };
            match unit.flip(second) {
                Ok(Flip::Match { .. }) | Ok(Flip::Cleared { .. }) => {
                    seen.remove(&first);
                    seen.remove(&second);
                    cleared.insert(first);
                    cleared.insert(second);
                }
                Ok(Flip::Mismatch { second: sym, .. }) => {
                    seen.insert(second, sym);
                }
                Ok(Flip::First { .. }) | Err(_) => break,
            }
            unit.tick();
        }
    }

    fn word<R: Rng>(&mut self, unit: &mut WordUnit<R>) {
        while !unit.is_terminal() {
            let Some(answer) = unit.current_word().map(str::to_string) else {
                break;
            };
            let guess = if self.slips() {
                answer.chars().rev().collect()
            } else {
                answer
            };
            if unit.guess(&guess).is_err() {
                break;
            }
            for _ in 0..WORD_THINKING {
                unit.tick();
            }
        }
    }
}

/// Tick a timed unit to expiry; untimed units are left alone
fn run_out(unit: &mut dyn GameUnit) {
    if unit.time_left().is_none() {
        return;
    }
    while !unit.is_terminal() {
        if unit.tick() == Tick::Stopped {
            break;
        }
    }
}

/// Shortest list of steps from `from` to the exit
pub fn route(maze: &Maze, from: Position) -> Vec<Direction> {
    let mut parent: HashMap<Position, Position> = HashMap::from([(from, from)]);
    let mut queue = VecDeque::from([from]);
    while let Some(pos) = queue.pop_front() {
        if pos == maze.exit() {
            break;
        }
        for next in maze.open_neighbours(pos) {
            if !parent.contains_key(&next) {
                parent.insert(next, pos);
                queue.push_back(next);
            }
        }
    }

    let mut steps = Vec::new();
    let mut at = maze.exit();
    while at != from {
        let Some(prev) = parent.get(&at).copied() else {
            return Vec::new();
        };
        if let Some(direction) = Direction::all()
            .into_iter()
            .find(|d| prev.offset(*d, 1) == Some(at))
        {
            steps.push(direction);
        }
        at = prev;
    }
    steps.reverse();
    steps
}
