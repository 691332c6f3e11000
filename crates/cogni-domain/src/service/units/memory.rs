//! Memory Match - Find the eight pairs
//!
//! Sixteen face-down cards hold eight symbol pairs. Flipping two cards is one
//! attempt; a match stays face up, a mismatch is turned back over on the next
//! flip. Clearing the board before the timer runs out adds a time bonus.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameUnit, Phase, Round, UnitError, UnitOutcome};
use crate::model::countdown::Tick;
use crate::model::game::GameId;
use crate::model::metrics::Metrics;

/// Round length in seconds
pub const MEMORY_SECONDS: u32 = 90;

/// Number of symbol pairs
pub const PAIRS: u8 = 8;

/// Points for each pair found
pub const POINTS_PER_PAIR: u32 = 100;

/// What a flip did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flip {
    /// First card of an attempt
    First { symbol: u8 },
    /// Second card matched the first
    Match { symbol: u8 },
    /// Second card did not match; both stay visible until the next flip
    Mismatch { first: u8, second: u8 },
    /// Last pair found
    Cleared { bonus: u32 },
}

/// Persistable part of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryState {
    round: Round,
    cards: Vec<u8>,
    matched: Vec<bool>,
    face_up: Vec<usize>,
    attempts: u32,
    pairs_found: u32,
    points: u32,
}

impl MemoryState {
    pub fn is_consistent(&self) -> bool {
        let total = usize::from(PAIRS) * 2;
        let matched_count = self.matched.iter().filter(|m| **m).count();
        let shape_ok = if self.round.phase() == Phase::Ready {
            self.cards.is_empty()
        } else {
            self.cards.len() == total && self.matched.len() == total
        };
        self.round.is_consistent()
            && shape_ok
            && self.face_up.len() <= 2
            && self.face_up.iter().all(|i| *i < self.cards.len())
            && matched_count == self.pairs_found as usize * 2
            && self.pairs_found <= self.attempts
            && (self.cards.is_empty() || self.deck_is_paired())
            && self.points_match_pairs()
    }

    /// Every symbol appears on exactly two cards, matched together or not at all
    fn deck_is_paired(&self) -> bool {
        (0..PAIRS).all(|symbol| {
            let holders: Vec<usize> = (0..self.cards.len())
                .filter(|i| self.cards[*i] == symbol)
                .collect();
            match holders.as_slice() {
                [a, b] => self.matched.get(*a) == self.matched.get(*b),
                _ => false,
            }
        })
    }

    /// Points are 100 per pair, plus an even time bonus once the board is clear
    fn points_match_pairs(&self) -> bool {
        let base = self.pairs_found * POINTS_PER_PAIR;
        if self.pairs_found < u32::from(PAIRS) {
            return self.points == base;
        }
        match self.points.checked_sub(base) {
            Some(bonus) => bonus % 2 == 0 && bonus <= MEMORY_SECONDS * 2,
            None => false,
        }
    }
}

impl Default for MemoryState {
    fn default() -> Self {
        Self {
            round: Round::new(),
            cards: Vec::new(),
            matched: Vec::new(),
            face_up: Vec::new(),
            attempts: 0,
            pairs_found: 0,
            points: 0,
        }
    }
}

/// The card matching game
#[derive(Debug)]
pub struct MemoryUnit<R> {
    state: MemoryState,
    rng: R,
}

impl<R: Rng> MemoryUnit<R> {
    pub fn new(rng: R) -> Self {
        Self {
            state: MemoryState::default(),
            rng,
        }
    }

    pub fn from_state(state: MemoryState, rng: R) -> Self {
        Self { state, rng }
    }

    pub fn state(&self) -> &MemoryState {
        &self.state
    }

    pub fn card_count(&self) -> usize {
        self.state.cards.len()
    }

    /// Symbol on a card if it is currently visible
    pub fn visible(&self, card: usize) -> Option<u8> {
        let s = &self.state;
        let shown = s.matched.get(card).copied().unwrap_or(false) || s.face_up.contains(&card);
        if shown {
            s.cards.get(card).copied()
        } else {
            None
        }
    }

    pub fn pairs_found(&self) -> u32 {
        self.state.pairs_found
    }

    /// Turn a card face up
    pub fn flip(&mut self, card: usize) -> Result<Flip, MemoryError> {
        let s = &mut self.state;
        if !s.round.is_playing() {
            return Err(MemoryError::NotPlaying);
        }
        if card >= s.cards.len() {
            return Err(MemoryError::NoSuchCard { card });
        }
        if s.matched[card] {
            return Err(MemoryError::AlreadyMatched { card });
        }
        if s.face_up.len() == 2 {
            s.face_up.clear();
        }
        if s.face_up.contains(&card) {
            return Err(MemoryError::AlreadyFaceUp { card });
        }

        s.face_up.push(card);
        let symbol = s.cards[card];
        let first = match s.face_up.as_slice() {
            [first, _] => *first,
            _ => return Ok(Flip::First { symbol }),
        };

        s.attempts += 1;
        let first_symbol = s.cards[first];
        if first_symbol != symbol {
            return Ok(Flip::Mismatch {
                first: first_symbol,
                second: symbol,
            });
        }

        s.matched[first] = true;
        s.matched[card] = true;
        s.face_up.clear();
        s.pairs_found += 1;
        s.points += POINTS_PER_PAIR;

        if s.pairs_found == u32::from(PAIRS) {
            let bonus = s.round.time_left().unwrap_or(0) * 2;
            s.points += bonus;
            s.round.end();
            return Ok(Flip::Cleared { bonus });
        }
        Ok(Flip::Match { symbol })
    }

    fn deal(&mut self) {
        let mut cards: Vec<u8> = (0..PAIRS).flat_map(|s| [s, s]).collect();
        cards.shuffle(&mut self.rng);
        self.state.matched = vec![false; cards.len()];
        self.state.cards = cards;
    }
}

impl<R: Rng> GameUnit for MemoryUnit<R> {
    fn game_id(&self) -> GameId {
        GameId::Memory
    }

    fn phase(&self) -> Phase {
        self.state.round.phase()
    }

    fn start(&mut self) {
        self.state = MemoryState::default();
        self.state.round.begin(Some(MEMORY_SECONDS));
        self.deal();
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
        let metrics = Metrics::new()
            .with_count("attempts", s.attempts)
            .with_count("pairs_matched", s.pairs_found);
        Ok(UnitOutcome {
            score: s.points,
            metrics: Some(metrics),
        })
    }

    fn teardown(&mut self) {
        self.state.round.cancel();
    }
}

/// Why a flip was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryError {
    NotPlaying,
    NoSuchCard { card: usize },
    AlreadyMatched { card: usize },
    AlreadyFaceUp { card: usize },
}

impl core::fmt::Display for MemoryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MemoryError::NotPlaying => write!(f, "The game is not being played"),
            MemoryError::NoSuchCard { card } => write!(f, "There is no card {}", card),
            MemoryError::AlreadyMatched { card } => write!(f, "Card {} is already matched", card),
            MemoryError::AlreadyFaceUp { card } => write!(f, "Card {} is already face up", card),
        }
    }
}

impl std::error::Error for MemoryError {}
