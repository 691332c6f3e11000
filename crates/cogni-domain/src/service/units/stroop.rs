//! Stroop - Pick the ink colour, not the word

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameUnit, Phase, Round, UnitError, UnitOutcome};
use crate::model::countdown::Tick;
use crate::model::game::GameId;
use crate::model::metrics::Metrics;

/// Round length in seconds
pub const STROOP_SECONDS: u32 = 30;

/// Chance that a challenge is forced to show a word in a different ink
pub const MISMATCH_PROBABILITY: f64 = 0.7;

/// The five colours, used both as words and as inks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InkColor {
    Red,
    Blue,
    Green,
    Yellow,
    Orange,
}

impl InkColor {
    pub fn all() -> &'static [InkColor] {
        &[
            InkColor::Red,
            InkColor::Blue,
            InkColor::Green,
            InkColor::Yellow,
            InkColor::Orange,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InkColor::Red => "red",
            InkColor::Blue => "blue",
            InkColor::Green => "green",
            InkColor::Yellow => "yellow",
            InkColor::Orange => "orange",
        }
    }

    /// Case-insensitive lookup by name
    pub fn parse(name: &str) -> Option<InkColor> {
        let name = name.trim();
        InkColor::all()
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(name))
    }
}

/// A word printed in an ink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StroopChallenge {
    pub word: InkColor,
    pub ink: InkColor,
}

impl StroopChallenge {
    pub fn is_congruent(&self) -> bool {
        self.word == self.ink
    }
}

/// Persistable part of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StroopState {
    round: Round,
    challenge: Option<StroopChallenge>,
    correct: u32,
    incorrect: u32,
    streak: u32,
    best_streak: u32,
}

impl StroopState {
    pub fn is_consistent(&self) -> bool {
        self.round.is_consistent()
            && self.best_streak >= self.streak
            && self.correct >= self.best_streak
            && (self.round.phase() != Phase::Playing || self.challenge.is_some())
    }
}

impl Default for StroopState {
    fn default() -> Self {
        Self {
            round: Round::new(),
            challenge: None,
            correct: 0,
            incorrect: 0,
            streak: 0,
            best_streak: 0,
        }
    }
}

/// The Stroop game
#[derive(Debug)]
pub struct StroopUnit<R> {
    state: StroopState,
    rng: R,
}

impl<R: Rng> StroopUnit<R> {
    pub fn new(rng: R) -> Self {
        Self {
            state: StroopState::default(),
            rng,
        }
    }

    /// Resume from a saved state
    pub fn from_state(state: StroopState, rng: R) -> Self {
        let mut unit = Self { state, rng };
        if unit.state.round.is_playing() && unit.state.challenge.is_none() {
            unit.next_challenge();
        }
        unit
    }

    pub fn state(&self) -> &StroopState {
        &self.state
    }

    pub fn challenge(&self) -> Option<StroopChallenge> {
        self.state.challenge
    }

    pub fn streak(&self) -> u32 {
        self.state.streak
    }

    pub fn best_streak(&self) -> u32 {
        self.state.best_streak
    }

    /// Answer the current challenge; returns whether it was correct
    ///
    /// A new challenge is drawn after every answer.
    pub fn select(&mut self, color: InkColor) -> Result<bool, UnitError> {
        let challenge = match (self.state.round.is_playing(), self.state.challenge) {
            (true, Some(challenge)) => challenge,
            _ => return Err(UnitError::NotPlaying),
        };

        let correct = color == challenge.ink;
        let s = &mut self.state;
        if correct {
            s.correct += 1;
            s.streak += 1;
            s.best_streak = s.best_streak.max(s.streak);
        } else {
            s.incorrect += 1;
            s.streak = 0;
        }
        self.next_challenge();
        Ok(correct)
    }

    fn next_challenge(&mut self) {
        let count = InkColor::all().len();
        let word = self.rng.gen_range(0..count);
        let mut ink = self.rng.gen_range(0..count);
        let force_mismatch = self.rng.gen_bool(MISMATCH_PROBABILITY);
        if force_mismatch && word == ink {
            ink = (ink + 1) % count;
        }
        let colors = InkColor::all();
        self.state.challenge = Some(StroopChallenge {
            word: colors[word],
            ink: colors[ink],
        });
    }
}

impl<R: Rng> GameUnit for StroopUnit<R> {
    fn game_id(&self) -> GameId {
        GameId::Stroop
    }

    fn phase(&self) -> Phase {
        self.state.round.phase()
    }

    fn start(&mut self) {
        self.state = StroopState::default();
        self.state.round.begin(Some(STROOP_SECONDS));
        self.next_challenge();
    }

    fn tick(&mut self) -> Tick {
        self.state.round.tick()
    }

    fn time_left(&self) -> Option<u32> {
        self.state.round.time_left()
    }

    fn current_score(&self) -> u32 {
        self.state.correct
    }

    fn finish(&mut self) -> Result<UnitOutcome, UnitError> {
        self.state.round.claim_finish()?;
        let s = &self.state;
        let metrics = Metrics::new()
            .with_count("correct_responses", s.correct)
            .with_count("incorrect_responses", s.incorrect)
            .with_count("total_trials", s.correct + s.incorrect)
            .with_count("best_streak", s.best_streak);
        Ok(UnitOutcome {
            score: s.correct,
            metrics: Some(metrics),
        })
    }

    fn teardown(&mut self) {
        self.state.round.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::metrics::MetricValue;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started(seed: u64) -> StroopUnit<StdRng> {
        let mut unit = StroopUnit::new(StdRng::seed_from_u64(seed));
        unit.start();
        unit
    }

    fn answer(unit: &mut StroopUnit<StdRng>, correct: bool) {
        let ink = unit.challenge().unwrap().ink;
        let choice = if correct {
            ink
        } else {
            *InkColor::all().iter().find(|c| **c != ink).unwrap()
        };
        assert_eq!(unit.select(choice).unwrap(), correct);
    }

    #[test]
    fn test_scoring_and_streaks() {
        let mut unit = started(1);

        answer(&mut unit, true);
        answer(&mut unit, true);
        answer(&mut unit, true);
        answer(&mut unit, false);
        answer(&mut unit, true);

        assert_eq!(unit.current_score(), 4);
        assert_eq!(unit.streak(), 1);
        assert_eq!(unit.best_streak(), 3);
    }

    #[test]
    fn test_expiry_ends_round_once() {
        let mut unit = started(2);
        answer(&mut unit, true);

        let mut expiries = 0;
        for _ in 0..(STROOP_SECONDS + 10) {
            if unit.tick() == Tick::Expired {
                expiries += 1;
            }
        }
        assert_eq!(expiries, 1);
        assert!(unit.is_terminal());
        assert_eq!(unit.time_left(), Some(0));

        // Answers after the buzzer are ignored
        assert_eq!(unit.select(InkColor::Red), Err(UnitError::NotPlaying));

        let outcome = unit.finish().unwrap();
        assert_eq!(outcome.score, 1);
        let metrics = outcome.metrics.unwrap();
        assert_eq!(metrics.get("total_trials"), Some(&MetricValue::Integer(1)));
        assert_eq!(unit.finish(), Err(UnitError::AlreadyFinished));
    }

    #[test]
    fn test_no_answers_scores_zero() {
        let mut unit = started(3);
        while unit.tick() != Tick::Expired {}
        assert_eq!(unit.finish().unwrap().score, 0);
    }

    #[test]
    fn test_mostly_mismatched() {
        let mut unit = started(4);
        let trials = 2000;
        let mut congruent = 0;
        for _ in 0..trials {
            if unit.challenge().unwrap().is_congruent() {
                congruent += 1;
            }
            unit.select(InkColor::Red).unwrap();
        }
        // Only the unforced 30% can match, one time in five: about 6%
        assert!(congruent < trials / 8, "congruent = {}", congruent);
        assert!(congruent > 0);
    }

    #[test]
    fn test_start_resets_everything() {
        let mut unit = started(5);
        answer(&mut unit, true);
        unit.tick();

        unit.start();
        assert_eq!(unit.current_score(), 0);
        assert_eq!(unit.best_streak(), 0);
        assert_eq!(unit.time_left(), Some(STROOP_SECONDS));
    }

    #[test]
    fn test_restore_keeps_progress() {
        let mut unit = started(6);
        answer(&mut unit, true);
        unit.tick();

        let saved = unit.state().clone();
        let json = serde_json::to_string(&saved).unwrap();
        let loaded: StroopState = serde_json::from_str(&json).unwrap();
        assert!(loaded.is_consistent());

        let resumed = StroopUnit::from_state(loaded, StdRng::seed_from_u64(9));
        assert_eq!(resumed.current_score(), 1);
        assert_eq!(resumed.time_left(), Some(STROOP_SECONDS - 1));
        assert_eq!(resumed.challenge(), unit.challenge());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(InkColor::parse(" Green "), Some(InkColor::Green));
        assert_eq!(InkColor::parse("purple"), None);
    }
}
