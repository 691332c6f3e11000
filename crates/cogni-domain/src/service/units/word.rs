//! Word Scramble - Unscramble as many words as possible in a minute

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{GameUnit, Phase, Round, UnitError, UnitOutcome};
use crate::model::countdown::Tick;
use crate::model::game::GameId;
use crate::model::metrics::Metrics;

/// Round length in seconds
pub const WORD_SECONDS: u32 = 60;

/// Points per solved word
pub const POINTS_PER_WORD: u32 = 100;

/// Words the puzzle draws from
pub const WORDS: [&str; 10] = [
    "COGNITIVE",
    "PUZZLE",
    "BRAIN",
    "MEMORY",
    "CHALLENGE",
    "INTELLIGENCE",
    "LEARNING",
    "KNOWLEDGE",
    "THINKING",
    "PROBLEM",
];

/// Shuffle the letters of `word`
pub fn shuffle_word<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let mut letters: Vec<char> = word.chars().collect();
    letters.shuffle(rng);
    letters.into_iter().collect()
}

/// Persistable part of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordState {
    round: Round,
    current_word: Option<String>,
    scrambled: Option<String>,
    solved: u32,
    attempts: u32,
}

impl WordState {
    pub fn is_consistent(&self) -> bool {
        let same_letters = match (&self.current_word, &self.scrambled) {
            (Some(word), Some(scrambled)) => {
                let mut a: Vec<char> = word.chars().collect();
                let mut b: Vec<char> = scrambled.chars().collect();
                a.sort_unstable();
                b.sort_unstable();
                a == b
            }
            (None, None) => true,
            _ => false,
        };
        self.round.is_consistent()
            && same_letters
            && self.solved <= self.attempts
            && (self.round.phase() != Phase::Playing || self.current_word.is_some())
    }
}

impl Default for WordState {
    fn default() -> Self {
        Self {
            round: Round::new(),
            current_word: None,
            scrambled: None,
            solved: 0,
            attempts: 0,
        }
    }
}

/// The word unscrambling game
#[derive(Debug)]
pub struct WordUnit<R> {
    state: WordState,
    rng: R,
}

impl<R: Rng> WordUnit<R> {
    pub fn new(rng: R) -> Self {
        Self {
            state: WordState::default(),
            rng,
        }
    }

    pub fn from_state(state: WordState, rng: R) -> Self {
        Self { state, rng }
    }

    pub fn state(&self) -> &WordState {
        &self.state
    }

    /// The word the player is looking for
    pub fn current_word(&self) -> Option<&str> {
        self.state.current_word.as_deref()
    }

    /// The letters as shown to the player
    pub fn scrambled(&self) -> Option<&str> {
        self.state.scrambled.as_deref()
    }

    pub fn solved(&self) -> u32 {
        self.state.solved
    }

    /// Submit a guess; a correct one scores and moves to a fresh word
    pub fn guess(&mut self, input: &str) -> Result<bool, UnitError> {
        if !self.state.round.is_playing() {
            return Err(UnitError::NotPlaying);
        }
        let Some(word) = self.state.current_word.as_deref() else {
            return Err(UnitError::NotPlaying);
        };

        let correct = input.trim().eq_ignore_ascii_case(word);
        self.state.attempts += 1;
        if correct {
            self.state.solved += 1;
            self.next_word();
        }
        Ok(correct)
    }

    fn next_word(&mut self) {
        let word = WORDS[self.rng.gen_range(0..WORDS.len())];
        self.state.scrambled = Some(shuffle_word(word, &mut self.rng));
        self.state.current_word = Some(word.to_string());
    }
}

impl<R: Rng> GameUnit for WordUnit<R> {
    fn game_id(&self) -> GameId {
        GameId::Word
    }

    fn phase(&self) -> Phase {
        self.state.round.phase()
    }

    fn start(&mut self) {
        self.state = WordState::default();
        self.state.round.begin(Some(WORD_SECONDS));
        self.next_word();
    }

    fn tick(&mut self) -> Tick {
        self.state.round.tick()
    }

    fn time_left(&self) -> Option<u32> {
        self.state.round.time_left()
    }

    fn current_score(&self) -> u32 {
        self.state.solved * POINTS_PER_WORD
    }

    fn finish(&mut self) -> Result<UnitOutcome, UnitError> {
        self.state.round.claim_finish()?;
        let metrics = Metrics::new()
            .with_count("words_solved", self.state.solved)
            .with_count("attempts", self.state.attempts);
        Ok(UnitOutcome {
            score: self.current_score(),
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
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn started(seed: u64) -> WordUnit<StdRng> {
        let mut unit = WordUnit::new(StdRng::seed_from_u64(seed));
        unit.start();
        unit
    }

    fn sorted(word: &str) -> Vec<char> {
        let mut letters: Vec<char> = word.chars().collect();
        letters.sort_unstable();
        letters
    }

    #[test]
    fn test_shuffle_keeps_letters() {
        let mut rng = StdRng::seed_from_u64(1);
        for word in WORDS {
            for _ in 0..20 {
                let shuffled = shuffle_word(word, &mut rng);
                assert_eq!(sorted(&shuffled), sorted(word));
            }
        }
    }

    #[test]
    fn test_correct_guess_case_insensitive() {
        let mut unit = started(2);
        let word = unit.current_word().unwrap().to_lowercase();
        assert_eq!(unit.guess(&format!("  {}\n", word)), Ok(true));
        assert_eq!(unit.current_score(), 100);
        assert!(WORDS.contains(&unit.current_word().unwrap()));
    }

    #[test]
    fn test_wrong_guess_keeps_word() {
        let mut unit = started(3);
        let word = unit.current_word().unwrap().to_string();
        let scrambled = unit.scrambled().unwrap().to_string();

        assert_eq!(unit.guess("definitely not it"), Ok(false));
        assert_eq!(unit.guess(""), Ok(false));
        assert_eq!(unit.current_word(), Some(word.as_str()));
        assert_eq!(unit.scrambled(), Some(scrambled.as_str()));
        assert_eq!(unit.current_score(), 0);
    }

    #[test]
    fn test_expiry_reports_metrics() {
        let mut unit = started(4);
        let word = unit.current_word().unwrap().to_string();
        unit.guess("nope").unwrap();
        unit.guess(&word).unwrap();
        while unit.tick() != Tick::Expired {}

        assert_eq!(unit.guess("late"), Err(UnitError::NotPlaying));
        let outcome = unit.finish().unwrap();
        assert_eq!(outcome.score, 100);
        let metrics = outcome.metrics.unwrap();
        assert_eq!(
            metrics.get("attempts"),
            Some(&crate::model::metrics::MetricValue::Integer(2))
        );
    }

    #[test]
    fn test_state_consistency() {
        let unit = started(5);
        assert!(unit.state().is_consistent());

        let mut broken = unit.state().clone();
        broken.scrambled = Some("XYZ".to_string());
        assert!(!broken.is_consistent());
    }
}
