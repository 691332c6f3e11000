//! Session - One user's run through the game sequence
//!
//! A Session is the aggregate root. Every mutation goes through a state
//! transition here, so the invariants hold at every observation point:
//!
//! - the stage only moves forward, one step at a time
//! - each game's score is written at most once
//! - `total_score` always equals the sum of the per-game scores
//! - user data is present from the first game until restart

use std::collections::BTreeMap;

use super::game::{GameId, Stage};
use super::metrics::Metrics;
use super::user::UserData;

/// The aggregate root
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    user: Option<UserData>,
    stage: Stage,
    scores: BTreeMap<GameId, u32>,
    metrics: BTreeMap<GameId, Metrics>,
    total_score: u32,
}

impl Session {
    /// A fresh session waiting at intake
    pub fn new() -> Self {
        let scores = GameId::all().iter().map(|g| (*g, 0)).collect();
        Self {
            user: None,
            stage: Stage::Intake,
            scores,
            metrics: BTreeMap::new(),
            total_score: 0,
        }
    }

    /// Rebuild a session from persisted parts
    ///
    /// Returns `None` when the parts contradict the invariants (a playing
    /// stage without a user, or a score recorded for a game not yet reached).
    /// The total is recomputed from the scores, which are the source of truth
    /// when loading.
    pub fn restore(
        user: Option<UserData>,
        stage: Stage,
        scores: BTreeMap<GameId, u32>,
        metrics: BTreeMap<GameId, Metrics>,
    ) -> Option<Self> {
        if stage != Stage::Intake && user.is_none() {
            return None;
        }
        let mut session = Self::new();
        for (game, score) in scores {
            if score > 0 && Stage::Playing(game) >= stage {
                return None;
            }
            session.scores.insert(game, score);
        }
        for game in metrics.keys() {
            if Stage::Playing(*game) >= stage {
                return None;
            }
        }
        session.total_score = session.scores.values().sum();
        session.user = user;
        session.stage = stage;
        session.metrics = metrics;
        Some(session)
    }

    // ========== Getters ==========

    pub fn user(&self) -> Option<&UserData> {
        self.user.as_ref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn current_game(&self) -> Option<GameId> {
        self.stage.game()
    }

    pub fn score(&self, game: GameId) -> u32 {
        self.scores.get(&game).copied().unwrap_or(0)
    }

    pub fn scores(&self) -> &BTreeMap<GameId, u32> {
        &self.scores
    }

    pub fn metrics(&self) -> &BTreeMap<GameId, Metrics> {
        &self.metrics
    }

    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    pub fn is_complete(&self) -> bool {
        self.stage.is_complete()
    }

    // ========== State Transitions ==========

    /// Record intake data and move to the first game
    pub fn begin(&mut self, user: UserData) -> Result<Stage, SessionError> {
        match self.stage {
            Stage::Intake => {
                self.user = Some(user);
                self.stage = Stage::FIRST_GAME;
                Ok(self.stage)
            }
            _ => Err(SessionError::InvalidStateTransition {
                from: self.stage,
                to: Stage::FIRST_GAME,
            }),
        }
    }

    /// Record the result of the current game and advance
    ///
    /// Rejected without mutation when `game` is not the current game.
    pub fn record(
        &mut self,
        game: GameId,
        score: u32,
        metrics: Option<Metrics>,
    ) -> Result<Stage, SessionError> {
        if self.stage != Stage::Playing(game) {
            return Err(SessionError::NotCurrentGame {
                expected: self.stage,
                got: game,
            });
        }
        let total = self
            .total_score
            .checked_add(score)
            .ok_or(SessionError::ScoreOverflow { game, score })?;

        self.scores.insert(game, score);
        self.total_score = total;
        if let Some(metrics) = metrics {
            self.metrics.insert(game, metrics);
        }
        self.stage = self.stage.next();
        Ok(self.stage)
    }

    /// Reset every field to its default
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur during Session operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    InvalidStateTransition { from: Stage, to: Stage },
    NotCurrentGame { expected: Stage, got: GameId },
    ScoreOverflow { game: GameId, score: u32 },
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::InvalidStateTransition { from, to } => {
                write!(f, "Invalid state transition from {} to {}", from, to)
            }
            SessionError::NotCurrentGame { expected, got } => {
                write!(f, "Cannot complete '{}' while the session is at '{}'", got, expected)
            }
            SessionError::ScoreOverflow { game, score } => {
                write!(f, "Score {} for '{}' overflows the session total", score, game)
            }
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::user::Education;

    fn alex() -> UserData {
        UserData::new("Alex", 24, Education::Bachelors).unwrap()
    }

    fn sum(session: &Session) -> u32 {
        session.scores().values().sum()
    }

    #[test]
    fn test_session_lifecycle() {
        let mut session = Session::new();
        assert_eq!(session.stage(), Stage::Intake);
        assert_eq!(session.scores().len(), 6);

        session.begin(alex()).unwrap();
        assert_eq!(session.current_game(), Some(GameId::Stroop));

        for (i, game) in GameId::all().iter().enumerate() {
            session.record(*game, (i as u32 + 1) * 10, None).unwrap();
            assert_eq!(session.total_score(), sum(&session));
        }

        assert!(session.is_complete());
        assert_eq!(session.total_score(), 210);
        assert!(session.user().is_some());
    }

    #[test]
    fn test_wrong_game_does_not_mutate() {
        let mut session = Session::new();
        session.begin(alex()).unwrap();
        let before = session.clone();

        let result = session.record(GameId::Maze, 1000, Some(Metrics::new().with_count("moves", 3)));
        assert_eq!(
            result,
            Err(SessionError::NotCurrentGame {
                expected: Stage::Playing(GameId::Stroop),
                got: GameId::Maze,
            })
        );
        assert_eq!(session, before);
    }

    #[test]
    fn test_record_before_intake_rejected() {
        let mut session = Session::new();
        assert!(session.record(GameId::Stroop, 5, None).is_err());
        assert_eq!(session.total_score(), 0);
    }

    #[test]
    fn test_game_cannot_be_recorded_twice() {
        let mut session = Session::new();
        session.begin(alex()).unwrap();
        session.record(GameId::Stroop, 5, None).unwrap();

        assert!(session.record(GameId::Stroop, 50, None).is_err());
        assert_eq!(session.score(GameId::Stroop), 5);
        assert_eq!(session.total_score(), 5);
    }

    #[test]
    fn test_begin_twice_rejected() {
        let mut session = Session::new();
        session.begin(alex()).unwrap();
        assert!(matches!(
            session.begin(alex()),
            Err(SessionError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_overflow_rejected_without_mutation() {
        let mut session = Session::new();
        session.begin(alex()).unwrap();
        session.record(GameId::Stroop, u32::MAX, None).unwrap();
        let before = session.clone();

        assert!(matches!(
            session.record(GameId::Hanoi, 1, None),
            Err(SessionError::ScoreOverflow { .. })
        ));
        assert_eq!(session, before);
    }

    #[test]
    fn test_reset() {
        let mut session = Session::new();
        session.begin(alex()).unwrap();
        session
            .record(GameId::Stroop, 12, Some(Metrics::new().with_count("correct", 12)))
            .unwrap();

        session.reset();
        assert_eq!(session, Session::new());
        assert!(session.user().is_none());
        assert!(session.metrics().is_empty());
    }

    #[test]
    fn test_restore_recomputes_total() {
        let mut scores = BTreeMap::new();
        scores.insert(GameId::Stroop, 7);
        scores.insert(GameId::Hanoi, 180);

        let session = Session::restore(
            Some(alex()),
            Stage::Playing(GameId::Pattern),
            scores,
            BTreeMap::new(),
        )
        .unwrap();
        assert_eq!(session.total_score(), 187);
        assert_eq!(session.score(GameId::Maze), 0);
    }

    #[test]
    fn test_restore_rejects_contradictions() {
        // Playing without a user
        assert!(Session::restore(
            None,
            Stage::Playing(GameId::Hanoi),
            BTreeMap::new(),
            BTreeMap::new()
        )
        .is_none());

        // Score for a game that has not been reached
        let mut scores = BTreeMap::new();
        scores.insert(GameId::Word, 300);
        assert!(Session::restore(
            Some(alex()),
            Stage::Playing(GameId::Hanoi),
            scores,
            BTreeMap::new()
        )
        .is_none());
    }
}
