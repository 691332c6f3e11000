//! Session Orchestrator - Runs a session through the six games
//!
//! The orchestrator owns the [`Session`] aggregate and the injected
//! [`SessionStore`]. Every accepted transition is written through to the
//! store right away, so a restarted process resumes where it left off.
//!
//! ```text
//! load ─▶ start(user) ─▶ complete(stroop) ─▶ … ─▶ complete(word) ─▶ Complete
//!   ▲                                                                 │
//!   └──────────────────────────── restart ◀──────────────────────────┘
//! ```
//!
//! Storage is best effort. A failed read is treated as an absent key, a
//! malformed value is discarded, and a failed write marks the orchestrator
//! as degraded. None of these ever reject a transition.

use std::collections::BTreeMap;

use cogni_domain::model::game::{GameId, Stage};
use cogni_domain::model::metrics::Metrics;
use cogni_domain::model::session::{Session, SessionError};
use cogni_domain::model::user::UserData;
use cogni_domain::repository::session_store::SessionStore;
use cogni_domain::service::maze_generator::MazeGenerator;
use cogni_domain::service::units::{AnyUnit, GameUnit, Phase, UnitError};
use rand::Rng;
use shared::error::MalformedStateError;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::persistence::{self, UnitState};
use crate::persistence::{KEY_CURRENT_GAME, KEY_GAME_SCORES, KEY_METRICS, KEY_TOTAL_SCORE, KEY_USER_DATA};

/// Contract violations reported to the caller
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Unit(#[from] UnitError),
}

/// What an accepted transition did
///
/// Returned for logging and for the host to decide what to show next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Intake accepted, first game is up
    Started { name: String, first: Stage },
    /// A game was scored and the session moved on
    GameCompleted { game: GameId, score: u32, next: Stage },
    /// Everything wiped
    Restarted,
}

/// Read-only view of the session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub user: Option<UserData>,
    pub scores: BTreeMap<GameId, u32>,
    pub metrics: BTreeMap<GameId, Metrics>,
    pub total_score: u32,
    pub degraded: bool,
}

/// The session state machine bound to a store
#[derive(Debug)]
pub struct SessionOrchestrator<S: SessionStore> {
    store: S,
    session: Session,
    degraded: bool,
    discarded: Vec<&'static str>,
}

impl<S: SessionStore> SessionOrchestrator<S> {
    /// A fresh session that ignores whatever the store holds
    pub fn new(store: S) -> Self {
        Self {
            store,
            session: Session::new(),
            degraded: false,
            discarded: Vec::new(),
        }
    }

    /// Restore the session persisted in `store`
    ///
    /// Keys that fail to decode are removed and replaced by defaults. If the
    /// surviving parts contradict each other (a playing stage without a user,
    /// scores for games not reached yet) the whole session starts fresh.
    pub fn load(store: S) -> Self {
        let mut this = Self::new(store);

        let stage = this
            .read(KEY_CURRENT_GAME, persistence::decode_stage)
            .unwrap_or_default();
        let user = this.read(KEY_USER_DATA, persistence::decode_user);
        let scores = this
            .read(KEY_GAME_SCORES, persistence::decode_scores)
            .unwrap_or_default();
        let metrics = this
            .read(KEY_METRICS, persistence::decode_metrics)
            .unwrap_or_default();
        let total = this.read(KEY_TOTAL_SCORE, persistence::decode_total);

        if stage == Stage::Intake {
            this.drop_intake_leftovers(user.is_some());
        }
        let user = if stage == Stage::Intake { None } else { user };
        match Session::restore(user, stage, scores, metrics) {
            Some(session) => {
                let stale_total = total.is_some_and(|t| t != session.total_score());
                if stale_total {
                    warn!(
                        stored = total,
                        computed = session.total_score(),
                        "Stored total disagrees with the scores, using the sum"
                    );
                }
                this.session = session;
                if stale_total || !this.discarded.is_empty() {
                    this.persist();
                }
                info!(stage = %this.session.stage(), total = this.session.total_score(), "Session restored");
            }
            None => {
                warn!(stage = %stage, "Persisted session is inconsistent, starting fresh");
                this.clear_store();
            }
        }
        this
    }

    // ========== Getters ==========

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    /// True once any storage operation has failed
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Keys thrown away while loading
    pub fn discarded_keys(&self) -> &[&'static str] {
        &self.discarded
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.session.stage(),
            user: self.session.user().cloned(),
            scores: self.session.scores().clone(),
            metrics: self.session.metrics().clone(),
            total_score: self.session.total_score(),
            degraded: self.degraded,
        }
    }

    // ========== Transitions ==========

    /// Accept intake data and move to the first game
    ///
    /// Rejected once a session is already under way; restart first.
    pub fn start(&mut self, user: UserData) -> Result<SessionEvent, OrchestratorError> {
        let name = user.name().to_string();
        let first = self.session.begin(user)?;
        self.persist();
        info!(user = %name, first = %first, "Session started");
        Ok(SessionEvent::Started { name, first })
    }

    /// Record the result of the current game and advance
    ///
    /// A `game` other than the current one is rejected and nothing changes.
    pub fn complete_current(
        &mut self,
        game: GameId,
        score: u32,
        metrics: Option<Metrics>,
    ) -> Result<SessionEvent, OrchestratorError> {
        let next = self.session.record(game, score, metrics)?;
        self.erase(persistence::working_state_key(game));
        self.persist();

        info!(game = %game, score, next = %next, "Game completed");
        if next.is_complete() {
            info!(total = self.session.total_score(), "Session complete");
        }
        Ok(SessionEvent::GameCompleted { game, score, next })
    }

    /// Take the outcome of a finished unit and advance
    ///
    /// The unit is only asked for its outcome when it is the current game,
    /// so a rejected call leaves it untouched.
    pub fn complete_unit(&mut self, unit: &mut dyn GameUnit) -> Result<SessionEvent, OrchestratorError> {
        let game = unit.game_id();
        if self.session.current_game() != Some(game) {
            return Err(SessionError::NotCurrentGame {
                expected: self.session.stage(),
                got: game,
            }
            .into());
        }
        let outcome = unit.finish()?;
        self.complete_current(game, outcome.score, outcome.metrics)
    }

    /// Back to intake with every persisted key removed
    pub fn restart(&mut self) -> SessionEvent {
        self.session.reset();
        self.clear_store();
        info!("Session restarted");
        SessionEvent::Restarted
    }

    // ========== Working State ==========

    /// The unit for the current game
    ///
    /// Resumes from saved working state when there is a usable one,
    /// otherwise starts a new round. `None` outside the playing stages.
    /// A resumed unit may already be over (it expired before its result was
    /// recorded); the host hands it straight to [`Self::complete_unit`].
    pub fn activate_unit<R: Rng>(&mut self, rng: R, generator: MazeGenerator) -> Option<AnyUnit<R>> {
        let game = self.session.current_game()?;
        if let Some(state) = self.saved_unit_state(game, generator) {
            let unit = state.into_unit(rng, generator);
            if unit.as_unit().phase() != Phase::Ready {
                debug!(game = %game, "Resuming saved game");
                return Some(unit);
            }
            let mut unit = unit;
            unit.as_unit_mut().start();
            self.save_working_state(&unit);
            return Some(unit);
        }

        let mut unit = AnyUnit::new(game, rng, generator);
        unit.as_unit_mut().start();
        self.save_working_state(&unit);
        debug!(game = %game, "Started new game");
        Some(unit)
    }

    /// Persist the in-progress state of the current game's unit
    pub fn save_working_state<R: Rng>(&mut self, unit: &AnyUnit<R>) {
        let game = unit.game_id();
        if self.session.current_game() != Some(game) {
            debug!(game = %game, "Ignoring working state for a game that is not current");
            return;
        }
        let key = persistence::working_state_key(game);
        let encoded = persistence::encode_unit(unit);
        self.write_encoded(key, encoded);
    }

    fn saved_unit_state(&mut self, game: GameId, generator: MazeGenerator) -> Option<UnitState> {
        let key = persistence::working_state_key(game);
        self.read(key, |raw| UnitState::decode(game, raw, generator))
    }

    // ========== Store Access ==========

    fn read<T>(
        &mut self,
        key: &'static str,
        decode: impl FnOnce(&str) -> Result<T, MalformedStateError>,
    ) -> Option<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Could not read persisted value");
                self.degraded = true;
                return None;
            }
        };
        match decode(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(error = %e, "Discarding malformed persisted value");
                self.discarded.push(key);
                self.erase(key);
                None
            }
        }
    }

    fn persist(&mut self) {
        let stage = persistence::encode_stage(self.session.stage());
        self.write(KEY_CURRENT_GAME, &stage);

        let total = persistence::encode_total(self.session.total_score());
        self.write(KEY_TOTAL_SCORE, &total);

        let scores = persistence::encode_json(KEY_GAME_SCORES, self.session.scores());
        self.write_encoded(KEY_GAME_SCORES, scores);

        match self.session.user() {
            Some(user) => {
                let user = persistence::encode_json(KEY_USER_DATA, user);
                self.write_encoded(KEY_USER_DATA, user);
            }
            None => self.erase(KEY_USER_DATA),
        }

        if self.session.metrics().is_empty() {
            self.erase(KEY_METRICS);
        } else {
            let metrics = persistence::encode_json(KEY_METRICS, self.session.metrics());
            self.write_encoded(KEY_METRICS, metrics);
        }
    }

    fn write_encoded(&mut self, key: &str, encoded: Result<String, MalformedStateError>) {
        match encoded {
            Ok(value) => self.write(key, &value),
            Err(e) => {
                warn!(error = %e, "Could not encode value");
                self.degraded = true;
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "Could not persist value, continuing in memory");
            self.degraded = true;
        }
    }

    fn erase(&mut self, key: &str) {
        if let Err(e) = self.store.remove(key) {
            warn!(key, error = %e, "Could not remove persisted value");
            self.degraded = true;
        }
    }

    /// Nothing but the stage may be stored before intake
    fn drop_intake_leftovers(&mut self, had_user: bool) {
        if had_user {
            debug!("Dropping user data stored before intake");
            self.erase(KEY_USER_DATA);
        }
        for game in GameId::all() {
            let key = persistence::working_state_key(*game);
            if matches!(self.store.contains(key), Ok(true)) {
                debug!(key, "Dropping working state stored before intake");
                self.erase(key);
            }
        }
    }

    fn clear_store(&mut self) {
        for key in persistence::all_keys() {
            self.erase(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogni_domain::model::metrics::MetricValue;
    use cogni_domain::model::user::Education;
    use cogni_domain::repository::session_store::StoreError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    /// Plain map store; `fail_writes` simulates a full or locked disk
    #[derive(Debug, Default)]
    struct MapStore {
        values: HashMap<String, String>,
        fail_writes: bool,
    }

    impl SessionStore for MapStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            Ok(self.values.get(key).cloned())
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
            if self.fail_writes {
                return Err(StoreError::WriteError {
                    key: key.to_string(),
                    message: "disk full".to_string(),
                });
            }
            self.values.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.values.remove(key);
            Ok(())
        }
    }

    fn alex() -> UserData {
        UserData::new("Alex", 24, Education::Bachelors).unwrap()
    }

    fn generator() -> MazeGenerator {
        MazeGenerator::new(9).unwrap()
    }

    #[test]
    fn test_start_persists_session() {
        let mut orch = SessionOrchestrator::load(MapStore::default());
        assert_eq!(orch.stage(), Stage::Intake);

        let event = orch.start(alex()).unwrap();
        assert_eq!(
            event,
            SessionEvent::Started {
                name: "Alex".to_string(),
                first: Stage::Playing(GameId::Stroop)
            }
        );
        let store = orch.store();
        assert_eq!(store.values[KEY_CURRENT_GAME], "stroop");
        assert_eq!(store.values[KEY_TOTAL_SCORE], "0");
        assert!(store.values[KEY_USER_DATA].contains("\"Alex\""));
        assert!(!store.values.contains_key(KEY_METRICS));
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        orch.start(alex()).unwrap();
        let err = orch.start(alex()).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Session(SessionError::InvalidStateTransition { .. })
        ));
    }

    #[test]
    fn test_wrong_game_rejected_without_mutation() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        orch.start(alex()).unwrap();
        let before = orch.snapshot();

        let err = orch.complete_current(GameId::Maze, 1000, None).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::Session(SessionError::NotCurrentGame { .. })
        ));
        assert_eq!(orch.snapshot(), before);
    }

    #[test]
    fn test_complete_unit_checks_game_before_finishing() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        orch.start(alex()).unwrap();

        let mut hanoi = AnyUnit::new(GameId::Hanoi, StdRng::seed_from_u64(1), generator());
        hanoi.as_unit_mut().start();
        while hanoi.as_unit_mut().tick() != cogni_domain::Tick::Expired {}

        assert!(orch.complete_unit(hanoi.as_unit_mut()).is_err());
        // Still claimable once it is Hanoi's turn
        orch.complete_current(GameId::Stroop, 3, None).unwrap();
        let event = orch.complete_unit(hanoi.as_unit_mut()).unwrap();
        assert!(matches!(event, SessionEvent::GameCompleted { game: GameId::Hanoi, .. }));
    }

    #[test]
    fn test_unfinished_unit_rejected() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        orch.start(alex()).unwrap();
        let mut unit = orch.activate_unit(StdRng::seed_from_u64(2), generator()).unwrap();

        let err = orch.complete_unit(unit.as_unit_mut()).unwrap_err();
        assert!(matches!(err, OrchestratorError::Unit(UnitError::NotTerminal)));
        assert_eq!(orch.stage(), Stage::Playing(GameId::Stroop));
    }

    #[test]
    fn test_write_failures_degrade_but_do_not_block() {
        let store = MapStore {
            fail_writes: true,
            ..MapStore::default()
        };
        let mut orch = SessionOrchestrator::load(store);
        orch.start(alex()).unwrap();
        orch.complete_current(GameId::Stroop, 5, None).unwrap();

        assert!(orch.is_degraded());
        assert_eq!(orch.stage(), Stage::Playing(GameId::Hanoi));
        assert_eq!(orch.session().total_score(), 5);
    }

    #[test]
    fn test_load_discards_malformed_keys() {
        let mut store = MapStore::default();
        store.values.insert(KEY_CURRENT_GAME.into(), "hanoi".into());
        store.values.insert(
            KEY_USER_DATA.into(),
            r#"{"name":"Alex","age":24,"education":"bachelors"}"#.into(),
        );
        store.values.insert(KEY_GAME_SCORES.into(), r#"{"stroop":5}"#.into());
        store.values.insert(KEY_TOTAL_SCORE.into(), "5".into());
        store.values.insert(KEY_METRICS.into(), "{not json".into());

        let orch = SessionOrchestrator::load(store);
        assert_eq!(orch.discarded_keys(), &[KEY_METRICS]);
        assert_eq!(orch.stage(), Stage::Playing(GameId::Hanoi));
        assert_eq!(orch.session().score(GameId::Stroop), 5);
        assert!(orch.session().metrics().is_empty());
        assert!(!orch.store().values.contains_key(KEY_METRICS));
    }

    #[test]
    fn test_load_recomputes_stale_total() {
        let mut store = MapStore::default();
        store.values.insert(KEY_CURRENT_GAME.into(), "pattern".into());
        store.values.insert(
            KEY_USER_DATA.into(),
            r#"{"name":"Alex","age":24,"education":"phd"}"#.into(),
        );
        store
            .values
            .insert(KEY_GAME_SCORES.into(), r#"{"stroop":5,"hanoi":180}"#.into());
        store.values.insert(KEY_TOTAL_SCORE.into(), "999".into());

        let orch = SessionOrchestrator::load(store);
        assert_eq!(orch.session().total_score(), 185);
        assert_eq!(orch.store().values[KEY_TOTAL_SCORE], "185");
    }

    #[test]
    fn test_playing_without_user_starts_fresh() {
        let mut store = MapStore::default();
        store.values.insert(KEY_CURRENT_GAME.into(), "memory".into());
        store.values.insert(KEY_TOTAL_SCORE.into(), "0".into());
        store.values.insert("memory_state".into(), "{}".into());

        let orch = SessionOrchestrator::load(store);
        assert_eq!(orch.stage(), Stage::Intake);
        assert!(orch.store().values.is_empty());
    }

    #[test]
    fn test_working_state_resumes_and_clears() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        orch.start(alex()).unwrap();

        let mut unit = orch.activate_unit(StdRng::seed_from_u64(3), generator()).unwrap();
        unit.as_unit_mut().tick();
        unit.as_unit_mut().tick();
        orch.save_working_state(&unit);
        assert!(orch.store().values.contains_key("stroop_state"));

        // Simulated reload
        let mut orch = SessionOrchestrator::load(orch.into_store());
        let mut resumed = orch.activate_unit(StdRng::seed_from_u64(4), generator()).unwrap();
        assert_eq!(resumed.as_unit().time_left(), Some(28));

        while resumed.as_unit_mut().tick() != cogni_domain::Tick::Expired {}
        orch.complete_unit(resumed.as_unit_mut()).unwrap();
        assert!(!orch.store().values.contains_key("stroop_state"));

        let metrics = &orch.session().metrics()[&GameId::Stroop];
        assert_eq!(metrics.get("total_trials"), Some(&MetricValue::Integer(0)));
    }

    #[test]
    fn test_load_at_intake_erases_user_and_working_state() {
        let mut store = MapStore::default();
        store.values.insert(KEY_CURRENT_GAME.into(), "form".into());
        store.values.insert(
            KEY_USER_DATA.into(),
            r#"{"name":"Alex","age":24,"education":"bachelors"}"#.into(),
        );
        store.values.insert(KEY_TOTAL_SCORE.into(), "0".into());
        store.values.insert("hanoi_state".into(), "{}".into());

        let orch = SessionOrchestrator::load(store);
        assert_eq!(orch.stage(), Stage::Intake);
        assert!(orch.session().user().is_none());
        assert!(!orch.store().values.contains_key(KEY_USER_DATA));
        assert!(!orch.store().values.contains_key("hanoi_state"));
        assert_eq!(orch.store().values[KEY_CURRENT_GAME], "form");
    }

    #[test]
    fn test_expired_unit_saved_before_recording_resumes_over() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        orch.start(alex()).unwrap();
        let mut unit = orch.activate_unit(StdRng::seed_from_u64(7), generator()).unwrap();
        while unit.as_unit_mut().tick() != cogni_domain::Tick::Expired {}
        orch.save_working_state(&unit);

        // Reload as if the process stopped before the result was taken
        let mut orch = SessionOrchestrator::load(orch.into_store());
        let mut resumed = orch.activate_unit(StdRng::seed_from_u64(8), generator()).unwrap();
        assert!(resumed.as_unit().is_terminal());

        let event = orch.complete_unit(resumed.as_unit_mut()).unwrap();
        assert!(matches!(event, SessionEvent::GameCompleted { game: GameId::Stroop, .. }));
        assert_eq!(orch.stage(), Stage::Playing(GameId::Hanoi));
        assert!(!orch.store().values.contains_key("stroop_state"));
    }

    #[test]
    fn test_corrupt_working_state_starts_new_round() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        orch.start(alex()).unwrap();
        orch.store.values.insert("stroop_state".into(), "[1,2,3]".into());

        let unit = orch.activate_unit(StdRng::seed_from_u64(5), generator()).unwrap();
        assert_eq!(unit.as_unit().phase(), Phase::Playing);
        assert_eq!(unit.as_unit().time_left(), Some(30));
        assert!(orch.discarded_keys().contains(&"stroop_state"));
    }

    #[test]
    fn test_no_unit_outside_playing() {
        let mut orch = SessionOrchestrator::new(MapStore::default());
        assert!(orch.activate_unit(StdRng::seed_from_u64(6), generator()).is_none());
    }
}
