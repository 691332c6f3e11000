//! Interactive play mode
//!
//! One line of input is one move. A one-second ticker drives the game
//! clocks while the player thinks, so both are multiplexed in a single
//! `select!` loop. Lines starting with `/` are session commands.

use std::time::Duration;

use cogni_domain::{AnyUnit, GameId, MazeGenerator, Report, SessionStore, Stage, Tick};
use cogni_usecase::{SessionEvent, SessionOrchestrator};
use console::style;
use rand::rngs::StdRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::context::RngSource;
use crate::input;
use crate::intake;
use crate::render;

/// Seconds the pattern stays on screen before it is hidden
const PATTERN_REVEAL_SECONDS: u8 = 3;

/// Time warnings for timed games
const WARN_AT: [u32; 2] = [10, 5];

/// What the caller should do after a line was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Restart,
    Quit,
}

/// Interactive session bound to a store
pub struct InteractiveSession<S: SessionStore> {
    orch: SessionOrchestrator<S>,
    generator: MazeGenerator,
    rngs: RngSource,
    unit: Option<AnyUnit<StdRng>>,
    reveal_left: u8,
}

impl<S: SessionStore> InteractiveSession<S> {
    pub fn new(orch: SessionOrchestrator<S>, generator: MazeGenerator, rngs: RngSource) -> Self {
        Self {
            orch,
            generator,
            rngs,
            unit: None,
            reveal_left: 0,
        }
    }

    #[cfg(test)]
    fn orchestrator(&self) -> &SessionOrchestrator<S> {
        &self.orch
    }

    #[cfg(test)]
    fn unit(&self) -> Option<&AnyUnit<StdRng>> {
        self.unit.as_ref()
    }

    /// Run until the player quits or input ends
    pub async fn run(&mut self) -> anyhow::Result<()> {
        println!("{}", style("Cognitive Games").bold());
        println!("Type /help for commands, /quit to leave (progress is kept)");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            if self.orch.stage() == Stage::Intake {
                let user = intake::prompt_user()?;
                self.begin(user)?;
            } else if self.unit.is_none() {
                self.activate();
            }

            match self.drive(&mut lines).await? {
                Control::Quit => break,
                Control::Restart | Control::Continue => continue,
            }
        }

        self.shutdown();
        Ok(())
    }

    /// The select loop for everything after intake
    async fn drive<R>(&mut self, lines: &mut tokio::io::Lines<R>) -> anyhow::Result<Control>
    where
        R: tokio::io::AsyncBufRead + Unpin,
    {
        let mut ticker = interval(Duration::from_secs(1));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => self.on_tick(),
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        debug!("Input closed");
                        return Ok(Control::Quit);
                    };
                    match self.handle_line(&line)? {
                        Control::Continue => {}
                        other => return Ok(other),
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    return Ok(Control::Quit);
                }
            }
        }
    }

    // ========== Session Steps ==========

    fn begin(&mut self, user: cogni_domain::UserData) -> anyhow::Result<()> {
        if let SessionEvent::Started { name, .. } = self.orch.start(user)? {
            println!("\nWelcome, {}! Six short games are ahead.", style(name).bold());
        }
        self.activate();
        Ok(())
    }

    /// Bring up the current game, or the report once all are done
    fn activate(&mut self) {
        let rng = self.rngs.next_rng();
        self.unit = self.orch.activate_unit(rng, self.generator);
        // Ran out before the last run could record it
        if let Some(unit) = self.unit.as_ref().filter(|u| u.as_unit().is_terminal()) {
            debug!(game = %unit.game_id(), "Resumed game is already over");
            self.settle();
            return;
        }
        match &self.unit {
            Some(unit) => {
                self.reveal_left = PATTERN_REVEAL_SECONDS;
                println!("{}", render::intro(unit.game_id()));
                print!("{}", render::screen(unit, true));
            }
            None if self.orch.stage().is_complete() => {
                println!("\n{}", Report::new(self.orch.session()).render());
                println!("Type /restart for a new session or /quit to leave");
            }
            None => {}
        }
    }

    fn on_tick(&mut self) {
        let Some(unit) = self.unit.as_mut() else {
            return;
        };
        let tick = unit.as_unit_mut().tick();
        if let Tick::Running { remaining } = tick {
            if WARN_AT.contains(&remaining) {
                println!("{}", style(format!("{} seconds left", remaining)).yellow());
            }
        }
        if self.reveal_left > 0 {
            self.reveal_left -= 1;
            if self.reveal_left == 0 && unit.game_id() == GameId::Pattern {
                if let Err(e) = console::Term::stdout().clear_screen() {
                    debug!(error = %e, "Could not clear the screen");
                }
                print!("{}", render::screen(unit, false));
            }
        }
        if tick != Tick::Stopped {
            self.orch.save_working_state(unit);
        }
        if tick == Tick::Expired {
            println!("{}", style("Time is up!").red().bold());
            self.settle();
        }
    }

    /// Handle one line of player input
    pub fn handle_line(&mut self, line: &str) -> anyhow::Result<Control> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Control::Continue);
        }
        if line.starts_with('/') {
            return self.handle_command(line);
        }

        let Some(unit) = self.unit.as_mut() else {
            println!("No game is running. Type /restart or /quit");
            return Ok(Control::Continue);
        };
        let game = unit.game_id();
        match input::parse(game, line).and_then(|mv| input::apply(unit, mv)) {
            Ok(reply) => {
                if !reply.is_empty() {
                    println!("{}", reply);
                }
                // A new pattern gets its own look
                if matches!(unit, AnyUnit::Pattern(p) if p.progress() == 0) {
                    self.reveal_left = PATTERN_REVEAL_SECONDS;
                }
            }
            Err(e) => println!("{}", style(e).red()),
        }

        self.orch.save_working_state(unit);
        if unit.as_unit().is_terminal() {
            self.settle();
        } else {
            print!("{}", render::screen(unit, self.reveal_left > 0));
        }
        Ok(Control::Continue)
    }

    /// Hand a finished unit to the session and move on
    fn settle(&mut self) {
        let Some(unit) = self.unit.as_mut() else {
            return;
        };
        match self.orch.complete_unit(unit.as_unit_mut()) {
            Ok(SessionEvent::GameCompleted { game, score, .. }) => {
                println!(
                    "{} finished with {} points",
                    style(game.title()).bold(),
                    style(score).green().bold()
                );
                self.unit = None;
                self.activate();
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "Could not record the game result"),
        }
    }

    fn handle_command(&mut self, input: &str) -> anyhow::Result<Control> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let cmd = parts.first().copied().unwrap_or("");

        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye! Your progress is saved.");
                return Ok(Control::Quit);
            }
            "/help" | "/h" => {
                println!("Commands:");
                println!("  /status    - Show scores so far");
                println!("  /screen    - Show the current game again");
                println!("  /restart   - Throw this session away and start over");
                println!("  /quit      - Leave (the session resumes next time)");
            }
            "/status" => {
                print!("{}", render::snapshot(&self.orch.snapshot()));
            }
            "/screen" => match &self.unit {
                Some(unit) => print!("{}", render::screen(unit, self.reveal_left > 0)),
                None => println!("No game is running"),
            },
            "/restart" => {
                if let Some(unit) = self.unit.as_mut() {
                    unit.as_unit_mut().teardown();
                }
                self.unit = None;
                self.orch.restart();
                println!("Session cleared.");
                return Ok(Control::Restart);
            }
            _ => {
                println!("Unknown command: {}", cmd);
            }
        }

        Ok(Control::Continue)
    }

    /// Stop the clock; the working state saved so far is what resumes
    fn shutdown(&mut self) {
        if let Some(unit) = self.unit.as_mut() {
            unit.as_unit_mut().teardown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogni_adapter::InMemorySessionStore;
    use cogni_domain::UserData;

    fn session() -> InteractiveSession<InMemorySessionStore> {
        let orch = SessionOrchestrator::load(InMemorySessionStore::new());
        InteractiveSession::new(orch, MazeGenerator::new(9).unwrap(), RngSource::new(Some(1)))
    }

    fn started() -> InteractiveSession<InMemorySessionStore> {
        let mut session = session();
        session
            .begin(UserData::from_form("Alex", "24", "masters").unwrap())
            .unwrap();
        session
    }

    // ============== Command Handling Tests ==============

    #[test]
    fn test_handle_quit_commands() {
        let mut session = session();
        for cmd in ["/quit", "/exit", "/q"] {
            assert_eq!(session.handle_line(cmd).unwrap(), Control::Quit);
        }
    }

    #[test]
    fn test_handle_help_and_status() {
        let mut session = started();
        assert_eq!(session.handle_line("/help").unwrap(), Control::Continue);
        assert_eq!(session.handle_line("/status").unwrap(), Control::Continue);
        assert_eq!(session.handle_line("/screen").unwrap(), Control::Continue);
        assert_eq!(session.handle_line("/bogus").unwrap(), Control::Continue);
    }

    #[test]
    fn test_restart_returns_to_intake() {
        let mut session = started();
        assert_eq!(session.handle_line("/restart").unwrap(), Control::Restart);
        assert_eq!(session.orchestrator().stage(), Stage::Intake);
        assert!(session.unit().is_none());
    }

    // ============== Game Flow Tests ==============

    #[test]
    fn test_begin_activates_first_game() {
        let session = started();
        assert_eq!(session.unit().map(|u| u.game_id()), Some(GameId::Stroop));
        assert!(session
            .orchestrator()
            .store()
            .contains("stroop_state")
            .unwrap());
    }

    #[test]
    fn test_moves_are_saved() {
        let mut session = started();
        let saved = |s: &InteractiveSession<InMemorySessionStore>| {
            s.orchestrator().store().get("stroop_state").unwrap().unwrap()
        };
        let before = saved(&session);
        session.handle_line("red").unwrap();
        assert_ne!(saved(&session), before);
    }

    #[test]
    fn test_expiry_advances_to_next_game() {
        let mut session = started();
        for _ in 0..30 {
            session.on_tick();
        }
        assert_eq!(session.orchestrator().stage(), Stage::Playing(GameId::Hanoi));
        assert_eq!(session.unit().map(|u| u.game_id()), Some(GameId::Hanoi));
        assert!(!session
            .orchestrator()
            .store()
            .contains("stroop_state")
            .unwrap());
    }

    #[test]
    fn test_solving_hanoi_by_typing() {
        let mut session = started();
        for _ in 0..30 {
            session.on_tick();
        }
        for mv in ["1 3", "1 2", "3 2", "1 3", "2 1", "2 3", "1 3"] {
            session.handle_line(mv).unwrap();
        }
        assert_eq!(session.orchestrator().session().score(GameId::Hanoi), 220);
        assert_eq!(session.unit().map(|u| u.game_id()), Some(GameId::Pattern));
    }

    #[test]
    fn test_expired_game_left_on_disk_is_settled_on_reload() {
        let mut session = started();
        let mut unit = session.unit.take().unwrap();
        while unit.as_unit_mut().tick() != Tick::Expired {}
        // Saved as over, then the process died before recording it
        session.orch.save_working_state(&unit);

        let orch = SessionOrchestrator::load(session.orch.into_store());
        let mut reloaded = InteractiveSession::new(orch, MazeGenerator::new(9).unwrap(), RngSource::new(Some(2)));
        reloaded.activate();

        assert_eq!(reloaded.orchestrator().stage(), Stage::Playing(GameId::Hanoi));
        assert_eq!(reloaded.unit().map(|u| u.game_id()), Some(GameId::Hanoi));
        assert!(reloaded.orchestrator().session().metrics().contains_key(&GameId::Stroop));
        assert!(!reloaded
            .orchestrator()
            .store()
            .contains("stroop_state")
            .unwrap());
    }

    #[test]
    fn test_pattern_is_hidden_after_reveal() {
        let mut session = started();
        session.orch.complete_current(GameId::Stroop, 0, None).unwrap();
        session.orch.complete_current(GameId::Hanoi, 0, None).unwrap();
        session.activate();
        assert_eq!(session.unit().map(|u| u.game_id()), Some(GameId::Pattern));
        assert_eq!(session.reveal_left, PATTERN_REVEAL_SECONDS);

        for _ in 0..PATTERN_REVEAL_SECONDS {
            session.on_tick();
        }
        // Without a terminal the clear fails and is only logged
        assert_eq!(session.reveal_left, 0);
        assert_eq!(session.orchestrator().stage(), Stage::Playing(GameId::Pattern));
    }

    #[test]
    fn test_input_without_game() {
        let mut session = session();
        assert_eq!(session.handle_line("red").unwrap(), Control::Continue);
    }
}
