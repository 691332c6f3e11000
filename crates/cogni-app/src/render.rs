//! Text screens for the terminal

use std::fmt::Write;

use cogni_domain::service::units::hanoi::HanoiUnit;
use cogni_domain::service::units::memory::MemoryUnit;
use cogni_domain::service::units::pattern::{PatternUnit, LIVES};
use cogni_domain::service::units::stroop::{InkColor, StroopUnit};
use cogni_domain::{AnyUnit, GameId, Stage};
use cogni_usecase::SessionSnapshot;
use console::{style, Color};
use rand::Rng;

/// Shown once when a game comes up
pub fn intro(game: GameId) -> String {
    let how = match game {
        GameId::Stroop => {
            "Name the INK colour, not the word. Type a colour, its first letter or its number."
        }
        GameId::Hanoi => {
            "Move all disks to tower 3. Type 'from to' (e.g. '1 3'), or one tower to pick and another to drop."
        }
        GameId::Pattern => {
            "Memorise the highlighted cells, then type them back in order (e.g. '3 7 1')."
        }
        GameId::Maze => "Walk from the top-left to the exit with w/a/s/d. 'r' starts over.",
        GameId::Memory => "Flip two cards at a time by number and find all the pairs.",
        GameId::Word => "Unscramble the letters and type the word.",
    };
    format!(
        "\n{}  {}\n{}\n",
        style(game.title()).bold().cyan(),
        style(format!("({})", game.area())).dim(),
        how
    )
}

/// The current state of a unit
///
/// `reveal` only matters for the pattern game, where the sequence is hidden
/// once the player has had a look.
pub fn screen<R: Rng>(unit: &AnyUnit<R>, reveal: bool) -> String {
    let mut out = match unit {
        AnyUnit::Stroop(u) => stroop(u),
        AnyUnit::Hanoi(u) => hanoi(u),
        AnyUnit::Pattern(u) => pattern(u, reveal),
        AnyUnit::Maze(u) => u.render().unwrap_or_default(),
        AnyUnit::Memory(u) => memory(u),
        AnyUnit::Word(u) => format!(
            "  {}\n",
            style(u.scrambled().unwrap_or("").to_uppercase()).bold()
        ),
    };
    let unit = unit.as_unit();
    let _ = write!(out, "Score: {}", unit.current_score());
    if let Some(left) = unit.time_left() {
        let _ = write!(out, "   Time: {}s", left);
    }
    out.push('\n');
    out
}

fn ink(color: InkColor) -> Color {
    match color {
        InkColor::Red => Color::Red,
        InkColor::Blue => Color::Blue,
        InkColor::Green => Color::Green,
        InkColor::Yellow => Color::Yellow,
        // 256-colour orange
        InkColor::Orange => Color::Color256(208),
    }
}

fn stroop<R: Rng>(unit: &StroopUnit<R>) -> String {
    let mut out = String::new();
    if let Some(challenge) = unit.challenge() {
        let word = challenge.word.as_str().to_uppercase();
        let _ = writeln!(out, "\n    {}\n", style(word).fg(ink(challenge.ink)).bold());
    }
    let choices: Vec<String> = InkColor::all()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}={}", i + 1, c.as_str()))
        .collect();
    let _ = writeln!(out, "{}", choices.join("  "));
    let _ = writeln!(out, "Streak: {}  Best: {}", unit.streak(), unit.best_streak());
    out
}

fn hanoi(unit: &HanoiUnit) -> String {
    let mut out = String::new();
    for (i, tower) in unit.towers().iter().enumerate() {
        let disks: Vec<String> = tower.iter().map(|d| d.to_string()).collect();
        let marker = if unit.selected() == Some(i) { "*" } else { " " };
        let _ = writeln!(out, "{}{}: {}", marker, i + 1, disks.join(" "));
    }
    let _ = writeln!(out, "Moves: {}", unit.moves());
    out
}

fn pattern<R: Rng>(unit: &PatternUnit<R>, reveal: bool) -> String {
    let mut out = String::new();
    let sequence = unit.sequence();
    for row in 0..3u8 {
        let cells: Vec<String> = (0..3u8)
            .map(|col| {
                let cell = row * 3 + col;
                let label = (cell + 1).to_string();
                if reveal && sequence.contains(&cell) {
                    style(label).reverse().bold().to_string()
                } else {
                    label
                }
            })
            .collect();
        let _ = writeln!(out, "  {}", cells.join(" "));
    }
    if reveal {
        let order: Vec<String> = sequence.iter().map(|c| (c + 1).to_string()).collect();
        let _ = writeln!(out, "Pattern: {}", order.join(" "));
    } else {
        let _ = writeln!(
            out,
            "Entered {} of {}",
            unit.progress(),
            sequence.len()
        );
    }
    let _ = writeln!(out, "Lives: {}/{}", unit.lives(), LIVES);
    out
}

fn memory<R: Rng>(unit: &MemoryUnit<R>) -> String {
    let mut out = String::new();
    let count = unit.card_count();
    let width = 4;
    for start in (0..count).step_by(width) {
        let row: Vec<String> = (start..(start + width).min(count))
            .map(|card| match unit.visible(card) {
                Some(symbol) => format!("  {}", style((b'A' + symbol) as char).bold().green()),
                None => format!("{:>3}", card + 1),
            })
            .collect();
        let _ = writeln!(out, "{}", row.join(" "));
    }
    let _ = writeln!(out, "Pairs: {}", unit.pairs_found());
    out
}

/// Where the session stands
pub fn snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    let stage = match snapshot.stage {
        Stage::Intake => "waiting for intake".to_string(),
        Stage::Playing(game) => format!("playing {}", game.title()),
        Stage::Complete => "complete".to_string(),
    };
    let _ = writeln!(out, "Stage: {}", stage);
    if let Some(user) = &snapshot.user {
        let _ = writeln!(
            out,
            "Player: {} ({}, {})",
            user.name(),
            user.age(),
            user.education().display_name()
        );
    }
    for game in GameId::all() {
        let score = snapshot.scores.get(game).copied().unwrap_or(0);
        let _ = writeln!(out, "  {:<18} {}", game.title(), score);
    }
    let _ = writeln!(out, "Total: {}", snapshot.total_score);
    if snapshot.degraded {
        let _ = writeln!(
            out,
            "{}",
            style("Progress could not be saved; this session lives in memory only").yellow()
        );
    }
    out
}
