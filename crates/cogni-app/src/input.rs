//! Player input - turning a typed line into a move for the active game

use cogni_domain::model::maze::Direction;
use cogni_domain::service::units::hanoi::{Click, MoveResult};
use cogni_domain::service::units::maze::StepOutcome;
use cogni_domain::service::units::memory::Flip;
use cogni_domain::service::units::pattern::{PatternStep, BOARD_CELLS};
use cogni_domain::service::units::stroop::InkColor;
use cogni_domain::{AnyUnit, GameId};
use rand::Rng;

/// A parsed move
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    Ink(InkColor),
    Tower(usize),
    Transfer { from: usize, to: usize },
    Cells(Vec<u8>),
    Step(Vec<Direction>),
    ResetMaze,
    Card(usize),
    Guess(String),
}

/// Parse `line` as a move in `game`
///
/// Numbers typed by the player are 1-based; the returned indices are 0-based.
pub fn parse(game: GameId, line: &str) -> Result<Move, String> {
    let line = line.trim();
    match game {
        GameId::Stroop => parse_ink(line).map(Move::Ink),
        GameId::Hanoi => parse_towers(line),
        GameId::Pattern => parse_cells(line).map(Move::Cells),
        GameId::Maze => parse_steps(line),
        GameId::Memory => parse_index(line, usize::MAX).map(Move::Card),
        GameId::Word => {
            if line.is_empty() {
                Err("Type your guess".to_string())
            } else {
                Ok(Move::Guess(line.to_string()))
            }
        }
    }
}

fn parse_index(token: &str, limit: usize) -> Result<usize, String> {
    match token.parse::<usize>() {
        Ok(n) if n >= 1 && n <= limit => Ok(n - 1),
        _ => Err(format!("'{}' is not a valid number", token)),
    }
}

/// Colour by name, first letter or position in the palette
fn parse_ink(token: &str) -> Result<InkColor, String> {
    if let Some(color) = InkColor::parse(token) {
        return Ok(color);
    }
    if let Ok(i) = parse_index(token, InkColor::all().len()) {
        return Ok(InkColor::all()[i]);
    }
    let lower = token.to_ascii_lowercase();
    InkColor::all()
        .iter()
        .copied()
        .find(|c| !lower.is_empty() && c.as_str().starts_with(&lower))
        .ok_or_else(|| format!("'{}' is not one of the colours", token))
}

fn parse_towers(line: &str) -> Result<Move, String> {
    let parts: Vec<&str> = line
        .split(|c: char| c.is_whitespace() || c == ',' || c == '>' || c == '-')
        .filter(|p| !p.is_empty())
        .collect();
    match parts.as_slice() {
        [one] => parse_index(one, 3).map(Move::Tower),
        [from, to] => Ok(Move::Transfer {
            from: parse_index(from, 3)?,
            to: parse_index(to, 3)?,
        }),
        _ => Err("Enter a tower (1-3) or a move such as '1 3'".to_string()),
    }
}

fn parse_cells(line: &str) -> Result<Vec<u8>, String> {
    let cells = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|p| !p.is_empty())
        .flat_map(|p| {
            // "157" is three cells as well as "1 5 7"
            if p.len() > 1 && p.chars().all(|c| c.is_ascii_digit()) {
                p.chars().map(|c| c.to_string()).collect::<Vec<_>>()
            } else {
                vec![p.to_string()]
            }
        })
        .map(|t| parse_index(&t, BOARD_CELLS as usize).map(|i| i as u8))
        .collect::<Result<Vec<_>, _>>()?;
    if cells.is_empty() {
        return Err(format!("Enter cells 1-{}", BOARD_CELLS));
    }
    Ok(cells)
}

fn parse_direction(token: &str) -> Option<Direction> {
    match token.to_ascii_lowercase().as_str() {
        "up" | "north" => Some(Direction::Up),
        "down" | "south" => Some(Direction::Down),
        "left" | "west" => Some(Direction::Left),
        "right" | "east" => Some(Direction::Right),
        _ => None,
    }
}

fn parse_steps(line: &str) -> Result<Move, String> {
    let lower = line.to_ascii_lowercase();
    if lower == "r" || lower == "reset" {
        return Ok(Move::ResetMaze);
    }
    // Whole words first, then runs of single keys such as "wwdd"
    let words: Vec<&str> = lower.split_whitespace().collect();
    if let Some(steps) = words
        .iter()
        .map(|w| parse_direction(w))
        .collect::<Option<Vec<_>>>()
    {
        if !steps.is_empty() {
            return Ok(Move::Step(steps));
        }
    }
    let steps = lower
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| match c {
            'w' => Some(Direction::Up),
            's' => Some(Direction::Down),
            'a' => Some(Direction::Left),
            'd' => Some(Direction::Right),
            _ => None,
        })
        .collect::<Option<Vec<_>>>();
    match steps {
        Some(steps) if !steps.is_empty() => Ok(Move::Step(steps)),
        _ => Err("Move with w/a/s/d (several at once are fine), or 'r' to start over".to_string()),
    }
}

/// Apply a parsed move and describe what happened
pub fn apply<R: Rng>(unit: &mut AnyUnit<R>, mv: Move) -> Result<String, String> {
    match (unit, mv) {
        (AnyUnit::Stroop(u), Move::Ink(color)) => match u.select(color) {
            Ok(true) => Ok("Correct!".to_string()),
            Ok(false) => Ok("Not quite, streak reset".to_string()),
            Err(e) => Err(e.to_string()),
        },
        (AnyUnit::Hanoi(u), Move::Tower(tower)) => match u.click(tower) {
            Click::Selected { tower } => Ok(format!("Picked tower {}", tower + 1)),
            Click::Deselected => Ok("Selection cleared".to_string()),
            Click::Moved(result) => Ok(describe_hanoi(result)),
            Click::Rejected(e) => Err(e.to_string()),
        },
        (AnyUnit::Hanoi(u), Move::Transfer { from, to }) => u
            .move_disk(from, to)
            .map(describe_hanoi)
            .map_err(|e| e.to_string()),
        (AnyUnit::Pattern(u), Move::Cells(cells)) => {
            let mut last = String::new();
            for cell in cells {
                let step = u.pick(cell).map_err(|e| e.to_string())?;
                last = match step {
                    PatternStep::Correct { remaining } => format!("Good, {} to go", remaining),
                    PatternStep::Completed { next_length } => {
                        format!("Pattern complete! Next one has {} cells", next_length)
                    }
                    PatternStep::Mistake { lives_left } => {
                        format!("Wrong cell, {} lives left. Watch the new pattern", lives_left)
                    }
                    PatternStep::OutOfLives => "Out of lives".to_string(),
                };
                // Anything typed after a miss or a finished pattern belongs to the old one
                if !matches!(step, PatternStep::Correct { .. }) {
                    break;
                }
            }
            Ok(last)
        }
        (AnyUnit::Maze(u), Move::Step(steps)) => {
            let mut last = String::new();
            for direction in steps {
                match u.step(direction).map_err(|e| e.to_string())? {
                    StepOutcome::Moved { .. } => last.clear(),
                    StepOutcome::Blocked => {
                        last = "Bumped into a wall".to_string();
                        break;
                    }
                    StepOutcome::ReachedExit => {
                        last = "You found the exit!".to_string();
                        break;
                    }
                }
            }
            Ok(last)
        }
        (AnyUnit::Maze(u), Move::ResetMaze) => u
            .reset()
            .map(|_| "Back at the start".to_string())
            .map_err(|e| e.to_string()),
        (AnyUnit::Memory(u), Move::Card(card)) => match u.flip(card) {
            Ok(Flip::First { .. }) => Ok(String::new()),
            Ok(Flip::Match { .. }) => Ok("A pair!".to_string()),
            Ok(Flip::Mismatch { .. }) => Ok("No match".to_string()),
            Ok(Flip::Cleared { bonus }) => Ok(format!("Board cleared! Time bonus {}", bonus)),
            Err(e) => Err(e.to_string()),
        },
        (AnyUnit::Word(u), Move::Guess(guess)) => match u.guess(&guess) {
            Ok(true) => Ok("Solved! Here is the next one".to_string()),
            Ok(false) => Ok("Not that one, try again".to_string()),
            Err(e) => Err(e.to_string()),
        },
        (unit, mv) => Err(format!("{:?} does not apply to {}", mv, unit.game_id().title())),
    }
}

fn describe_hanoi(result: MoveResult) -> String {
    match result {
        MoveResult::Moved { disk } => format!("Moved disk {}", disk),
        MoveResult::Solved { score } => format!("Solved! {} points", score),
    }
}
