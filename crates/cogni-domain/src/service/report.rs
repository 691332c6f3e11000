//! Report - Turn a finished session into labels and a text summary
//!
//! Pure presentation over the session's scores, user data and metrics.
//! Thresholds are compared on integer percentages so boundary scores land on
//! the expected side.

use std::fmt::Write as _;

use crate::model::game::GameId;
use crate::model::session::Session;

/// Best possible total over the six games
pub const MAX_TOTAL_SCORE: u32 = 6000;

/// Ceiling used for each area's strength label
pub const MAX_AREA_SCORE: u32 = 1000;

/// True when `score / max` is at least `percent`%
fn at_least(score: u32, max: u32, percent: u64) -> bool {
    u64::from(score) * 100 >= u64::from(max) * percent
}

/// Overall label derived from the total score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CognitiveLevel {
    Exceptional,
    Advanced,
    AboveAverage,
    Average,
    BelowAverage,
    NeedsImprovement,
}

impl CognitiveLevel {
    pub fn from_total(total: u32) -> Self {
        let levels = [
            (90, CognitiveLevel::Exceptional),
            (80, CognitiveLevel::Advanced),
            (70, CognitiveLevel::AboveAverage),
            (50, CognitiveLevel::Average),
            (30, CognitiveLevel::BelowAverage),
        ];
        levels
            .into_iter()
            .find(|(percent, _)| at_least(total, MAX_TOTAL_SCORE, *percent))
            .map(|(_, level)| level)
            .unwrap_or(CognitiveLevel::NeedsImprovement)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CognitiveLevel::Exceptional => "Exceptional",
            CognitiveLevel::Advanced => "Advanced",
            CognitiveLevel::AboveAverage => "Above Average",
            CognitiveLevel::Average => "Average",
            CognitiveLevel::BelowAverage => "Below Average",
            CognitiveLevel::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl core::fmt::Display for CognitiveLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-area label derived from one game's score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaStrength {
    Strong,
    Good,
    Average,
    NeedsImprovement,
}

impl AreaStrength {
    pub fn from_score(score: u32) -> Self {
        if at_least(score, MAX_AREA_SCORE, 80) {
            AreaStrength::Strong
        } else if at_least(score, MAX_AREA_SCORE, 60) {
            AreaStrength::Good
        } else if at_least(score, MAX_AREA_SCORE, 40) {
            AreaStrength::Average
        } else {
            AreaStrength::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AreaStrength::Strong => "Strong",
            AreaStrength::Good => "Good",
            AreaStrength::Average => "Average",
            AreaStrength::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl core::fmt::Display for AreaStrength {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// A report over one session
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    session: &'a Session,
}

impl<'a> Report<'a> {
    pub fn new(session: &'a Session) -> Self {
        Self { session }
    }

    pub fn level(&self) -> CognitiveLevel {
        CognitiveLevel::from_total(self.session.total_score())
    }

    pub fn strength(&self, game: GameId) -> AreaStrength {
        AreaStrength::from_score(self.session.score(game))
    }

    /// Plain text summary
    pub fn render(&self) -> String {
        let session = self.session;
        let mut out = String::new();

        let _ = writeln!(out, "Cognitive Assessment Report");
        let _ = writeln!(out, "===========================");
        if let Some(user) = session.user() {
            let _ = writeln!(out, "Name:      {}", user.name());
            let _ = writeln!(out, "Age:       {}", user.age());
            let _ = writeln!(out, "Education: {}", user.education().display_name());
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total score: {} / {}",
            session.total_score(),
            MAX_TOTAL_SCORE
        );
        let _ = writeln!(out, "Overall cognitive level: {}", self.level());
        let _ = writeln!(out);

        let _ = writeln!(out, "Areas");
        for game in GameId::all() {
            let _ = writeln!(
                out,
                "  {} ({}): {} [{}]",
                game.area(),
                game.title(),
                session.score(*game),
                self.strength(*game)
            );
        }

        for (game, metrics) in session.metrics() {
            if metrics.is_empty() {
                continue;
            }
            let _ = writeln!(out);
            let _ = writeln!(out, "{} metrics", game.title());
            for (name, value) in metrics.iter() {
                let _ = writeln!(out, "  {}: {}", name.replace('_', " "), value);
            }
        }
        out
    }
}
