// Player model: role categories, roster metadata, and playing-eleven entries.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Credit charged for a player the roster book does not know about.
pub const DEFAULT_CREDIT: f64 = 7.0;

/// The four composition categories of a fantasy eleven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Keeper,
    Batter,
    AllRounder,
    Bowler,
}

impl Category {
    /// Fixed order used by the minimum-fill phase and for team sheet display.
    pub const ALL: [Category; 4] = [
        Category::Keeper,
        Category::Batter,
        Category::AllRounder,
        Category::Bowler,
    ];

    /// Short code used in logs and team sheets.
    pub fn code(&self) -> &'static str {
        match self {
            Category::Keeper => "WK",
            Category::Batter => "BAT",
            Category::AllRounder => "ALL",
            Category::Bowler => "BOWL",
        }
    }

    /// Role label used by the published team report.
    pub fn display_role(&self) -> &'static str {
        match self {
            Category::Keeper => "Wicketkeeper",
            Category::Batter => "Batsman",
            Category::AllRounder => "All-Rounder",
            Category::Bowler => "Bowler",
        }
    }

    /// Plural heading for grouped team sheets.
    pub fn heading(&self) -> &'static str {
        match self {
            Category::Keeper => "WICKET-KEEPERS",
            Category::Batter => "BATSMEN",
            Category::AllRounder => "ALL-ROUNDERS",
            Category::Bowler => "BOWLERS",
        }
    }

    /// Position of this category in `Category::ALL`.
    pub fn index(&self) -> usize {
        match self {
            Category::Keeper => 0,
            Category::Batter => 1,
            Category::AllRounder => 2,
            Category::Bowler => 3,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A player in one run, classified once and priced from the roster book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Name of the side this player was named in.
    pub team: String,
    pub category: Category,
    pub credit: f64,
    pub foreign: bool,
}

/// A player together with the score accumulated for the current run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredPlayer {
    pub player: Player,
    pub score: f64,
}

impl ScoredPlayer {
    pub fn name(&self) -> &str {
        &self.player.name
    }
}

/// One free-text playing-eleven line, e.g. `"Jos Buttler(WK-Batter)"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineupEntry {
    pub name: String,
    /// Declared role text, `None` when the entry carries no parenthesized role.
    pub role: Option<String>,
}

impl LineupEntry {
    /// Split a `"Name(Role)"` entry at the first `(`.
    ///
    /// A trailing `)` is dropped; an empty role segment counts as unknown.
    pub fn parse(entry: &str) -> Self {
        match entry.trim().split_once('(') {
            Some((name, rest)) => {
                let rest = rest.trim();
                let role = rest.strip_suffix(')').unwrap_or(rest).trim();
                LineupEntry {
                    name: name.trim().to_string(),
                    role: (!role.is_empty()).then(|| role.to_string()),
                }
            }
            None => LineupEntry {
                name: entry.trim().to_string(),
                role: None,
            },
        }
    }
}
