// Typed statistical inputs and the lookup seams the engine reads them through.
//
// Everything here is already numeric. Turning cache files and table text into
// these records is the ingestion layer's job; the engine never parses text.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};


// ---------------------------------------------------------------------------
// Head-to-head records
// ---------------------------------------------------------------------------

/// A head-to-head entry: either a recorded summary or an explicit "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Matchup<T> {
    Recorded(T),
    NoData,
}

impl<T> Matchup<T> {
    pub fn recorded(&self) -> Option<&T> {
        match self {
            Matchup::Recorded(r) => Some(r),
            Matchup::NoData => None,
        }
    }
}

/// Batter's view of one batter/bowler pairing. Missing fields read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingMatchup {
    pub strike_rate: f64,
    pub average: f64,
    pub boundary_pct: f64,
    pub dismissals: f64,
}

/// Bowler's view of one batter/bowler pairing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BowlingMatchup {
    pub dismissals: f64,
    /// `None` when the source carried no economy figure.
    pub economy: Option<f64>,
}

// ---------------------------------------------------------------------------
// Venue and form rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattingVenueRow {
    pub venue: String,
    pub strike_rate: Option<f64>,
    pub average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlingVenueRow {
    pub venue: String,
    pub wickets: Option<f64>,
    pub economy: Option<f64>,
}

/// One match of a batting recent-form series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingFormRow {
    pub runs: Option<f64>,
    pub strike_rate: Option<f64>,
}

/// One match of a bowling recent-form series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BowlingFormRow {
    pub wickets: Option<f64>,
    pub economy: Option<f64>,
}

// ---------------------------------------------------------------------------
// Player profiles
// ---------------------------------------------------------------------------

/// Everything the batting dataset knows about one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BattingProfile {
    /// Keyed by bowler name.
    pub head_to_head: HashMap<String, Matchup<BattingMatchup>>,
    pub venues: Vec<BattingVenueRow>,
    /// Most recent matches, in source order.
    pub recent_form: Vec<BattingFormRow>,
}

/// Everything the bowling dataset knows about one player.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BowlingProfile {
    /// Keyed by batter name.
    pub head_to_head: HashMap<String, Matchup<BowlingMatchup>>,
    pub venues: Vec<BowlingVenueRow>,
    pub recent_form: Vec<BowlingFormRow>,
}

// ---------------------------------------------------------------------------
// Repository seam
// ---------------------------------------------------------------------------

/// Read-only access to pre-loaded player statistics.
///
/// Presence matters on its own: a player who appears in the batting dataset
/// "has batting stats" even when every table is empty.
pub trait StatsRepository {
    fn batting(&self, player: &str) -> Option<&BattingProfile>;
    fn bowling(&self, player: &str) -> Option<&BowlingProfile>;

    fn has_batting(&self, player: &str) -> bool {
        self.batting(player).is_some()
    }

    fn has_bowling(&self, player: &str) -> bool {
        self.bowling(player).is_some()
    }
}

/// In-memory stats repository keyed by player name.
#[derive(Debug, Clone, Default)]
pub struct StatsBook {
    pub batting: HashMap<String, BattingProfile>,
    pub bowling: HashMap<String, BowlingProfile>,
}

impl StatsBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_batting(&mut self, player: impl Into<String>, profile: BattingProfile) {
        self.batting.insert(player.into(), profile);
    }

    pub fn insert_bowling(&mut self, player: impl Into<String>, profile: BowlingProfile) {
        self.bowling.insert(player.into(), profile);
    }
}

impl StatsRepository for StatsBook {
    fn batting(&self, player: &str) -> Option<&BattingProfile> {
        self.batting.get(player)
    }

    fn bowling(&self, player: &str) -> Option<&BowlingProfile> {
        self.bowling.get(player)
    }
}

// ---------------------------------------------------------------------------
// Roster metadata
// ---------------------------------------------------------------------------

/// One row of a squad sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub name: String,
    pub role: String,
    /// `None` when the sheet left the credit blank.
    pub credit: Option<f64>,
    pub foreign: bool,
}

/// Roster information resolved for a single lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterInfo {
    pub team: String,
    pub role: String,
    pub credit: f64,
    pub foreign: bool,
}

/// Squad sheets keyed by team name.
///
/// A `BTreeMap` keeps the team scan order fixed, which makes the partial-name
/// fallback deterministic.
#[derive(Debug, Clone, Default)]
pub struct RosterBook {
    teams: BTreeMap<String, Vec<RosterEntry>>,
}

impl RosterBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_team(&mut self, team: impl Into<String>, entries: Vec<RosterEntry>) {
        self.teams.insert(team.into(), entries);
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    pub fn player_count(&self) -> usize {
        self.teams.values().map(Vec::len).sum()
    }

    /// Find a player by exact name, then by case-insensitive partial name.
    ///
    /// Each team is tried in order: exact match within the team first, then a
    /// row whose name contains the query. Blank credits fall back to
    /// `default_credit`.
    pub fn lookup(&self, name: &str, default_credit: f64) -> Option<RosterInfo> {
        let query = name.trim();
        if query.is_empty() {
            return None;
        }
        let query_lower = query.to_lowercase();

        for (team, entries) in &self.teams {
            let hit = entries
                .iter()
                .find(|e| e.name == query)
                .or_else(|| {
                    entries
                        .iter()
                        .find(|e| e.name.to_lowercase().contains(&query_lower))
                });

            if let Some(entry) = hit {
                return Some(RosterInfo {
                    team: team.clone(),
                    role: entry.role.clone(),
                    credit: entry.credit.unwrap_or(default_credit),
                    foreign: entry.foreign,
                });
            }
        }
        None
    }
}
