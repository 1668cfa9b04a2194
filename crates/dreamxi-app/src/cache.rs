// Batter and bowler JSON stat caches -> typed profiles for the engine.
//
// Cache layout, per player name:
//   head_to_head: { opponent: record | [record, ...] }
//   venue:        { "Batting"?: table text, "Bowling"?: table text }
//   recent_form:  [ [series label, table text], ... ]
//
// Anything malformed is logged and dropped here; the engine only ever sees
// numeric fields.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use dreamxi_core::{
    BattingFormRow, BattingMatchup, BattingProfile, BattingVenueRow, BowlingFormRow,
    BowlingMatchup, BowlingProfile, BowlingVenueRow, Matchup, StatsBook,
};

use crate::table::{Table, TableError};
use crate::IngestError;

const BATTING_FORM_LABEL: &str = "Batting Match-wise";
const BOWLING_FORM_LABEL: &str = "Bowling Match-wise";

// ---------------------------------------------------------------------------
// Raw serde structs (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct RawPlayer {
    #[serde(default)]
    head_to_head: HashMap<String, Value>,
    #[serde(default)]
    venue: Value,
    #[serde(default)]
    recent_form: Vec<Value>,
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// A JSON number, or a string holding one.
fn as_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite())
}

/// Optional numeric field: absent is `Ok(None)`, present but non-numeric is `Err`.
fn field(record: &Map<String, Value>, key: &str) -> Result<Option<f64>, String> {
    match record.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => as_number(v)
            .map(Some)
            .ok_or_else(|| format!("`{key}` is not numeric: {v}")),
    }
}

/// Resolve a head-to-head value to a single record.
///
/// Lists use their first element; a record carrying `Message` means no data.
/// `None` means the value is unusable and should be skipped.
fn head_to_head_record(value: &Value) -> Option<Matchup<&Map<String, Value>>> {
    let value = match value {
        Value::Array(items) => items.first()?,
        other => other,
    };
    let record = value.as_object()?;
    if record.contains_key("Message") {
        return Some(Matchup::NoData);
    }
    Some(Matchup::Recorded(record))
}

fn batting_matchup(record: &Map<String, Value>) -> Result<BattingMatchup, String> {
    Ok(BattingMatchup {
        strike_rate: field(record, "Strike Rate")?.unwrap_or(0.0),
        average: field(record, "Average")?.unwrap_or(0.0),
        boundary_pct: field(record, "Boundary %")?.unwrap_or(0.0),
        dismissals: field(record, "Dismissals")?.unwrap_or(0.0),
    })
}

fn bowling_matchup(record: &Map<String, Value>) -> Result<BowlingMatchup, String> {
    Ok(BowlingMatchup {
        dismissals: field(record, "Dismissals")?.unwrap_or(0.0),
        economy: field(record, "Econ")?,
    })
}

fn convert_head_to_head<T>(
    player: &str,
    raw: &HashMap<String, Value>,
    convert: impl Fn(&Map<String, Value>) -> Result<T, String>,
) -> HashMap<String, Matchup<T>> {
    let mut out = HashMap::new();
    for (opponent, value) in raw {
        let entry = match head_to_head_record(value) {
            Some(Matchup::Recorded(record)) => match convert(record) {
                Ok(m) => Matchup::Recorded(m),
                Err(e) => {
                    warn!("dropping {} vs {} head-to-head: {}", player, opponent, e);
                    continue;
                }
            },
            Some(Matchup::NoData) => Matchup::NoData,
            None => {
                debug!("skipping empty {} vs {} head-to-head", player, opponent);
                continue;
            }
        };
        out.insert(opponent.trim().to_string(), entry);
    }
    out
}

// ---------------------------------------------------------------------------
// Table conversion
// ---------------------------------------------------------------------------

/// Parse an optional table, logging and discarding failures.
fn parse_table_or_warn<T>(
    player: &str,
    what: &str,
    text: Option<&str>,
    convert: impl Fn(&Table) -> Result<Vec<T>, TableError>,
) -> Vec<T> {
    let Some(text) = text else {
        return Vec::new();
    };
    match Table::parse(text).and_then(|t| convert(&t)) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("ignoring {} table for '{}': {}", what, player, e);
            Vec::new()
        }
    }
}

fn batting_venue_rows(t: &Table) -> Result<Vec<BattingVenueRow>, TableError> {
    let venue = t.require("venue")?;
    let sr = t.column("Strike_Rate");
    let avg = t.column("Average");
    Ok((0..t.len())
        .map(|r| BattingVenueRow {
            venue: t.cell(r, venue).unwrap_or_default().to_string(),
            strike_rate: t.number(r, sr),
            average: t.number(r, avg),
        })
        .collect())
}

fn bowling_venue_rows(t: &Table) -> Result<Vec<BowlingVenueRow>, TableError> {
    let venue = t.require("venue")?;
    let wickets = t.column("Wickets");
    let economy = t.column("Economy");
    Ok((0..t.len())
        .map(|r| BowlingVenueRow {
            venue: t.cell(r, venue).unwrap_or_default().to_string(),
            wickets: t.number(r, wickets),
            economy: t.number(r, economy),
        })
        .collect())
}

fn batting_form_rows(t: &Table) -> Result<Vec<BattingFormRow>, TableError> {
    let runs = t.column("Runs");
    let sr = t.column("Strike Rate");
    Ok((0..t.len())
        .map(|r| BattingFormRow {
            runs: t.number(r, runs),
            strike_rate: t.number(r, sr),
        })
        .collect())
}

fn bowling_form_rows(t: &Table) -> Result<Vec<BowlingFormRow>, TableError> {
    let wickets = t.column("Wickets");
    let economy = t.column("Economy");
    Ok((0..t.len())
        .map(|r| BowlingFormRow {
            wickets: t.number(r, wickets),
            economy: t.number(r, economy),
        })
        .collect())
}

/// Table text of the `[label, text]` pair in `recent_form` with `label`.
fn form_text<'a>(series: &'a [Value], label: &str) -> Option<&'a str> {
    series.iter().find_map(|entry| {
        let pair = entry.as_array()?;
        match pair.as_slice() {
            [Value::String(l), Value::String(text), ..] if l.trim() == label => Some(text.as_str()),
            _ => None,
        }
    })
}

// ---------------------------------------------------------------------------
// Profile builders
// ---------------------------------------------------------------------------

fn batting_profile(player: &str, raw: &RawPlayer) -> BattingProfile {
    BattingProfile {
        head_to_head: convert_head_to_head(player, &raw.head_to_head, batting_matchup),
        venues: parse_table_or_warn(
            player,
            "batting venue",
            raw.venue.get("Batting").and_then(Value::as_str),
            batting_venue_rows,
        ),
        recent_form: parse_table_or_warn(
            player,
            "batting form",
            form_text(&raw.recent_form, BATTING_FORM_LABEL),
            batting_form_rows,
        ),
    }
}

fn bowling_profile(player: &str, raw: &RawPlayer) -> BowlingProfile {
    BowlingProfile {
        head_to_head: convert_head_to_head(player, &raw.head_to_head, bowling_matchup),
        venues: parse_table_or_warn(
            player,
            "bowling venue",
            raw.venue.get("Bowling").and_then(Value::as_str),
            bowling_venue_rows,
        ),
        recent_form: parse_table_or_warn(
            player,
            "bowling form",
            form_text(&raw.recent_form, BOWLING_FORM_LABEL),
            bowling_form_rows,
        ),
    }
}

/// Per-player raw entries. A player whose entry has the wrong shape is kept
/// with empty tables, since being present in a cache is itself a signal.
fn raw_players<R: Read>(rdr: R) -> Result<Vec<(String, RawPlayer)>, serde_json::Error> {
    let root: HashMap<String, Value> = serde_json::from_reader(rdr)?;
    let mut players: Vec<(String, RawPlayer)> = root
        .into_iter()
        .map(|(name, value)| {
            let raw = serde_json::from_value::<RawPlayer>(value).unwrap_or_else(|e| {
                warn!("malformed cache entry for '{}': {}", name, e);
                RawPlayer::default()
            });
            (name.trim().to_string(), raw)
        })
        .collect();
    players.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(players)
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

pub fn load_batting_from_reader<R: Read>(
    rdr: R,
    stats: &mut StatsBook,
) -> Result<usize, serde_json::Error> {
    let players = raw_players(rdr)?;
    let count = players.len();
    for (name, raw) in players {
        let profile = batting_profile(&name, &raw);
        stats.insert_batting(name, profile);
    }
    Ok(count)
}

pub fn load_bowling_from_reader<R: Read>(
    rdr: R,
    stats: &mut StatsBook,
) -> Result<usize, serde_json::Error> {
    let players = raw_players(rdr)?;
    let count = players.len();
    for (name, raw) in players {
        let profile = bowling_profile(&name, &raw);
        stats.insert_bowling(name, profile);
    }
    Ok(count)
}

// ---------------------------------------------------------------------------
// File-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, IngestError> {
    std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load both caches into one stats book.
pub fn load_stats(batter_cache: &Path, bowler_cache: &Path) -> Result<StatsBook, IngestError> {
    let mut stats = StatsBook::new();

    let batters = load_batting_from_reader(std::io::BufReader::new(open(batter_cache)?), &mut stats)
        .map_err(|e| IngestError::Json {
            path: batter_cache.display().to_string(),
            source: e,
        })?;
    let bowlers = load_bowling_from_reader(std::io::BufReader::new(open(bowler_cache)?), &mut stats)
        .map_err(|e| IngestError::Json {
            path: bowler_cache.display().to_string(),
            source: e,
        })?;

    if batters == 0 && bowlers == 0 {
        return Err(IngestError::Validation(format!(
            "no players in {} or {}",
            batter_cache.display(),
            bowler_cache.display()
        )));
    }
    debug!("stats caches: {} batters, {} bowlers", batters, bowlers);

    Ok(stats)
}
