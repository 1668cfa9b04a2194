// Squad sheet loading: one `<team>_squad.csv` per franchise -> RosterBook.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use dreamxi_core::{RosterBook, RosterEntry};

use crate::IngestError;

const SQUAD_SUFFIX: &str = "_squad.csv";

/// Raw squad CSV row. Extra columns are ignored.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawSquadRow {
    Name: String,
    #[serde(default)]
    Role: Option<String>,
    #[serde(default, alias = "credits", alias = "Credit")]
    Credits: Option<String>,
    #[serde(default, rename = "Foreign Player")]
    foreign_player: Option<String>,
}

/// Boolean-like cell: true/yes/y/1, any case.
fn truthy(cell: Option<&str>) -> bool {
    cell.map(|c| c.trim().to_lowercase())
        .is_some_and(|c| matches!(c.as_str(), "true" | "yes" | "y" | "1"))
}

/// `mumbai-indians_squad.csv` -> `Mumbai Indians`.
pub fn team_name_from_file(file_name: &str) -> Option<String> {
    let stem = file_name.strip_suffix(SQUAD_SUFFIX)?;
    let title = stem
        .replace('-', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ");
    (!title.is_empty()).then_some(title)
}

pub fn load_squad_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut entries = Vec::new();
    for result in reader.deserialize::<RawSquadRow>() {
        match result {
            Ok(raw) => {
                let name = raw.Name.trim().to_string();
                if name.is_empty() {
                    continue;
                }
                let credit = raw.Credits.as_deref().map(str::trim).and_then(|c| {
                    c.parse::<f64>().ok().filter(|v| v.is_finite()).or_else(|| {
                        warn!("'{}': unreadable credit '{}', using default", name, c);
                        None
                    })
                });
                entries.push(RosterEntry {
                    role: raw.Role.unwrap_or_default().trim().to_string(),
                    credit,
                    foreign: truthy(raw.foreign_player.as_deref()),
                    name,
                });
            }
            Err(e) => {
                warn!("skipping malformed squad row: {}", e);
            }
        }
    }
    Ok(entries)
}

/// Load every `*_squad.csv` in `dir`. Unreadable sheets are logged and skipped.
pub fn load_squads(dir: &Path) -> Result<RosterBook, IngestError> {
    let listing = std::fs::read_dir(dir).map_err(|e| IngestError::Io {
        path: dir.display().to_string(),
        source: e,
    })?;

    let mut book = RosterBook::new();
    for entry in listing.flatten() {
        let path = entry.path();
        let Some(team) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(team_name_from_file)
        else {
            continue;
        };

        let loaded = std::fs::File::open(&path)
            .map_err(|e| e.to_string())
            .and_then(|f| load_squad_from_reader(f).map_err(|e| e.to_string()));
        match loaded {
            Ok(rows) => {
                info!("squad '{}': {} players", team, rows.len());
                book.insert_team(team, rows);
            }
            Err(e) => warn!("error loading {}: {}", path.display(), e),
        }
    }

    if book.team_count() == 0 {
        warn!("no squad sheets found in {}", dir.display());
    }
    Ok(book)
}
