// Output rendering: the published JSON team report and the plain-text sheet.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use dreamxi_core::{Category, Prediction, ScoredPlayer, SelectionRules};

/// Franchise keyword -> abbreviation, checked in order.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("Sunrisers", "SRH"),
    ("Delhi", "DC"),
    ("Chennai", "CSK"),
    ("Mumbai", "MI"),
    ("Kolkata", "KKR"),
    ("Punjab", "PBKS"),
    ("Rajasthan", "RR"),
    ("Bangalore", "RCB"),
    ("Bengaluru", "RCB"),
    ("Gujarat", "GT"),
    ("Lucknow", "LSG"),
];

/// Short team code; unknown teams use their first two characters.
pub fn team_abbreviation(team: &str) -> String {
    ABBREVIATIONS
        .iter()
        .find(|(keyword, _)| team.contains(keyword))
        .map(|(_, abbr)| abbr.to_string())
        .unwrap_or_else(|| team.chars().take(2).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportPlayer {
    pub name: String,
    pub team: String,
    pub role: String,
    pub credit: f64,
}

/// The published result of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamReport {
    pub players: Vec<ReportPlayer>,
    pub total_credits: f64,
    #[serde(rename = "match")]
    pub match_label: String,
    pub venue: String,
    pub captain: Option<String>,
    pub vice_captain: Option<String>,
}

impl TeamReport {
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let selection = &prediction.selection;
        TeamReport {
            players: selection
                .picks
                .iter()
                .map(|p| ReportPlayer {
                    name: p.player.name.clone(),
                    team: team_abbreviation(&p.player.team),
                    role: p.player.category.display_role().to_string(),
                    credit: p.player.credit,
                })
                .collect(),
            total_credits: selection.total_credits,
            match_label: prediction.label(),
            venue: prediction.venue.clone(),
            captain: selection.captain.clone(),
            vice_captain: selection.vice_captain.clone(),
        }
    }
}

fn sheet_line(out: &mut String, pick: &ScoredPlayer, prediction: &Prediction) {
    let selection = &prediction.selection;
    let name = pick.name();
    let mark = if selection.captain.as_deref() == Some(name) {
        " (C)"
    } else if selection.vice_captain.as_deref() == Some(name) {
        " (VC)"
    } else {
        ""
    };
    let foreign = if pick.player.foreign { " [FOREIGN]" } else { "" };
    let _ = writeln!(
        out,
        "  {}{} - {:.2} points - {:.1} credits{}",
        name, mark, pick.score, pick.player.credit, foreign
    );
}

/// Human-readable team sheet grouped by category.
pub fn render_team_sheet(prediction: &Prediction, rules: &SelectionRules) -> String {
    let selection = &prediction.selection;
    let mut out = String::new();

    let _ = writeln!(out, "===== DREAM XI =====");
    let _ = writeln!(out);
    let _ = writeln!(out, "Match: {}", prediction.label());
    let _ = writeln!(out, "Venue: {}", prediction.venue);
    let _ = writeln!(
        out,
        "Total Credits: {:.1}/{:.1}",
        selection.total_credits, rules.credit_cap
    );
    let _ = writeln!(
        out,
        "Foreign Players: {}/{}",
        selection.foreign_count, rules.foreign_cap
    );
    if selection.len() < rules.team_size {
        let _ = writeln!(
            out,
            "Only {} of {} places could be filled under the constraints.",
            selection.len(),
            rules.team_size
        );
    }

    for category in Category::ALL {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}:", category.heading());
        for pick in selection.in_category(category) {
            sheet_line(&mut out, pick, prediction);
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "CAPTAIN: {}",
        selection.captain.as_deref().unwrap_or("None")
    );
    let _ = writeln!(
        out,
        "VICE-CAPTAIN: {}",
        selection.vice_captain.as_deref().unwrap_or("None")
    );
    out
}

/// `<Batter>_vs_<Bowler>.json` with spaces removed.
pub fn matchup_file_name(batter: &str, bowler: &str) -> String {
    format!("{}_vs_{}.json", batter.replace(' ', ""), bowler.replace(' ', ""))
}

/// Pretty-print `value` as JSON to `path`, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(value).context("failed to serialize JSON")?;
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
