// Single batter-vs-bowler summary computed from delivery-level records.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a delivery's extras were recorded, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtrasType {
    None,
    Wides,
    NoBalls,
    Byes,
    LegByes,
    Penalty,
}

impl ExtrasType {
    /// Parse the scorecard spelling. Blank and `NA` mean no extras; anything
    /// unrecognized is treated the same way.
    pub fn parse(raw: &str) -> Self {
        let squashed: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect();
        match squashed.as_str() {
            "wide" | "wides" => ExtrasType::Wides,
            "noball" | "noballs" => ExtrasType::NoBalls,
            "bye" | "byes" => ExtrasType::Byes,
            "legbye" | "legbyes" => ExtrasType::LegByes,
            "penalty" | "penalties" => ExtrasType::Penalty,
            _ => ExtrasType::None,
        }
    }

    /// Wides, byes, and leg-byes never count as a ball faced.
    pub fn counts_as_ball_faced(&self) -> bool {
        !matches!(
            self,
            ExtrasType::Wides | ExtrasType::Byes | ExtrasType::LegByes
        )
    }
}

/// One ball of a scorecard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub batter: String,
    pub bowler: String,
    pub batsman_runs: u32,
    pub extras_type: ExtrasType,
    pub player_dismissed: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatchupError {
    #[error("no head-to-head data found between {batter} and {bowler}")]
    NotFound { batter: String, bowler: String },
}

/// Head-to-head summary for one pairing. Field names on the wire follow the
/// published results format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchupSummary {
    #[serde(rename = "Batter")]
    pub batter: String,
    #[serde(rename = "Bowler")]
    pub bowler: String,
    #[serde(rename = "Balls Faced")]
    pub balls_faced: u32,
    #[serde(rename = "Dot Balls")]
    pub dot_balls: u32,
    #[serde(rename = "Total Runs")]
    pub total_runs: u32,
    #[serde(rename = "1s")]
    pub ones: u32,
    #[serde(rename = "2s")]
    pub twos: u32,
    #[serde(rename = "3s")]
    pub threes: u32,
    #[serde(rename = "4s")]
    pub fours: u32,
    #[serde(rename = "6s")]
    pub sixes: u32,
    #[serde(rename = "Dismissals")]
    pub dismissals: u32,
    #[serde(rename = "Strike Rate")]
    pub strike_rate: f64,
    #[serde(rename = "Average")]
    pub average: f64,
    #[serde(rename = "Boundary %")]
    pub boundary_pct: f64,
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Summarize every legal delivery `bowler` sent down to `batter`.
///
/// Names must already be in scorecard form. Returns `NotFound` when the pair
/// has no legal deliveries, which is distinct from a summary of zeros.
pub fn analyze_matchup(
    deliveries: &[Delivery],
    batter: &str,
    bowler: &str,
) -> Result<MatchupSummary, MatchupError> {
    let mut summary = MatchupSummary {
        batter: batter.to_string(),
        bowler: bowler.to_string(),
        balls_faced: 0,
        dot_balls: 0,
        total_runs: 0,
        ones: 0,
        twos: 0,
        threes: 0,
        fours: 0,
        sixes: 0,
        dismissals: 0,
        strike_rate: 0.0,
        average: 0.0,
        boundary_pct: 0.0,
    };

    let legal = deliveries.iter().filter(|d| {
        d.batter == batter && d.bowler == bowler && d.extras_type.counts_as_ball_faced()
    });

    for d in legal {
        summary.balls_faced += 1;
        summary.total_runs = summary.total_runs.saturating_add(d.batsman_runs);
        match d.batsman_runs {
            0 => summary.dot_balls += 1,
            1 => summary.ones += 1,
            2 => summary.twos += 1,
            3 => summary.threes += 1,
            4 => summary.fours += 1,
            6 => summary.sixes += 1,
            _ => {}
        }
        if d.player_dismissed.as_deref() == Some(batter) {
            summary.dismissals += 1;
        }
    }

    if summary.balls_faced == 0 {
        return Err(MatchupError::NotFound {
            batter: batter.to_string(),
            bowler: bowler.to_string(),
        });
    }

    let balls = f64::from(summary.balls_faced);
    let runs = f64::from(summary.total_runs);
    summary.strike_rate = round2(runs / balls * 100.0);
    summary.average = if summary.dismissals > 0 {
        round2(runs / f64::from(summary.dismissals))
    } else {
        round2(runs)
    };
    summary.boundary_pct = round2(f64::from(summary.fours + summary.sixes) / balls * 100.0);

    Ok(summary)
}
