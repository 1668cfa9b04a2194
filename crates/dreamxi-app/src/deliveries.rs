// Ball-by-ball scorecard CSV -> typed deliveries for matchup analysis.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use dreamxi_core::{Delivery, ExtrasType};

use crate::IngestError;

const MAX_RUNS_PER_BALL: f64 = 6.0;

/// The columns we use; the rest of the scorecard is ignored.
#[derive(Debug, Deserialize)]
struct RawDelivery {
    batter: String,
    bowler: String,
    batsman_runs: f64,
    #[serde(default)]
    extras_type: Option<String>,
    #[serde(default)]
    player_dismissed: Option<String>,
}

fn dismissed(cell: Option<String>) -> Option<String> {
    cell.map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case("na"))
}

/// Runs off the bat for one ball: a whole number from 0 to 6.
fn off_the_bat(runs: f64) -> Option<u32> {
    (runs.fract() == 0.0 && (0.0..=MAX_RUNS_PER_BALL).contains(&runs)).then(|| runs as u32)
}

pub fn load_deliveries_from_reader<R: Read>(rdr: R) -> Result<Vec<Delivery>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut deliveries = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize::<RawDelivery>() {
        match result {
            Ok(raw) => {
                let Some(runs) = off_the_bat(raw.batsman_runs) else {
                    skipped += 1;
                    continue;
                };
                deliveries.push(Delivery {
                    batter: raw.batter.trim().to_string(),
                    bowler: raw.bowler.trim().to_string(),
                    batsman_runs: runs,
                    extras_type: raw
                        .extras_type
                        .as_deref()
                        .map_or(ExtrasType::None, ExtrasType::parse),
                    player_dismissed: dismissed(raw.player_dismissed),
                });
            }
            Err(e) => {
                skipped += 1;
                if skipped <= 5 {
                    warn!("skipping malformed delivery row: {}", e);
                }
            }
        }
    }
    if skipped > 0 {
        warn!("skipped {} unusable delivery rows", skipped);
    }
    Ok(deliveries)
}

pub fn load_deliveries(path: &Path) -> Result<Vec<Delivery>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let deliveries =
        load_deliveries_from_reader(std::io::BufReader::new(file)).map_err(|e| IngestError::Csv {
            path: path.display().to_string(),
            source: e,
        })?;
    info!("loaded {} deliveries from {}", deliveries.len(), path.display());
    Ok(deliveries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
match_id,inning,batting_team,bowling_team,over,ball,batter,bowler,non_striker,\
batsman_runs,extra_runs,total_runs,extras_type,is_wicket,player_dismissed,dismissal_kind,fielder
1,1,RCB,MI,0,1,V Kohli,JJ Bumrah,F du Plessis,0,0,0,NA,0,NA,NA,NA
1,1,RCB,MI,0,2,V Kohli,JJ Bumrah,F du Plessis,0,1,1,wides,0,NA,NA,NA
1,1,RCB,MI,0,3,V Kohli,JJ Bumrah,F du Plessis,4,0,4,,0,,,
1,1,RCB,MI,0,4,V Kohli,JJ Bumrah,F du Plessis,0,0,0,NA,1,V Kohli,caught,TA Boult
1,1,RCB,MI,0,5,F du Plessis,JJ Bumrah,V Kohli,x,0,0,NA,0,NA,NA,NA
";

    #[test]
    fn parses_scorecard_rows() {
        let d = load_deliveries_from_reader(CSV.as_bytes()).unwrap();
        assert_eq!(d.len(), 4);
        assert_eq!(d[0].batter, "V Kohli");
        assert_eq!(d[0].extras_type, ExtrasType::None);
        assert_eq!(d[0].player_dismissed, None);
        assert_eq!(d[1].extras_type, ExtrasType::Wides);
        assert_eq!(d[2].batsman_runs, 4);
        assert_eq!(d[2].extras_type, ExtrasType::None);
        assert_eq!(d[3].player_dismissed.as_deref(), Some("V Kohli"));
    }

    #[test]
    fn feeds_matchup_analysis() {
        let d = load_deliveries_from_reader(CSV.as_bytes()).unwrap();
        let s = dreamxi_core::analyze_matchup(&d, "V Kohli", "JJ Bumrah").unwrap();
        assert_eq!(s.balls_faced, 3);
        assert_eq!(s.total_runs, 4);
        assert_eq!(s.dismissals, 1);
    }

    #[test]
    fn impossible_run_counts_are_skipped() {
        let csv = "\
batter,bowler,batsman_runs,extras_type,player_dismissed
A,B,5000000000,NA,NA
A,B,2.5,NA,NA
A,B,7,NA,NA
A,B,-1,NA,NA
A,B,4,NA,NA
A,B,6.0,NA,NA
";
        let d = load_deliveries_from_reader(csv.as_bytes()).unwrap();
        let runs: Vec<u32> = d.iter().map(|b| b.batsman_runs).collect();
        assert_eq!(runs, vec![4, 6]);

        let s = dreamxi_core::analyze_matchup(&d, "A", "B").unwrap();
        assert_eq!(s.total_runs, 10);
        assert_eq!(s.balls_faced, 2);
    }
}
