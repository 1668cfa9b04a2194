// Command-line surface for the `dreamxi` binary: argument parsing and the
// concurrent prediction driver.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use thiserror::Error;
use tracing::info;

use dreamxi_app::pipeline::StatsBundle;
use dreamxi_core::{Fixture, Prediction};

pub const USAGE: &str = "\
Usage:
  dreamxi predict [--fixture PATH]... [--out PATH]
  dreamxi matchup <BATTER> <BOWLER> [--deliveries PATH]
  dreamxi --help

Commands:
  predict   Pick a team for each fixture file (default: config/fixture.toml).
            One fixture is written to --out (default: output.team_file);
            several are written to <results_dir>/<Home>_vs_<Away>.json,
            or into the --out directory when given.
  matchup   Head-to-head summary for one batter against one bowler, from the
            ball-by-ball scorecard (default: data_paths.deliveries).
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Predict {
        fixtures: Vec<PathBuf>,
        out: Option<PathBuf>,
    },
    Matchup {
        batter: String,
        bowler: String,
        deliveries: Option<PathBuf>,
    },
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("no command given")]
    MissingCommand,

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("missing argument <{0}>")]
    MissingPositional(&'static str),

    #[error("unknown argument: {0}")]
    UnknownArg(String),
}

/// Parse arguments (program name already stripped).
pub fn parse_args<I>(args: I) -> Result<Command, ArgsError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = args.next().ok_or(ArgsError::MissingCommand)?;

    match command.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "predict" => {
            let mut fixtures = Vec::new();
            let mut out = None;
            while let Some(a) = args.next() {
                match a.as_str() {
                    "-f" | "--fixture" => {
                        let v = args.next().ok_or(ArgsError::MissingValue("--fixture"))?;
                        fixtures.push(PathBuf::from(v));
                    }
                    "-o" | "--out" => {
                        let v = args.next().ok_or(ArgsError::MissingValue("--out"))?;
                        out = Some(PathBuf::from(v));
                    }
                    "-h" | "--help" => return Ok(Command::Help),
                    _ => return Err(ArgsError::UnknownArg(a)),
                }
            }
            Ok(Command::Predict { fixtures, out })
        }
        "matchup" => {
            let mut positional = Vec::new();
            let mut deliveries = None;
            while let Some(a) = args.next() {
                match a.as_str() {
                    "-d" | "--deliveries" => {
                        let v = args.next().ok_or(ArgsError::MissingValue("--deliveries"))?;
                        deliveries = Some(PathBuf::from(v));
                    }
                    "-h" | "--help" => return Ok(Command::Help),
                    flag if flag.starts_with('-') => return Err(ArgsError::UnknownArg(a)),
                    _ => positional.push(a),
                }
            }
            let mut positional = positional.into_iter();
            let batter = positional.next().ok_or(ArgsError::MissingPositional("BATTER"))?;
            let bowler = positional.next().ok_or(ArgsError::MissingPositional("BOWLER"))?;
            if let Some(extra) = positional.next() {
                return Err(ArgsError::UnknownArg(extra));
            }
            Ok(Command::Matchup {
                batter,
                bowler,
                deliveries,
            })
        }
        _ => Err(ArgsError::UnknownCommand(command)),
    }
}

/// Run every fixture against one shared bundle on the blocking pool.
///
/// Results come back in fixture order.
pub async fn run_predictions(
    bundle: Arc<StatsBundle>,
    fixtures: Vec<Fixture>,
) -> anyhow::Result<Vec<Prediction>> {
    let handles: Vec<_> = fixtures
        .into_iter()
        .map(|fixture| {
            let bundle = Arc::clone(&bundle);
            tokio::task::spawn_blocking(move || bundle.predict(&fixture))
        })
        .collect();

    let mut predictions = Vec::with_capacity(handles.len());
    for handle in handles {
        let prediction = handle.await.context("prediction task failed")?;
        info!("{}: {} players picked", prediction.label(), prediction.selection.len());
        predictions.push(prediction);
    }
    Ok(predictions)
}
