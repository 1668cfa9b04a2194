// dreamxi entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file; stdout carries results)
// 2. Parse the command line
// 3. Load config (copying defaults on first run)
// 4. Dispatch: predict (load the stats bundle once, run fixtures
//    concurrently, print and save) or matchup (load deliveries, summarize,
//    print and save)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use dreamxi_app::config::{self, Config};
use dreamxi_app::names::NameMap;
use dreamxi_app::pipeline::{self, StatsBundle};
use dreamxi_app::report::{self, TeamReport};
use dreamxi_cli::{parse_args, run_predictions, Command, USAGE};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("dreamxi starting up");

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    if command == Command::Help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = config::load_config().context("failed to load configuration")?;
    let base_dir = std::env::current_dir().context("failed to read working directory")?;
    info!(
        "Config loaded: {} players per team, {} credit cap, {} foreign",
        config.selection.team_size, config.selection.credit_cap, config.selection.foreign_cap
    );

    match command {
        Command::Predict { fixtures, out } => predict(&config, &base_dir, fixtures, out).await,
        Command::Matchup {
            batter,
            bowler,
            deliveries,
        } => matchup(&config, &base_dir, &batter, &bowler, deliveries.as_deref()),
        Command::Help => Ok(()),
    }
}

async fn predict(
    config: &Config,
    base_dir: &Path,
    fixture_paths: Vec<PathBuf>,
    out: Option<PathBuf>,
) -> anyhow::Result<()> {
    let fixtures = if fixture_paths.is_empty() {
        vec![config.fixture.to_fixture()]
    } else {
        fixture_paths
            .iter()
            .map(|p| config::load_fixture_file(p).map(|f| f.to_fixture()))
            .collect::<Result<Vec<_>, _>>()
            .context("failed to load fixture")?
    };

    let bundle = Arc::new(StatsBundle::load(config, base_dir)?);
    let predictions = run_predictions(Arc::clone(&bundle), fixtures).await?;
    let single = predictions.len() == 1;
    let file_names = pipeline::fixture_file_names(&predictions);

    for (prediction, file_name) in predictions.iter().zip(file_names) {
        println!("{}", report::render_team_sheet(prediction, &bundle.rules));

        let path = match (&out, single) {
            (Some(out), true) => out.clone(),
            (None, true) => pipeline::resolve(base_dir, &config.output.team_file),
            (Some(dir), false) => dir.join(file_name),
            (None, false) => {
                pipeline::resolve(base_dir, &config.output.results_dir).join(file_name)
            }
        };
        report::write_json(&path, &TeamReport::from_prediction(prediction))?;
        println!("Team saved to {}\n", path.display());
        info!("{} written to {}", prediction.label(), path.display());
    }
    Ok(())
}

fn matchup(
    config: &Config,
    base_dir: &Path,
    batter: &str,
    bowler: &str,
    deliveries: Option<&Path>,
) -> anyhow::Result<()> {
    let deliveries = pipeline::load_config_deliveries(config, base_dir, deliveries)?;
    let names = NameMap::new(config.names.clone());
    let summary = pipeline::matchup(&deliveries, &names, batter, bowler)?;

    println!("{}", serde_json::to_string_pretty(&summary)?);

    let path = pipeline::resolve(base_dir, &config.output.results_dir)
        .join(report::matchup_file_name(&summary.batter, &summary.bowler));
    report::write_json(&path, &summary)?;
    println!("Matchup saved to {}", path.display());
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for results).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("dreamxi.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("dreamxi_core=info,dreamxi_app=info,dreamxi_cli=info,warn")
        }))
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
