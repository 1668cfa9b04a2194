// Run pipeline: load every input once into an immutable bundle, then serve
// any number of predictions and matchup queries from it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info, warn};

use dreamxi_core::{
    analyze_matchup, Delivery, Engine, Fixture, MatchupError, MatchupSummary, Prediction,
    RosterBook, SelectionRules, SpecialistKeepers, StatsBook,
};

use crate::cache::load_stats;
use crate::config::Config;
use crate::deliveries::load_deliveries;
use crate::names::NameMap;
use crate::squads::load_squads;

/// Relative data paths in the config are taken from the project root.
pub fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

/// Everything a prediction run reads. Never mutated after loading, so one
/// bundle can back concurrent runs behind an `Arc`.
#[derive(Debug, Clone)]
pub struct StatsBundle {
    pub stats: StatsBook,
    pub roster: RosterBook,
    pub rules: SelectionRules,
    pub keepers: SpecialistKeepers,
    pub names: NameMap,
}

impl StatsBundle {
    /// Load the stats caches and squad sheets named in `config`.
    pub fn load(config: &Config, base_dir: &Path) -> anyhow::Result<Self> {
        let paths = &config.data_paths;
        let stats = load_stats(
            &resolve(base_dir, &paths.batter_cache),
            &resolve(base_dir, &paths.bowler_cache),
        )
        .context("failed to load stats caches")?;
        let roster = load_squads(&resolve(base_dir, &paths.squads_dir))
            .context("failed to load squad sheets")?;

        info!(
            "bundle ready: {} batters, {} bowlers, {} squads ({} players)",
            stats.batting.len(),
            stats.bowling.len(),
            roster.team_count(),
            roster.player_count()
        );

        Ok(Self::from_parts(stats, roster, config))
    }

    pub fn from_parts(stats: StatsBook, roster: RosterBook, config: &Config) -> Self {
        StatsBundle {
            stats,
            roster,
            rules: config.selection.clone(),
            keepers: config.classifier.keepers(),
            names: NameMap::new(config.names.clone()),
        }
    }

    pub fn engine(&self) -> Engine<'_, StatsBook> {
        Engine {
            stats: &self.stats,
            roster: &self.roster,
            rules: &self.rules,
            keepers: &self.keepers,
        }
    }

    pub fn predict(&self, fixture: &Fixture) -> Prediction {
        self.engine().predict(fixture)
    }
}

/// Head-to-head summary for two roster names, aligned to scorecard names.
pub fn matchup(
    deliveries: &[Delivery],
    names: &NameMap,
    batter: &str,
    bowler: &str,
) -> Result<MatchupSummary, MatchupError> {
    let batter = names.to_short(batter);
    let bowler = names.to_short(bowler);
    debug!("matchup query: {} vs {}", batter, bowler);
    analyze_matchup(deliveries, batter, bowler)
}

/// Load the ball-by-ball scorecard named in `config` (or `override_path`).
pub fn load_config_deliveries(
    config: &Config,
    base_dir: &Path,
    override_path: Option<&Path>,
) -> anyhow::Result<Vec<Delivery>> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => resolve(base_dir, &config.data_paths.deliveries),
    };
    load_deliveries(&path).context("failed to load deliveries")
}

/// `<Home>_vs_<Away>.json` with spaces removed.
pub fn fixture_file_name(prediction: &Prediction) -> String {
    format!(
        "{}_vs_{}.json",
        prediction.home.replace(' ', ""),
        prediction.away.replace(' ', "")
    )
}

/// Output names for a batch of predictions, one per prediction in order.
/// A repeated home/away pairing gets `_2`, `_3`, ... before the extension so
/// no result overwrites an earlier one.
pub fn fixture_file_names(predictions: &[Prediction]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    predictions
        .iter()
        .map(|prediction| {
            let name = fixture_file_name(prediction);
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                return name;
            }
            let stem = name.trim_end_matches(".json");
            let renamed = format!("{stem}_{count}.json");
            warn!("{} repeats an earlier fixture, saving as {}", prediction.label(), renamed);
            renamed
        })
        .collect()
}
