// Configuration loading and parsing (engine.toml, fixture.toml, names.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use dreamxi_core::{Fixture, SelectionRules, SpecialistKeepers, TeamSheet};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub selection: SelectionRules,
    pub classifier: ClassifierConfig,
    pub data_paths: DataPaths,
    pub output: OutputConfig,
    pub fixture: FixtureConfig,
    /// Canonical name -> scorecard short name. Empty when names.toml is absent.
    pub names: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// engine.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire engine.toml file.
#[derive(Debug, Clone, Deserialize)]
struct EngineFile {
    #[serde(default)]
    selection: SelectionRules,
    #[serde(default)]
    classifier: ClassifierConfig,
    data_paths: DataPaths,
    output: OutputConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifierConfig {
    /// Consulted only when a declared role is unrecognized.
    #[serde(default)]
    pub specialist_keepers: Vec<String>,
}

impl ClassifierConfig {
    pub fn keepers(&self) -> SpecialistKeepers {
        SpecialistKeepers::new(self.specialist_keepers.iter().cloned())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub batter_cache: String,
    pub bowler_cache: String,
    pub squads_dir: String,
    pub deliveries: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub team_file: String,
    pub results_dir: String,
}

// ---------------------------------------------------------------------------
// fixture.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[fixture]` table in fixture.toml.
#[derive(Debug, Clone, Deserialize)]
struct FixtureFile {
    fixture: FixtureConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FixtureConfig {
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub venue: String,
    /// Free-text `"Name(Role)"` entries.
    pub home_xi: Vec<String>,
    pub away_xi: Vec<String>,
}

impl FixtureConfig {
    pub fn to_fixture(&self) -> Fixture {
        Fixture {
            home: TeamSheet {
                name: self.home.trim().to_string(),
                entries: self.home_xi.clone(),
            },
            away: TeamSheet {
                name: self.away.trim().to_string(),
                entries: self.away_xi.clone(),
            },
            venue: self.venue.trim().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// names.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
struct NamesFile {
    #[serde(default)]
    names: HashMap<String, String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/engine.toml`,
/// `config/fixture.toml`, and (optionally) `config/names.toml`, all relative
/// to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- engine.toml (required) ---
    let engine_path = config_dir.join("engine.toml");
    let engine: EngineFile = parse_file(&engine_path)?;

    // --- fixture.toml (required) ---
    let fixture = load_fixture_file(&config_dir.join("fixture.toml"))?;

    // --- names.toml (optional) ---
    let names_path = config_dir.join("names.toml");
    let names = if names_path.exists() {
        let file: NamesFile = parse_file(&names_path)?;
        file.names
    } else {
        HashMap::new()
    };

    let config = Config {
        selection: engine.selection,
        classifier: engine.classifier,
        data_paths: engine.data_paths,
        output: engine.output,
        fixture,
        names,
    };

    validate(&config)?;

    Ok(config)
}

/// Load and validate a single fixture file (a `[fixture]` table).
pub fn load_fixture_file(path: &Path) -> Result<FixtureConfig, ConfigError> {
    let file: FixtureFile = parse_file(path)?;
    validate_fixture(&file.fixture)?;
    Ok(file.fixture)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // User edits win.
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Convenience wrapper: loads config relative to the current working directory.
/// Ensures default config files are copied before loading.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn parse_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = read_file(path)?;
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let s = &config.selection;

    if s.team_size == 0 {
        return Err(invalid("selection.team_size", "must be greater than 0"));
    }

    if !s.credit_cap.is_finite() || s.credit_cap <= 0.0 {
        return Err(invalid(
            "selection.credit_cap",
            format!("must be a positive number, got {}", s.credit_cap),
        ));
    }

    if !s.default_credit.is_finite() || s.default_credit < 0.0 {
        return Err(invalid(
            "selection.default_credit",
            format!("must be >= 0, got {}", s.default_credit),
        ));
    }

    if s.min_per_category == 0 {
        return Err(invalid("selection.min_per_category", "must be greater than 0"));
    }

    let caps: &[(&str, usize)] = &[
        ("selection.min_fill_category_cap", s.min_fill_category_cap),
        ("selection.top_up_category_cap", s.top_up_category_cap),
    ];
    for (name, cap) in caps {
        if *cap < s.min_per_category {
            return Err(invalid(
                name,
                format!("must be >= min_per_category ({}), got {cap}", s.min_per_category),
            ));
        }
    }

    validate_fixture(&config.fixture)
}

fn validate_fixture(fixture: &FixtureConfig) -> Result<(), ConfigError> {
    let text_fields: &[(&str, &str)] = &[
        ("fixture.home", fixture.home.as_str()),
        ("fixture.away", fixture.away.as_str()),
        ("fixture.venue", fixture.venue.as_str()),
    ];
    for (name, value) in text_fields {
        if value.trim().is_empty() {
            return Err(invalid(name, "must not be empty"));
        }
    }

    let lineups: &[(&str, &Vec<String>)] = &[
        ("fixture.home_xi", &fixture.home_xi),
        ("fixture.away_xi", &fixture.away_xi),
    ];
    for (name, xi) in lineups {
        if xi.iter().all(|e| e.trim().is_empty()) {
            return Err(invalid(name, "must name at least one player"));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
