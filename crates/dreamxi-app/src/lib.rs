// Library root: configuration, file ingestion, name alignment, output
// rendering, and the run pipeline around the dreamxi-core engine.

pub mod cache;
pub mod config;
pub mod deliveries;
pub mod names;
pub mod pipeline;
pub mod report;
pub mod squads;
pub mod table;

use thiserror::Error;

/// Failure to read one of the external collaborators' data files.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{0}")]
    Validation(String),
}
