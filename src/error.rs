//! Error types for the analysis pipeline
//!
//! Every analyzer validates its required columns eagerly and fails fast
//! with a specific kind; the engine aborts on the first failure and never
//! returns a partial report.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// A mapped column does not exist in the table
    #[error("mapped column not found in table: {column}")]
    MissingColumn { column: String },

    /// Code column count outside the supported [1, 20] range
    #[error("code column count must be between 1 and 20, got {count}")]
    CodeColumnCount { count: usize },

    /// Zero rows, or zero usable rows for readiness scoring
    #[error("insufficient data: {0}")]
    InsufficientData(String),

    /// A mapped column is entirely missing
    #[error("mapped column is entirely empty: {column}")]
    EmptyColumn { column: String },

    /// Scoring weights are negative or do not sum to 1.0
    #[error("scoring weights must be non-negative and sum to 1.0, got sum {sum}")]
    InvalidWeights { sum: f64 },

    #[error("failed to read catalog from {path}: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse catalog CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
