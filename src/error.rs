use thiserror::Error;

use crate::domain::Dataset;

#[derive(Error, Debug)]
pub enum LinkageError {
    #[error("{dataset} table is missing required column '{column}'")]
    MissingColumn { dataset: Dataset, column: String },

    #[error("{dataset} row {row} has {found} values, expected {expected}")]
    MalformedRow {
        dataset: Dataset,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("expected a {expected} table, got a {found} table")]
    DatasetMismatch { expected: Dataset, found: Dataset },

    #[error("Cannot convert '{0}' to an integer")]
    InvalidNumber(String),

    #[error("Unknown name transform: {0}")]
    UnknownTransform(String),

    #[error("Percentile must be within [0, 100], got {0}")]
    InvalidPercentile(f64),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Environment variable error: {0}")]
    Env(#[from] std::env::VarError),
}

pub type Result<T> = std::result::Result<T, LinkageError>;
