//! Error handling for DTC extraction runs.
//!
//! Only I/O, serialization, configuration and storage failures are errors.
//! Malformed source lines are never errors; the classifier ignores them.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DtcError {
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Failed to read input file: {path} - {source}")]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write output file: {path} - {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Batch {batch_index} of {total_batches} failed to write: {source}")]
    BatchWrite {
        batch_index: usize,
        total_batches: usize,
        #[source]
        source: sqlx::Error,
    },

    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid diagnostic trouble code: {value}")]
    InvalidCode { value: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to read config file: {path} - {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {path} - {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl DtcError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DtcError>;
