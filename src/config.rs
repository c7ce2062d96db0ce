//! Configuration management and validation.
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then command-line overrides applied through the `with_*` builders.

use crate::assembler::PairingPolicy;
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_CONFIG_FILE, DEFAULT_DATABASE_URL, DEFAULT_INPUT_FILE,
    DEFAULT_OUTPUT_FILE,
};
use crate::error::{DtcError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where assembled entries are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    /// JSON array document on disk
    #[default]
    File,
    /// Batched upsert into the `dtc_codes` table
    Storage,
}

/// Settings for one extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Source file containing the enum declarations
    pub input_path: PathBuf,

    /// JSON document written by the file sink
    pub output_path: PathBuf,

    pub sink: SinkKind,

    /// SQLite connection URL for the storage sink
    pub database_url: String,

    /// Records per storage transaction
    pub batch_size: usize,

    pub pairing: PairingPolicy,

    /// Show a progress bar while reducing lines
    pub show_progress: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_FILE),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            sink: SinkKind::File,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            batch_size: DEFAULT_BATCH_SIZE,
            pairing: PairingPolicy::Forward,
            show_progress: true,
        }
    }
}

impl ExtractorConfig {
    /// Load a TOML config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| DtcError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| DtcError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Use `path` if given, else `dtc_extractor.toml` in the working
    /// directory if it exists, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn with_input_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_path = path.into();
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_sink(mut self, sink: SinkKind) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_pairing(mut self, pairing: PairingPolicy) -> Self {
        self.pairing = pairing;
        self
    }

    /// Disable the progress bar (quiet runs and tests)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(DtcError::configuration("batch_size must be at least 1"));
        }
        if let PairingPolicy::BackwardWindow { window: 0 } = self.pairing {
            return Err(DtcError::configuration(
                "backward pairing window must be at least 1 line",
            ));
        }
        if self.sink == SinkKind::Storage && self.database_url.trim().is_empty() {
            return Err(DtcError::configuration(
                "database_url is required for the storage sink",
            ));
        }
        Ok(())
    }
}
