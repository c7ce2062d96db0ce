//! Command-line interface components.

use crate::assembler::PairingPolicy;
use crate::config::{ExtractorConfig, SinkKind};
use crate::constants::DEFAULT_BACKWARD_WINDOW;
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dtc_extractor")]
#[command(about = "Extract diagnostic trouble code tables from C# enum sources")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Source file with the DTC enum (default: DTCCodes.cs)
    #[arg(value_name = "INPUT")]
    pub input_path: Option<PathBuf>,

    /// JSON output file for the file sink (default: dtc_codes.json)
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// Where to write entries
    #[arg(long, value_enum)]
    pub sink: Option<SinkArg>,

    /// SQLite URL for the storage sink
    #[arg(long)]
    pub database_url: Option<String>,

    /// Records per storage transaction
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// How codes are paired with their annotations
    #[arg(long, value_enum)]
    pub pairing: Option<PairingArg>,

    /// Lines searched back by the backward pairing policy
    #[arg(long)]
    pub window: Option<usize>,

    /// TOML config file (default: dtc_extractor.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkArg {
    File,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PairingArg {
    Forward,
    Backward,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }

    /// Build the run configuration: defaults, then config file, then flags
    pub fn to_config(&self) -> Result<ExtractorConfig> {
        let mut config = ExtractorConfig::load(self.config.as_deref())?;

        if let Some(path) = &self.input_path {
            config = config.with_input_path(path);
        }
        if let Some(path) = &self.output_path {
            config = config.with_output_path(path);
        }
        if let Some(sink) = self.sink {
            config = config.with_sink(match sink {
                SinkArg::File => SinkKind::File,
                SinkArg::Storage => SinkKind::Storage,
            });
        }
        if let Some(url) = &self.database_url {
            config = config.with_database_url(url);
        }
        if let Some(batch_size) = self.batch_size {
            config = config.with_batch_size(batch_size);
        }
        if let Some(pairing) = self.resolve_pairing(config.pairing) {
            config = config.with_pairing(pairing);
        }
        if !self.show_progress() {
            config = config.without_progress();
        }

        config.validate()?;
        Ok(config)
    }

    /// `--window` alone adjusts an already-backward policy from the config file
    fn resolve_pairing(&self, current: PairingPolicy) -> Option<PairingPolicy> {
        let window = |fallback: usize| self.window.unwrap_or(fallback);

        match (self.pairing, current) {
            (Some(PairingArg::Forward), _) => Some(PairingPolicy::Forward),
            (Some(PairingArg::Backward), PairingPolicy::BackwardWindow { window: w }) => {
                Some(PairingPolicy::BackwardWindow { window: window(w) })
            }
            (Some(PairingArg::Backward), PairingPolicy::Forward) => {
                Some(PairingPolicy::BackwardWindow {
                    window: window(DEFAULT_BACKWARD_WINDOW),
                })
            }
            (None, PairingPolicy::BackwardWindow { window: w }) => self
                .window
                .map(|_| PairingPolicy::BackwardWindow { window: window(w) }),
            (None, PairingPolicy::Forward) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("dtc_extractor").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_bare_invocation_uses_defaults() {
        let args = parse(&[]);
        assert!(args.input_path.is_none());
        assert_eq!(args.get_log_level(), "warn");
        assert!(args.show_progress());
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "codes.cs",
            "-o",
            "out.json",
            "--sink",
            "storage",
            "--database-url",
            "sqlite::memory:",
            "--batch-size",
            "10",
            "--pairing",
            "backward",
            "--window",
            "2",
            "-q",
        ]);
        let config = ExtractorConfig::default();
        let pairing = args.resolve_pairing(config.pairing);
        assert_eq!(pairing, Some(PairingPolicy::BackwardWindow { window: 2 }));
        assert_eq!(args.sink, Some(SinkArg::Storage));
        assert_eq!(args.batch_size, Some(10));
        assert!(!args.show_progress());
        assert_eq!(args.get_log_level(), "error");
    }

    #[test]
    fn test_backward_without_window_uses_default() {
        let args = parse(&["--pairing", "backward"]);
        assert_eq!(
            args.resolve_pairing(PairingPolicy::Forward),
            Some(PairingPolicy::BackwardWindow { window: 3 })
        );
    }

    #[test]
    fn test_window_alone_keeps_forward() {
        let args = parse(&["--window", "7"]);
        assert_eq!(args.resolve_pairing(PairingPolicy::Forward), None);
        assert_eq!(
            args.resolve_pairing(PairingPolicy::BackwardWindow { window: 3 }),
            Some(PairingPolicy::BackwardWindow { window: 7 })
        );
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["-v"]).get_log_level(), "info");
        assert_eq!(parse(&["-vv"]).get_log_level(), "debug");
        assert_eq!(parse(&["-vvvv"]).get_log_level(), "trace");
    }
}
