//! DTC Extractor Library
//!
//! Converts OBD-II diagnostic trouble code tables written as C# enums with
//! `[Category(...), Description("...")]` attributes into normalized records.
//!
//! This library provides tools for:
//! - Classifying source lines as code declarations, annotations or noise
//! - Pairing each code with its annotation in a single pass
//! - Deriving severity and affected vehicle system for each code
//! - Writing entries to a JSON document or a SQLite table in batches

pub mod assembler;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod constants;
pub mod emitter;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod severity;

pub use assembler::{EntryAssembler, PairingPolicy};
pub use classifier::{LineClassifier, LineKind};
pub use config::{ExtractorConfig, SinkKind};
pub use error::{DtcError, Result};
pub use models::{CodeToken, DtcEntry, DtcRecord, Severity};
