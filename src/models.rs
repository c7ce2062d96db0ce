//! Core data structures for DTC extraction.
//!
//! Defines the validated code token, annotations, assembled entries, the
//! enriched storage record and per-run statistics.

use crate::error::{DtcError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Leading letter of an OBD-II trouble code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CodeLetter {
    /// Powertrain
    P,
    /// Chassis
    C,
    /// Body
    B,
    /// Network
    U,
}

impl CodeLetter {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'P' => Some(CodeLetter::P),
            'C' => Some(CodeLetter::C),
            'B' => Some(CodeLetter::B),
            'U' => Some(CodeLetter::U),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            CodeLetter::P => 'P',
            CodeLetter::C => 'C',
            CodeLetter::B => 'B',
            CodeLetter::U => 'U',
        }
    }
}

/// A diagnostic trouble code such as `P0100`
///
/// The suffix is always four uppercase hexadecimal digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodeToken {
    letter: CodeLetter,
    suffix: [u8; 4],
}

impl CodeToken {
    /// Parse a code, rejecting lowercase, wrong length or letters outside {P, C, B, U}
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || DtcError::InvalidCode {
            value: value.to_string(),
        };

        let mut chars = value.chars();
        let letter = chars
            .next()
            .and_then(CodeLetter::from_char)
            .ok_or_else(invalid)?;

        let rest = chars.as_str().as_bytes();
        if rest.len() != 4 || !rest.iter().all(|b| matches!(b, b'0'..=b'9' | b'A'..=b'F')) {
            return Err(invalid());
        }

        let mut suffix = [0u8; 4];
        suffix.copy_from_slice(rest);
        Ok(Self { letter, suffix })
    }

    pub fn letter(&self) -> CodeLetter {
        self.letter
    }

    pub fn suffix(&self) -> &str {
        // Validated as ASCII hex digits on construction
        std::str::from_utf8(&self.suffix).unwrap_or_default()
    }
}

impl FromStr for CodeToken {
    type Err = DtcError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CodeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.letter.as_char(), self.suffix())
    }
}

impl Serialize for CodeToken {
    fn serialize<S: serde::Serializer>(
        &self,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CodeToken {
    fn deserialize<D: serde::Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        CodeToken::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Category and description taken from a single attribute line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationToken {
    pub category: String,
    pub description: String,
}

/// An assembled code with its annotation, as written by the file sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DtcEntry {
    pub code: CodeToken,
    pub category: String,
    pub description: String,
}

/// Severity rank derived from the code letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type)]
#[sqlx(type_name = "TEXT", rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry enriched with derived fields, as persisted by the storage sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DtcRecord {
    pub code: CodeToken,
    pub description: String,
    pub category: String,
    pub severity: Severity,
    pub affected_system: String,
}

/// Extraction statistics for one run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractionStats {
    pub lines_read: usize,
    pub lines_ignored: usize,
    pub code_declarations: usize,
    pub annotations: usize,
    pub entries_assembled: usize,
    /// Codes replaced by a later code before any annotation arrived
    pub codes_overwritten: usize,
    /// Codes with no annotation inside the backward window
    pub codes_outside_window: usize,
    /// Annotations seen while no code was pending
    pub orphan_annotations: usize,
    /// Codes still pending when the input ended
    pub codes_unpaired_at_end: usize,
}

/// Outcome of writing entries to a sink
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EmitReport {
    /// Rows or records actually written
    pub written: usize,
    /// Rows skipped because the code already existed
    pub skipped: usize,
    pub batches: usize,
}

/// Summary of a complete run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub stats: ExtractionStats,
    pub report: EmitReport,
    pub processing_time: Duration,
}
