//! Application constants for the DTC extractor
//!
//! Default paths, line patterns, batch sizing and the storage schema used
//! throughout the extractor.

// =============================================================================
// Default Paths
// =============================================================================

/// Source file read when no input path is given
pub const DEFAULT_INPUT_FILE: &str = "DTCCodes.cs";

/// JSON document written by the file sink when no output path is given
pub const DEFAULT_OUTPUT_FILE: &str = "dtc_codes.json";

/// Database used by the storage sink when no URL is given
pub const DEFAULT_DATABASE_URL: &str = "sqlite://dtc_codes.db";

/// Config file picked up from the working directory if present
pub const DEFAULT_CONFIG_FILE: &str = "dtc_extractor.toml";

// =============================================================================
// Line Patterns
// =============================================================================

/// Code declaration: letter from {P, C, B, U}, four uppercase hex digits,
/// assignment to a hex literal, optional trailing comma
pub const CODE_DECLARATION_PATTERN: &str =
    r"^([PCBU])([0-9A-F]{4})\s*=\s*0[xX][0-9A-Fa-f]+\s*,?$";

/// Attribute annotation: `[Category(Categories.X), Description("...")]`
pub const ANNOTATION_PATTERN: &str = r#"^\[\s*Category\(\s*([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)\s*\)\s*,\s*Description\(\s*"([^"]+)"\s*\)\s*\]\s*,?$"#;

/// Line prefixes that mark source-language boilerplate
pub const BOILERPLATE_PREFIXES: &[&str] = &[
    "using ",
    "namespace ",
    "module ",
    "import ",
    "{",
    "}",
    "enum ",
    "public enum ",
    "internal enum ",
    "///",
    "//",
    "/*",
    "*",
    "#region",
    "#endregion",
];

// =============================================================================
// Pairing and Batching
// =============================================================================

/// Lines searched backwards for an annotation by the backward-window policy
pub const DEFAULT_BACKWARD_WINDOW: usize = 3;

/// Records written per storage transaction
pub const DEFAULT_BATCH_SIZE: usize = 100;

// =============================================================================
// Storage Schema
// =============================================================================

/// Table holding extracted codes. `affectedSystem` keeps the column name
/// the web application's ORM schema reads.
pub const CREATE_DTC_TABLE_SQL: &str = r#"CREATE TABLE IF NOT EXISTS dtc_codes (
    code            TEXT PRIMARY KEY NOT NULL,
    description     TEXT NOT NULL,
    category        TEXT NOT NULL,
    severity        TEXT NOT NULL CHECK (severity IN ('low', 'medium', 'high')),
    affectedSystem  TEXT NOT NULL,
    created_at      TEXT NOT NULL
)"#;

// =============================================================================
// Affected Systems
// =============================================================================

pub mod systems {
    pub const ENGINE_AND_TRANSMISSION: &str = "Engine and Transmission";
    pub const BODY_ELECTRONICS: &str = "Body Electronics";
    pub const SUSPENSION_AND_BRAKING: &str = "Suspension and Braking";
    pub const COMMUNICATION_SYSTEMS: &str = "Communication Systems";
    pub const UNKNOWN: &str = "Unknown";
}
