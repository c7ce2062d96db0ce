//! JSON file sink.

use crate::error::{DtcError, Result};
use crate::models::{DtcEntry, EmitReport};
use std::path::Path;
use tracing::{debug, info};

/// Serialize `entries` as a pretty-printed JSON array, replacing any
/// existing file at `path`
pub fn write_json(entries: &[DtcEntry], path: &Path) -> Result<EmitReport> {
    let mut document = serde_json::to_string_pretty(entries)?;
    document.push('\n');

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| DtcError::OutputWrite {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    std::fs::write(path, document.as_bytes()).map_err(|source| DtcError::OutputWrite {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("Wrote {} bytes to {}", document.len(), path.display());
    info!("Wrote {} entries to {}", entries.len(), path.display());

    Ok(EmitReport {
        written: entries.len(),
        skipped: 0,
        batches: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(code: &str, category: &str, description: &str) -> DtcEntry {
        DtcEntry {
            code: code.parse().unwrap(),
            category: category.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_writes_array_without_derived_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.json");
        let entries = vec![entry("P0100", "Powertrain", "MAF circuit")];

        let report = write_json(&entries, &path).unwrap();
        assert_eq!(report.written, 1);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let records = value.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["code"], "P0100");
        assert_eq!(records[0]["category"], "Powertrain");
        assert_eq!(records[0]["description"], "MAF circuit");
        assert!(records[0].get("severity").is_none());
        assert!(records[0].get("affectedSystem").is_none());
    }

    #[test]
    fn test_empty_entries_write_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.json");

        write_json(&[], &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]\n");
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("codes.json");
        std::fs::write(&path, "stale contents that are much longer than the output").unwrap();

        write_json(&[entry("B0002", "Body", "Airbag fault")], &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(!contents.contains("stale"));
        assert!(contents.contains("B0002"));
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out").join("nested").join("codes.json");

        write_json(&[entry("U0100", "Network", "Lost comms")], &path).unwrap();
        assert!(path.exists());
    }
}
