//! Severity and affected-system derivation.
//!
//! Both lookups are total: unknown input falls back to `medium` and
//! `"Unknown"` respectively.

use crate::constants::systems;
use crate::models::{CodeLetter, CodeToken, DtcEntry, DtcRecord, Severity};

/// Derive `(severity, affected system)` for a code and its category
pub fn classify(code: &CodeToken, category: &str) -> (Severity, &'static str) {
    (severity_for(code.letter()), affected_system_for(category))
}

pub fn severity_for(letter: CodeLetter) -> Severity {
    match letter {
        CodeLetter::P => Severity::High,
        CodeLetter::C => Severity::Medium,
        CodeLetter::B => Severity::Low,
        CodeLetter::U => Severity::Medium,
    }
}

/// Exact, case-sensitive category match
pub fn affected_system_for(category: &str) -> &'static str {
    match category {
        "Powertrain" => systems::ENGINE_AND_TRANSMISSION,
        "Body" => systems::BODY_ELECTRONICS,
        "Chassis" => systems::SUSPENSION_AND_BRAKING,
        "Network" => systems::COMMUNICATION_SYSTEMS,
        _ => systems::UNKNOWN,
    }
}

impl From<&DtcEntry> for DtcRecord {
    fn from(entry: &DtcEntry) -> Self {
        let (severity, affected_system) = classify(&entry.code, &entry.category);
        Self {
            code: entry.code.clone(),
            description: entry.description.clone(),
            category: entry.category.clone(),
            severity,
            affected_system: affected_system.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(value: &str) -> CodeToken {
        value.parse().unwrap()
    }

    #[test]
    fn test_severity_by_letter() {
        assert_eq!(classify(&code("P0100"), "Powertrain").0, Severity::High);
        assert_eq!(classify(&code("C0035"), "Chassis").0, Severity::Medium);
        assert_eq!(classify(&code("B0001"), "Body").0, Severity::Low);
        assert_eq!(classify(&code("U0100"), "Network").0, Severity::Medium);
    }

    #[test]
    fn test_affected_system_by_category() {
        assert_eq!(affected_system_for("Powertrain"), "Engine and Transmission");
        assert_eq!(affected_system_for("Body"), "Body Electronics");
        assert_eq!(affected_system_for("Chassis"), "Suspension and Braking");
        assert_eq!(affected_system_for("Network"), "Communication Systems");
    }

    #[test]
    fn test_unknown_category_is_total() {
        assert_eq!(affected_system_for("Hydraulics"), "Unknown");
        assert_eq!(affected_system_for("powertrain"), "Unknown");
        assert_eq!(affected_system_for(""), "Unknown");

        // Severity still follows the letter
        let (severity, system) = classify(&code("P0A00"), "Hydraulics");
        assert_eq!(severity, Severity::High);
        assert_eq!(system, "Unknown");
    }

    #[test]
    fn test_record_from_entry() {
        let entry = DtcEntry {
            code: code("P0100"),
            category: "Powertrain".to_string(),
            description: "Mass air flow sensor malfunction".to_string(),
        };
        let record = DtcRecord::from(&entry);
        assert_eq!(record.severity, Severity::High);
        assert_eq!(record.affected_system, "Engine and Transmission");
        assert_eq!(record.description, entry.description);
    }
}
