//! Line classification for C#-style DTC enum sources.
//!
//! Each trimmed line becomes exactly one [`LineKind`]. Rules are checked in
//! priority order: boilerplate, code declaration, attribute annotation. Any
//! line that fails strict matching is ignored rather than reported.

use crate::constants::{ANNOTATION_PATTERN, BOILERPLATE_PREFIXES, CODE_DECLARATION_PATTERN};
use crate::error::Result;
use crate::models::{AnnotationToken, CodeToken};
use regex::Regex;

/// Classification of a single source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    Ignore,
    CodeDeclaration(CodeToken),
    Annotation(AnnotationToken),
}

/// Compiled line patterns
#[derive(Debug, Clone)]
pub struct LineClassifier {
    code_pattern: Regex,
    annotation_pattern: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Ok(Self {
            code_pattern: Regex::new(CODE_DECLARATION_PATTERN)?,
            annotation_pattern: Regex::new(ANNOTATION_PATTERN)?,
        })
    }

    /// Classify one line; surrounding whitespace is trimmed first
    pub fn classify(&self, line: &str) -> LineKind {
        let line = line.trim();

        if is_boilerplate(line) {
            return LineKind::Ignore;
        }

        if let Some(code) = self.match_code(line) {
            return LineKind::CodeDeclaration(code);
        }

        if let Some(annotation) = self.match_annotation(line) {
            return LineKind::Annotation(annotation);
        }

        LineKind::Ignore
    }

    fn match_code(&self, line: &str) -> Option<CodeToken> {
        let caps = self.code_pattern.captures(line)?;
        let code = format!("{}{}", &caps[1], &caps[2]);
        CodeToken::parse(&code).ok()
    }

    fn match_annotation(&self, line: &str) -> Option<AnnotationToken> {
        let caps = self.annotation_pattern.captures(line)?;

        // `Categories.Powertrain` -> `Powertrain`
        let category = caps[1].rsplit('.').next().unwrap_or_default();
        let description = &caps[2];

        if category.is_empty() || description.is_empty() {
            return None;
        }

        Some(AnnotationToken {
            category: category.to_string(),
            description: description.to_string(),
        })
    }
}

fn is_boilerplate(line: &str) -> bool {
    line.is_empty()
        || BOILERPLATE_PREFIXES
            .iter()
            .any(|prefix| line.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> LineClassifier {
        LineClassifier::new().unwrap()
    }

    fn code(value: &str) -> LineKind {
        LineKind::CodeDeclaration(CodeToken::parse(value).unwrap())
    }

    fn annotation(category: &str, description: &str) -> LineKind {
        LineKind::Annotation(AnnotationToken {
            category: category.to_string(),
            description: description.to_string(),
        })
    }

    #[test]
    fn test_code_declarations() {
        let c = classifier();
        assert_eq!(c.classify("P0100 = 0x0100,"), code("P0100"));
        assert_eq!(c.classify("  B0001 = 0x01,  "), code("B0001"));
        assert_eq!(c.classify("U3FFF=0x3FFF"), code("U3FFF"));
        assert_eq!(c.classify("C1A2B = 0X1A2B"), code("C1A2B"));
    }

    #[test]
    fn test_malformed_codes_ignored() {
        let c = classifier();
        assert_eq!(c.classify("p0100 = 0x0100,"), LineKind::Ignore);
        assert_eq!(c.classify("X0100 = 0x0100,"), LineKind::Ignore);
        assert_eq!(c.classify("P01a0 = 0x0100,"), LineKind::Ignore);
        assert_eq!(c.classify("P010 = 0x0100,"), LineKind::Ignore);
        assert_eq!(c.classify("P01000 = 0x0100,"), LineKind::Ignore);
        assert_eq!(c.classify("P0100 = 256,"), LineKind::Ignore);
        assert_eq!(c.classify("P0100 = 0x0100,,"), LineKind::Ignore);
    }

    #[test]
    fn test_annotations() {
        let c = classifier();
        assert_eq!(
            c.classify(
                r#"[Category(Categories.Powertrain), Description("Mass air flow sensor malfunction")]"#
            ),
            annotation("Powertrain", "Mass air flow sensor malfunction")
        );
        assert_eq!(
            c.classify(r#"[Category(Body), Description("Airbag fault")]"#),
            annotation("Body", "Airbag fault")
        );
        assert_eq!(
            c.classify(r#"[ Category( Vendor.Categories.Hydraulics ) , Description( "Pump" ) ],"#),
            annotation("Hydraulics", "Pump")
        );
    }

    #[test]
    fn test_malformed_annotations_ignored() {
        let c = classifier();
        assert_eq!(
            c.classify(r#"[Category(Categories.Body), Description("")]"#),
            LineKind::Ignore
        );
        assert_eq!(
            c.classify(r#"[Category(), Description("Airbag fault")]"#),
            LineKind::Ignore
        );
        assert_eq!(
            c.classify(r#"[Category(Categories.Body), Description("Air"bag")]"#),
            LineKind::Ignore
        );
        assert_eq!(
            c.classify(r#"[Description("Airbag fault")]"#),
            LineKind::Ignore
        );
    }

    #[test]
    fn test_boilerplate_ignored() {
        let c = classifier();
        for line in [
            "",
            "   ",
            "using System.ComponentModel;",
            "namespace Vehicle.Diagnostics",
            "{",
            "}",
            "};",
            "public enum DtcCodes : ushort",
            "enum Codes",
            "/// <summary>Powertrain codes</summary>",
            "// P0100 = 0x0100,",
            "#region Powertrain",
        ] {
            assert_eq!(c.classify(line), LineKind::Ignore, "line: {line:?}");
        }
    }

    #[test]
    fn test_commented_code_is_not_a_declaration() {
        let c = classifier();
        assert_eq!(c.classify("// P0100 = 0x0100,"), LineKind::Ignore);
    }
}
