//! Entry assembly from classified lines.
//!
//! The assembler is a single-pass reducer. It owns the pending slots and
//! emits a [`DtcEntry`] whenever a code and an annotation are paired under
//! the configured [`PairingPolicy`].

use crate::classifier::LineKind;
use crate::constants::DEFAULT_BACKWARD_WINDOW;
use crate::models::{AnnotationToken, CodeToken, DtcEntry, ExtractionStats};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// How codes and annotations are paired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PairingPolicy {
    #[default]
    /// The next annotation after a pending code closes it, at any distance.
    /// A second code before that annotation replaces the first.
    Forward,
    /// A code takes the most recent annotation seen within `window` lines
    /// before it. Each annotation is attached to at most one code.
    BackwardWindow { window: usize },
}

impl PairingPolicy {
    pub fn backward() -> Self {
        PairingPolicy::BackwardWindow {
            window: DEFAULT_BACKWARD_WINDOW,
        }
    }
}

/// Stateful reducer over classified lines
#[derive(Debug)]
pub struct EntryAssembler {
    policy: PairingPolicy,
    pending_code: Option<CodeToken>,
    pending_category: Option<String>,
    pending_description: Option<String>,
    /// Line number of the pending annotation, used by the backward window
    annotation_line: Option<usize>,
    entries: Vec<DtcEntry>,
    stats: ExtractionStats,
}

impl EntryAssembler {
    pub fn new(policy: PairingPolicy) -> Self {
        Self {
            policy,
            pending_code: None,
            pending_category: None,
            pending_description: None,
            annotation_line: None,
            entries: Vec::new(),
            stats: ExtractionStats::default(),
        }
    }

    /// Feed the classification of line `line_number` (zero based)
    pub fn push(&mut self, line_number: usize, kind: LineKind) {
        self.stats.lines_read += 1;

        match kind {
            LineKind::Ignore => self.stats.lines_ignored += 1,
            LineKind::CodeDeclaration(code) => {
                self.stats.code_declarations += 1;
                match self.policy {
                    PairingPolicy::Forward => self.forward_code(code),
                    PairingPolicy::BackwardWindow { window } => {
                        self.backward_code(line_number, code, window)
                    }
                }
            }
            LineKind::Annotation(annotation) => {
                self.stats.annotations += 1;
                match self.policy {
                    PairingPolicy::Forward => self.forward_annotation(annotation),
                    PairingPolicy::BackwardWindow { .. } => {
                        self.backward_annotation(line_number, annotation)
                    }
                }
            }
        }
    }

    /// End the input. Pending state is dropped, never emitted.
    pub fn finish(mut self) -> (Vec<DtcEntry>, ExtractionStats) {
        if let Some(code) = self.pending_code.take() {
            debug!("Dropping unpaired code {} at end of input", code);
            self.stats.codes_unpaired_at_end += 1;
        }
        self.stats.entries_assembled = self.entries.len();
        (self.entries, self.stats)
    }

    fn forward_code(&mut self, code: CodeToken) {
        if let Some(previous) = self.pending_code.replace(code) {
            debug!("Code {} overwritten before it was annotated", previous);
            self.stats.codes_overwritten += 1;
        }
    }

    fn forward_annotation(&mut self, annotation: AnnotationToken) {
        self.pending_category = Some(annotation.category);
        self.pending_description = Some(annotation.description);

        if self.pending_code.is_some() {
            self.emit_pending();
        } else {
            trace!("Annotation with no pending code");
            self.stats.orphan_annotations += 1;
        }
    }

    fn backward_code(&mut self, line_number: usize, code: CodeToken, window: usize) {
        let in_window = self
            .annotation_line
            .is_some_and(|at| line_number.saturating_sub(at) <= window);

        if in_window {
            self.pending_code = Some(code);
            self.emit_pending();
        } else {
            debug!(
                "No annotation within {} lines before code {} on line {}",
                window,
                code,
                line_number + 1
            );
            self.stats.codes_outside_window += 1;
        }
    }

    fn backward_annotation(&mut self, line_number: usize, annotation: AnnotationToken) {
        if self.pending_category.is_some() {
            self.stats.orphan_annotations += 1;
        }
        self.pending_category = Some(annotation.category);
        self.pending_description = Some(annotation.description);
        self.annotation_line = Some(line_number);
    }

    /// Assemble an entry from all three slots and clear them
    fn emit_pending(&mut self) {
        let code = self.pending_code.take();
        let category = self.pending_category.take();
        let description = self.pending_description.take();
        self.annotation_line = None;

        if let (Some(code), Some(category), Some(description)) = (code, category, description) {
            trace!("Assembled {} ({})", code, category);
            self.entries.push(DtcEntry {
                code,
                category,
                description,
            });
        }
    }
}
