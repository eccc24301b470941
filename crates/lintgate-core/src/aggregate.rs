//! Severity filtering and per-project counting.

use crate::types::{Diagnostic, ProjectRunResult};

/// Collects the interesting diagnostics of one project, batch by batch.
#[derive(Debug)]
pub struct ProjectAccumulator {
    project: String,
    retained: Vec<Diagnostic>,
    hidden: usize,
}

impl ProjectAccumulator {
    /// Starts accumulating for a project.
    #[must_use]
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            retained: Vec::new(),
            hidden: 0,
        }
    }

    /// Absorbs one analyzer's diagnostics and returns the ones retained,
    /// in their original order.
    pub fn absorb(&mut self, batch: Vec<Diagnostic>) -> &[Diagnostic] {
        let start = self.retained.len();
        for diagnostic in batch {
            if diagnostic.severity.is_interesting() {
                self.retained.push(diagnostic);
            } else {
                self.hidden += 1;
            }
        }
        &self.retained[start..]
    }

    /// Number of hidden diagnostics dropped so far.
    #[must_use]
    pub fn hidden_count(&self) -> usize {
        self.hidden
    }

    /// Produces the project's result.
    #[must_use]
    pub fn finish(self) -> ProjectRunResult {
        ProjectRunResult::new(self.project, self.retained)
    }
}

/// Aggregates a whole raw diagnostic sequence for one project.
#[must_use]
pub fn aggregate(project: impl Into<String>, diagnostics: Vec<Diagnostic>) -> ProjectRunResult {
    let mut accumulator = ProjectAccumulator::new(project);
    accumulator.absorb(diagnostics);
    accumulator.finish()
}
