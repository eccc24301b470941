//! Run-level pass/fail decision.

use crate::types::ProjectRunResult;
use serde::{Deserialize, Serialize};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunVerdict {
    /// No project produced interesting diagnostics.
    Pass,
    /// At least one project did.
    Fail,
}

impl RunVerdict {
    /// Folds project results into a verdict.
    #[must_use]
    pub fn resolve(results: &[ProjectRunResult]) -> Self {
        if results.iter().all(ProjectRunResult::is_clean) {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    /// Returns `true` for [`RunVerdict::Pass`].
    #[must_use]
    pub fn is_pass(self) -> bool {
        self == Self::Pass
    }
}

impl std::fmt::Display for RunVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// One result per project, in command-line order.
    pub results: Vec<ProjectRunResult>,
    /// The verdict over all results.
    pub verdict: RunVerdict,
}

impl RunReport {
    /// Builds a report and resolves its verdict.
    #[must_use]
    pub fn new(results: Vec<ProjectRunResult>) -> Self {
        let verdict = RunVerdict::resolve(&results);
        Self { results, verdict }
    }

    /// Interesting diagnostics across all projects.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.results.iter().map(ProjectRunResult::count).sum()
    }
}
