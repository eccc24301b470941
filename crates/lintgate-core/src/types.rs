//! Core types for diagnostics and run results.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics.
///
/// Ordered from least to most important. `Hidden` diagnostics are produced
/// by analyzers but never count towards the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Invisible finding, excluded from pass/fail decisions.
    Hidden,
    /// Informational message.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl Severity {
    /// Returns `true` if diagnostics at this severity count towards the verdict.
    #[must_use]
    pub fn is_interesting(self) -> bool {
        self != Self::Hidden
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hidden => write!(f, "hidden"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hidden" => Ok(Self::Hidden),
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity `{other}`, expected: hidden, info, warning, error"
            )),
        }
    }
}

/// Where a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Location {
    /// Applies to the project as a whole.
    Project,
    /// A position inside a source file.
    Source {
        /// File path relative to the project root.
        file: PathBuf,
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
    },
}

impl Location {
    /// Creates a source location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self::Source {
            file: file.into(),
            line,
            column,
        }
    }

    /// Creates a source location from a `proc_macro2` span start.
    #[must_use]
    pub fn from_span(file: impl Into<PathBuf>, span: proc_macro2::Span) -> Self {
        let start = span.start();
        Self::new(file, start.line, start.column + 1)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Project => write!(f, "<project>"),
            Self::Source { file, line, column } => {
                write!(f, "{}:{line}:{column}", file.display())
            }
        }
    }
}

/// A finding produced by one analyzer for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Diagnostic identifier (e.g., "ACME001").
    pub id: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Where the finding applies.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            location,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Interesting diagnostics for one project across all analyzers.
///
/// Only non-hidden diagnostics are ever stored, so [`count`](Self::count)
/// always equals the number of interesting findings. Serialized output
/// carries `count` alongside the diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRunResult {
    /// Project name.
    pub project: String,
    diagnostics: Vec<Diagnostic>,
}

impl ProjectRunResult {
    pub(crate) fn new(project: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        debug_assert!(diagnostics.iter().all(|d| d.severity.is_interesting()));
        Self {
            project: project.into(),
            diagnostics,
        }
    }

    /// Retained diagnostics in analyzer order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of interesting diagnostics.
    #[must_use]
    pub fn count(&self) -> usize {
        self.diagnostics.len()
    }

    /// Returns `true` if the project produced no interesting diagnostics.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Counts retained diagnostics by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let of = |severity| {
            self.diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .count()
        };
        (of(Severity::Error), of(Severity::Warning), of(Severity::Info))
    }
}

impl Serialize for ProjectRunResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("ProjectRunResult", 3)?;
        state.serialize_field("project", &self.project)?;
        state.serialize_field("diagnostics", &self.diagnostics)?;
        state.serialize_field("count", &self.count())?;
        state.end()
    }
}
