//! The analyzer capability contract.

use crate::compilation::Compilation;
use crate::types::Diagnostic;

/// A pluggable check that inspects a compiled project and produces diagnostics.
///
/// Instances are created by an [`AnalyzerCatalog`](crate::AnalyzerCatalog)
/// factory while plugin manifests are loaded, then reused unchanged for every
/// project in the run.
///
/// # Example
///
/// ```ignore
/// use lintgate_core::{Analyzer, AnalysisError, Compilation, Diagnostic, Location, Severity};
///
/// pub struct RequireReadme {
///     name: String,
/// }
///
/// impl Analyzer for RequireReadme {
///     fn full_name(&self) -> &str { &self.name }
///
///     fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError> {
///         if compilation.root.join("README.md").exists() {
///             return Ok(vec![]);
///         }
///         Ok(vec![Diagnostic::new(
///             "DOC001",
///             Severity::Warning,
///             Location::Project,
///             "Project should have a README.md",
///         )])
///     }
/// }
/// ```
pub trait Analyzer: Send + Sync {
    /// Returns the fully qualified name, `<module>::<type>`.
    fn full_name(&self) -> &str;

    /// Returns a brief description of what this analyzer checks.
    fn description(&self) -> &str {
        ""
    }

    /// Analyzes a compiled project.
    ///
    /// # Errors
    ///
    /// Returns an error if the analyzer cannot complete. The run treats this
    /// as fatal.
    fn analyze(&self, compilation: &Compilation) -> Result<Vec<Diagnostic>, AnalysisError>;
}

/// Type alias for boxed Analyzer trait objects.
pub type AnalyzerBox = Box<dyn Analyzer>;

/// Failure raised by an analyzer while it runs.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct AnalysisError {
    message: String,
}

impl AnalysisError {
    /// Creates a new analysis error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
