//! Run orchestration: projects × analyzers, in order, fail-fast.

use crate::aggregate::ProjectAccumulator;
use crate::analyzer::AnalysisError;
use crate::config::Config;
use crate::project::{ProjectLoadError, ProjectSource};
use crate::registry::ClosedRegistry;
use crate::report::Reporter;
use crate::types::{Diagnostic, ProjectRunResult};
use crate::verdict::RunReport;

use std::cell::Cell;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum RunError {
    /// A project could not be opened or compiled.
    #[error(transparent)]
    ProjectLoad(#[from] ProjectLoadError),

    /// An analyzer failed.
    #[error("analyzer {analyzer} failed on project {project}: {source}")]
    Analysis {
        /// Full name of the failing analyzer.
        analyzer: String,
        /// Project being analyzed.
        project: String,
        /// Error the analyzer returned.
        source: AnalysisError,
    },

    /// Progress output could not be written.
    #[error("failed to write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// Nothing has happened yet.
    Idle,
    /// Plugins are being loaded.
    Loading,
    /// The registry is closed.
    Registered,
    /// Analyzing the project at this index.
    Analyzing(usize),
    /// Every project has a result.
    Aggregated,
    /// The verdict is known.
    Resolved,
    /// A fatal error stopped the run.
    Aborted,
}

/// Logs a run state change at debug level.
pub(crate) fn log_transition(from: RunState, to: RunState) {
    debug!("Run state: {from:?} -> {to:?}");
}

/// Runs every analyzer of a closed registry against every project.
///
/// Projects run in the order given; within a project, analyzers run in
/// registry order. The first error stops the run.
pub struct Orchestrator<'a, S: ProjectSource> {
    registry: &'a ClosedRegistry,
    source: S,
    config: Option<&'a Config>,
    state: Cell<RunState>,
}

impl<'a, S: ProjectSource> Orchestrator<'a, S> {
    /// Creates an orchestrator over a closed registry.
    ///
    /// Loading and closing already happened in [`AnalyzerRegistry`], so the
    /// run starts out [`RunState::Registered`].
    ///
    /// [`AnalyzerRegistry`]: crate::AnalyzerRegistry
    pub fn new(registry: &'a ClosedRegistry, source: S) -> Self {
        Self {
            registry,
            source,
            config: None,
            state: Cell::new(RunState::Registered),
        }
    }

    /// Applies per-analyzer severity overrides from `config`.
    #[must_use]
    pub fn config(mut self, config: &'a Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> RunState {
        self.state.get()
    }

    /// Executes the run and reports progress.
    ///
    /// # Errors
    ///
    /// Returns the first project load, analysis, or reporting failure.
    /// Results for projects finished before the failure are discarded.
    pub fn run<R: Reporter + ?Sized>(
        &self,
        projects: &[PathBuf],
        reporter: &mut R,
    ) -> Result<RunReport, RunError> {
        let outcome = self.run_inner(projects, reporter);
        if outcome.is_err() {
            self.transition(RunState::Aborted);
        }
        outcome
    }

    fn run_inner<R: Reporter + ?Sized>(
        &self,
        projects: &[PathBuf],
        reporter: &mut R,
    ) -> Result<RunReport, RunError> {
        info!(
            "Running {} analyzer(s) against {} project(s)",
            self.registry.len(),
            projects.len()
        );
        reporter.registry_ready(self.registry.len(), self.registry.plugin_count())?;

        let mut results = Vec::with_capacity(projects.len());
        for (index, path) in projects.iter().enumerate() {
            self.transition(RunState::Analyzing(index));
            results.push(self.run_project(path, reporter)?);
        }
        self.transition(RunState::Aggregated);

        let report = RunReport::new(results);
        self.transition(RunState::Resolved);
        info!(
            "Run finished: {} interesting result(s), verdict {}",
            report.total_count(),
            report.verdict
        );

        reporter.run_finished(report.verdict)?;
        Ok(report)
    }

    fn run_project<R: Reporter + ?Sized>(
        &self,
        path: &Path,
        reporter: &mut R,
    ) -> Result<ProjectRunResult, RunError> {
        reporter.project_loading(path)?;
        let project = self.source.open(path)?;
        reporter.project_analyzing(&project.name)?;
        let compilation = self.source.compile(&project)?;

        let mut accumulator = ProjectAccumulator::new(project.name.clone());
        for analyzer in self.registry.iter() {
            let full_name = analyzer.full_name();
            reporter.analyzer_started(full_name)?;
            debug!("Running {full_name} on {}: {}", project.name, analyzer.description());

            let diagnostics =
                analyzer
                    .analyze(&compilation)
                    .map_err(|source| RunError::Analysis {
                        analyzer: full_name.to_string(),
                        project: project.name.clone(),
                        source,
                    })?;
            let diagnostics = self.apply_severity_override(full_name, diagnostics);

            for diagnostic in accumulator.absorb(diagnostics) {
                reporter.diagnostic(diagnostic)?;
            }
        }

        if accumulator.hidden_count() > 0 {
            debug!(
                "Dropped {} hidden diagnostic(s) for {}",
                accumulator.hidden_count(),
                project.name
            );
        }

        let result = accumulator.finish();
        reporter.project_finished(&result)?;
        Ok(result)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        full_name: &str,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Vec<Diagnostic> {
        if let Some(severity) = self.config.and_then(|c| c.analyzer_severity(full_name)) {
            for d in &mut diagnostics {
                d.severity = severity;
            }
        }
        diagnostics
    }

    fn transition(&self, next: RunState) {
        log_transition(self.state.get(), next);
        self.state.set(next);
    }
}
