//! Progress and result reporting.
//!
//! The orchestrator drives a [`Reporter`] through every step of a run. The
//! [`ConsoleReporter`] renders the plain-text console transcript; its lines
//! are stable and free of color so they can be compared byte for byte.

use crate::types::{Diagnostic, ProjectRunResult};
use crate::verdict::RunVerdict;
use std::io::{self, Write};
use std::path::Path;

/// Receives run progress from the orchestrator.
pub trait Reporter {
    /// The registry is closed and ready to run.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn registry_ready(&mut self, analyzers: usize, plugins: usize) -> io::Result<()>;

    /// A project is about to be opened.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn project_loading(&mut self, path: &Path) -> io::Result<()>;

    /// A project was opened and is about to be analyzed.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn project_analyzing(&mut self, name: &str) -> io::Result<()>;

    /// An analyzer is about to run.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn analyzer_started(&mut self, full_name: &str) -> io::Result<()>;

    /// An interesting diagnostic was retained.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()>;

    /// A project finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn project_finished(&mut self, result: &ProjectRunResult) -> io::Result<()>;

    /// The run completed with a verdict.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    fn run_finished(&mut self, verdict: RunVerdict) -> io::Result<()>;
}

/// Writes the console transcript to any [`Write`] sink.
#[derive(Debug)]
pub struct ConsoleReporter<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReporter<W> {
    /// Creates a reporter writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl ConsoleReporter<io::Stdout> {
    /// Creates a reporter writing to standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter for ConsoleReporter<W> {
    fn registry_ready(&mut self, analyzers: usize, plugins: usize) -> io::Result<()> {
        writeln!(self.out, "Found {analyzers} diagnostics in {plugins} DLL(s).")
    }

    fn project_loading(&mut self, path: &Path) -> io::Result<()> {
        writeln!(self.out, "Loading {}", path.display())
    }

    fn project_analyzing(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.out, "Analyzing project {name}")
    }

    fn analyzer_started(&mut self, full_name: &str) -> io::Result<()> {
        writeln!(self.out, "...with {full_name}")
    }

    fn diagnostic(&mut self, diagnostic: &Diagnostic) -> io::Result<()> {
        writeln!(self.out, "{diagnostic}")
    }

    fn project_finished(&mut self, result: &ProjectRunResult) -> io::Result<()> {
        writeln!(
            self.out,
            "Found {} interesting results for {}",
            result.count(),
            result.project
        )?;
        if result.is_clean() {
            writeln!(self.out, "Good job!")?;
        }
        Ok(())
    }

    fn run_finished(&mut self, _verdict: RunVerdict) -> io::Result<()> {
        writeln!(self.out, "End of diagnostics")?;
        self.out.flush()
    }
}
