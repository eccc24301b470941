//! # lintgate-core
//!
//! Core framework for a plugin-driven static analysis gate.
//!
//! Analyzers are discovered from plugin manifests, run against each project
//! in turn, and their diagnostics are reduced to a pass/fail verdict. This
//! crate provides:
//!
//! - [`Analyzer`] trait implemented by every analyzer instance
//! - [`AnalyzerCatalog`] mapping manifest `kind`s to analyzer factories
//! - [`PluginLoader`] for manifests, their dependencies and inheritance
//! - [`AnalyzerRegistry`] accumulating analyzers in discovery order
//! - [`Orchestrator`] running projects × analyzers, fail-fast
//! - [`ProjectAccumulator`] and [`RunVerdict`] for aggregation
//! - [`ConsoleReporter`] rendering the console transcript
//!
//! ## Example
//!
//! ```ignore
//! use lintgate_core::{
//!     AnalyzerRegistry, Config, ConsoleReporter, FsProjectSource, Orchestrator, PluginLoader,
//! };
//!
//! let catalog = my_catalog();
//! let mut loader = PluginLoader::new(&catalog);
//! let registry = AnalyzerRegistry::from_plugins(&mut loader, &["rules/acme.toml"])?
//!     .close(&Config::default());
//!
//! let report = Orchestrator::new(&registry, FsProjectSource::default())
//!     .run(&["./my-crate".into()], &mut ConsoleReporter::stdout())?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod analyzer;
mod catalog;
mod compilation;
mod config;
mod orchestrator;
mod project;
mod registry;
mod report;
mod types;
mod verdict;

pub mod plugin;

pub use aggregate::{aggregate, ProjectAccumulator};
pub use analyzer::{AnalysisError, Analyzer, AnalyzerBox};
pub use catalog::{AnalyzerCatalog, AnalyzerFactory, AnalyzerSpec, FactoryError, TypeOptions};
pub use compilation::{Compilation, SourceUnit};
pub use config::{
    AnalyzerConfig, Config, ConfigError, ConfigOrigin, MalformedArgsPolicy, ProjectConfig,
    RunConfig, USER_CONFIG_FILE, WORK_DIR_CONFIG_FILES,
};
pub use orchestrator::{Orchestrator, RunError, RunState};
pub use plugin::{ModuleIdentity, ModuleRegistry, PluginLoadError, PluginLoader, PluginModule};
pub use project::{FsProjectSource, ProjectLoadError, ProjectSource, ProjectUnit};
pub use registry::{AnalyzerRegistry, ClosedRegistry};
pub use report::{ConsoleReporter, Reporter};
pub use types::{Diagnostic, Location, ProjectRunResult, Severity};
pub use verdict::{RunReport, RunVerdict};
