//! The analysis run.

use anyhow::{Context, Result};
use lintgate_analyzers::builtin_catalog;
use lintgate_core::{
    AnalyzerRegistry, Config, ConfigOrigin, ConsoleReporter, FsProjectSource, MalformedArgsPolicy,
    Orchestrator, PluginLoader, RunReport, RunVerdict,
};
use std::path::{Path, PathBuf};

use crate::args::{self, USAGE};
use crate::exit_codes;

/// Overrides the user configuration directory.
const CONFIG_DIR_ENV: &str = "LINTGATE_CONFIG_DIR";

/// Inputs of a run, as given on the command line.
pub struct RunOptions<'a> {
    /// Raw slash-switch tokens.
    pub tokens: &'a [String],
    /// Explicit `--config` path.
    pub config: Option<&'a Path>,
    /// `--json` output path.
    pub json: Option<&'a Path>,
}

/// Runs plugins against projects and returns the process exit code.
///
/// # Errors
///
/// Returns an error for any tooling failure: configuration, plugin loading,
/// project loading, analysis or output.
pub fn run(options: &RunOptions<'_>) -> Result<u8> {
    let invocation = args::parse(options.tokens);
    if invocation.malformed {
        println!("{USAGE}");
    }
    for warning in &invocation.warnings {
        println!("{warning}");
    }

    let work_dir = std::env::current_dir().context("cannot determine working directory")?;
    let origin = ConfigOrigin::locate(&work_dir, options.config, user_config_dir().as_deref());
    let config = load_config(&origin)?;

    if invocation.malformed && config.run.on_malformed_args == MalformedArgsPolicy::Abort {
        tracing::warn!("Malformed command line, aborting");
        return Ok(exit_codes::USAGE);
    }

    let source = FsProjectSource::from_config(&config.project)
        .context("invalid [project] configuration")?;

    let catalog = builtin_catalog();
    let mut loader = PluginLoader::new(&catalog);
    let registry = AnalyzerRegistry::from_plugins(&mut loader, &invocation.analyzers)
        .context("failed to load plugins")?
        .close(&config);

    tracing::info!(
        "Analyzing {} project(s) with {} analyzer(s)",
        invocation.projects.len(),
        registry.len()
    );

    let report = Orchestrator::new(&registry, source)
        .config(&config)
        .run(&invocation.projects, &mut ConsoleReporter::stdout())
        .context("run aborted")?;

    if let Some(path) = options.json {
        write_json(&report, path)?;
    }

    Ok(match report.verdict {
        RunVerdict::Pass => exit_codes::SUCCESS,
        RunVerdict::Fail => exit_codes::FINDINGS,
    })
}

/// `$LINTGATE_CONFIG_DIR`, else `~/.lintgate`.
fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os(CONFIG_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| home::home_dir().map(|home| home.join(".lintgate")))
}

fn load_config(origin: &ConfigOrigin) -> Result<Config> {
    match origin {
        ConfigOrigin::BuiltIn => tracing::debug!("No config file found, using defaults"),
        ConfigOrigin::UserDir(path) => tracing::info!("Using user config: {}", path.display()),
        ConfigOrigin::Flag(path) | ConfigOrigin::WorkDir(path) => {
            tracing::debug!("Using config: {}", path.display());
        }
    }
    origin.load().with_context(|| match origin.path() {
        Some(path) => format!("Failed to load config: {}", path.display()),
        None => "Failed to load config".to_string(),
    })
}

fn write_json(report: &RunReport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("failed to serialize run report")?;
    std::fs::write(path, json)
        .with_context(|| format!("failed to write run report: {}", path.display()))?;
    tracing::debug!("Wrote run report to {}", path.display());
    Ok(())
}
