//! lintgate CLI tool.
//!
//! Usage:
//! ```bash
//! lintgate /analyzer rules/acme.toml /project ./my-crate
//! lintgate --json report.json /analyzer a.toml /analyzer b.toml /project .
//! lintgate --list-kinds
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod args;
mod commands;
mod exit_codes;

/// Runs analyzer plugins against Rust projects and gates on the findings
#[derive(Parser)]
#[command(name = "lintgate")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Arguments:\n  /project <path>     Project directory or Cargo.toml (repeatable)\n  /analyzer <path>    Plugin manifest (repeatable)\n\nExit status: 0 pass, 1 findings, 2 tool failure, 3 usage abort")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the run report as JSON to this file
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// List the built-in analyzer kinds and exit
    #[arg(long)]
    list_kinds: bool,

    /// `/project <path>` and `/analyzer <path>` pairs
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    args: Vec<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.list_kinds {
        commands::list_kinds::run();
        return ExitCode::from(exit_codes::SUCCESS);
    }

    let options = commands::run::RunOptions {
        tokens: &cli.args,
        config: cli.config.as_deref(),
        json: cli.json.as_deref(),
    };

    match commands::run::run(&options) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::debug!("Run failed: {e:?}");
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_codes::TOOL_FAILURE)
        }
    }
}
