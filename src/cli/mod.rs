//! CLI argument parsing for ci-checks.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// ci-checks: run repository validation checks and gate CI on the verdict.
///
/// Exit codes: 0 when the suite passes or only warns, 1 when it fails,
/// 2 for invalid input such as a missing root path or a bad config file.
#[derive(Parser, Debug)]
#[command(name = "ci-checks")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level (overrides CI_CHECKS_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available commands for ci-checks.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run checks against a source tree.
    ///
    /// Runs every registered check unless --checks names a subset.
    /// Unknown check names are logged and skipped.
    Run(RunArgs),

    /// List available checks.
    List(ListArgs),
}

/// Output format for reports and listings.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable console output.
    #[default]
    Text,
    /// Pretty-printed JSON with camelCase field names.
    Json,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Root directory to check (defaults to the current directory).
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Comma-separated check names to run (defaults to all).
    #[arg(short, long, value_delimiter = ',')]
    pub checks: Vec<String>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Config file (defaults to .ci-checks.yaml under the root, if present).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the `list` command.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl Cli {
    /// Parse command line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
