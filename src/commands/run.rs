//! Implementation of the `ci-checks run` command.
//!
//! Resolves the root path, loads configuration, runs the requested checks,
//! and prints the suite report. The suite verdict becomes the exit code:
//! `Fail` or `Error` overall maps to [`CiError::ChecksFailed`].


use crate::cancel::CancellationToken;
use crate::checks::default_registry;
use crate::cli::RunArgs;
use crate::config::Config;
use crate::diagnostics::TracingLog;
use crate::error::{CiError, Result};
use crate::output::render_suite;
use crate::report::SuiteReport;
use crate::runner::SuiteRunner;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Root directory for a run: `path` if given, else the current directory.
///
/// The root must exist and be a directory. It is canonicalized so reports
/// carry an absolute path.
pub fn resolve_root(path: Option<&Path>) -> Result<PathBuf> {
    let root = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::current_dir().map_err(|e| {
            CiError::UserError(format!("failed to determine current directory: {}", e))
        })?,
    };

    if !root.exists() {
        return Err(CiError::UserError(format!(
            "path does not exist: {}",
            root.display()
        )));
    }
    if !root.is_dir() {
        return Err(CiError::UserError(format!(
            "path is not a directory: {}",
            root.display()
        )));
    }

    root.canonicalize().map_err(|e| {
        CiError::UserError(format!(
            "failed to resolve path '{}': {}",
            root.display(),
            e
        ))
    })
}

/// Run the suite described by `args` and return its report.
pub fn execute_run(args: &RunArgs) -> Result<SuiteReport> {
    let root = resolve_root(args.path.as_deref())?;
    let config = Config::load_for_root(&root, args.config.as_deref())?;
    let registry = default_registry(&config)?;

    tracing::debug!(root = %root.display(), parallel = config.parallel, "starting suite");

    let runner = SuiteRunner::new(registry, Arc::new(TracingLog)).with_parallel(config.parallel);
    Ok(runner.run(&root, args.checks.as_slice(), &CancellationToken::new()))
}

/// Execute the `ci-checks run` command.
pub fn cmd_run(args: &RunArgs) -> Result<()> {
    let report = execute_run(args)?;
    println!("{}", render_suite(&report, args.format)?);

    if report.is_success() {
        Ok(())
    } else {
        Err(CiError::ChecksFailed(format!(
            "overall status {}, {} issues",
            report.overall_status, report.total_issues
        )))
    }
}
