//! Implementation of the `ci-checks list` command.

use crate::checks::default_registry;
use crate::cli::ListArgs;
use crate::config::Config;
use crate::diagnostics::TracingLog;
use crate::error::Result;
use crate::output::render_listing;
use crate::report::CheckListing;
use crate::runner::SuiteRunner;
use std::sync::Arc;

/// Every built-in check with its description.
pub fn available_checks() -> Result<CheckListing> {
    let registry = default_registry(&Config::default())?;
    Ok(SuiteRunner::new(registry, Arc::new(TracingLog)).available_checks())
}

/// Execute the `ci-checks list` command.
pub fn cmd_list(args: &ListArgs) -> Result<()> {
    let listing = available_checks()?;
    println!("{}", render_listing(&listing, args.format)?);
    Ok(())
}
