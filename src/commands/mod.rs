//! Command implementations for ci-checks.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations.

mod list;
mod run;

pub use list::cmd_list;
pub use run::{cmd_run, execute_run, resolve_root};

use crate::cli::Command;
use crate::error::Result;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Run(args) => cmd_run(&args),
        Command::List(args) => cmd_list(&args),
    }
}
