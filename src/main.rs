//! ci-checks: run repository validation checks and gate CI on the verdict.
//!
//! This is the main entry point for the `ci-checks` CLI. It parses
//! arguments, installs logging, dispatches to the command handler, and maps
//! errors to exit codes.

use ci_checks::cli::Cli;
use ci_checks::{commands, exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose, cli.log_json);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {}", err);

            ExitCode::from(err.exit_code() as u8)
        }
    }
}
