//! ci-checks: pluggable repository validation checks for CI.
//!
//! Checks implement [`check::Check`] and are collected in a
//! [`registry::CheckRegistry`]. A [`runner::SuiteRunner`] resolves the
//! requested checks, runs each one in isolation, and reduces their reports
//! into a single [`report::SuiteReport`] whose status gates the build.
//!
//! Built-in checks live in [`checks`]; the subprocess plumbing and output
//! classification they share live in [`tool`].

pub mod cancel;
pub mod check;
pub mod checks;
pub mod cli;
pub mod commands;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod exit_codes;
pub mod logging;
pub mod output;
pub mod registry;
pub mod report;
pub mod runner;
pub mod tool;

#[cfg(test)]
mod test_support;
