//! Configuration model for ci-checks.
//!
//! This module defines the Config struct that represents `.ci-checks.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! defaults for every field, and validation of config values.

mod model;
mod operations;
pub mod types;


// Re-export public API
pub use model::{CONFIG_FILE_NAME, Config};
pub use types::{DocWardenSettings, MissingScriptPolicy, ReadmeSettings, SectionRule};
