//! Config struct definition.

use super::types::{DocWardenSettings, ReadmeSettings};
use serde::{Deserialize, Serialize};

/// Name of the optional config file looked up at the root path.
pub const CONFIG_FILE_NAME: &str = ".ci-checks.yaml";

/// Configuration for a ci-checks run.
///
/// Read from `.ci-checks.yaml` at the root path, or from an explicit
/// `--config` file. Every field has a default and unknown fields are
/// ignored, so an empty file is a valid config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run resolved checks concurrently. Report order is unaffected.
    pub parallel: bool,

    /// Settings for `verify-readme`.
    pub readme: ReadmeSettings,

    /// Settings for `doc-warden`.
    pub doc_warden: DocWardenSettings,
}
