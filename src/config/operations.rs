//! Config loading, validation, and utility operations.

use super::model::{CONFIG_FILE_NAME, Config};
use crate::error::{CiError, Result};
use globset::Glob;
use regex::RegexBuilder;
use std::path::{Path, PathBuf};

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            CiError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map_err(|e| {
            CiError::UserError(format!("{} (in '{}')", e, path.display()))
        })
    }

    /// Resolve the config for a run.
    ///
    /// An explicit path must exist. Otherwise `.ci-checks.yaml` under `root`
    /// is used when present, and defaults when it is not.
    pub fn load_for_root(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let path = Self::default_path(root);
        if path.is_file() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE_NAME)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty file means all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| CiError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| CiError::UserError(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `readme.file_name` must be a bare, non-empty file name
    /// - `readme.min_length` and `doc_warden.timeout_seconds` must be positive
    /// - every placeholder pattern must compile as a regex
    /// - every project marker must compile as a glob
    /// - `doc_warden.shell` must parse to at least one word
    pub fn validate(&self) -> Result<()> {
        let readme = &self.readme;

        if readme.file_name.trim().is_empty()
            || readme.file_name.contains('/')
            || readme.file_name.contains('\\')
        {
            return Err(invalid(format!(
                "readme.file_name must be a plain file name (found '{}')",
                readme.file_name
            )));
        }

        if readme.min_length == 0 {
            return Err(invalid("readme.min_length must be greater than 0".to_string()));
        }

        for section in &readme.required_sections {
            if section.marker.is_empty() {
                return Err(invalid(format!(
                    "readme.required_sections entry '{}' has an empty marker",
                    section.label
                )));
            }
        }

        for pattern in &readme.placeholder_patterns {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    CiError::UserError(format!(
                        "invalid regex pattern in readme.placeholder_patterns: '{}' - {}\n\
                         Fix: edit {} and correct or remove this pattern.",
                        pattern, e, CONFIG_FILE_NAME
                    ))
                })?;
        }

        for marker in &readme.project_markers {
            Glob::new(marker).map_err(|e| {
                CiError::UserError(format!(
                    "invalid glob in readme.project_markers: '{}' - {}",
                    marker, e
                ))
            })?;
        }

        let warden = &self.doc_warden;

        if warden.timeout_seconds == 0 {
            return Err(invalid(
                "doc_warden.timeout_seconds must be greater than 0".to_string(),
            ));
        }

        let words = shell_words::split(&warden.shell).map_err(|e| {
            invalid(format!(
                "doc_warden.shell could not be parsed ('{}'): {}",
                warden.shell, e
            ))
        })?;
        if words.is_empty() {
            return Err(invalid("doc_warden.shell must not be empty".to_string()));
        }

        Ok(())
    }
}

fn invalid(message: String) -> CiError {
    CiError::UserError(format!("config validation failed: {}", message))
}
