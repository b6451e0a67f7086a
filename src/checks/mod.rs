//! Built-in checks.
//!
//! - `verify-readme`: README presence and content rules, evaluated in-process
//! - `doc-warden`: README verification delegated to the doc-warden script

pub mod doc_warden;
pub mod readme;

pub use doc_warden::DocWardenCheck;
pub use readme::ReadmeCheck;

use crate::config::Config;
use crate::error::Result;
use crate::registry::CheckRegistry;
use std::path::Path;
use std::sync::Arc;

/// Registry holding every built-in check, configured from `config`.
pub fn default_registry(config: &Config) -> Result<CheckRegistry> {
    CheckRegistry::new()
        .with(Arc::new(ReadmeCheck::from_settings(&config.readme)?))?
        .with(Arc::new(DocWardenCheck::new(config.doc_warden.clone())))
}

/// Path of `path` relative to `root` with `/` separators, or `.` for the
/// root itself. Paths outside `root` are shown as-is.
pub(crate) fn display_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(relative) if relative.as_os_str().is_empty() => ".".to_string(),
        Ok(relative) => relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.display().to_string(),
    }
}
