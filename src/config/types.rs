//! Per-check settings sections and their defaults.

use serde::{Deserialize, Serialize};

/// A section a README is expected to contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRule {
    /// Text searched for (case-insensitive substring), e.g. `"## Examples"`.
    pub marker: String,
    /// Human name used in the finding message.
    pub label: String,
}

impl SectionRule {
    pub fn new(marker: &str, label: &str) -> Self {
        Self {
            marker: marker.to_string(),
            label: label.to_string(),
        }
    }
}

/// Settings for the inline README content check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadmeSettings {
    /// File expected in every candidate directory.
    pub file_name: String,

    /// Minimum length in characters before a README counts as too short.
    pub min_length: usize,

    /// Sections checked in order; one finding per missing section.
    pub required_sections: Vec<SectionRule>,

    /// Regexes (matched case-insensitively) flagging leftover template text.
    pub placeholder_patterns: Vec<String>,

    /// File globs whose containing directory is a project directory.
    pub project_markers: Vec<String>,

    /// Directories whose immediate subdirectories are all candidates.
    pub package_roots: Vec<String>,

    /// Directory names never descended into during discovery.
    pub exclude_dirs: Vec<String>,
}

impl Default for ReadmeSettings {
    fn default() -> Self {
        Self {
            file_name: "README.md".to_string(),
            min_length: 100,
            required_sections: default_required_sections(),
            placeholder_patterns: default_placeholder_patterns(),
            project_markers: default_project_markers(),
            package_roots: strings(&["sdk", "src", "packages", "libs"]),
            exclude_dirs: strings(&[".git", "node_modules", "target"]),
        }
    }
}

/// Outcome of the doc-warden check when no verify script is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingScriptPolicy {
    /// Report `Skipped`: the tool is not provisioned in this tree (default).
    #[default]
    Skip,
    /// Report `Error`, failing the suite.
    Error,
}

/// Settings for the external doc-warden check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocWardenSettings {
    /// Command prefix used to run the verify script (shell-words parsed).
    pub shell: String,

    /// Pinned doc-warden version passed to the script.
    pub version: String,

    /// Script locations relative to the root, first existing wins.
    pub script_candidates: Vec<String>,

    /// Settings file locations relative to the root, first existing wins.
    pub settings_candidates: Vec<String>,

    /// Directories scanned when present; the root is scanned when none are.
    pub scan_dirs: Vec<String>,

    /// The tool is killed after this many seconds.
    pub timeout_seconds: u64,

    /// What a missing verify script means for the check.
    pub missing_script: MissingScriptPolicy,
}

impl Default for DocWardenSettings {
    fn default() -> Self {
        Self {
            shell: "pwsh".to_string(),
            version: "0.7.2".to_string(),
            script_candidates: strings(&[
                "eng/common/scripts/Verify-Readme.ps1",
                "eng/scripts/Verify-Readme.ps1",
                "scripts/Verify-Readme.ps1",
            ]),
            settings_candidates: strings(&[
                ".docsettings.yml",
                ".docsettings.yaml",
                "eng/.docsettings.yml",
                "eng/.docsettings.yaml",
                "eng/common/.docsettings.yml",
                "eng/common/.docsettings.yaml",
            ]),
            scan_dirs: strings(&["sdk", "docs", "src", "lib", "packages", "tools"]),
            timeout_seconds: 600,
            missing_script: MissingScriptPolicy::Skip,
        }
    }
}

/// Default recommended README sections.
pub fn default_required_sections() -> Vec<SectionRule> {
    vec![
        SectionRule::new("# ", "Main heading"),
        SectionRule::new("## Getting started", "Getting started section"),
        SectionRule::new("## Key concepts", "Key concepts section"),
        SectionRule::new("## Examples", "Examples section"),
        SectionRule::new("## Troubleshooting", "Troubleshooting section"),
        SectionRule::new("## Contributing", "Contributing section"),
    ]
}

/// Default placeholder-text patterns.
pub fn default_placeholder_patterns() -> Vec<String> {
    strings(&[
        r"\[Your\s+\w+\]",
        "TODO:",
        "FIXME:",
        r"\[Package Name\]",
        r"\[Description\]",
    ])
}

/// Default project marker globs.
pub fn default_project_markers() -> Vec<String> {
    strings(&[
        "*.csproj",
        "*.sln",
        "package.json",
        "pom.xml",
        "setup.py",
        "pyproject.toml",
        "Cargo.toml",
        "go.mod",
    ])
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
