//! Content rules applied to a single README.

use crate::config::{ReadmeSettings, SectionRule};
use crate::error::{CiError, Result};
use crate::report::{Finding, Severity, rules};
use regex::{Regex, RegexBuilder};
use std::sync::LazyLock;

/// Markdown inline link: `[text](target)`.
static LINK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("Invalid link regex"));

/// README rules compiled once per check instance.
pub struct ReadmeRules {
    file_name: String,
    min_length: usize,
    /// Sections paired with their lowercased marker.
    sections: Vec<(SectionRule, String)>,
    placeholders: Vec<Regex>,
}

impl std::fmt::Debug for ReadmeRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadmeRules")
            .field("file_name", &self.file_name)
            .field("min_length", &self.min_length)
            .field(
                "sections",
                &self.sections.iter().map(|(s, _)| &s.label).collect::<Vec<_>>(),
            )
            .field(
                "placeholders",
                &self.placeholders.iter().map(Regex::as_str).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ReadmeRules {
    /// Compile rules from settings.
    ///
    /// Returns `CiError::UserError` if a placeholder pattern is not a valid regex.
    pub fn from_settings(settings: &ReadmeSettings) -> Result<Self> {
        let mut placeholders = Vec::with_capacity(settings.placeholder_patterns.len());
        for pattern in &settings.placeholder_patterns {
            let regex = RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    CiError::UserError(format!(
                        "invalid regex pattern in readme.placeholder_patterns: '{}' - {}",
                        pattern, e
                    ))
                })?;
            placeholders.push(regex);
        }

        let sections = settings
            .required_sections
            .iter()
            .map(|s| (s.clone(), s.marker.to_lowercase()))
            .collect();

        Ok(Self {
            file_name: settings.file_name.clone(),
            min_length: settings.min_length,
            sections,
            placeholders,
        })
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Evaluate README `content`. `file` is the path recorded on findings.
    ///
    /// Every violation is a `Warning`.
    pub fn evaluate(&self, file: &str, content: &str) -> Vec<Finding> {
        let mut findings = Vec::new();
        let warn = |rule: &str, message: String| {
            Finding::new(Severity::Warning, rule, message).with_file(file)
        };

        let lowered = content.to_lowercase();
        for (section, marker) in &self.sections {
            if !lowered.contains(marker.as_str()) {
                findings.push(warn(
                    rules::README_MISSING_SECTION,
                    format!("Missing recommended section: {}", section.label),
                ));
            }
        }

        if content.chars().count() < self.min_length {
            findings.push(warn(
                rules::README_TOO_SHORT,
                format!(
                    "README appears to be too short (less than {} characters)",
                    self.min_length
                ),
            ));
        }

        for regex in &self.placeholders {
            for m in regex.find_iter(content) {
                findings.push(
                    warn(
                        rules::README_PLACEHOLDER_TEXT,
                        format!("Placeholder text found: {}", m.as_str()),
                    )
                    .with_line(line_of(content, m.start())),
                );
            }
        }

        for caps in LINK_REGEX.captures_iter(content) {
            let url = &caps[2];
            if url.starts_with("http") && url.contains("example.com") {
                let start = caps.get(0).map(|m| m.start()).unwrap_or(0);
                findings.push(
                    warn(
                        rules::README_PLACEHOLDER_LINK,
                        "Link points to example.com - likely a placeholder".to_string(),
                    )
                    .with_line(line_of(content, start)),
                );
            }
        }

        findings
    }
}

/// 1-based line containing byte offset `offset`.
fn line_of(content: &str, offset: usize) -> u32 {
    let newlines = content.as_bytes()[..offset]
        .iter()
        .filter(|&&b| b == b'\n')
        .count();
    u32::try_from(newlines + 1).unwrap_or(u32::MAX)
}
