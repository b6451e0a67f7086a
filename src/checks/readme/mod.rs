//! `verify-readme`: README presence and content rules.
//!
//! Every candidate directory (see [`discovery`]) is expected to hold a
//! README. A missing file is a `Warning`, an unreadable one an `Error`, and
//! each content-rule violation a `Warning`. `issuesFound` counts
//! directories with at least one Warning-or-worse finding, not findings.

pub mod discovery;
pub mod rules;


use super::display_path;
use crate::check::{Check, CheckContext};
use crate::config::ReadmeSettings;
use crate::error::{CheckError, Result};
use crate::report::{CheckReport, Finding, Severity, rules as rule_ids};
use discovery::{DirectoryDiscovery, MarkerDiscovery};
use rules::ReadmeRules;
use std::io::ErrorKind;
use std::path::Path;

pub const NAME: &str = "verify-readme";

pub struct ReadmeCheck {
    rules: ReadmeRules,
    discovery: Box<dyn DirectoryDiscovery>,
}

impl ReadmeCheck {
    /// Build the check with marker-based discovery.
    pub fn from_settings(settings: &ReadmeSettings) -> Result<Self> {
        Ok(Self::with_discovery(
            ReadmeRules::from_settings(settings)?,
            MarkerDiscovery::from_settings(settings)?,
        ))
    }

    pub fn with_discovery(rules: ReadmeRules, discovery: impl DirectoryDiscovery + 'static) -> Self {
        Self {
            rules,
            discovery: Box::new(discovery),
        }
    }

    fn check_directory(&self, root: &Path, dir: &Path) -> Vec<Finding> {
        let readme = dir.join(self.rules.file_name());
        let file = display_path(root, &readme);

        // Only a README that is really absent counts as missing; any other
        // failure to look at it is a read error.
        let exists = match std::fs::metadata(&readme) {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return vec![read_error(file, &e)],
        };

        if !exists {
            return vec![
                Finding::new(
                    Severity::Warning,
                    rule_ids::README_MISSING,
                    format!("{} file not found", self.rules.file_name()),
                )
                .with_file(display_path(root, dir)),
            ];
        }

        match std::fs::read(&readme) {
            Ok(bytes) => self.rules.evaluate(&file, &String::from_utf8_lossy(&bytes)),
            Err(e) => vec![read_error(file, &e)],
        }
    }
}

fn read_error(file: String, err: &std::io::Error) -> Finding {
    Finding::new(
        Severity::Error,
        rule_ids::README_READ_ERROR,
        format!("Error reading README file: {}", err),
    )
    .with_file(file)
}

impl Check for ReadmeCheck {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Verifies README.md files exist and contain required sections"
    }

    fn run(&self, root: &Path, ctx: &CheckContext) -> std::result::Result<CheckReport, CheckError> {
        ctx.log.info(
            NAME,
            &format!("Running README verification check on {}", root.display()),
        );

        let discovered = self.discovery.discover(root, &ctx.cancel)?;
        ctx.log.debug(
            NAME,
            &format!("Found {} candidate directories", discovered.directories.len()),
        );

        let mut report = CheckReport::new(NAME);

        // An unreadable subtree counts as one location with issues.
        for (path, reason) in &discovered.problems {
            ctx.log.warn(
                NAME,
                &format!("Could not traverse {}: {}", path.display(), reason),
            );
            report.findings.push(
                Finding::new(
                    Severity::Error,
                    rule_ids::DISCOVERY_ERROR,
                    format!("Could not traverse directory: {}", reason),
                )
                .with_file(display_path(root, path)),
            );
            report.issues_found += 1;
        }

        for dir in &discovered.directories {
            ctx.ensure_not_cancelled()?;

            let findings = self.check_directory(root, dir);
            report.files_checked += 1;
            if findings.iter().any(|f| f.severity >= Severity::Warning) {
                report.issues_found += 1;
            }
            report.findings.extend(findings);
        }

        report.status = CheckReport::status_from_findings(&report.findings);
        report.summary = format!(
            "Checked {} directories, found {} issues",
            report.files_checked, report.issues_found
        );

        ctx.log.info(
            NAME,
            &format!("README verification completed with status: {}", report.status),
        );
        Ok(report)
    }
}
