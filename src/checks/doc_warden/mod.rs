//! `doc-warden`: README verification through the repository's
//! `Verify-Readme.ps1` script.
//!
//! The script, the doc-warden settings file, and the scan paths are located
//! under the root, the script is run through the configured shell, and its
//! output is classified by [`crate::tool::parser`].
//!
//! Outcomes:
//! - script not found: `Skipped` with an Info `script-missing` finding, or
//!   `Error` with an Error one under `missing_script: error`
//! - settings file not found: `Error` with `settings-missing`
//! - launch failure: `Error` with a Critical `script-execution-error`
//! - timeout: `Fail` with `tool-timeout`
//! - completed run: see [`evaluate`]


use super::display_path;
use crate::check::{Check, CheckContext};
use crate::config::{DocWardenSettings, MissingScriptPolicy};
use crate::error::CheckError;
use crate::report::{CheckReport, CheckStatus, Finding, Severity, rules};
use crate::tool::{ParsedOutput, ToolCommand, parse_output_bytes, run_tool};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const NAME: &str = "doc-warden";

const GENERAL_FAILURE_MESSAGE: &str = "README verification failed. Check logs for details.";

pub struct DocWardenCheck {
    settings: DocWardenSettings,
}

impl DocWardenCheck {
    pub fn new(settings: DocWardenSettings) -> Self {
        Self { settings }
    }

    /// Directories passed to the tool: the configured scan dirs that exist,
    /// or the root when none do.
    pub fn scan_paths(&self, root: &Path) -> Vec<PathBuf> {
        let paths: Vec<PathBuf> = self
            .settings
            .scan_dirs
            .iter()
            .map(|d| root.join(d))
            .filter(|p| p.is_dir())
            .collect();

        if paths.is_empty() {
            vec![root.to_path_buf()]
        } else {
            paths
        }
    }

    /// The full tool invocation for one run.
    pub fn command(
        &self,
        root: &Path,
        script: &Path,
        settings_file: &Path,
        scan_paths: &[PathBuf],
    ) -> Result<ToolCommand, CheckError> {
        let joined = scan_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(",");

        let args = vec![
            "-ExecutionPolicy".to_string(),
            "Bypass".to_string(),
            "-File".to_string(),
            script.display().to_string(),
            "-SettingsPath".to_string(),
            settings_file.display().to_string(),
            "-ScanPaths".to_string(),
            joined,
            "-RepoRoot".to_string(),
            root.display().to_string(),
            "-DocWardenVersion".to_string(),
            self.settings.version.clone(),
        ];

        ToolCommand::from_command_line(
            &self.settings.shell,
            args,
            root,
            Duration::from_secs(self.settings.timeout_seconds),
        )
    }

    fn script_missing(&self) -> CheckReport {
        let message = format!(
            "Verify-Readme.ps1 script not found (looked in: {})",
            self.settings.script_candidates.join(", ")
        );

        match self.settings.missing_script {
            MissingScriptPolicy::Skip => CheckReport {
                status: CheckStatus::Skipped,
                summary: "Verify-Readme script not found; doc-warden is not provisioned"
                    .to_string(),
                findings: vec![Finding::new(Severity::Info, rules::SCRIPT_MISSING, message)],
                ..CheckReport::new(NAME)
            },
            MissingScriptPolicy::Error => CheckReport {
                status: CheckStatus::Error,
                summary: "Could not find Verify-Readme script".to_string(),
                findings: vec![Finding::new(Severity::Error, rules::SCRIPT_MISSING, message)],
                issues_found: 1,
                ..CheckReport::new(NAME)
            },
        }
    }

    fn settings_missing(&self) -> CheckReport {
        CheckReport {
            status: CheckStatus::Error,
            summary: "Could not find README settings file".to_string(),
            findings: vec![Finding::new(
                Severity::Error,
                rules::SETTINGS_MISSING,
                "README settings file not found. Expected .docsettings.yml or similar",
            )],
            issues_found: 1,
            ..CheckReport::new(NAME)
        }
    }
}

/// First candidate, relative to `root`, that exists as a file.
fn find_first(root: &Path, candidates: &[String]) -> Option<PathBuf> {
    candidates
        .iter()
        .map(|c| root.join(c))
        .find(|p| p.is_file())
}

/// Report for a tool that could not be started.
fn launch_failure(script: &str, err: &CheckError) -> CheckReport {
    CheckReport {
        status: CheckStatus::Error,
        summary: format!("Script execution failed: {}", err),
        findings: vec![
            Finding::new(Severity::Critical, rules::SCRIPT_EXECUTION_ERROR, err.to_string())
                .with_file(script),
        ],
        issues_found: 1,
        ..CheckReport::new(NAME)
    }
}

/// Report for a tool run killed at the timeout. Output captured before
/// the kill is kept.
fn timed_out(parsed: ParsedOutput, timeout: Duration) -> CheckReport {
    let mut findings = parsed.findings;
    findings.push(Finding::new(
        Severity::Error,
        rules::TOOL_TIMEOUT,
        format!(
            "README verification did not finish within {} seconds and was stopped",
            timeout.as_secs()
        ),
    ));

    let mut report = CheckReport {
        status: CheckStatus::Fail,
        summary: format!("README verification timed out after {}s", timeout.as_secs()),
        findings,
        files_checked: parsed.files_checked,
        ..CheckReport::new(NAME)
    };
    report.issues_found = report.count_at_least(Severity::Error);
    report
}

/// Turn a completed tool run into a report.
///
/// Exit 0 takes its status from the parsed findings. Any other exit is a
/// `Fail`, and gets a `general-failure` finding when nothing was parsed so
/// a failing run never looks issue-free. `issuesFound` counts Error and
/// Critical findings.
pub fn evaluate(exit_code: Option<i32>, parsed: ParsedOutput) -> CheckReport {
    let succeeded = exit_code == Some(0);
    let mut findings = parsed.findings;

    if !succeeded && findings.is_empty() {
        findings.push(Finding::new(
            Severity::Error,
            rules::GENERAL_FAILURE,
            GENERAL_FAILURE_MESSAGE,
        ));
    }

    let status = if succeeded {
        CheckReport::status_from_findings(&findings)
    } else {
        CheckStatus::Fail
    };

    let summary = if status.is_failure() {
        format!("README verification failed with {} issues", findings.len())
    } else {
        format!(
            "README verification passed for {} files",
            parsed.files_checked
        )
    };

    let mut report = CheckReport {
        status,
        summary,
        findings,
        files_checked: parsed.files_checked,
        ..CheckReport::new(NAME)
    };
    report.issues_found = report.count_at_least(Severity::Error);
    report
}

impl Check for DocWardenCheck {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Verifies README files using the doc-warden tool"
    }

    fn run(&self, root: &Path, ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        ctx.log.info(
            NAME,
            &format!("Running doc-warden README verification on {}", root.display()),
        );

        let Some(script) = find_first(root, &self.settings.script_candidates) else {
            ctx.log.info(NAME, "Verify-Readme.ps1 not found; skipping");
            return Ok(self.script_missing());
        };

        let Some(settings_file) = find_first(root, &self.settings.settings_candidates) else {
            ctx.log.warn(NAME, "README settings file not found");
            return Ok(self.settings_missing());
        };

        ctx.ensure_not_cancelled()?;

        let script_display = display_path(root, &script);
        let scan_paths = self.scan_paths(root);
        let command = match self.command(root, &script, &settings_file, &scan_paths) {
            Ok(command) => command,
            Err(err) => return Ok(launch_failure(&script_display, &err)),
        };

        ctx.log.debug(NAME, &format!("Running command: {}", command.display()));

        let output = match run_tool(&command, &ctx.cancel) {
            Ok(output) => output,
            Err(CheckError::Cancelled) => return Err(CheckError::Cancelled),
            Err(err) => {
                ctx.log.error(
                    NAME,
                    &format!("Error executing Verify-Readme script: {}", err),
                );
                return Ok(launch_failure(&script_display, &err));
            }
        };

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            ctx.log.debug(NAME, &format!("STDOUT: {}", line));
        }
        for line in String::from_utf8_lossy(&output.stderr).lines() {
            ctx.log.debug(NAME, &format!("STDERR: {}", line));
        }

        let parsed = parse_output_bytes(&output.stdout, &output.stderr);
        let report = if output.timed_out {
            ctx.log.warn(
                NAME,
                &format!("Verify-Readme script timed out after {:?}", command.timeout),
            );
            timed_out(parsed, command.timeout)
        } else {
            evaluate(output.exit_code, parsed)
        };

        ctx.log.info(
            NAME,
            &format!(
                "README verification completed with status: {} in {}ms",
                report.status,
                output.duration.as_millis()
            ),
        );
        Ok(report)
    }
}
