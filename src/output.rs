//! Rendering of suite reports and check listings.

use crate::cli::OutputFormat;
use crate::error::{CiError, Result};
use crate::report::{CheckListing, CheckReport, Finding, SuiteReport};
use serde::Serialize;
use std::fmt::Write;

pub fn render_suite(report: &SuiteReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(report),
        OutputFormat::Text => Ok(suite_text(report)),
    }
}

pub fn render_listing(listing: &CheckListing, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => to_json(listing),
        OutputFormat::Text => Ok(listing_text(listing)),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CiError::UserError(format!("failed to serialize output: {}", e)))
}

fn suite_text(report: &SuiteReport) -> String {
    let mut out = String::new();

    for check in &report.checks {
        check_text(&mut out, check);
    }
    if !report.checks.is_empty() {
        out.push('\n');
    }

    let _ = write!(
        out,
        "Overall: {} | {} issues in {} files | {}ms",
        report.overall_status,
        report.total_issues,
        report.total_files_checked,
        report.execution_time.as_millis()
    );
    if report.cancelled {
        out.push_str(" | cancelled");
    }
    out
}

fn check_text(out: &mut String, check: &CheckReport) {
    let _ = writeln!(
        out,
        "{}: {} - {} ({}ms)",
        check.name, check.status, check.summary, check.duration_ms
    );
    for finding in &check.findings {
        let _ = writeln!(out, "  {}", finding_text(finding));
    }
}

/// `file:line:column [SEVERITY] rule: message`, omitting unknown location parts.
pub fn finding_text(finding: &Finding) -> String {
    let mut location = finding.file.clone();
    if !location.is_empty() {
        if let Some(line) = finding.line {
            let _ = write!(location, ":{}", line);
            if let Some(column) = finding.column {
                let _ = write!(location, ":{}", column);
            }
        }
        location.push(' ');
    }

    format!(
        "{}[{}] {}: {}",
        location, finding.severity, finding.rule, finding.message
    )
}

fn listing_text(listing: &CheckListing) -> String {
    let width = listing
        .available_checks
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    let mut out = String::from("Available checks:\n");
    for check in &listing.available_checks {
        let _ = writeln!(out, "  {:width$}  {}", check.name, check.description);
    }
    let _ = write!(out, "\nTotal: {}", listing.total_count);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{CheckDescriptor, CheckStatus, Severity, rules};
    use chrono::Utc;
    use std::time::Duration;

    fn sample_suite() -> SuiteReport {
        let mut check = CheckReport::new("verify-readme");
        check.status = CheckStatus::Warning;
        check.summary = "Checked 1 directories, found 1 issues".to_string();
        check.files_checked = 1;
        check.issues_found = 1;
        check.duration_ms = 3;
        check.findings.push(
            Finding::new(Severity::Warning, rules::README_TOO_SHORT, "too short")
                .with_file("README.md"),
        );
        check.findings.push(
            Finding::new(Severity::Warning, rules::README_PLACEHOLDER_TEXT, "TODO:")
                .with_file("README.md")
                .with_line(4),
        );

        SuiteReport {
            checks: vec![check],
            overall_status: CheckStatus::Warning,
            total_issues: 1,
            total_files_checked: 1,
            execution_time: Duration::from_millis(7),
            started_at: Utc::now(),
            host: "host".to_string(),
            root_path: "/repo".to_string(),
            cancelled: false,
        }
    }

    #[test]
    fn text_rendering_lists_checks_findings_and_totals() {
        let text = render_suite(&sample_suite(), OutputFormat::Text).unwrap();

        assert!(text.starts_with(
            "verify-readme: WARNING - Checked 1 directories, found 1 issues (3ms)\n"
        ));
        assert!(text.contains("  README.md [WARNING] readme-too-short: too short\n"));
        assert!(text.contains("  README.md:4 [WARNING] readme-placeholder-text: TODO:\n"));
        assert!(text.ends_with("Overall: WARNING | 1 issues in 1 files | 7ms"));
    }

    #[test]
    fn text_rendering_marks_cancelled_suite() {
        let mut suite = sample_suite();
        suite.cancelled = true;
        let text = render_suite(&suite, OutputFormat::Text).unwrap();
        assert!(text.ends_with("| cancelled"));
    }

    #[test]
    fn finding_without_file_has_no_location() {
        let finding = Finding::new(Severity::Error, rules::GENERAL_FAILURE, "failed").with_line(3);
        assert_eq!(finding_text(&finding), "[ERROR] general-failure: failed");

        let finding = Finding::new(Severity::Info, "r", "m")
            .with_file("a.md")
            .with_line(2)
            .with_column(5);
        assert_eq!(finding_text(&finding), "a.md:2:5 [INFO] r: m");
    }

    #[test]
    fn json_rendering_uses_stable_field_names() {
        let json = render_suite(&sample_suite(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["overallStatus"], "Warning");
        assert_eq!(value["totalIssues"], 1);
        assert_eq!(value["totalFilesChecked"], 1);
        assert_eq!(value["executionTime"], 7.0);
        assert_eq!(value["rootPath"], "/repo");
        assert_eq!(value["checks"][0]["name"], "verify-readme");
        assert_eq!(value["checks"][0]["findings"][1]["line"], 4);
    }

    #[test]
    fn listing_renders_both_formats() {
        let listing = CheckListing::new(vec![
            CheckDescriptor {
                name: "verify-readme".to_string(),
                description: "Checks READMEs".to_string(),
            },
            CheckDescriptor {
                name: "doc-warden".to_string(),
                description: "Runs doc-warden".to_string(),
            },
        ]);

        let text = render_listing(&listing, OutputFormat::Text).unwrap();
        assert!(text.contains("  verify-readme  Checks READMEs\n"));
        assert!(text.contains("  doc-warden     Runs doc-warden\n"));
        assert!(text.ends_with("Total: 2"));

        let json = render_listing(&listing, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalCount"], 2);
        assert_eq!(value["availableChecks"][1]["name"], "doc-warden");
    }
}
