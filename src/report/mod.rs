//! Report model shared by checks, the suite runner, and output formatting.
//!
//! Field names serialize in camelCase; other tooling reads these reports, so
//! renaming a field is a breaking change.

pub mod rules;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

/// Coarse outcome of a check or of a whole suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CheckStatus {
    #[default]
    Unknown,
    Pass,
    Warning,
    Fail,
    Skipped,
    Error,
}

impl CheckStatus {
    /// Whether this status fails a CI gate. `Error` counts as `Fail`.
    pub fn is_failure(self) -> bool {
        matches!(self, CheckStatus::Fail | CheckStatus::Error)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckStatus::Unknown => write!(f, "UNKNOWN"),
            CheckStatus::Pass => write!(f, "PASS"),
            CheckStatus::Warning => write!(f, "WARNING"),
            CheckStatus::Fail => write!(f, "FAIL"),
            CheckStatus::Skipped => write!(f, "SKIPPED"),
            CheckStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Issue importance. Ordered: `Info < Warning < Error < Critical`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Error and Critical findings fail a check.
    pub fn is_blocking(self) -> bool {
        self >= Severity::Error
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// One located issue discovered by a check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// File the finding refers to. May be a directory, or empty when no
    /// location applies.
    pub file: String,
    /// 1-based line number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    pub severity: Severity,
    pub message: String,
    /// Stable identifier grouping findings by cause (see [`rules`]).
    pub rule: String,
}

impl Finding {
    pub fn new(severity: Severity, rule: &str, message: impl Into<String>) -> Self {
        Self {
            file: String::new(),
            line: None,
            column: None,
            severity,
            message: message.into(),
            rule: rule.to_string(),
        }
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = file.into();
        self
    }

    /// Attach a line number. Zero is not a valid line and is dropped.
    pub fn with_line(mut self, line: u32) -> Self {
        self.line = (line > 0).then_some(line);
        self
    }

    pub fn with_column(mut self, column: u32) -> Self {
        self.column = (column > 0).then_some(column);
        self
    }
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub name: String,
    pub status: CheckStatus,
    pub findings: Vec<Finding>,
    pub summary: String,
    pub files_checked: usize,
    pub issues_found: usize,
    /// Wall-clock time spent in this check. Filled in by the runner.
    #[serde(default)]
    pub duration_ms: u64,
}

impl CheckReport {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Unknown,
            findings: Vec::new(),
            summary: String::new(),
            files_checked: 0,
            issues_found: 0,
            duration_ms: 0,
        }
    }

    /// Report synthesized for a check that failed to produce its own.
    pub fn execution_error(name: &str, message: &str) -> Self {
        Self {
            status: CheckStatus::Error,
            summary: format!("Check execution failed: {}", message),
            findings: vec![Finding::new(
                Severity::Error,
                rules::CHECK_EXECUTION_ERROR,
                message,
            )],
            ..Self::new(name)
        }
    }

    /// Report for a check abandoned because the suite was cancelled.
    pub fn cancelled(name: &str) -> Self {
        Self {
            status: CheckStatus::Error,
            summary: "Check cancelled before completion".to_string(),
            findings: vec![Finding::new(
                Severity::Error,
                rules::CHECK_CANCELLED,
                "Check was cancelled before it could complete",
            )],
            ..Self::new(name)
        }
    }

    /// Status implied by a finding set: Fail on any Error/Critical, Warning
    /// on any Warning, otherwise Pass.
    pub fn status_from_findings(findings: &[Finding]) -> CheckStatus {
        if findings.iter().any(|f| f.severity.is_blocking()) {
            CheckStatus::Fail
        } else if findings.iter().any(|f| f.severity == Severity::Warning) {
            CheckStatus::Warning
        } else {
            CheckStatus::Pass
        }
    }

    pub fn count_at_least(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity >= severity)
            .count()
    }
}

/// Result of one suite invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteReport {
    /// Check reports in resolution order.
    pub checks: Vec<CheckReport>,
    pub overall_status: CheckStatus,
    pub total_issues: usize,
    pub total_files_checked: usize,
    #[serde(serialize_with = "serialize_millis")]
    pub execution_time: Duration,
    pub started_at: DateTime<Utc>,
    pub host: String,
    pub root_path: String,
    /// Set when the cancellation token was tripped before every resolved
    /// check could finish.
    pub cancelled: bool,
}

impl SuiteReport {
    pub fn is_success(&self) -> bool {
        !self.overall_status.is_failure()
    }

    /// Process exit code for this verdict.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            crate::exit_codes::SUCCESS
        } else {
            crate::exit_codes::CHECKS_FAILED
        }
    }
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_nanos() as f64 / 1_000_000.0)
}

/// Descriptor of a registered check, as shown by the listing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckDescriptor {
    pub name: String,
    pub description: String,
}

/// Listing of every registered check.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckListing {
    pub available_checks: Vec<CheckDescriptor>,
    pub total_count: usize,
}

impl CheckListing {
    pub fn new(available_checks: Vec<CheckDescriptor>) -> Self {
        let total_count = available_checks.len();
        Self {
            available_checks,
            total_count,
        }
    }
}
