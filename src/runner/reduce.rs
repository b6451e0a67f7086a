//! Reduction of per-check reports into suite totals and a single verdict.

use crate::report::{CheckReport, CheckStatus, SuiteReport};
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Fold one more check status into the running suite status.
///
/// `Pass < Warning < Fail`, with `Error` counted as `Fail`. `Skipped` and
/// `Unknown` leave the suite status untouched. Once `Fail` is reached it is
/// never downgraded.
pub fn reduce_status(overall: CheckStatus, next: CheckStatus) -> CheckStatus {
    if overall.is_failure() || next.is_failure() {
        CheckStatus::Fail
    } else if next == CheckStatus::Warning && overall == CheckStatus::Pass {
        CheckStatus::Warning
    } else {
        overall
    }
}

/// Accumulates check reports as they complete.
#[derive(Debug)]
pub struct SuiteTally {
    checks: Vec<CheckReport>,
    overall: CheckStatus,
    total_issues: usize,
    total_files_checked: usize,
}

impl Default for SuiteTally {
    fn default() -> Self {
        Self::new()
    }
}

impl SuiteTally {
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            overall: CheckStatus::Pass,
            total_issues: 0,
            total_files_checked: 0,
        }
    }

    pub fn push(&mut self, report: CheckReport) {
        self.overall = reduce_status(self.overall, report.status);
        self.total_issues += report.issues_found;
        self.total_files_checked += report.files_checked;
        self.checks.push(report);
    }

    /// Build the suite report. A cancelled suite never reports success.
    pub fn finish(
        self,
        execution_time: Duration,
        started_at: DateTime<Utc>,
        root_path: String,
        host: String,
        cancelled: bool,
    ) -> SuiteReport {
        let overall_status = if cancelled {
            CheckStatus::Fail
        } else {
            self.overall
        };

        SuiteReport {
            checks: self.checks,
            overall_status,
            total_issues: self.total_issues,
            total_files_checked: self.total_files_checked,
            execution_time,
            started_at,
            host,
            root_path,
            cancelled,
        }
    }
}
