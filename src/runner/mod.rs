//! Suite runner: resolves requested checks, runs each inside a failure
//! boundary, and reduces the reports into one verdict.
//!
//! # Isolation
//!
//! - A check returning `Err` gets a synthetic `Error` report with rule
//!   `check-execution-error`
//! - A check that panics is caught with `catch_unwind` and treated the same
//! - A check that observes cancellation gets an `Error` report with rule
//!   `check-cancelled`
//!
//! Nothing raised inside a check reaches the caller of [`SuiteRunner::run`].
//!
//! # Cancellation
//!
//! The token is checked before each check starts. Reports of checks that
//! already finished are kept, no further checks start, and the suite is
//! flagged `cancelled` with an overall `Fail`.

mod reduce;


use crate::cancel::CancellationToken;
use crate::check::{Check, CheckContext};
use crate::diagnostics::CheckLog;
use crate::error::CheckError;
use crate::registry::CheckRegistry;
use crate::report::{CheckListing, CheckReport, SuiteReport, rules};
use chrono::Utc;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub use reduce::{SuiteTally, reduce_status};

/// Scope name used for the runner's own log lines.
const SUITE_SCOPE: &str = "suite";

/// Runs checks from a registry against a root path.
pub struct SuiteRunner {
    registry: CheckRegistry,
    log: Arc<dyn CheckLog>,
    parallel: bool,
}

impl SuiteRunner {
    pub fn new(registry: CheckRegistry, log: Arc<dyn CheckLog>) -> Self {
        Self {
            registry,
            log,
            parallel: false,
        }
    }

    /// Run resolved checks on scoped threads instead of one at a time.
    /// Report order still follows resolution order.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Names and descriptions of every registered check.
    pub fn available_checks(&self) -> CheckListing {
        CheckListing::new(self.registry.descriptors())
    }

    /// Run the requested checks (all of them when `requested` is empty).
    pub fn run<S: AsRef<str>>(
        &self,
        root: &Path,
        requested: &[S],
        cancel: &CancellationToken,
    ) -> SuiteReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let resolution = self.registry.resolve(requested);
        for name in &resolution.unknown {
            self.log.warn(
                SUITE_SCOPE,
                &format!(
                    "Requested check '{}' not found. Available checks: {}",
                    name,
                    self.registry.names().join(", ")
                ),
            );
        }

        self.log.info(
            SUITE_SCOPE,
            &format!(
                "Running {} checks on path: {}",
                resolution.checks.len(),
                root.display()
            ),
        );

        let ctx = CheckContext::new(cancel.clone(), Arc::clone(&self.log));
        let reports = if self.parallel {
            self.run_parallel(&resolution.checks, root, &ctx)
        } else {
            self.run_sequential(&resolution.checks, root, &ctx)
        };

        let cancelled = reports.len() < resolution.checks.len()
            || reports
                .iter()
                .any(|r| r.findings.iter().any(|f| f.rule == rules::CHECK_CANCELLED));

        let mut tally = SuiteTally::new();
        for report in reports {
            tally.push(report);
        }

        let suite = tally.finish(
            start.elapsed(),
            started_at,
            root.display().to_string(),
            host_name(),
            cancelled,
        );

        self.log.info(
            SUITE_SCOPE,
            &format!(
                "Checks completed in {}ms. Overall status: {}, Total issues: {}",
                suite.execution_time.as_millis(),
                suite.overall_status,
                suite.total_issues
            ),
        );

        suite
    }

    fn run_sequential(
        &self,
        checks: &[Arc<dyn Check>],
        root: &Path,
        ctx: &CheckContext,
    ) -> Vec<CheckReport> {
        let mut reports = Vec::with_capacity(checks.len());

        for check in checks {
            if ctx.cancel.is_cancelled() {
                self.log.warn(
                    SUITE_SCOPE,
                    &format!(
                        "Cancelled; {} check(s) not started",
                        checks.len() - reports.len()
                    ),
                );
                break;
            }
            reports.push(self.execute_isolated(check.as_ref(), root, ctx));
        }

        reports
    }

    fn run_parallel(
        &self,
        checks: &[Arc<dyn Check>],
        root: &Path,
        ctx: &CheckContext,
    ) -> Vec<CheckReport> {
        let results: Vec<Option<CheckReport>> = std::thread::scope(|s| {
            let handles: Vec<_> = checks
                .iter()
                .map(|check| {
                    s.spawn(move || {
                        if ctx.cancel.is_cancelled() {
                            return None;
                        }
                        Some(self.execute_isolated(check.as_ref(), root, ctx))
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(checks)
                .map(|(handle, check)| match handle.join() {
                    Ok(report) => report,
                    Err(payload) => Some(CheckReport::execution_error(
                        check.name(),
                        &panic_message(payload.as_ref()),
                    )),
                })
                .collect()
        });

        // Keep resolution order; a check that never started leaves a gap.
        results.into_iter().flatten().collect()
    }

    /// Run one check inside the failure boundary.
    fn execute_isolated(&self, check: &dyn Check, root: &Path, ctx: &CheckContext) -> CheckReport {
        let name = check.name();
        self.log.debug(SUITE_SCOPE, &format!("Running check: {}", name));

        let start = Instant::now();
        let outcome = catch_unwind(AssertUnwindSafe(|| check.run(root, ctx)));
        let elapsed = start.elapsed();

        let mut report = match outcome {
            Ok(Ok(report)) => report,
            Ok(Err(CheckError::Cancelled)) => {
                self.log
                    .warn(SUITE_SCOPE, &format!("Check {} was cancelled", name));
                CheckReport::cancelled(name)
            }
            Ok(Err(err)) => {
                self.log.error(
                    SUITE_SCOPE,
                    &format!("Error running check {}: {}", name, err),
                );
                CheckReport::execution_error(name, &err.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                self.log.error(
                    SUITE_SCOPE,
                    &format!("Check {} panicked: {}", name, message),
                );
                CheckReport::execution_error(name, &message)
            }
        };

        if report.name.is_empty() {
            report.name = name.to_string();
        }
        report.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        self.log.debug(
            SUITE_SCOPE,
            &format!("Check {} completed with status: {}", name, report.status),
        );
        report
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "check panicked".to_string()
    }
}

fn host_name() -> String {
    hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string())
}
