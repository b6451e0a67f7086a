use crate::check::{Check, CheckContext};
use crate::diagnostics::{CheckLog, LogLevel};
use crate::error::CheckError;
use crate::report::{CheckReport, CheckStatus, Finding, Severity};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // The working directory is process-global; serialize tests that touch it.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// Write `content` to `root/relative`, creating parent directories.
pub(crate) fn write_file(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
    path
}

/// A README that satisfies every default content rule.
pub(crate) fn complete_readme(title: &str) -> String {
    format!(
        "# {title}\n\n\
         A library that does useful things for the people who depend on it.\n\n\
         ## Getting started\n\nInstall it.\n\n\
         ## Key concepts\n\nIt has concepts.\n\n\
         ## Examples\n\nSee the samples directory.\n\n\
         ## Troubleshooting\n\nEnable verbose logging.\n\n\
         ## Contributing\n\nPull requests are welcome.\n"
    )
}

/// Check that always reports a fixed status.
pub(crate) struct StaticCheck {
    name: String,
    status: CheckStatus,
    files_checked: usize,
    issues_found: usize,
}

impl StaticCheck {
    pub(crate) fn arc(name: &str, status: CheckStatus) -> Arc<dyn Check> {
        Self::with_counts(name, status, 1, 0)
    }

    pub(crate) fn with_counts(
        name: &str,
        status: CheckStatus,
        files_checked: usize,
        issues_found: usize,
    ) -> Arc<dyn Check> {
        Arc::new(Self {
            name: name.to_string(),
            status,
            files_checked,
            issues_found,
        })
    }
}

impl Check for StaticCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Reports a fixed status"
    }

    fn run(&self, _root: &Path, _ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        let mut report = CheckReport::new(&self.name);
        report.status = self.status;
        report.files_checked = self.files_checked;
        report.issues_found = self.issues_found;
        report.summary = format!("fixed {}", self.status);
        let severity = match self.status {
            CheckStatus::Warning => Some(Severity::Warning),
            CheckStatus::Fail | CheckStatus::Error => Some(Severity::Error),
            _ => None,
        };
        if let Some(severity) = severity {
            report
                .findings
                .push(Finding::new(severity, "fixed", "fixed finding"));
        }
        Ok(report)
    }
}

/// Check that returns an error instead of a report.
pub(crate) struct FailingCheck(pub(crate) &'static str);

impl FailingCheck {
    pub(crate) fn arc(name: &'static str) -> Arc<dyn Check> {
        Arc::new(Self(name))
    }
}

impl Check for FailingCheck {
    fn name(&self) -> &str {
        self.0
    }

    fn description(&self) -> &str {
        "Always errors"
    }

    fn run(&self, root: &Path, _ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        Err(CheckError::io(
            root.join("missing"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "simulated failure"),
        ))
    }
}

/// Check that panics.
pub(crate) struct PanickingCheck(pub(crate) &'static str);

impl PanickingCheck {
    pub(crate) fn arc(name: &'static str) -> Arc<dyn Check> {
        Arc::new(Self(name))
    }
}

impl Check for PanickingCheck {
    fn name(&self) -> &str {
        self.0
    }

    fn description(&self) -> &str {
        "Always panics"
    }

    fn run(&self, _root: &Path, _ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        panic!("simulated panic")
    }
}

/// Check that trips the shared token, then reports itself cancelled.
pub(crate) struct CancellingCheck(pub(crate) &'static str);

impl CancellingCheck {
    pub(crate) fn arc(name: &'static str) -> Arc<dyn Check> {
        Arc::new(Self(name))
    }
}

impl Check for CancellingCheck {
    fn name(&self) -> &str {
        self.0
    }

    fn description(&self) -> &str {
        "Cancels the suite"
    }

    fn run(&self, _root: &Path, ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        ctx.cancel.cancel();
        ctx.ensure_not_cancelled()?;
        Ok(CheckReport::new(self.0))
    }
}

/// Check that counts how many times it ran.
pub(crate) struct CountingCheck {
    pub(crate) name: &'static str,
    pub(crate) runs: Arc<AtomicUsize>,
}

impl CountingCheck {
    pub(crate) fn arc(name: &'static str) -> (Arc<dyn Check>, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let check: Arc<dyn Check> = Arc::new(Self {
            name,
            runs: Arc::clone(&runs),
        });
        (check, runs)
    }
}

impl Check for CountingCheck {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        "Counts invocations"
    }

    fn run(&self, _root: &Path, _ctx: &CheckContext) -> Result<CheckReport, CheckError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let mut report = CheckReport::new(self.name);
        report.status = CheckStatus::Pass;
        Ok(report)
    }
}

/// Log sink that keeps every message for later assertions.
#[derive(Default)]
pub(crate) struct RecordingLog {
    entries: Mutex<Vec<(LogLevel, String, String)>>,
}

impl RecordingLog {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _, _)| *l == level)
            .map(|(_, _, m)| m.clone())
            .collect()
    }
}

impl CheckLog for RecordingLog {
    fn log(&self, level: LogLevel, check: &str, message: &str) {
        self.entries
            .lock()
            .unwrap()
            .push((level, check.to_string(), message.to_string()));
    }
}
