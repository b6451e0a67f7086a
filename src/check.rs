//! The contract every check implements.

use crate::cancel::CancellationToken;
use crate::diagnostics::{CheckLog, NullLog};
use crate::error::CheckError;
use crate::report::CheckReport;
use std::path::Path;
use std::sync::Arc;

/// Everything a check receives besides the root path.
#[derive(Clone)]
pub struct CheckContext {
    pub cancel: CancellationToken,
    pub log: Arc<dyn CheckLog>,
}

impl CheckContext {
    pub fn new(cancel: CancellationToken, log: Arc<dyn CheckLog>) -> Self {
        Self { cancel, log }
    }

    /// A context with a fresh token and no logging.
    pub fn silent() -> Self {
        Self::new(CancellationToken::new(), Arc::new(NullLog))
    }

    /// Return `Err(CheckError::Cancelled)` once the token has tripped.
    pub fn ensure_not_cancelled(&self) -> Result<(), CheckError> {
        if self.cancel.is_cancelled() {
            Err(CheckError::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for CheckContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckContext")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish()
    }
}

/// A named, independently runnable validation unit.
///
/// Implementations should turn recoverable problems (unreadable files, tool
/// failures) into findings on the returned report. Returning `Err`, or
/// panicking, is still safe: the suite runner isolates it and records a
/// synthetic `Error` report in its place.
pub trait Check: Send + Sync {
    /// Stable identifier, unique (case-insensitively) within a registry.
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn run(&self, root: &Path, ctx: &CheckContext) -> Result<CheckReport, CheckError>;
}
