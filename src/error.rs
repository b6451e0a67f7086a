//! Error types for ci-checks.
//!
//! Uses thiserror for derive macros. `CiError` covers failures that are
//! allowed to abort a whole invocation (bad input before any check starts);
//! `CheckError` covers failures inside a single check, which the suite runner
//! turns into report data instead of propagating.

use crate::exit_codes;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for ci-checks operations.
#[derive(Error, Debug)]
pub enum CiError {
    /// User provided invalid arguments, a missing root path, or a bad config.
    #[error("{0}")]
    UserError(String),

    /// The suite ran to completion but its verdict is a failure.
    #[error("Checks failed: {0}")]
    ChecksFailed(String),
}

impl CiError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            CiError::UserError(_) => exit_codes::USER_ERROR,
            CiError::ChecksFailed(_) => exit_codes::CHECKS_FAILED,
        }
    }
}

/// Result type alias for ci-checks operations.
pub type Result<T> = std::result::Result<T, CiError>;

/// Failure raised inside a single check.
#[derive(Error, Debug)]
pub enum CheckError {
    /// The shared cancellation token was tripped while the check was running.
    #[error("check was cancelled")]
    Cancelled,

    /// A filesystem operation failed in a way the check could not recover from.
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external tool could not be driven.
    #[error("tool execution failed: {0}")]
    Tool(String),
}

impl CheckError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CheckError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_error_has_correct_exit_code() {
        let err = CiError::UserError("path does not exist".to_string());
        assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    }

    #[test]
    fn checks_failed_has_correct_exit_code() {
        let err = CiError::ChecksFailed("2 issues".to_string());
        assert_eq!(err.exit_code(), exit_codes::CHECKS_FAILED);
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = CiError::ChecksFailed("overall status Fail".to_string());
        assert_eq!(err.to_string(), "Checks failed: overall status Fail");

        let err = CheckError::io(
            "/repo/README.md",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "I/O error at '/repo/README.md': denied");

        assert_eq!(CheckError::Cancelled.to_string(), "check was cancelled");
    }
}
