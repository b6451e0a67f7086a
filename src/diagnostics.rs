//! Diagnostics sink handed to checks.
//!
//! Checks log through a `CheckLog` passed in their [`CheckContext`](crate::check::CheckContext)
//! rather than calling `tracing` directly, so tests can swap in a recording
//! or silent implementation.

/// Log level for check diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Side-effecting diagnostics collaborator.
pub trait CheckLog: Send + Sync {
    /// Record a message emitted on behalf of `check`.
    fn log(&self, level: LogLevel, check: &str, message: &str);

    fn debug(&self, check: &str, message: &str) {
        self.log(LogLevel::Debug, check, message);
    }

    fn info(&self, check: &str, message: &str) {
        self.log(LogLevel::Info, check, message);
    }

    fn warn(&self, check: &str, message: &str) {
        self.log(LogLevel::Warn, check, message);
    }

    fn error(&self, check: &str, message: &str) {
        self.log(LogLevel::Error, check, message);
    }
}

/// Forwards to the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl CheckLog for TracingLog {
    fn log(&self, level: LogLevel, check: &str, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(check, "{}", message),
            LogLevel::Info => tracing::info!(check, "{}", message),
            LogLevel::Warn => tracing::warn!(check, "{}", message),
            LogLevel::Error => tracing::error!(check, "{}", message),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl CheckLog for NullLog {
    fn log(&self, _level: LogLevel, _check: &str, _message: &str) {}
}
