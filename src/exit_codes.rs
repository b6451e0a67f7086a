//! Exit code constants for the ci-checks CLI.
//!
//! - 0: Suite passed (Pass or Warning), or a listing succeeded
//! - 1: Suite failed (a check reported Fail or Error)
//! - 2: User error (bad args, missing root path, invalid config)

/// Successful execution. Warnings do not fail the build.
pub const SUCCESS: i32 = 0;

/// One or more checks failed or could not execute.
pub const CHECKS_FAILED: i32 = 1;

/// User error: bad arguments, missing root path, or invalid configuration.
pub const USER_ERROR: i32 = 2;
