//! Rule identifiers attached to findings.
//!
//! Consumers group and filter findings by these strings, independent of the
//! message text.

// Suite runner
pub const CHECK_EXECUTION_ERROR: &str = "check-execution-error";
pub const CHECK_CANCELLED: &str = "check-cancelled";

// verify-readme
pub const README_MISSING: &str = "readme-missing";
pub const README_READ_ERROR: &str = "readme-read-error";
pub const README_MISSING_SECTION: &str = "readme-missing-section";
pub const README_TOO_SHORT: &str = "readme-too-short";
pub const README_PLACEHOLDER_TEXT: &str = "readme-placeholder-text";
pub const README_PLACEHOLDER_LINK: &str = "readme-placeholder-link";
pub const DISCOVERY_ERROR: &str = "discovery-error";

// Tool output
pub const TOOL_DIAGNOSTIC: &str = "tool-diagnostic";
pub const GENERAL_ERROR: &str = "general-error";
pub const GENERAL_WARNING: &str = "general-warning";

// doc-warden
pub const GENERAL_FAILURE: &str = "general-failure";
pub const SCRIPT_MISSING: &str = "script-missing";
pub const SETTINGS_MISSING: &str = "settings-missing";
pub const SCRIPT_EXECUTION_ERROR: &str = "script-execution-error";
pub const TOOL_TIMEOUT: &str = "tool-timeout";
