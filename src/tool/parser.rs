//! Classification of line-oriented tool output into findings.
//!
//! Each line is offered to an ordered list of rules; the first rule that
//! recognizes it wins. Lines nothing recognizes are tool chatter and are
//! skipped. Parsing never fails: the worst case is an empty result.

use crate::report::{Finding, Severity, rules};
use regex::Regex;
use std::sync::LazyLock;

/// `<file>:<line>: <Severity>: <message>`
static DIAGNOSTIC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+?):([0-9]+):\s*(Error|Warning|Info):\s*(.+)$")
        .expect("Invalid diagnostic regex")
});

/// `<n> files scanned`
static FILES_SCANNED_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s+files?\s+scanned").expect("Invalid files-scanned regex")
});

/// What a single recognized line contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    Finding(Finding),
    /// Running count of files the tool reports having scanned.
    FilesScanned(usize),
}

type LineRule = fn(&str) -> Option<LineEvent>;

/// Tried top to bottom.
const LINE_RULES: &[LineRule] = &[
    structured_diagnostic,
    files_scanned,
    bare_error_marker,
    bare_warning_marker,
];

/// Findings and file count extracted from one tool run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedOutput {
    pub findings: Vec<Finding>,
    pub files_checked: usize,
}

/// Classify one line. `None` means the line is ignored.
pub fn classify_line(line: &str) -> Option<LineEvent> {
    if line.trim().is_empty() {
        return None;
    }
    LINE_RULES.iter().find_map(|rule| rule(line))
}

/// Parse a sequence of lines. A later file-count line replaces an earlier one.
pub fn parse_lines<'a, I>(lines: I) -> ParsedOutput
where
    I: IntoIterator<Item = &'a str>,
{
    let mut parsed = ParsedOutput::default();

    for line in lines {
        match classify_line(line) {
            Some(LineEvent::Finding(finding)) => parsed.findings.push(finding),
            Some(LineEvent::FilesScanned(count)) => parsed.files_checked = count,
            None => {}
        }
    }

    parsed
}

/// Parse captured stdout then stderr. The relative order of the two
/// streams is not meaningful.
pub fn parse_output(stdout: &str, stderr: &str) -> ParsedOutput {
    parse_lines(stdout.lines().chain(stderr.lines()))
}

/// Like [`parse_output`], for raw bytes. Invalid UTF-8 is replaced.
pub fn parse_output_bytes(stdout: &[u8], stderr: &[u8]) -> ParsedOutput {
    parse_output(
        &String::from_utf8_lossy(stdout),
        &String::from_utf8_lossy(stderr),
    )
}

/// Map a tool severity token. Unrecognized tokens fail closed as `Error`.
pub fn severity_from_token(token: &str) -> Severity {
    match token.trim().to_ascii_lowercase().as_str() {
        "error" => Severity::Error,
        "warning" => Severity::Warning,
        "info" => Severity::Info,
        _ => Severity::Error,
    }
}

fn structured_diagnostic(line: &str) -> Option<LineEvent> {
    let caps = DIAGNOSTIC_REGEX.captures(line)?;

    let mut finding = Finding::new(
        severity_from_token(&caps[3]),
        rules::TOOL_DIAGNOSTIC,
        caps[4].trim(),
    )
    .with_file(caps[1].trim());

    // An out-of-range line number still yields a finding, just unlocated.
    if let Ok(line_number) = caps[2].parse::<u32>() {
        finding = finding.with_line(line_number);
    }

    Some(LineEvent::Finding(finding))
}

fn files_scanned(line: &str) -> Option<LineEvent> {
    let caps = FILES_SCANNED_REGEX.captures(line)?;
    caps[1].parse::<usize>().ok().map(LineEvent::FilesScanned)
}

fn bare_error_marker(line: &str) -> Option<LineEvent> {
    bare_marker(line, "error:", Severity::Error, rules::GENERAL_ERROR)
}

fn bare_warning_marker(line: &str) -> Option<LineEvent> {
    bare_marker(line, "warning:", Severity::Warning, rules::GENERAL_WARNING)
}

fn bare_marker(line: &str, marker: &str, severity: Severity, rule: &str) -> Option<LineEvent> {
    if !line.to_ascii_lowercase().contains(marker) {
        return None;
    }
    Some(LineEvent::Finding(Finding::new(severity, rule, line.trim())))
}
