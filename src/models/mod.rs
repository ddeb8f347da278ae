//! Shared data models for extracted rules, findings, and audit reports.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// One CSS rule block as seen by the extractor.
pub struct StyleRule {
    /// Raw selector text, possibly a comma-joined group.
    pub selector: String,
    /// Trimmed, non-empty declaration fragments in source order.
    pub declarations: Vec<String>,
    /// 1-based line where the selector begins.
    pub line: usize,
    /// Name of the originating text buffer.
    pub file: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Category of a finding.
pub enum IssueKind {
    Specificity,
    Duplicate,
    Important,
    Overqualified,
    Universal,
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            IssueKind::Specificity => "specificity",
            IssueKind::Duplicate => "duplicate",
            IssueKind::Important => "important",
            IssueKind::Overqualified => "overqualified",
            IssueKind::Universal => "universal",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Severity attached to each detection rule.
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single finding with provenance copied from the originating rule.
pub struct Issue {
    pub kind: IssueKind,
    pub severity: Severity,
    pub message: String,
    pub selector: String,
    pub file: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Size and rule statistics for one input.
pub struct FileStats {
    pub name: String,
    pub bytes: usize,
    pub rules: usize,
    pub selectors: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Statistics summed across all inputs.
pub struct Totals {
    pub bytes: usize,
    pub rules: usize,
    pub selectors: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
/// Health scores, each within 0..=100.
pub struct Scores {
    pub overall: u32,
    pub specificity: u32,
    pub duplicates: u32,
    pub important: u32,
    #[serde(rename = "fileSize")]
    pub file_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Pass/fail outcome against the caller's threshold.
pub struct Verdict {
    pub passed: bool,
    pub threshold: u32,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Issue counts per severity.
pub struct IssueSummary {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl IssueSummary {
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = IssueSummary::default();
        for is in issues {
            match is.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
                Severity::Info => summary.infos += 1,
            }
        }
        summary
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Aggregate result of one audit run.
pub struct AuditReport {
    pub files: Vec<FileStats>,
    pub totals: Totals,
    pub issues: Vec<Issue>,
    pub summary: IssueSummary,
    pub scores: Scores,
    pub verdict: Verdict,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A named CSS text buffer handed to the audit pipeline.
pub struct Source {
    pub name: String,
    pub content: String,
}

impl Source {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Source {
            name: name.into(),
            content: content.into(),
        }
    }
}
