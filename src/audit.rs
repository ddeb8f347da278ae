//! Audit pipeline: extract, detect, score.
//!
//! Pure and deterministic. No I/O, no logging; callers collect sources and
//! render the returned `AuditReport`.

use crate::detect::detect_issues;
use crate::models::{AuditReport, FileStats, IssueSummary, Source, StyleRule, Totals};
use crate::parser::extract_rules;
use crate::score::{score, verdict};
use crate::specificity::split_selector_group;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuditError {
    /// Nothing was supplied to analyze.
    #[error("no CSS input to audit")]
    NoInput,
}

/// Audit the given named CSS buffers against `threshold`.
pub fn audit(sources: &[Source], threshold: u32) -> Result<AuditReport, AuditError> {
    if sources.is_empty() {
        return Err(AuditError::NoInput);
    }

    let mut rules: Vec<StyleRule> = Vec::new();
    let mut files: Vec<FileStats> = Vec::with_capacity(sources.len());
    let mut totals = Totals::default();
    for src in sources {
        let extracted = extract_rules(&src.content, &src.name);
        let stats = FileStats {
            name: src.name.clone(),
            bytes: src.content.len(),
            rules: extracted.len(),
            selectors: count_selectors(&extracted),
        };
        totals.bytes += stats.bytes;
        totals.rules += stats.rules;
        totals.selectors += stats.selectors;
        files.push(stats);
        rules.extend(extracted);
    }

    let detection = detect_issues(&rules);
    let scores = score(&rules, &detection, totals.bytes);
    let verdict = verdict(&scores, threshold);
    let summary = IssueSummary::from_issues(&detection.issues);

    Ok(AuditReport {
        files,
        totals,
        issues: detection.issues,
        summary,
        scores,
        verdict,
    })
}

fn count_selectors(rules: &[StyleRule]) -> usize {
    rules
        .iter()
        .map(|r| split_selector_group(&r.selector).len())
        .sum()
}
