//! Health scoring and the pass/fail verdict.
//!
//! Sub-scores are computed as floats, clamped to 0..=100, then combined
//! with fixed weights. Only the displayed values are rounded; the overall
//! score is rounded once from the unrounded sub-scores.

use crate::detect::Detection;
use crate::models::{Scores, StyleRule, Verdict};

pub const DEFAULT_THRESHOLD: u32 = 60;

const WEIGHT_SPECIFICITY: f64 = 0.30;
const WEIGHT_DUPLICATES: f64 = 0.25;
const WEIGHT_IMPORTANT: f64 = 0.25;
const WEIGHT_FILE_SIZE: f64 = 0.20;

/// Byte-size steps, checked from the largest down.
const SIZE_STEPS: [(usize, f64); 4] = [
    (100_000, 30.0),
    (50_000, 50.0),
    (25_000, 70.0),
    (10_000, 85.0),
];

fn clamp(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Step score for the combined byte size of all inputs.
pub fn file_size_score(total_bytes: usize) -> f64 {
    SIZE_STEPS
        .iter()
        .find(|(limit, _)| total_bytes > *limit)
        .map(|(_, score)| *score)
        .unwrap_or(100.0)
}

/// Compute all scores for one audit run.
pub fn score(rules: &[StyleRule], detection: &Detection, total_bytes: usize) -> Scores {
    let rule_count = rules.len().max(1) as f64;
    let decl_count = rules
        .iter()
        .map(|r| r.declarations.len())
        .sum::<usize>()
        .max(1) as f64;

    let specificity = clamp(100.0 - (detection.high_specificity as f64 / rule_count) * 200.0);
    let duplicates = clamp(100.0 - (detection.duplicates as f64 / decl_count) * 300.0);
    let important = clamp(100.0 - (detection.important as f64 / decl_count) * 500.0);
    let file_size = file_size_score(total_bytes);

    let overall = specificity * WEIGHT_SPECIFICITY
        + duplicates * WEIGHT_DUPLICATES
        + important * WEIGHT_IMPORTANT
        + file_size * WEIGHT_FILE_SIZE;

    Scores {
        overall: overall.round() as u32,
        specificity: specificity.round() as u32,
        duplicates: duplicates.round() as u32,
        important: important.round() as u32,
        file_size: file_size.round() as u32,
    }
}

/// Compare the overall score against `threshold`.
pub fn verdict(scores: &Scores, threshold: u32) -> Verdict {
    let passed = scores.overall >= threshold;
    let summary = if passed {
        format!(
            "PASS: overall score {} meets threshold {}",
            scores.overall, threshold
        )
    } else {
        format!(
            "FAIL: overall score {} is below threshold {}",
            scores.overall, threshold
        )
    };
    Verdict {
        passed,
        threshold,
        summary,
    }
}
