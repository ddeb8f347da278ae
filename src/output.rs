//! Output rendering for audit reports.
//!
//! Supports `human` (default) and `json` outputs. The JSON form is the full
//! report plus any skipped sources; the human form is a summary with score
//! bars and the first `top` issues.

use crate::config::OutputMode;
use crate::models::{AuditReport, Issue, Severity};
use crate::sources::Skipped;
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;
use std::fmt::Write as _;

const BAR_WIDTH: usize = 20;

/// Print an audit report in the requested format.
pub fn print_report(
    report: &AuditReport,
    skipped: &[Skipped],
    output: OutputMode,
    color: bool,
    top: usize,
) -> Result<(), serde_json::Error> {
    match output {
        OutputMode::Json => println!(
            "{}",
            serde_json::to_string_pretty(&compose_report_json(report, skipped)?)?
        ),
        OutputMode::Human => print!("{}", render_human(report, skipped, color, top)),
    }
    Ok(())
}

/// Compose the report JSON object (pure) for testing/snapshot purposes.
pub fn compose_report_json(
    report: &AuditReport,
    skipped: &[Skipped],
) -> Result<JsonVal, serde_json::Error> {
    let mut out = serde_json::to_value(report)?;
    if let JsonVal::Object(map) = &mut out {
        map.insert("skipped".to_string(), serde_json::to_value(skipped)?);
    }
    Ok(out)
}

/// Render a filled/empty bar for a 0..=100 score.
pub fn score_bar(score: u32, width: usize) -> String {
    let filled = ((score.min(100) as usize) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn paint_score(text: String, score: u32, color: bool) -> String {
    if !color {
        return text;
    }
    if score >= 80 {
        text.green().to_string()
    } else if score >= 60 {
        text.yellow().to_string()
    } else {
        text.red().to_string()
    }
}

fn severity_tag(sev: Severity, color: bool) -> String {
    let (icon, tag) = match sev {
        Severity::Error => ("✖", "⟦error⟧"),
        Severity::Warning => ("▲", "⟦warn⟧"),
        Severity::Info => ("◆", "⟦info⟧"),
    };
    if !color {
        return format!("{} {}", icon, tag);
    }
    match sev {
        Severity::Error => format!("{} {}", icon.red(), tag.red().bold()),
        Severity::Warning => format!("{} {}", icon.yellow(), tag.yellow().bold()),
        Severity::Info => format!("{} {}", icon.blue(), tag.blue().bold()),
    }
}

fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_string()
    }
}

fn issue_line(is: &Issue, color: bool) -> String {
    let loc = format!("{}:{}", is.file, is.line);
    let loc = if color {
        loc.bold().to_string()
    } else {
        loc
    };
    format!(
        "{} {} ❲{}❳ {} — {}",
        severity_tag(is.severity, color),
        loc,
        is.kind,
        is.selector,
        is.message
    )
}

/// Render the human-readable report (pure).
pub fn render_human(report: &AuditReport, skipped: &[Skipped], color: bool, top: usize) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", heading("— Files —", color));
    for f in &report.files {
        let _ = writeln!(
            out,
            "  {}  {} bytes, {} rules, {} selectors",
            f.name, f.bytes, f.rules, f.selectors
        );
    }
    let _ = writeln!(
        out,
        "  total  {} bytes, {} rules, {} selectors",
        report.totals.bytes, report.totals.rules, report.totals.selectors
    );

    let _ = writeln!(out, "\n{}", heading("— Scores —", color));
    let s = &report.scores;
    for (label, value) in [
        ("overall", s.overall),
        ("specificity", s.specificity),
        ("duplicates", s.duplicates),
        ("important", s.important),
        ("file size", s.file_size),
    ] {
        let bar = paint_score(score_bar(value, BAR_WIDTH), value, color);
        let _ = writeln!(out, "  {:<12} {} {:>3}", label, bar, value);
    }

    let _ = writeln!(
        out,
        "\n{}",
        heading(
            &format!(
                "— Issues — errors={} warnings={} infos={}",
                report.summary.errors, report.summary.warnings, report.summary.infos
            ),
            color
        )
    );
    for is in report.issues.iter().take(top) {
        let _ = writeln!(out, "  {}", issue_line(is, color));
    }
    if report.issues.len() > top {
        let _ = writeln!(out, "  ... and {} more", report.issues.len() - top);
    }

    if !skipped.is_empty() {
        let _ = writeln!(out, "\n{}", heading("— Skipped —", color));
        for sk in skipped {
            let _ = writeln!(out, "  {} ({})", sk.name, sk.reason);
        }
    }

    let verdict = &report.verdict.summary;
    let verdict = match (color, report.verdict.passed) {
        (false, _) => verdict.to_string(),
        (true, true) => verdict.green().bold().to_string(),
        (true, false) => verdict.red().bold().to_string(),
    };
    let _ = writeln!(out, "\n{}", verdict);
    out
}
