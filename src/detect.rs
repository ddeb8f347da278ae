//! Issue detection over extracted rules.
//!
//! Three passes run in a fixed order so output is deterministic:
//! 1. Per-selector checks (specificity, overqualification, universal, nesting).
//! 2. `!important` usage across all declarations.
//! 3. Declarations repeated three or more times across the whole input set.
//!
//! Alongside the issues, `Detection` carries the counters the scorer needs.

use crate::models::{Issue, IssueKind, Severity, StyleRule};
use crate::specificity::{specificity_of, split_selector_group};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

// Only the leading simple selector is inspected; `ul li.item` is not flagged.
static OVERQUALIFIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z]+[.#]").unwrap());
static STANDALONE_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s\*\s").unwrap());
static COMBINATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s>+~]+").unwrap());

const MAX_NESTING: usize = 4;
const DUPLICATE_MIN: usize = 3;
const SNIPPET_CHARS: usize = 60;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Issues plus the raw counts consumed by the scorer.
pub struct Detection {
    pub issues: Vec<Issue>,
    /// High/moderate specificity and deep nesting hits, one per triggered check.
    pub high_specificity: usize,
    /// Sum of `occurrences - 1` over reported duplicate groups.
    pub duplicates: usize,
    pub important: usize,
}

/// Run every detection pass over `rules`.
pub fn detect_issues(rules: &[StyleRule]) -> Detection {
    let mut det = Detection::default();
    for rule in rules {
        for selector in split_selector_group(&rule.selector) {
            check_selector(rule, selector, &mut det);
        }
    }
    check_important(rules, &mut det);
    check_duplicates(rules, &mut det);
    det
}

fn issue(
    rule: &StyleRule,
    selector: &str,
    kind: IssueKind,
    severity: Severity,
    message: String,
) -> Issue {
    Issue {
        kind,
        severity,
        message,
        selector: selector.to_string(),
        file: rule.file.clone(),
        line: rule.line,
    }
}

fn check_selector(rule: &StyleRule, selector: &str, det: &mut Detection) {
    let spec = specificity_of(selector);
    if spec.ids >= 2 {
        det.high_specificity += 1;
        det.issues.push(issue(
            rule,
            selector,
            IssueKind::Specificity,
            Severity::Error,
            format!("High specificity: {} ID selectors", spec.ids),
        ));
    } else if spec.ids >= 1 && spec.classes >= 2 {
        det.high_specificity += 1;
        det.issues.push(issue(
            rule,
            selector,
            IssueKind::Specificity,
            Severity::Warning,
            format!(
                "Moderate specificity: ID combined with {} class-level selectors",
                spec.classes
            ),
        ));
    }

    if OVERQUALIFIED.is_match(selector) {
        det.issues.push(issue(
            rule,
            selector,
            IssueKind::Overqualified,
            Severity::Info,
            "Overqualified selector: type selector combined with class or ID".to_string(),
        ));
    }

    if selector == "*" || STANDALONE_STAR.is_match(selector) {
        det.issues.push(issue(
            rule,
            selector,
            IssueKind::Universal,
            Severity::Info,
            "Universal selector matches every element".to_string(),
        ));
    }

    let depth = COMBINATORS
        .split(selector)
        .filter(|part| !part.is_empty())
        .count();
    if depth > MAX_NESTING {
        det.high_specificity += 1;
        det.issues.push(issue(
            rule,
            selector,
            IssueKind::Specificity,
            Severity::Warning,
            format!("Deep nesting: {} levels (max {})", depth, MAX_NESTING),
        ));
    }
}

fn check_important(rules: &[StyleRule], det: &mut Detection) {
    for rule in rules {
        for decl in &rule.declarations {
            if decl.contains("!important") {
                det.important += 1;
                det.issues.push(issue(
                    rule,
                    &rule.selector,
                    IssueKind::Important,
                    Severity::Warning,
                    format!("!important used: {}", truncate(decl, SNIPPET_CHARS)),
                ));
            }
        }
    }
}

fn check_duplicates(rules: &[StyleRule], det: &mut Detection) {
    // Groups stay in first-seen order so repeated runs report identically.
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&StyleRule>)> = Vec::new();
    for rule in rules {
        for decl in &rule.declarations {
            let Some(key) = declaration_key(decl) else {
                continue;
            };
            match slots.get(&key).copied() {
                Some(slot) => groups[slot].1.push(rule),
                None => {
                    slots.insert(key.clone(), groups.len());
                    groups.push((key, vec![rule]));
                }
            }
        }
    }

    for (key, group) in &groups {
        if group.len() < DUPLICATE_MIN {
            continue;
        }
        det.duplicates += group.len() - 1;
        let first = group[0];
        let selectors = group
            .iter()
            .map(|r| r.selector.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        det.issues.push(Issue {
            kind: IssueKind::Duplicate,
            severity: Severity::Warning,
            message: format!("Declaration \"{}\" repeated {} times", key, group.len()),
            selector: selectors,
            file: first.file.clone(),
            line: first.line,
        });
    }
}

/// Normalize a declaration into a `property:value` key.
///
/// Only the first colon separates property from value, so values such as
/// `url(http://x)` survive intact. Returns `None` unless both halves are
/// non-empty after trimming.
pub fn declaration_key(decl: &str) -> Option<String> {
    let (prop, value) = decl.split_once(':')?;
    let prop = prop.trim();
    let value = value.trim();
    if prop.is_empty() || value.is_empty() {
        return None;
    }
    Some(format!("{}:{}", prop, value))
}

fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::extract_rules;

    fn rule(selector: &str, decls: &[&str]) -> StyleRule {
        StyleRule {
            selector: selector.to_string(),
            declarations: decls.iter().map(|d| d.to_string()).collect(),
            line: 1,
            file: "t.css".to_string(),
        }
    }

    fn kinds(det: &Detection) -> Vec<(IssueKind, Severity)> {
        det.issues.iter().map(|i| (i.kind, i.severity)).collect()
    }

    #[test]
    fn test_high_specificity_is_error() {
        let det = detect_issues(&[rule("#a #b", &[])]);
        assert_eq!(kinds(&det), vec![(IssueKind::Specificity, Severity::Error)]);
        assert_eq!(det.high_specificity, 1);
        assert!(det.issues[0].message.contains('2'));
    }

    #[test]
    fn test_moderate_specificity_only_without_high() {
        let det = detect_issues(&[rule("#a .b .c", &[])]);
        assert_eq!(kinds(&det), vec![(IssueKind::Specificity, Severity::Warning)]);

        let det = detect_issues(&[rule("#a #b .c .d", &[])]);
        assert_eq!(kinds(&det), vec![(IssueKind::Specificity, Severity::Error)]);
        assert_eq!(det.high_specificity, 1);
    }

    #[test]
    fn test_overqualified_only_leading_selector() {
        let det = detect_issues(&[rule("div.foo", &[]), rule("SPAN#bar", &[])]);
        let overq = det
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::Overqualified)
            .count();
        assert_eq!(overq, 2);

        // Known limitation: qualification after a combinator is not flagged.
        let det = detect_issues(&[rule("ul li.item", &[])]);
        assert!(det.issues.is_empty());
    }

    #[test]
    fn test_universal_selector() {
        let det = detect_issues(&[rule("*", &[]), rule(".a * .b", &[])]);
        let universal = det
            .issues
            .iter()
            .filter(|i| i.kind == IssueKind::Universal)
            .count();
        assert_eq!(universal, 2);

        let det = detect_issues(&[rule("[data-x*=\"y\"]", &[]), rule("*.a", &[])]);
        assert!(det.issues.iter().all(|i| i.kind != IssueKind::Universal));
    }

    #[test]
    fn test_deep_nesting_counts_towards_high_specificity() {
        let det = detect_issues(&[rule("a b > c + d ~ e", &[])]);
        assert_eq!(kinds(&det), vec![(IssueKind::Specificity, Severity::Warning)]);
        assert_eq!(det.high_specificity, 1);

        let det = detect_issues(&[rule("a b c d", &[])]);
        assert!(det.issues.is_empty());
    }

    #[test]
    fn test_checks_are_independent_counters() {
        let det = detect_issues(&[rule("#a #b c d e f", &[])]);
        assert_eq!(det.high_specificity, 2);
        assert_eq!(det.issues.len(), 2);
    }

    #[test]
    fn test_each_group_member_checked() {
        let det = detect_issues(&[rule("#a #b, div.x", &[])]);
        assert_eq!(det.issues.len(), 2);
        assert_eq!(det.issues[0].selector, "#a #b");
        assert_eq!(det.issues[1].selector, "div.x");
    }

    #[test]
    fn test_important_detected_and_truncated() {
        let det = detect_issues(&[rule("a", &["color:red !important", "margin: 0"])]);
        assert_eq!(kinds(&det), vec![(IssueKind::Important, Severity::Warning)]);
        assert_eq!(det.important, 1);

        let long = format!("background: url({}) !important", "x".repeat(100));
        let det = detect_issues(&[rule("a", &[long.as_str()])]);
        assert!(det.issues[0].message.ends_with("..."));

        let det = detect_issues(&[rule("a", &["color: red"])]);
        assert!(det.issues.is_empty());
    }

    #[test]
    fn test_duplicate_needs_three_occurrences() {
        let two = [rule(".a", &["color: red"]), rule(".b", &["color:red"])];
        assert!(detect_issues(&two).issues.is_empty());

        let three = [
            rule(".a", &["color: red"]),
            rule(".b", &["color:red"]),
            rule(".c", &["color :  red"]),
        ];
        let det = detect_issues(&three);
        assert_eq!(kinds(&det), vec![(IssueKind::Duplicate, Severity::Warning)]);
        assert!(det.issues[0].message.contains("color:red"));
        assert!(det.issues[0].message.contains('3'));
        assert_eq!(det.issues[0].selector, ".a, .b, .c");
        assert_eq!(det.duplicates, 2);
    }

    #[test]
    fn test_declaration_key() {
        assert_eq!(
            declaration_key("background: url(http://x/y.png)"),
            Some("background:url(http://x/y.png)".to_string())
        );
        assert_eq!(declaration_key("color:"), None);
        assert_eq!(declaration_key(": red"), None);
        assert_eq!(declaration_key("garbage"), None);
    }

    #[test]
    fn test_detection_order_and_determinism() {
        let css = "#a#b { color: red !important; } #a#b { color: red !important; } #a#b { color: red !important; }";
        let rules = extract_rules(css, "f");
        let det = detect_issues(&rules);
        let order: Vec<IssueKind> = det.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            order,
            vec![
                IssueKind::Specificity,
                IssueKind::Specificity,
                IssueKind::Specificity,
                IssueKind::Important,
                IssueKind::Important,
                IssueKind::Important,
                IssueKind::Duplicate,
            ]
        );
        assert_eq!(det, detect_issues(&rules));
    }
}
