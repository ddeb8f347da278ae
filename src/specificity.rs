//! Selector specificity as an `(ids, classes, elements)` triple.
//!
//! Classes, attribute selectors, and pseudo-classes share one bucket.
//! Pseudo-elements count as elements. Combinators, `*`, and punctuation
//! contribute nothing. Malformed selectors degrade to low counts.

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

static PSEUDO_ELEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"::[\w-]+").unwrap());
static ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#[\w-]+").unwrap());
static CLASS_LIKE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\.[\w-]+|\[[^\]]*\]|:[\w-]+(?:\([^)]*\))?").unwrap()
});
static ELEMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z_][\w-]*").unwrap());

// Stands in for a pseudo-element so it is counted with the type selectors.
const ELEMENT_MARKER: &str = " pseudo ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Specificity {
    pub ids: usize,
    pub classes: usize,
    pub elements: usize,
}

impl Specificity {
    pub fn new(ids: usize, classes: usize, elements: usize) -> Self {
        Specificity {
            ids,
            classes,
            elements,
        }
    }
}

/// Compute the specificity of a single selector (no commas).
pub fn specificity_of(selector: &str) -> Specificity {
    let marked = PSEUDO_ELEMENT.replace_all(selector, ELEMENT_MARKER);

    let ids = ID.find_iter(&marked).count();
    let without_ids = ID.replace_all(&marked, " ");

    let classes = CLASS_LIKE.find_iter(&without_ids).count();
    let rest = CLASS_LIKE.replace_all(&without_ids, " ");

    let elements = ELEMENT.find_iter(&rest).count();
    Specificity::new(ids, classes, elements)
}

/// Split a selector group on top-level commas.
///
/// Commas inside `()` or `[]` stay with their selector, so `:is(a, b)` is
/// one alternative. Empty alternatives are dropped.
pub fn split_selector_group(group: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in group.char_indices() {
        match ch {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                out.push(group[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    out.push(group[start..].trim());
    out.retain(|s| !s.is_empty());
    out
}
