//! Best-effort rule extraction from raw CSS text.
//!
//! This is a brace-aware scanner, not a CSS grammar. It produces one
//! `StyleRule` per top-level rule block and treats at-rule bodies as opaque.
//!
//! Design notes:
//! - Comments are removed on a copy that keeps every newline they
//!   contained, so line numbers still match the original text.
//! - Scanning is an explicit state machine over `State`, with the line
//!   counter advanced for every consumed `\n` regardless of state.
//! - Malformed input never fails: unterminated selectors, blocks, and
//!   at-rules are dropped silently.

use crate::models::StyleRule;
use regex::Regex;
use std::sync::LazyLock;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());

enum State {
    /// Between rules, skipping whitespace.
    Idle,
    /// Inside an at-rule prelude, waiting for its first `{`.
    AtRule,
    /// Inside an at-rule body at the given brace depth.
    AtBlock { depth: usize },
    /// Accumulating a selector that started on `line`.
    Selector { line: usize, text: String },
    /// Accumulating a declaration block at the given brace depth.
    Block {
        selector: String,
        line: usize,
        depth: usize,
        body: String,
    },
}

/// Remove `/* ... */` spans, keeping the newlines they contained.
pub fn strip_comments(text: &str) -> String {
    COMMENT
        .replace_all(text, |caps: &regex::Captures| {
            caps[0].chars().filter(|c| *c == '\n').collect::<String>()
        })
        .into_owned()
}

/// Extract style rules from `text`, tagging each with `source`.
pub fn extract_rules(text: &str, source: &str) -> Vec<StyleRule> {
    let cleaned = strip_comments(text);
    let mut rules = Vec::new();
    let mut state = State::Idle;
    let mut line = 1usize;
    let mut chars = cleaned.chars();

    while let Some(ch) = chars.next() {
        state = match state {
            State::Idle => match ch {
                c if c.is_whitespace() => State::Idle,
                '@' => State::AtRule,
                '{' => State::Selector {
                    line,
                    text: String::new(),
                }
                .open(),
                '\\' => {
                    let start = line;
                    let mut text = String::new();
                    push_escaped(&mut text, &mut chars, &mut line);
                    State::Selector { line: start, text }
                }
                c => State::Selector {
                    line,
                    text: c.to_string(),
                },
            },
            // At-rule preludes run to the first `{`, whatever precedes it.
            State::AtRule => match ch {
                '{' => State::AtBlock { depth: 1 },
                _ => State::AtRule,
            },
            State::AtBlock { depth } => match ch {
                '{' => State::AtBlock { depth: depth + 1 },
                '}' if depth == 1 => State::Idle,
                '}' => State::AtBlock { depth: depth - 1 },
                _ => State::AtBlock { depth },
            },
            State::Selector {
                line: start,
                mut text,
            } => match ch {
                '{' => State::Selector { line: start, text }.open(),
                '\\' => {
                    push_escaped(&mut text, &mut chars, &mut line);
                    State::Selector { line: start, text }
                }
                c => {
                    text.push(c);
                    State::Selector { line: start, text }
                }
            },
            State::Block {
                selector,
                line: start,
                depth,
                mut body,
            } => match ch {
                '}' if depth == 1 => {
                    if !selector.is_empty() {
                        rules.push(StyleRule {
                            selector,
                            declarations: split_declarations(&body),
                            line: start,
                            file: source.to_string(),
                        });
                    }
                    State::Idle
                }
                c => {
                    let depth = match c {
                        '{' => depth + 1,
                        '}' => depth - 1,
                        _ => depth,
                    };
                    body.push(c);
                    State::Block {
                        selector,
                        line: start,
                        depth,
                        body,
                    }
                }
            },
        };
        if ch == '\n' {
            line += 1;
        }
    }

    rules
}

impl State {
    /// Transition a finished selector into its declaration block.
    fn open(self) -> State {
        match self {
            State::Selector { line, text } => State::Block {
                selector: text.trim().to_string(),
                line,
                depth: 1,
                body: String::new(),
            },
            other => other,
        }
    }
}

/// Push a backslash and the character it escapes, counting a newline.
fn push_escaped(text: &mut String, chars: &mut std::str::Chars<'_>, line: &mut usize) {
    text.push('\\');
    if let Some(next) = chars.next() {
        if next == '\n' {
            *line += 1;
        }
        text.push(next);
    }
}

/// Split a declaration block on `;`, trimming and dropping empty fragments.
pub fn split_declarations(body: &str) -> Vec<String> {
    body.split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}
