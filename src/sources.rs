//! Source collection: turns a CLI target into named CSS buffers.
//!
//! Supported targets:
//! - a directory, searched recursively for configured extensions;
//! - an HTML file, whose `<style>` bodies and local `<link rel="stylesheet">`
//!   targets are collected;
//! - any other file, read as a single stylesheet.
//!
//! Individual unreadable files and unresolvable links are recorded as
//! `Skipped` and never abort the run. Remote stylesheets are not fetched.

use crate::models::Source;
use glob::{glob, Pattern};
use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b[^>]*>(.*?)</style\s*>").unwrap());
static LINK_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<link\b[^>]*>").unwrap());
static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\b(rel|href)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap()
});

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("input not found: {0}")]
    NotFound(String),
    #[error("remote input is not supported: {0}")]
    Remote(String),
    #[error("no stylesheets found in {0}")]
    NoFiles(String),
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
/// Discovery options resolved from configuration.
pub struct CollectOptions {
    /// Directory names skipped during recursive discovery.
    pub exclude: Vec<String>,
    /// File extensions (without dot) treated as stylesheets.
    pub extensions: Vec<String>,
}

impl Default for CollectOptions {
    fn default() -> Self {
        CollectOptions {
            exclude: vec!["node_modules".to_string()],
            extensions: vec!["css".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A source that was found but could not be read.
pub struct Skipped {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Collected {
    pub sources: Vec<Source>,
    pub skipped: Vec<Skipped>,
}

/// Resolve `target` into stylesheet buffers.
pub fn collect_sources(target: &str, opts: &CollectOptions) -> Result<Collected, SourceError> {
    if is_remote(target) {
        return Err(SourceError::Remote(target.to_string()));
    }
    let path = Path::new(target);
    if !path.exists() {
        return Err(SourceError::NotFound(target.to_string()));
    }
    if path.is_dir() {
        return collect_dir(path, opts);
    }
    if is_html(path) {
        return collect_html(path);
    }
    let content = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: target.to_string(),
        source,
    })?;
    Ok(Collected {
        sources: vec![Source::new(target, content)],
        skipped: Vec::new(),
    })
}

fn is_remote(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

fn is_html(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("html") || e.eq_ignore_ascii_case("htm"))
        .unwrap_or(false)
}

/// Recursively discover stylesheets under `root`, sorted by path.
fn collect_dir(root: &Path, opts: &CollectOptions) -> Result<Collected, SourceError> {
    let base = Pattern::escape(&root.to_string_lossy());
    let mut paths: Vec<PathBuf> = Vec::new();
    for ext in &opts.extensions {
        let pattern = format!("{}/**/*.{}", base.trim_end_matches('/'), ext);
        let entries = match glob(&pattern) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "invalid discovery pattern");
                continue;
            }
        };
        for entry in entries.flatten() {
            if entry.is_file() && !is_excluded(root, &entry, &opts.exclude) {
                paths.push(entry);
            }
        }
    }
    paths.sort();
    paths.dedup();
    if paths.is_empty() {
        return Err(SourceError::NoFiles(root.to_string_lossy().to_string()));
    }
    debug!(count = paths.len(), root = %root.display(), "discovered stylesheets");

    let read: Vec<Result<Source, Skipped>> = paths
        .par_iter()
        .map(|p| {
            let name = display_name(root, p);
            match fs::read_to_string(p) {
                Ok(content) => Ok(Source::new(name, content)),
                Err(e) => Err(Skipped {
                    name,
                    reason: e.to_string(),
                }),
            }
        })
        .collect();
    Ok(partition(read))
}

/// True when any directory between `root` and `path` is hidden or excluded.
fn is_excluded(root: &Path, path: &Path, exclude: &[String]) -> bool {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let Some(dirs) = rel.parent() else {
        return false;
    };
    dirs.components().any(|c| match c {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            name.starts_with('.') || exclude.iter().any(|ex| ex == name.as_ref())
        }
        _ => false,
    })
}

fn display_name(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .replace('\\', "/")
}

/// Collect inline `<style>` bodies and local linked stylesheets.
fn collect_html(path: &Path) -> Result<Collected, SourceError> {
    let html = fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_string_lossy().to_string(),
        source,
    })?;
    let file = path.to_string_lossy().to_string();
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut read: Vec<Result<Source, Skipped>> = Vec::new();
    for (n, caps) in STYLE_BLOCK.captures_iter(&html).enumerate() {
        read.push(Ok(Source::new(
            format!("{}#style[{}]", file, n + 1),
            caps[1].to_string(),
        )));
    }
    for href in stylesheet_links(&html) {
        read.push(resolve_link(dir, &href));
    }

    let collected = partition(read);
    if collected.sources.is_empty() {
        for s in &collected.skipped {
            warn!(source = %s.name, reason = %s.reason, "skipped stylesheet");
        }
        return Err(SourceError::NoFiles(file));
    }
    Ok(collected)
}

/// `href` values of every `<link>` whose `rel` includes `stylesheet`.
pub fn stylesheet_links(html: &str) -> Vec<String> {
    let mut out = Vec::new();
    for tag in LINK_TAG.find_iter(html) {
        let mut rel: Option<String> = None;
        let mut href: Option<String> = None;
        for caps in ATTR.captures_iter(tag.as_str()) {
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            if caps[1].eq_ignore_ascii_case("rel") {
                rel = Some(value);
            } else {
                href = Some(value);
            }
        }
        let is_stylesheet = rel
            .as_deref()
            .map(|r| {
                r.split_whitespace()
                    .any(|tok| tok.eq_ignore_ascii_case("stylesheet"))
            })
            .unwrap_or(false);
        if let (true, Some(h)) = (is_stylesheet, href) {
            if !h.is_empty() {
                out.push(h);
            }
        }
    }
    out
}

fn resolve_link(dir: &Path, href: &str) -> Result<Source, Skipped> {
    if is_remote(href) {
        return Err(Skipped {
            name: href.to_string(),
            reason: "remote stylesheet not fetched".to_string(),
        });
    }
    if href.to_ascii_lowercase().starts_with("data:") {
        return Err(Skipped {
            name: truncate_name(href),
            reason: "data URL stylesheet".to_string(),
        });
    }
    let local = href.split(['?', '#']).next().unwrap_or(href);
    let target = dir.join(local.trim_start_matches('/'));
    fs::read_to_string(&target)
        .map(|content| Source::new(local, content))
        .map_err(|e| Skipped {
            name: local.to_string(),
            reason: e.to_string(),
        })
}

fn truncate_name(s: &str) -> String {
    s.chars().take(40).collect()
}

fn partition(read: Vec<Result<Source, Skipped>>) -> Collected {
    let mut out = Collected::default();
    for item in read {
        match item {
            Ok(src) => out.sources.push(src),
            Err(skip) => {
                debug!(source = %skip.name, reason = %skip.reason, "skipping source");
                out.skipped.push(skip);
            }
        }
    }
    out
}
