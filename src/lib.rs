//! cssaudit core library.
//!
//! This crate exposes programmatic APIs for auditing CSS: extracting rules,
//! computing selector specificity, detecting issues, and scoring.
//!
//! High-level modules:
//! - `parser`: Brace-aware rule extraction with comment stripping.
//! - `specificity`: Selector weight triple and comma-group splitting.
//! - `detect`: Issue detection (specificity, duplicates, !important, ...).
//! - `score`: Health sub-scores, overall score, and verdict.
//! - `audit`: End-to-end pipeline over named CSS buffers.
//! - `models`: Data models for rules, issues, and reports.
//! - `sources`: Collecting CSS from files, directories, and HTML pages.
//! - `config`: Discovery and effective configuration resolution.
//! - `cli`: CLI argument parsing (binary uses this).
//! - `output`: Human/JSON printers.
//! - `utils`: Supporting helpers.
pub mod audit;
pub mod cli;
pub mod config;
pub mod detect;
pub mod models;
pub mod output;
pub mod parser;
pub mod score;
pub mod sources;
pub mod specificity;
pub mod utils;

pub use audit::{audit, AuditError};
pub use detect::detect_issues;
pub use parser::extract_rules;
pub use specificity::specificity_of;
