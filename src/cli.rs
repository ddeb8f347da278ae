//! CLI argument parsing via `clap`.

use crate::config::OutputMode;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cssaudit",
    version,
    about = "CSS quality auditor",
    long_about = "cssaudit — scan stylesheets for specificity, duplication, !important usage and size, then score them.\n\nConfiguration precedence: CLI > cssaudit.toml > defaults.",
    after_help = "Examples:\n  cssaudit audit styles/\n  cssaudit audit public/index.html --threshold 75\n  cssaudit audit app.css --json",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(short, long, global = true, help = "Enable debug logging on stderr")]
    pub verbose: bool,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(
        about = "Show version",
        long_about = "Print the current cssaudit version."
    )]
    Version,
    /// Audit stylesheets and report scores
    #[command(
        about = "Audit stylesheets",
        long_about = "Collect CSS from a file, a directory, or an HTML page, detect issues and compute health scores. Exits 1 when the overall score is below the threshold.",
        after_help = "Examples:\n  cssaudit audit .\n  cssaudit audit dist/app.css --output json\n  cssaudit audit index.html --no-color --top 25"
    )]
    Audit {
        #[arg(help = "CSS file, directory, or HTML file (default: current dir)")]
        target: Option<String>,
        #[arg(long, help = "Minimum overall score to pass (default: 60)")]
        threshold: Option<u32>,
        #[arg(long, value_enum, help = "Output mode (default: human)")]
        output: Option<OutputMode>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Shorthand for --output json")]
        json: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Disable colored output")]
        no_color: bool,
        #[arg(long, help = "Number of issues listed in human output (default: 10)")]
        top: Option<usize>,
    },
}
