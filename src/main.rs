//! cssaudit CLI binary entry point.
//! Collects sources, runs the audit, and prints results.

use clap::Parser;
use cssaudit::cli::{Cli, Commands};
use cssaudit::config::{self, CliOverrides, OutputMode};
use cssaudit::sources::{self, SourceError};
use cssaudit::utils::{error_prefix, warn_prefix};
use cssaudit::{audit, output};
use std::process;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

const EXIT_BELOW_THRESHOLD: i32 = 1;
const EXIT_INPUT_NOT_FOUND: i32 = 2;
const EXIT_NO_FILES: i32 = 3;

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Audit {
            target,
            threshold,
            output: output_mode,
            json,
            no_color,
            top,
        } => {
            let overrides = CliOverrides {
                target: target.as_deref(),
                threshold,
                output: if json { Some(OutputMode::Json) } else { output_mode },
                no_color,
                top,
            };
            let (eff, cfg_err) = config::resolve_effective(&overrides);
            if let Some(e) = cfg_err {
                eprintln!("{} {}; using defaults.", warn_prefix(), e);
            }
            match &eff.config_path {
                Some(p) => debug!(config = %p.display(), "loaded configuration"),
                None => debug!(
                    root = %eff.root.display(),
                    "no cssaudit.toml found; using defaults"
                ),
            }

            let target = target.unwrap_or_else(|| ".".to_string());
            let collected = match sources::collect_sources(&target, &eff.collect) {
                Ok(c) => c,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    let code = match e {
                        SourceError::NoFiles(_) => EXIT_NO_FILES,
                        _ => EXIT_INPUT_NOT_FOUND,
                    };
                    process::exit(code);
                }
            };
            debug!(
                sources = collected.sources.len(),
                skipped = collected.skipped.len(),
                "collected sources"
            );

            let report = match audit(&collected.sources, eff.threshold) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("{} {}", error_prefix(), e);
                    process::exit(EXIT_INPUT_NOT_FOUND);
                }
            };
            if let Err(e) =
                output::print_report(&report, &collected.skipped, eff.output, eff.color, eff.top)
            {
                eprintln!("{} failed to render report: {}", error_prefix(), e);
            }
            if !report.verdict.passed {
                process::exit(EXIT_BELOW_THRESHOLD);
            }
        }
    }
}
