//! Configuration discovery and effective settings resolution.
//!
//! cssaudit reads `cssaudit.toml|yaml|yml` from the audited directory (or
//! its closest ancestor) and merges it with CLI flags to produce an
//! `Effective` config.
//! Defaults:
//! - `threshold`: 60
//! - `output`: `human`
//! - `noColor`: false
//! - `top`: 10
//! - `exclude`: `["node_modules"]`
//! - `extensions`: `["css"]`
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::score::DEFAULT_THRESHOLD;
use crate::sources::CollectOptions;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_TOP: usize = 10;

const CONFIG_TOML: &str = "cssaudit.toml";
const CONFIG_YAML: [&str; 2] = ["cssaudit.yaml", "cssaudit.yml"];

/// Report format; unknown names are rejected by clap and by config parsing.
#[derive(Debug, Default, Deserialize, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Default, Deserialize, Clone, PartialEq, Eq)]
/// Root configuration loaded from `cssaudit.toml|yaml`.
pub struct AuditConfig {
    pub threshold: Option<u32>,
    pub output: Option<OutputMode>,
    #[serde(rename = "noColor")]
    pub no_color: Option<bool>,
    pub top: Option<usize>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub extensions: Option<Vec<String>>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {path}: {message}")]
    Toml { path: String, message: String },
    #[error("invalid YAML in {path}: {message}")]
    Yaml { path: String, message: String },
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the audit command.
pub struct Effective {
    pub root: PathBuf,
    pub config_path: Option<PathBuf>,
    pub threshold: u32,
    pub output: OutputMode,
    pub color: bool,
    pub top: usize,
    pub collect: CollectOptions,
}

/// Walk upward from `start` to find the directory holding the config.
///
/// Stops when a `cssaudit.toml|yaml|yml` or a `.git` directory is found.
/// A relative `start` is taken against the current directory so the walk can
/// climb past it.
pub fn detect_config_root(start: &Path) -> PathBuf {
    let start = std::path::absolute(start).unwrap_or_else(|_| start.to_path_buf());
    let mut cur = start.as_path();
    loop {
        if config_file(cur).is_some() || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start,
        }
    }
}

fn config_file(dir: &Path) -> Option<PathBuf> {
    std::iter::once(CONFIG_TOML)
        .chain(CONFIG_YAML)
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}

/// Load `AuditConfig` from `root` if a config file is present.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, AuditConfig)>, ConfigError> {
    let Some(path) = config_file(root) else {
        return Ok(None);
    };
    let display = path.to_string_lossy().to_string();
    let s = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: display.clone(),
        source,
    })?;
    let is_toml = path.file_name().and_then(|n| n.to_str()) == Some(CONFIG_TOML);
    let cfg: AuditConfig = if is_toml {
        toml::from_str(&s).map_err(|e| ConfigError::Toml {
            path: display,
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&s).map_err(|e| ConfigError::Yaml {
            path: display,
            message: e.to_string(),
        })?
    };
    Ok(Some((path, cfg)))
}

/// Command-line overrides; `None` means "not given".
#[derive(Debug, Default, Clone)]
pub struct CliOverrides<'a> {
    pub target: Option<&'a str>,
    pub threshold: Option<u32>,
    pub output: Option<OutputMode>,
    pub no_color: bool,
    pub top: Option<usize>,
}

/// Resolve `Effective` by merging CLI flags, a discovered config, and defaults.
///
/// A config that fails to load is returned alongside defaults so the caller
/// can warn and continue.
pub fn resolve_effective(cli: &CliOverrides) -> (Effective, Option<ConfigError>) {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_effective_from(&cwd, cli)
}

/// Like `resolve_effective`, with relative targets taken against `cwd`.
pub fn resolve_effective_from(
    cwd: &Path,
    cli: &CliOverrides,
) -> (Effective, Option<ConfigError>) {
    let target: PathBuf = cwd
        .join(cli.target.unwrap_or("."))
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let start = if target.is_dir() {
        target.clone()
    } else {
        target
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.to_path_buf())
    };
    let root = detect_config_root(&start);
    let (config_path, cfg, err) = match load_config(&root) {
        Ok(Some((path, cfg))) => (Some(path), cfg, None),
        Ok(None) => (None, AuditConfig::default(), None),
        Err(e) => (None, AuditConfig::default(), Some(e)),
    };

    let threshold = cli.threshold.or(cfg.threshold).unwrap_or(DEFAULT_THRESHOLD);
    let output = cli.output.or(cfg.output).unwrap_or_default();
    let no_color = cli.no_color || cfg.no_color.unwrap_or(false);
    let color =
        !no_color && output != OutputMode::Json && std::env::var_os("NO_COLOR").is_none();
    let top = cli.top.or(cfg.top).unwrap_or(DEFAULT_TOP);

    let defaults = CollectOptions::default();
    let collect = CollectOptions {
        exclude: cfg.exclude.unwrap_or(defaults.exclude),
        extensions: cfg
            .extensions
            .map(|exts| {
                exts.into_iter()
                    .map(|e| e.trim_start_matches('.').to_string())
                    .filter(|e| !e.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.extensions),
    };

    (
        Effective {
            root,
            config_path,
            threshold,
            output,
            color,
            top,
            collect,
        },
        err,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn cli(target: &str) -> CliOverrides<'_> {
        CliOverrides {
            target: Some(target),
            ..CliOverrides::default()
        }
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("cssaudit.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
threshold = 75
output = "json"
top = 5
exclude = ["vendor", "node_modules"]
extensions = [".css", "scss"]
    "#
        )
        .unwrap();

        let (eff, err) = resolve_effective(&cli(root.to_str().unwrap()));
        assert!(err.is_none());
        assert_eq!(eff.threshold, 75);
        assert_eq!(eff.output, OutputMode::Json);
        assert_eq!(eff.top, 5);
        assert!(!eff.color);
        assert_eq!(eff.collect.exclude, vec!["vendor", "node_modules"]);
        assert_eq!(eff.collect.extensions, vec!["css", "scss"]);
        assert_eq!(eff.config_path, Some(root.join("cssaudit.toml")));
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("cssaudit.yaml"), "noColor: true\n").unwrap();

        let (eff, err) = resolve_effective(&cli(root.to_str().unwrap()));
        assert!(err.is_none());
        assert_eq!(eff.threshold, DEFAULT_THRESHOLD);
        assert_eq!(eff.output, OutputMode::Human);
        assert_eq!(eff.top, DEFAULT_TOP);
        assert!(!eff.color);
        assert_eq!(eff.collect.exclude, vec!["node_modules"]);
        assert_eq!(eff.collect.extensions, vec!["css"]);
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("cssaudit.toml"), "threshold = 90\noutput = \"json\"\n").unwrap();

        let overrides = CliOverrides {
            target: root.to_str(),
            threshold: Some(40),
            output: Some(OutputMode::Human),
            no_color: true,
            top: Some(3),
        };
        let (eff, _) = resolve_effective(&overrides);
        assert_eq!(eff.threshold, 40);
        assert_eq!(eff.output, OutputMode::Human);
        assert_eq!(eff.top, 3);
        assert!(!eff.color);
    }

    #[test]
    fn test_config_found_in_ancestor_of_file_target() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("web/css")).unwrap();
        fs::write(root.join("cssaudit.toml"), "threshold = 80\n").unwrap();
        let file = root.join("web/css/site.css");
        fs::write(&file, "a { b: c }").unwrap();

        let (eff, _) = resolve_effective(&cli(file.to_str().unwrap()));
        assert_eq!(eff.root, root.to_path_buf());
        assert_eq!(eff.threshold, 80);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("cssaudit.toml"), "threshold = \"high\"\n").unwrap();

        let (eff, err) = resolve_effective(&cli(root.to_str().unwrap()));
        assert!(matches!(err, Some(ConfigError::Toml { .. })));
        assert_eq!(eff.threshold, DEFAULT_THRESHOLD);
        assert!(eff.config_path.is_none());
    }

    #[test]
    fn test_relative_target_walks_up_from_cwd() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("web/css")).unwrap();
        fs::write(root.join("cssaudit.toml"), "threshold = 88\n").unwrap();
        fs::write(root.join("web/css/site.css"), "a { b: c }").unwrap();
        let nested = root.join("web/css");

        let (eff, _) = resolve_effective_from(&nested, &CliOverrides::default());
        assert_eq!(eff.root, root.to_path_buf());
        assert_eq!(eff.threshold, 88);

        let (eff, _) = resolve_effective_from(&nested, &cli("site.css"));
        assert_eq!(eff.root, root.to_path_buf());
        assert_eq!(eff.config_path, Some(root.join("cssaudit.toml")));
    }

    #[test]
    fn test_detect_config_root_returns_absolute_path() {
        assert!(detect_config_root(Path::new(".")).is_absolute());
    }

    #[test]
    fn test_unknown_output_mode_is_rejected() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("cssaudit.toml"), "output = \"xml\"\n").unwrap();

        let (eff, err) = resolve_effective(&cli(root.to_str().unwrap()));
        assert!(matches!(err, Some(ConfigError::Toml { .. })));
        assert_eq!(eff.output, OutputMode::Human);

        let yaml: Result<AuditConfig, _> = serde_yaml::from_str("output: json\n");
        assert_eq!(yaml.unwrap().output, Some(OutputMode::Json));
    }
}
