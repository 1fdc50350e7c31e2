//! Configuration file loading for codefix.
//!
//! Discovers and loads `codefix.toml` from the directory holding the project
//! descriptor. CLI arguments extend lists and override scalars.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use codefix_types::fix::FormatOptions;
use fs_err as fs;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "codefix.toml";

/// Top-level configuration from codefix.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CodefixConfig {
    pub filter: FilterConfig,
    pub run: RunConfig,
    pub format: FormatConfig,
}

/// Which diagnostics and fixes a run considers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Accepted diagnostic codes. Empty accepts every code.
    pub error_codes: Vec<u32>,

    /// Accepted fix names. Empty accepts every fix.
    pub fix_names: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub max_passes: Option<u32>,
    pub dry_run: bool,

    /// Relative paths resolve against the config file's directory.
    pub output_dir: Option<Utf8PathBuf>,
}

/// Formatting hints forwarded to the analysis engine.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    pub indent_size: Option<u32>,
    pub convert_tabs_to_spaces: Option<bool>,
}

/// Discover codefix.toml in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<CodefixConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    let mut config =
        parse_config(&contents).with_context(|| format!("parse config file {}", path))?;

    if let Some(out) = config.run.output_dir.take() {
        let base = path.parent().unwrap_or(Utf8Path::new("."));
        config.run.output_dir = Some(if out.is_absolute() {
            out
        } else {
            base.join(out)
        });
    }
    Ok(config)
}

pub fn parse_config(contents: &str) -> anyhow::Result<CodefixConfig> {
    let config: CodefixConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config next to the project descriptor, or return default if not found.
pub fn load_or_default(descriptor: &Utf8Path) -> anyhow::Result<CodefixConfig> {
    let dir = match descriptor.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(CodefixConfig::default()),
    }
}

/// Config file values merged with CLI arguments.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    pub error_codes: Vec<u32>,
    pub fix_names: Vec<String>,
    pub max_passes: Option<u32>,
    pub dry_run: bool,
    pub output_dir: Option<Utf8PathBuf>,
    pub format: FormatOptions,
}

/// Values given on the command line. `None`/`false` defers to the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub error_codes: Vec<u32>,
    pub fix_names: Vec<String>,
    pub max_passes: Option<u32>,
    pub dry_run: bool,
    pub output_dir: Option<Utf8PathBuf>,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: CodefixConfig,
}

impl ConfigMerger {
    pub fn new(config: CodefixConfig) -> Self {
        Self { config }
    }

    /// CLI lists extend the config lists; CLI scalars win when given.
    pub fn merge(self, cli: &CliOverrides) -> MergedConfig {
        let mut error_codes = self.config.filter.error_codes;
        for code in &cli.error_codes {
            if !error_codes.contains(code) {
                error_codes.push(*code);
            }
        }

        let mut fix_names = self.config.filter.fix_names;
        for name in &cli.fix_names {
            if !fix_names.contains(name) {
                fix_names.push(name.clone());
            }
        }

        let mut format = FormatOptions::default();
        if let Some(indent_size) = self.config.format.indent_size {
            format.indent_size = indent_size;
        }
        if let Some(convert) = self.config.format.convert_tabs_to_spaces {
            format.convert_tabs_to_spaces = convert;
        }

        MergedConfig {
            error_codes,
            fix_names,
            max_passes: cli.max_passes.or(self.config.run.max_passes),
            dry_run: cli.dry_run || self.config.run.dry_run,
            output_dir: cli.output_dir.clone().or(self.config.run.output_dir),
            format,
        }
    }
}
