//! Clap-free settings for the codefix pipeline.

use camino::Utf8PathBuf;
use codefix_domain::PlannerConfig;
use codefix_types::fix::FormatOptions;

/// Passes run when the first one leaves changes rejected: the first pass
/// plus one retry.
pub const DEFAULT_MAX_PASSES: u32 = 2;

/// Settings for a codefix run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Project descriptor handed to the analysis service.
    pub project: Utf8PathBuf,
    /// Patched files land here, at their project-relative paths.
    pub output_dir: Utf8PathBuf,

    // Selection
    pub error_codes: Vec<u32>,
    pub fix_names: Vec<String>,
    pub format: FormatOptions,

    // Convergence
    pub max_passes: u32,

    /// Compute everything but write no source files.
    pub dry_run: bool,
    /// Where report.json, report.md and patch.diff go, if anywhere.
    pub artifacts_dir: Option<Utf8PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            project: Utf8PathBuf::from("codefix.project.toml"),
            output_dir: Utf8PathBuf::from("codefix-out"),
            error_codes: Vec::new(),
            fix_names: Vec::new(),
            format: FormatOptions::default(),
            max_passes: DEFAULT_MAX_PASSES,
            dry_run: false,
            artifacts_dir: None,
        }
    }
}

impl RunSettings {
    pub fn planner_config(&self) -> PlannerConfig {
        PlannerConfig {
            error_codes: self.error_codes.clone(),
            fix_names: self.fix_names.clone(),
            format: self.format.clone(),
        }
    }
}
