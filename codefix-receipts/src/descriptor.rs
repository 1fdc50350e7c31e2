use crate::load::ReceiptLoadError;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use glob::glob;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::debug;

/// Default snapshot location, relative to the project root.
pub const DEFAULT_ANALYSIS_PATH: &str = "codefix.analysis.json";

/// Parsed project descriptor.
///
/// ```toml
/// root = "."
/// sources = ["src/**/*.ts"]
/// analysis = "artifacts/analysis.json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProjectDescriptor {
    /// Path of the descriptor file itself.
    #[serde(skip)]
    pub path: Utf8PathBuf,

    /// Project root. Relative roots resolve against the descriptor's directory.
    #[serde(default)]
    pub root: Option<Utf8PathBuf>,

    /// Glob patterns, relative to the root, naming the project's source files.
    #[serde(default)]
    pub sources: Vec<String>,

    /// Analysis snapshot, relative to the root.
    #[serde(default)]
    pub analysis: Option<Utf8PathBuf>,
}

impl ProjectDescriptor {
    /// Directory containing the descriptor.
    pub fn dir(&self) -> &Utf8Path {
        self.path.parent().unwrap_or(Utf8Path::new("."))
    }

    /// Resolved project root.
    pub fn root_dir(&self) -> Utf8PathBuf {
        match &self.root {
            Some(root) if root.is_absolute() => root.clone(),
            Some(root) => self.dir().join(root),
            None => self.dir().to_path_buf(),
        }
    }

    /// Resolved snapshot path.
    pub fn analysis_path(&self) -> Utf8PathBuf {
        let rel = self
            .analysis
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_ANALYSIS_PATH));
        if rel.is_absolute() {
            rel
        } else {
            self.root_dir().join(rel)
        }
    }
}

/// Load and parse a project descriptor.
pub fn load_descriptor(path: &Utf8Path) -> Result<ProjectDescriptor, ReceiptLoadError> {
    let contents = fs::read_to_string(path).map_err(|e| ReceiptLoadError::Io {
        message: e.to_string(),
    })?;
    let mut descriptor: ProjectDescriptor =
        toml::from_str(&contents).map_err(|e| ReceiptLoadError::Toml {
            message: e.to_string(),
        })?;
    descriptor.path = path.to_path_buf();

    debug!(
        path = %path,
        root = %descriptor.root_dir(),
        patterns = descriptor.sources.len(),
        "loaded project descriptor"
    );
    Ok(descriptor)
}

/// Expand source patterns under `root` into root-relative file paths.
///
/// Directories are skipped. Deterministic order matters: the result is
/// sorted and free of duplicates regardless of pattern overlap.
pub fn expand_sources(
    root: &Utf8Path,
    patterns: &[String],
) -> Result<Vec<Utf8PathBuf>, ReceiptLoadError> {
    let mut out = BTreeSet::new();

    for pattern in patterns {
        let full = root.join(pattern);
        debug!(pattern = %full, "expanding source pattern");

        let entries = glob(full.as_str()).map_err(|e| ReceiptLoadError::Pattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;

        for entry in entries {
            let path = entry.map_err(|e| ReceiptLoadError::Io {
                message: e.to_string(),
            })?;
            if !path.is_file() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(path) else {
                debug!("skipping non-utf8 source path");
                continue;
            };
            let rel = path
                .strip_prefix(root)
                .map(Utf8Path::to_path_buf)
                .unwrap_or(path);
            out.insert(normalize(&rel));
        }
    }

    Ok(out.into_iter().collect())
}

fn normalize(path: &Utf8Path) -> Utf8PathBuf {
    Utf8PathBuf::from(path.as_str().replace('\\', "/"))
}
