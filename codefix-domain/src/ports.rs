use camino::{Utf8Path, Utf8PathBuf};
use codefix_types::diagnostic::Diagnostic;
use codefix_types::fix::{FixAction, FormatOptions};
use thiserror::Error;

/// A loaded project, as seen through the analysis service.
///
/// Implementations answer from a consistent snapshot: every call made
/// during one pass must describe the same file contents.
pub trait Project {
    /// Directory output paths are computed relative to.
    fn root(&self) -> &Utf8Path;

    /// Source files in the project's own order.
    fn source_files(&self) -> Vec<Utf8PathBuf>;

    /// Current diagnostics for one source file.
    fn diagnostics(&self, file: &Utf8Path) -> anyhow::Result<Vec<Diagnostic>>;

    /// Fix actions offered for `[start, end)` of `file`, restricted to `codes`.
    fn fix_actions(
        &self,
        file: &Utf8Path,
        start: usize,
        end: usize,
        codes: &[u32],
        format: &FormatOptions,
    ) -> anyhow::Result<Vec<FixAction>>;

    /// Unmodified text of a file in the project.
    fn source_text(&self, file: &Utf8Path) -> Result<String, FileNotFoundError>;
}

/// The project descriptor is missing or invalid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("could not load project {path}: {message}")]
pub struct ProjectLoadError {
    pub path: Utf8PathBuf,
    pub message: String,
}

/// A file named by an edit is not part of the loaded project.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("file {path} not found in project")]
pub struct FileNotFoundError {
    pub path: Utf8PathBuf,
}
