//! Port traits abstracting all I/O away from the pipeline.

use camino::Utf8Path;
use codefix_domain::{Project, ProjectLoadError};

/// The external analysis engine.
///
/// Every call loads the project afresh, so a second pass observes whatever
/// the first pass wrote.
pub trait AnalysisService {
    fn load_project(&self, descriptor: &Utf8Path) -> Result<Box<dyn Project>, ProjectLoadError>;
}

/// File-system write operations.
pub trait WritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()>;
    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()>;
}
