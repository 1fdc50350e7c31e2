use crate::ports::Project;
use anyhow::Context;
use codefix_types::diagnostic::FileDiagnostics;
use tracing::debug;

/// Ask the project for every source file's diagnostics, in project order.
///
/// Files without diagnostics are kept (with an empty list) so file counts in
/// tally messages reflect the whole project.
pub fn collect_diagnostics(project: &dyn Project) -> anyhow::Result<Vec<FileDiagnostics>> {
    let files = project.source_files();
    let mut out = Vec::with_capacity(files.len());

    for file in files {
        let diagnostics = project
            .diagnostics(&file)
            .with_context(|| format!("diagnostics for {}", file))?;
        debug!(file = %file, count = diagnostics.len(), "collected diagnostics");
        out.push(FileDiagnostics::new(file, diagnostics));
    }

    Ok(out)
}
