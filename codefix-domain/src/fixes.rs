use crate::filter::DiagnosticSelection;
use crate::ports::Project;
use anyhow::Context;
use codefix_types::diagnostic::FileDiagnostics;
use codefix_types::fix::{FixAction, FormatOptions};
use tracing::debug;

/// Fix actions offered for one file's selected diagnostics.
///
/// Each located diagnostic is queried at exactly its own span and code.
/// Diagnostics without a file, start or length contribute nothing.
pub fn fixes_for_file(
    project: &dyn Project,
    diagnostics: &FileDiagnostics,
    format: &FormatOptions,
) -> anyhow::Result<Vec<FixAction>> {
    let mut out = Vec::new();

    for diagnostic in &diagnostics.diagnostics {
        let Some((file, span)) = diagnostic.location() else {
            continue;
        };

        let mut actions = project
            .fix_actions(file, span.start, span.end(), &[diagnostic.code], format)
            .with_context(|| {
                format!(
                    "fix actions for {} [{}, {}) code {}",
                    file,
                    span.start,
                    span.end(),
                    diagnostic.code
                )
            })?;
        debug!(
            file = %file,
            start = span.start,
            end = span.end(),
            code = diagnostic.code,
            offered = actions.len(),
            "resolved fix actions"
        );
        out.append(&mut actions);
    }

    Ok(out)
}

/// Union of fix actions across every file of the selection, in file order.
pub fn resolve_fixes(
    project: &dyn Project,
    selection: &DiagnosticSelection,
    format: &FormatOptions,
) -> anyhow::Result<Vec<FixAction>> {
    let mut out = Vec::new();
    for file in &selection.files {
        out.extend(fixes_for_file(project, file, format)?);
    }
    Ok(out)
}

/// Keep fix actions whose name is in `names`; an empty `names` keeps all.
pub fn filter_by_fix_name(actions: Vec<FixAction>, names: &[String]) -> Vec<FixAction> {
    if names.is_empty() {
        return actions;
    }
    actions
        .into_iter()
        .filter(|a| names.iter().any(|n| n == &a.fix_name))
        .collect()
}
