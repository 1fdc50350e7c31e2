//! Pass and run pipelines.
//!
//! These entry points are I/O-agnostic: project loading goes through
//! [`AnalysisService`] and every write goes through [`WritePort`].

use crate::ports::{AnalysisService, WritePort};
use crate::settings::RunSettings;
use anyhow::Context;
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use codefix_domain::{FileNotFoundError, Planner, ProjectLoadError};
use codefix_edit::{EditError, apply_file_edits, render_patch, sha256_hex};
use codefix_render::render_report_md;
use codefix_types::fix::{RejectedChange, TextChange};
use codefix_types::receipt::ToolInfo;
use codefix_types::report::{
    CodefixReport, PassSummary, PatchedFileSummary, ReportCounts, ReportRunInfo, ReportStatus,
    ReportVerdict,
};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Why a single pass stopped.
#[derive(Debug, thiserror::Error)]
pub enum PassError {
    #[error(transparent)]
    ProjectLoad(#[from] ProjectLoadError),
    #[error(transparent)]
    FileNotFound(#[from] FileNotFoundError),
    #[error("cannot patch {path}: {source}")]
    Edit {
        path: Utf8PathBuf,
        #[source]
        source: EditError,
    },
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

/// Error type for run results. Every variant maps to exit code 1.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error(transparent)]
    ProjectLoad(#[from] ProjectLoadError),
    #[error("pass {pass} aborted: {source}")]
    PassAborted {
        pass: u32,
        #[source]
        source: PassError,
    },
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// One file produced by a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
    /// File name as it appears in the edit set.
    pub path: Utf8PathBuf,
    pub output_path: Utf8PathBuf,
    pub original: String,
    pub contents: String,
    pub accepted: Vec<TextChange>,
    pub rejected: Vec<TextChange>,
}

/// Outcome of [`run_pass`].
#[derive(Debug, Clone, Default)]
pub struct PassOutcome {
    pub pass: u32,
    pub diagnostics_total: usize,
    pub diagnostics_selected: usize,
    pub messages: Vec<String>,
    pub fix_actions: usize,
    pub files: Vec<PatchedFile>,
    /// Rejected changes of every file, in file order.
    pub rejected: Vec<RejectedChange>,
}

/// Outcome of [`run_codefix`].
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub passes: Vec<PassOutcome>,
    /// The final pass's rejected changes.
    pub rejected: Vec<RejectedChange>,
}

/// Run one full pass: load, plan, resolve, patch and (unless dry-run) write.
pub fn run_pass(
    pass: u32,
    settings: &RunSettings,
    analysis: &dyn AnalysisService,
    writer: &dyn WritePort,
) -> Result<PassOutcome, PassError> {
    let project = analysis.load_project(&settings.project)?;
    let planner = Planner::new(settings.planner_config());
    let plan = planner.plan(project.as_ref()).context("plan pass")?;

    let mut outcome = PassOutcome {
        pass,
        diagnostics_total: plan.diagnostics_total,
        diagnostics_selected: plan.diagnostics_selected,
        messages: plan.messages,
        fix_actions: plan.fix_actions,
        ..PassOutcome::default()
    };

    // Read every original before anything is written.
    let mut originals = Vec::with_capacity(plan.edits.len());
    for file in plan.edits.files() {
        originals.push(project.source_text(file)?);
    }

    for ((file, changes), original) in plan.edits.iter().zip(originals) {
        let edit = apply_file_edits(&original, changes).map_err(|source| PassError::Edit {
            path: file.to_path_buf(),
            source,
        })?;
        debug!(
            file = %file,
            accepted = edit.resolution.accepted.len(),
            rejected = edit.resolution.rejected.len(),
            "resolved changes"
        );

        outcome
            .rejected
            .extend(edit.resolution.rejected.iter().map(|change| RejectedChange {
                file_name: file.to_path_buf(),
                change: change.clone(),
            }));
        outcome.files.push(PatchedFile {
            path: file.to_path_buf(),
            output_path: output_path(project.root(), &settings.output_dir, file),
            original,
            contents: edit.contents,
            accepted: edit.resolution.accepted,
            rejected: edit.resolution.rejected,
        });
    }

    if !settings.dry_run {
        for file in &outcome.files {
            write_output(writer, &file.output_path, &file.contents)?;
            info!("updated {}", file.output_path);
        }
    }

    Ok(outcome)
}

fn write_output(writer: &dyn WritePort, path: &Utf8Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        writer.create_dir_all(parent)?;
    }
    writer.write_file(path, contents.as_bytes())
}

/// Run passes until one leaves nothing rejected or `max_passes` is reached.
///
/// Each pass reloads the project from scratch. A dry run stops after the
/// first pass since nothing it computed was written back.
pub fn run_codefix(
    settings: &RunSettings,
    analysis: &dyn AnalysisService,
    writer: &dyn WritePort,
) -> Result<RunOutcome, ToolError> {
    let max_passes = settings.max_passes.max(1);
    let mut outcome = RunOutcome::default();

    for pass in 1..=max_passes {
        let result = match run_pass(pass, settings, analysis, writer) {
            Ok(result) => result,
            Err(PassError::ProjectLoad(e)) => return Err(ToolError::ProjectLoad(e)),
            Err(source) => return Err(ToolError::PassAborted { pass, source }),
        };

        outcome.rejected = result.rejected.clone();
        outcome.passes.push(result);

        if outcome.rejected.is_empty() || settings.dry_run {
            break;
        }
        debug!(
            pass,
            rejected = outcome.rejected.len(),
            "changes rejected; rerunning"
        );
    }

    if !outcome.rejected.is_empty() {
        warn!(
            passes = outcome.passes.len(),
            rejected = outcome.rejected.len(),
            "changes still rejected after final pass"
        );
    }
    Ok(outcome)
}

/// Where a patched file is written: `output_dir` joined with the file's
/// path relative to the project root.
pub fn output_path(root: &Utf8Path, output_dir: &Utf8Path, file: &Utf8Path) -> Utf8PathBuf {
    if let Ok(rel) = file.strip_prefix(root) {
        return output_dir.join(rel);
    }
    let mut out = output_dir.to_path_buf();
    for component in file.components() {
        if let Utf8Component::Normal(part) = component {
            out.push(part);
        }
    }
    out
}

/// Unified diff from each file's first-seen original to its last contents.
pub fn preview_patch(outcome: &RunOutcome) -> String {
    let mut before: BTreeMap<Utf8PathBuf, String> = BTreeMap::new();
    let mut after: BTreeMap<Utf8PathBuf, String> = BTreeMap::new();
    for pass in &outcome.passes {
        for file in &pass.files {
            before
                .entry(file.path.clone())
                .or_insert_with(|| file.original.clone());
            after.insert(file.path.clone(), file.contents.clone());
        }
    }
    render_patch(&before, &after)
}

pub fn report_from_run(
    outcome: &RunOutcome,
    settings: &RunSettings,
    tool: ToolInfo,
    started_at: DateTime<Utc>,
) -> CodefixReport {
    let run = ReportRunInfo {
        project: settings.project.to_string(),
        output_dir: settings.output_dir.to_string(),
        started_at,
        ended_at: Some(Utc::now()),
        dry_run: settings.dry_run,
    };
    let mut report = CodefixReport::new(tool, run);

    let mut counts = ReportCounts {
        passes: outcome.passes.len() as u64,
        changes_rejected: outcome.rejected.len() as u64,
        ..ReportCounts::default()
    };

    for pass in &outcome.passes {
        let files: Vec<PatchedFileSummary> = pass
            .files
            .iter()
            .map(|f| PatchedFileSummary {
                path: f.path.to_string(),
                output_path: f.output_path.to_string(),
                sha256_before: sha256_hex(f.original.as_bytes()),
                sha256_after: sha256_hex(f.contents.as_bytes()),
                accepted: f.accepted.len() as u64,
                rejected: f.rejected.len() as u64,
            })
            .collect();

        counts.changes_applied += files.iter().map(|f| f.accepted).sum::<u64>();
        if !settings.dry_run {
            counts.files_written += files.len() as u64;
        }

        report.passes.push(PassSummary {
            pass: pass.pass,
            diagnostics_total: pass.diagnostics_total as u64,
            diagnostics_selected: pass.diagnostics_selected as u64,
            fix_actions: pass.fix_actions as u64,
            messages: pass.messages.clone(),
            files,
            rejected: pass.rejected.len() as u64,
        });
    }

    let mut reasons = Vec::new();
    let status = if outcome.rejected.is_empty() {
        ReportStatus::Pass
    } else {
        reasons.push(format!(
            "{} changes still rejected after {} passes",
            outcome.rejected.len(),
            outcome.passes.len()
        ));
        ReportStatus::Warn
    };

    report.verdict = ReportVerdict {
        status,
        counts,
        reasons,
    };
    report.rejected = outcome.rejected.clone();
    report
}

/// Write report.json, report.md and patch.diff to `out_dir`.
pub fn write_run_artifacts(
    outcome: &RunOutcome,
    report: &CodefixReport,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let report_json = serde_json::to_string_pretty(report).context("serialize report")?;
    writer.write_file(&out_dir.join("report.json"), report_json.as_bytes())?;

    let report_md = render_report_md(report);
    writer.write_file(&out_dir.join("report.md"), report_md.as_bytes())?;

    let patch = preview_patch(outcome);
    writer.write_file(&out_dir.join("patch.diff"), patch.as_bytes())?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryAnalysisService, MemWritePort, ProjectSnapshot};
    use codefix_types::diagnostic::Diagnostic;
    use codefix_types::fix::{FileTextChanges, FixAction};
    use pretty_assertions::assert_eq;

    fn action(name: &str, file: &str, changes: Vec<TextChange>) -> FixAction {
        FixAction {
            fix_name: name.to_string(),
            description: None,
            fix_id: None,
            changes: vec![FileTextChanges {
                file_name: file.into(),
                text_changes: changes,
            }],
        }
    }

    /// `a.ts` with two diagnostics whose fixes overlap.
    fn conflicting(root: &str) -> ProjectSnapshot {
        ProjectSnapshot::new(root)
            .with_file("a.ts", "abcdef")
            .with_diagnostic("a.ts", Diagnostic::at("a.ts", 0, 1, 1001))
            .with_diagnostic("a.ts", Diagnostic::at("a.ts", 1, 1, 1002))
            .with_fix(
                "a.ts",
                0,
                1,
                1001,
                action("wide", "a.ts", vec![TextChange::new(0, 2, "X")]),
            )
            .with_fix(
                "a.ts",
                1,
                2,
                1002,
                action("narrow", "a.ts", vec![TextChange::new(1, 1, "Y")]),
            )
    }

    fn settings() -> RunSettings {
        RunSettings {
            project: "project.toml".into(),
            output_dir: "out".into(),
            ..RunSettings::default()
        }
    }

    fn tool() -> ToolInfo {
        ToolInfo {
            name: "codefix".to_string(),
            version: Some("0.1.0".to_string()),
            repo: None,
            commit: None,
        }
    }

    #[test]
    fn pass_patches_accepted_and_reports_rejected() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();

        let outcome = run_pass(1, &settings(), &analysis, &writer).expect("pass");

        assert_eq!(outcome.files.len(), 1);
        assert_eq!(outcome.files[0].contents, "Xcdef");
        assert_eq!(outcome.files[0].output_path, Utf8PathBuf::from("out/a.ts"));
        assert_eq!(
            outcome.rejected,
            vec![RejectedChange {
                file_name: "a.ts".into(),
                change: TextChange::new(1, 1, "Y"),
            }]
        );
        assert_eq!(writer.get("out/a.ts").as_deref(), Some("Xcdef"));
        assert_eq!(writer.dirs(), vec!["out".to_string()]);
    }

    #[test]
    fn rejected_changes_trigger_exactly_one_more_pass() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();

        let outcome = run_codefix(&settings(), &analysis, &writer).expect("run");

        assert_eq!(outcome.passes.len(), 2);
        assert_eq!(analysis.load_count(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected, outcome.passes[1].rejected);
    }

    #[test]
    fn clean_first_pass_does_not_rerun() {
        let snapshot = ProjectSnapshot::new(".")
            .with_file("a.ts", "abc")
            .with_diagnostic("a.ts", Diagnostic::at("a.ts", 0, 1, 1001))
            .with_fix(
                "a.ts",
                0,
                1,
                1001,
                action("fix", "a.ts", vec![TextChange::new(0, 1, "A")]),
            );
        let analysis = InMemoryAnalysisService::new(vec![snapshot]);
        let writer = MemWritePort::default();

        let outcome = run_codefix(&settings(), &analysis, &writer).expect("run");

        assert_eq!(outcome.passes.len(), 1);
        assert_eq!(analysis.load_count(), 1);
        assert!(outcome.rejected.is_empty());
        assert_eq!(writer.get("out/a.ts").as_deref(), Some("Abc"));
    }

    #[test]
    fn second_pass_sees_reloaded_project() {
        let after_first = ProjectSnapshot::new(".").with_file("a.ts", "Xcdef");
        let analysis = InMemoryAnalysisService::new(vec![conflicting("."), after_first]);
        let writer = MemWritePort::default();

        let outcome = run_codefix(&settings(), &analysis, &writer).expect("run");

        assert_eq!(outcome.passes.len(), 2);
        assert!(outcome.rejected.is_empty());
        assert_eq!(
            outcome.passes[1].messages,
            vec!["found 0 diagnostics in 1 files".to_string()]
        );
    }

    #[test]
    fn max_passes_extends_the_bound() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();
        let settings = RunSettings {
            max_passes: 3,
            ..settings()
        };

        let outcome = run_codefix(&settings, &analysis, &writer).expect("run");

        assert_eq!(outcome.passes.len(), 3);
        assert_eq!(analysis.load_count(), 3);
    }

    #[test]
    fn zero_max_passes_still_runs_once() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();
        let settings = RunSettings {
            max_passes: 0,
            ..settings()
        };

        let outcome = run_codefix(&settings, &analysis, &writer).expect("run");
        assert_eq!(outcome.passes.len(), 1);
    }

    #[test]
    fn dry_run_writes_nothing_and_stops_after_one_pass() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();
        let settings = RunSettings {
            dry_run: true,
            ..settings()
        };

        let outcome = run_codefix(&settings, &analysis, &writer).expect("run");

        assert_eq!(outcome.passes.len(), 1);
        assert_eq!(outcome.passes[0].files[0].contents, "Xcdef");
        assert!(writer.paths().is_empty());
    }

    #[test]
    fn unmatched_codes_end_the_pass_early() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();
        let settings = RunSettings {
            error_codes: vec![9999],
            ..settings()
        };

        let outcome = run_codefix(&settings, &analysis, &writer).expect("run");

        assert_eq!(outcome.passes.len(), 1);
        assert_eq!(
            outcome.passes[0].messages,
            vec!["no diagnostics found with codes 9999".to_string()]
        );
        assert!(outcome.passes[0].files.is_empty());
        assert!(outcome.rejected.is_empty());
        assert!(writer.paths().is_empty());
    }

    #[test]
    fn fix_name_filter_drops_the_conflict() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();
        let settings = RunSettings {
            fix_names: vec!["narrow".to_string()],
            ..settings()
        };

        let outcome = run_codefix(&settings, &analysis, &writer).expect("run");

        assert_eq!(outcome.passes.len(), 1);
        assert_eq!(writer.get("out/a.ts").as_deref(), Some("aYcdef"));
    }

    #[test]
    fn rejected_list_is_union_across_files() {
        let snapshot = conflicting(".")
            .with_file("b.ts", "0123")
            .with_diagnostic("b.ts", Diagnostic::at("b.ts", 0, 2, 1001))
            .with_fix(
                "b.ts",
                0,
                2,
                1001,
                action(
                    "pair",
                    "b.ts",
                    vec![TextChange::new(0, 2, "ab"), TextChange::new(2, 1, "c")],
                ),
            );
        let analysis = InMemoryAnalysisService::new(vec![snapshot]);
        let writer = MemWritePort::default();

        let outcome = run_pass(1, &settings(), &analysis, &writer).expect("pass");

        let files: Vec<&str> = outcome
            .rejected
            .iter()
            .map(|r| r.file_name.as_str())
            .collect();
        assert_eq!(files, vec!["a.ts", "b.ts"]);
        assert_eq!(writer.get("out/b.ts").as_deref(), Some("ab23"));
    }

    #[test]
    fn edit_for_unknown_file_aborts_the_pass() {
        let snapshot = ProjectSnapshot::new(".")
            .with_file("a.ts", "abc")
            .with_diagnostic("a.ts", Diagnostic::at("a.ts", 0, 1, 1001))
            .with_fix(
                "a.ts",
                0,
                1,
                1001,
                action("elsewhere", "missing.ts", vec![TextChange::new(0, 0, "x")]),
            );
        let analysis = InMemoryAnalysisService::new(vec![snapshot]);
        let writer = MemWritePort::default();

        let err = run_codefix(&settings(), &analysis, &writer).expect_err("abort");

        match err {
            ToolError::PassAborted {
                pass: 1,
                source: PassError::FileNotFound(e),
            } => assert_eq!(e.path, "missing.ts"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(writer.paths().is_empty());
    }

    #[test]
    fn out_of_bounds_edit_aborts_the_pass() {
        let snapshot = ProjectSnapshot::new(".")
            .with_file("a.ts", "abc")
            .with_diagnostic("a.ts", Diagnostic::at("a.ts", 0, 1, 1001))
            .with_fix(
                "a.ts",
                0,
                1,
                1001,
                action("far", "a.ts", vec![TextChange::new(2, 5, "x")]),
            );
        let analysis = InMemoryAnalysisService::new(vec![snapshot]);
        let writer = MemWritePort::default();

        let err = run_codefix(&settings(), &analysis, &writer).expect_err("abort");
        assert!(matches!(
            err,
            ToolError::PassAborted {
                source: PassError::Edit { .. },
                ..
            }
        ));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn load_failure_aborts_the_run() {
        let analysis = InMemoryAnalysisService::new(vec![]);
        let writer = MemWritePort::default();

        let err = run_codefix(&settings(), &analysis, &writer).expect_err("load");
        assert!(matches!(err, ToolError::ProjectLoad(_)));
    }

    #[test]
    fn output_path_is_relative_to_root() {
        let root = Utf8Path::new("/repo");
        let out = Utf8Path::new("/tmp/out");
        assert_eq!(
            output_path(root, out, Utf8Path::new("/repo/src/a.ts")),
            Utf8PathBuf::from("/tmp/out/src/a.ts")
        );
        assert_eq!(
            output_path(root, out, Utf8Path::new("src/a.ts")),
            Utf8PathBuf::from("/tmp/out/src/a.ts")
        );
        assert_eq!(
            output_path(root, out, Utf8Path::new("/elsewhere/b.ts")),
            Utf8PathBuf::from("/tmp/out/elsewhere/b.ts")
        );
    }

    #[test]
    fn report_and_artifacts_describe_the_run() {
        let analysis = InMemoryAnalysisService::new(vec![conflicting(".")]);
        let writer = MemWritePort::default();
        let settings = settings();
        let started_at = Utc::now();

        let outcome = run_codefix(&settings, &analysis, &writer).expect("run");
        let report = report_from_run(&outcome, &settings, tool(), started_at);

        assert_eq!(report.verdict.status, ReportStatus::Warn);
        assert_eq!(
            report.verdict.counts,
            ReportCounts {
                passes: 2,
                files_written: 2,
                changes_applied: 2,
                changes_rejected: 1,
            }
        );
        assert_eq!(report.passes[0].files[0].sha256_before, sha256_hex(b"abcdef"));
        assert_eq!(report.rejected, outcome.rejected);

        let artifacts = Utf8Path::new("artifacts");
        write_run_artifacts(&outcome, &report, artifacts, &writer).expect("artifacts");

        let json = writer.get("artifacts/report.json").expect("report.json");
        let value: serde_json::Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["schema"], "codefix.report.v1");
        assert_eq!(value["verdict"]["status"], "warn");
        assert!(writer.get("artifacts/report.md").is_some());

        let patch = writer.get("artifacts/patch.diff").expect("patch.diff");
        assert!(patch.starts_with("diff --git a/a.ts b/a.ts\n"));
        assert!(patch.contains("-abcdef"));
        assert!(patch.contains("+Xcdef"));
    }
}
