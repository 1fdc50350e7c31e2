//! Rendering helpers (markdown) for human-readable artifacts.

use codefix_types::report::{CodefixReport, PassSummary, ReportStatus};

pub fn render_report_md(report: &CodefixReport) -> String {
    let mut out = String::new();
    out.push_str("# codefix run\n\n");
    out.push_str(&format!("- Project: `{}`\n", report.run.project));
    out.push_str(&format!("- Output: `{}`\n", report.run.output_dir));
    if report.run.dry_run {
        out.push_str("- Mode: dry-run\n");
    }
    out.push_str(&format!(
        "- Status: `{}`\n",
        status_label(report.verdict.status)
    ));
    out.push_str(&format!(
        "- Passes: {}\n- Files written: {}\n- Changes applied: {}\n- Changes rejected: {}\n\n",
        report.verdict.counts.passes,
        report.verdict.counts.files_written,
        report.verdict.counts.changes_applied,
        report.verdict.counts.changes_rejected
    ));

    out.push_str("## Passes\n\n");
    if report.passes.is_empty() {
        out.push_str("_No passes ran._\n\n");
    }
    for pass in &report.passes {
        render_pass(&mut out, pass);
    }

    out.push_str("## Rejected changes\n\n");
    if report.rejected.is_empty() {
        out.push_str("_None._\n");
        return out;
    }
    for r in &report.rejected {
        out.push_str(&format!(
            "- `{}` [{}, {}) → `{}`\n",
            r.file_name,
            r.change.span.start,
            r.change.span.end(),
            escape_inline(&r.change.new_text)
        ));
    }

    out
}

fn render_pass(out: &mut String, pass: &PassSummary) {
    out.push_str(&format!("### Pass {}\n\n", pass.pass));
    out.push_str(&format!(
        "- Diagnostics: {} (selected {})\n- Fix actions: {}\n- Rejected: {}\n",
        pass.diagnostics_total, pass.diagnostics_selected, pass.fix_actions, pass.rejected
    ));
    for message in &pass.messages {
        out.push_str(&format!("- {}\n", message));
    }

    if !pass.files.is_empty() {
        out.push_str("\n**Files**\n\n");
        for f in &pass.files {
            out.push_str(&format!(
                "- `{}` → `{}` ({} applied, {} rejected) {} → {}\n",
                f.path,
                f.output_path,
                f.accepted,
                f.rejected,
                short_sha(&f.sha256_before),
                short_sha(&f.sha256_after)
            ));
        }
    }
    out.push('\n');
}

fn status_label(s: ReportStatus) -> &'static str {
    match s {
        ReportStatus::Pass => "pass",
        ReportStatus::Warn => "warn",
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..12).unwrap_or(sha)
}

fn escape_inline(text: &str) -> String {
    text.replace('\n', "\\n").replace('`', "'")
}
