mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use clap::{Parser, Subcommand};
use codefix_core::adapters::{FsAnalysisService, FsWritePort};
use codefix_core::pipeline::{
    RunOutcome, ToolError, report_from_run, run_codefix, write_run_artifacts,
};
use codefix_core::settings::{DEFAULT_MAX_PASSES, RunSettings};
use codefix_types::receipt::ToolInfo;
use config::{CliOverrides, ConfigMerger};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Exit code when `--fail-on-rejected` is set and changes are still rejected.
const EXIT_REJECTED: u8 = 2;

#[derive(Debug, Parser)]
#[command(
    name = "codefix",
    version,
    about = "Batch-apply diagnostic-driven code fixes across a project."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply fixes, re-running once if conflicting changes were rejected.
    Run(RunArgs),
    /// Compute one pass without touching sources and write the artifacts.
    Plan(PlanArgs),
}

#[derive(Debug, Parser)]
struct SelectionArgs {
    /// Project descriptor (TOML).
    #[arg(long, default_value = "codefix.project.toml")]
    project: Utf8PathBuf,

    /// Only fix diagnostics with this code. Repeatable.
    #[arg(long = "error-code", value_name = "CODE")]
    error_codes: Vec<u32>,

    /// Only apply fixes with this name. Repeatable.
    #[arg(long = "fix-name", value_name = "NAME")]
    fix_names: Vec<String>,
}

#[derive(Debug, Parser)]
struct RunArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Where patched files are written (default: codefix-out).
    #[arg(long)]
    output_dir: Option<Utf8PathBuf>,

    /// Maximum number of passes (default: 2).
    #[arg(long)]
    max_passes: Option<u32>,

    /// Write report.json, report.md and patch.diff here.
    #[arg(long)]
    artifacts_dir: Option<Utf8PathBuf>,

    /// Compute a single pass and write no source files.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Exit with code 2 if the final pass still rejected changes.
    #[arg(long, default_value_t = false)]
    fail_on_rejected: bool,
}

#[derive(Debug, Parser)]
struct PlanArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Output directory for artifacts (default: <project dir>/artifacts/codefix).
    #[arg(long)]
    artifacts_dir: Option<Utf8PathBuf>,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("error: {:#}", e);
            let code = e.downcast_ref::<ToolError>().map_or(1, ToolError::exit_code);
            ExitCode::from(code)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Plan(args) => cmd_plan(args),
    }
}

fn settings_for(selection: &SelectionArgs, cli: CliOverrides) -> anyhow::Result<RunSettings> {
    let file_config =
        config::load_or_default(&selection.project).context("load codefix.toml config")?;
    let merged = ConfigMerger::new(file_config).merge(&CliOverrides {
        error_codes: selection.error_codes.clone(),
        fix_names: selection.fix_names.clone(),
        ..cli
    });
    debug!("merged config: {:?}", merged);

    let defaults = RunSettings::default();
    Ok(RunSettings {
        project: selection.project.clone(),
        output_dir: merged.output_dir.unwrap_or(defaults.output_dir),
        error_codes: merged.error_codes,
        fix_names: merged.fix_names,
        format: merged.format,
        max_passes: merged.max_passes.unwrap_or(DEFAULT_MAX_PASSES),
        dry_run: merged.dry_run,
        artifacts_dir: None,
    })
}

fn cmd_run(args: RunArgs) -> anyhow::Result<ExitCode> {
    let mut settings = settings_for(
        &args.selection,
        CliOverrides {
            max_passes: args.max_passes,
            dry_run: args.dry_run,
            output_dir: args.output_dir,
            ..CliOverrides::default()
        },
    )?;
    settings.artifacts_dir = args.artifacts_dir;

    let started_at = Utc::now();
    let outcome = run_codefix(&settings, &FsAnalysisService, &FsWritePort)?;

    if let Some(dir) = &settings.artifacts_dir {
        let report = report_from_run(&outcome, &settings, tool_info(), started_at);
        write_run_artifacts(&outcome, &report, dir, &FsWritePort)
            .with_context(|| format!("write artifacts to {}", dir))?;
        info!("wrote artifacts to {}", dir);
    }

    print_summary(&outcome);

    if args.fail_on_rejected && !outcome.rejected.is_empty() {
        return Ok(ExitCode::from(EXIT_REJECTED));
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_plan(args: PlanArgs) -> anyhow::Result<ExitCode> {
    let mut settings = settings_for(
        &args.selection,
        CliOverrides {
            max_passes: Some(1),
            dry_run: true,
            ..CliOverrides::default()
        },
    )?;
    let out_dir = args
        .artifacts_dir
        .unwrap_or_else(|| project_dir(&settings.project).join("artifacts").join("codefix"));
    settings.artifacts_dir = Some(out_dir.clone());

    let started_at = Utc::now();
    let outcome = run_codefix(&settings, &FsAnalysisService, &FsWritePort)?;
    let report = report_from_run(&outcome, &settings, tool_info(), started_at);
    write_run_artifacts(&outcome, &report, &out_dir, &FsWritePort)
        .with_context(|| format!("write artifacts to {}", out_dir))?;

    print_summary(&outcome);
    info!("wrote plan to {}", out_dir);
    Ok(ExitCode::SUCCESS)
}

fn project_dir(descriptor: &Utf8Path) -> Utf8PathBuf {
    match descriptor.parent() {
        Some(p) if !p.as_str().is_empty() => p.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    }
}

fn print_summary(outcome: &RunOutcome) {
    for pass in &outcome.passes {
        println!(
            "pass {}: {} diagnostics selected, {} files patched, {} changes rejected",
            pass.pass,
            pass.diagnostics_selected,
            pass.files.len(),
            pass.rejected.len()
        );
    }
    for rejected in &outcome.rejected {
        println!(
            "rejected {}:{}+{}",
            rejected.file_name, rejected.change.span.start, rejected.change.span.length
        );
    }
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "codefix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        repo: None,
        commit: None,
    }
}
