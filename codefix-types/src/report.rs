use crate::fix::RejectedChange;
use crate::receipt::ToolInfo;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Machine-readable summary of a codefix run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodefixReport {
    pub schema: String,
    pub run_id: Uuid,
    pub tool: ToolInfo,
    pub run: ReportRunInfo,
    pub verdict: ReportVerdict,

    #[serde(default)]
    pub passes: Vec<PassSummary>,

    /// Edits still rejected after the final pass.
    #[serde(default)]
    pub rejected: Vec<RejectedChange>,
}

impl CodefixReport {
    pub fn new(tool: ToolInfo, run: ReportRunInfo) -> Self {
        Self {
            schema: crate::schema::CODEFIX_REPORT_V1.to_string(),
            run_id: Uuid::new_v4(),
            tool,
            run,
            verdict: ReportVerdict::default(),
            passes: vec![],
            rejected: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRunInfo {
    pub project: String,
    pub output_dir: String,
    pub started_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportVerdict {
    pub status: ReportStatus,
    pub counts: ReportCounts,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[default]
    Pass,
    Warn,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportCounts {
    pub passes: u64,
    pub files_written: u64,
    pub changes_applied: u64,
    pub changes_rejected: u64,
}

/// What one pass of the pipeline did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassSummary {
    pub pass: u32,
    pub diagnostics_total: u64,
    pub diagnostics_selected: u64,
    pub fix_actions: u64,

    #[serde(default)]
    pub messages: Vec<String>,

    #[serde(default)]
    pub files: Vec<PatchedFileSummary>,

    pub rejected: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchedFileSummary {
    pub path: String,
    pub output_path: String,
    pub sha256_before: String,
    pub sha256_after: String,
    pub accepted: u64,
    pub rejected: u64,
}
