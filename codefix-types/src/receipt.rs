use crate::diagnostic::Diagnostic;
use crate::fix::FixAction;
use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A snapshot of analysis results produced by an external engine.
///
/// codefix reads snapshots *tolerantly*:
/// - Unknown fields are ignored.
/// - Optional fields may be absent.
///
/// The engine that writes the snapshot owns its correctness; codefix only
/// needs it to be internally consistent with the source files on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisReceipt {
    /// Schema identifier, e.g. "codefix.analysis.v1".
    #[serde(default)]
    pub schema: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolInfo>,

    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,

    #[serde(default)]
    pub fixes: Vec<FixRecord>,
}

/// A fix action the engine offers for one diagnostic span.
///
/// Lookups match on the exact `[start, end)` range and the diagnostic code,
/// which is how the engine was queried when the snapshot was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRecord {
    pub file: Utf8PathBuf,
    pub start: usize,
    pub end: usize,
    pub code: u32,
    pub action: FixAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit: Option<String>,
}
