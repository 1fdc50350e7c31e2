use crate::fix::TextSpan;
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// An issue reported by the analysis service.
///
/// Every positional field is optional: analysis engines emit global
/// diagnostics with no file and diagnostics with no span. Such degenerate
/// diagnostics are counted by filters but never resolved to fixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Utf8PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,

    pub code: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Diagnostic {
    /// A diagnostic anchored at `[start, start + length)` of `file`.
    pub fn at(file: impl Into<Utf8PathBuf>, start: usize, length: usize, code: u32) -> Self {
        Self {
            file: Some(file.into()),
            start: Some(start),
            length: Some(length),
            code,
            message: None,
        }
    }

    /// File and span, if the diagnostic carries both.
    pub fn location(&self) -> Option<(&Utf8Path, TextSpan)> {
        match (&self.file, self.start, self.length) {
            (Some(file), Some(start), Some(length)) => {
                Some((file.as_path(), TextSpan::new(start, length)))
            }
            _ => None,
        }
    }
}

/// Diagnostics reported for a single source file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileDiagnostics {
    pub file: Utf8PathBuf,

    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,
}

impl FileDiagnostics {
    pub fn new(file: impl Into<Utf8PathBuf>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            file: file.into(),
            diagnostics,
        }
    }
}
