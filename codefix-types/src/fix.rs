use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

/// A half-open byte range `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Exclusive end, saturating at `usize::MAX`.
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.length)
    }

    /// Exclusive end, or `None` if `start + length` overflows.
    pub fn checked_end(&self) -> Option<usize> {
        self.start.checked_add(self.length)
    }
}

/// The atomic edit: replace `span` of the original text with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextChange {
    pub span: TextSpan,

    #[serde(default)]
    pub new_text: String,
}

impl TextChange {
    pub fn new(start: usize, length: usize, new_text: impl Into<String>) -> Self {
        Self {
            span: TextSpan::new(start, length),
            new_text: new_text.into(),
        }
    }
}

/// Ordered edits targeting one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileTextChanges {
    pub file_name: Utf8PathBuf,

    #[serde(default)]
    pub text_changes: Vec<TextChange>,
}

/// A named, machine-generated remedy for one diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixAction {
    /// Fix category, e.g. "fixMissingImport".
    pub fix_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque group id reported by the analysis engine. Never used for deduplication.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix_id: Option<serde_json::Value>,

    #[serde(default)]
    pub changes: Vec<FileTextChanges>,
}

/// Formatting hints forwarded to the analysis service when requesting fixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub new_line: String,
    pub indent_size: u32,
    pub convert_tabs_to_spaces: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            new_line: if cfg!(windows) { "\r\n" } else { "\n" }.to_string(),
            indent_size: 4,
            convert_tabs_to_spaces: true,
        }
    }
}

/// An edit the conflict resolver refused, with the file it targeted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedChange {
    pub file_name: Utf8PathBuf,
    pub change: TextChange,
}
