//! Edit engine for codefix passes.
//!
//! Responsibilities:
//! - Resolve conflicts between candidate changes for one file.
//! - Patch a file's original text with the accepted changes.
//! - Render a unified diff preview of patched files.

mod error;
mod patch;
mod resolve;

pub use error::{EditError, EditResult};
pub use patch::{apply_change, apply_changes};
pub use resolve::{Resolution, resolve_conflicts, sort_changes};

use camino::{Utf8Path, Utf8PathBuf};
use codefix_types::fix::TextChange;
use diffy::PatchFormatter;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Result of resolving and applying one file's candidate changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEdit {
    pub resolution: Resolution,
    pub contents: String,
}

impl FileEdit {
    pub fn changed(&self, original: &str) -> bool {
        self.contents != original
    }
}

/// Resolve conflicts among `changes` and patch `original` with the survivors.
pub fn apply_file_edits(original: &str, changes: &[TextChange]) -> EditResult<FileEdit> {
    let resolution = resolve_conflicts(changes.to_vec());
    let contents = apply_changes(original, &resolution.accepted)?;
    Ok(FileEdit {
        resolution,
        contents,
    })
}

/// Unified diff of every file whose contents differ between `before` and `after`.
pub fn render_patch(
    before: &BTreeMap<Utf8PathBuf, String>,
    after: &BTreeMap<Utf8PathBuf, String>,
) -> String {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for (path, old) in before {
        let new = after.get(path).unwrap_or(old);
        if old == new {
            continue;
        }
        out.push_str(&file_header(path));

        let patch = diffy::create_patch(old, new);
        let body = formatter.fmt_patch(&patch).to_string();
        // diffy repeats the ---/+++ header; keep only the hunks.
        for line in body.lines().skip_while(|l| !l.starts_with("@@")) {
            out.push_str(line);
            out.push('\n');
        }
    }

    out
}

fn file_header(path: &Utf8Path) -> String {
    format!("diff --git a/{0} b/{0}\n--- a/{0}\n+++ b/{0}\n", path)
}

/// Hex-encoded SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
