//! Default port implementations: filesystem-backed and in-memory.

use crate::ports::{AnalysisService, WritePort};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use codefix_domain::{FileNotFoundError, Project, ProjectLoadError};
use codefix_receipts::{expand_sources, load_analysis, load_descriptor};
use codefix_types::diagnostic::Diagnostic;
use codefix_types::fix::{FixAction, FormatOptions};
use codefix_types::receipt::{AnalysisReceipt, FixRecord};
use fs_err as fs;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use tracing::debug;

/// A project frozen at load time.
///
/// Source text is captured when the snapshot is built, so every read made
/// during a pass sees the same contents no matter what gets written.
#[derive(Debug, Clone, Default)]
pub struct ProjectSnapshot {
    root: Utf8PathBuf,
    files: Vec<Utf8PathBuf>,
    texts: BTreeMap<Utf8PathBuf, String>,
    diagnostics: BTreeMap<Utf8PathBuf, Vec<Diagnostic>>,
    fixes: Vec<FixRecord>,
}

impl ProjectSnapshot {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Add a source file. Files keep insertion order.
    pub fn with_file(mut self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let key = self.key(&path);
        if !self.files.iter().any(|f| self.key(f) == key) {
            self.files.push(path);
        }
        self.texts.insert(key, text.into());
        self
    }

    /// Make `text` readable through `source_text` without listing `path` as a
    /// source file.
    pub fn with_text(mut self, path: impl Into<Utf8PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let key = self.key(&path);
        self.texts.insert(key, text.into());
        self
    }

    /// Report `diagnostic` when `file`'s diagnostics are requested.
    pub fn with_diagnostic(mut self, file: impl Into<Utf8PathBuf>, diagnostic: Diagnostic) -> Self {
        let file = self.key(&file.into());
        self.diagnostics.entry(file).or_default().push(diagnostic);
        self
    }

    /// Offer `action` for `[start, end)` of `file` under `code`.
    pub fn with_fix(
        mut self,
        file: impl Into<Utf8PathBuf>,
        start: usize,
        end: usize,
        code: u32,
        action: FixAction,
    ) -> Self {
        self.fixes.push(FixRecord {
            file: file.into(),
            start,
            end,
            code,
            action,
        });
        self
    }

    /// Build a snapshot from an analysis receipt and already-read sources.
    ///
    /// Diagnostics without a file cannot be attributed to any source file and
    /// are dropped here.
    pub fn from_receipt(
        root: Utf8PathBuf,
        sources: Vec<(Utf8PathBuf, String)>,
        receipt: AnalysisReceipt,
    ) -> Self {
        let mut snapshot = Self::new(root);
        for (path, text) in sources {
            snapshot = snapshot.with_file(path, text);
        }
        for d in receipt.diagnostics {
            match d.file.clone() {
                Some(file) => snapshot = snapshot.with_diagnostic(file, d),
                None => debug!(code = d.code, "dropping diagnostic without a file"),
            }
        }
        snapshot.fixes = receipt.fixes;
        snapshot
    }

    /// Lookup key for `file`: root-relative when it lies under the root.
    fn key(&self, file: &Utf8Path) -> Utf8PathBuf {
        file.strip_prefix(&self.root)
            .map(Utf8Path::to_path_buf)
            .unwrap_or_else(|_| file.to_path_buf())
    }
}

impl Project for ProjectSnapshot {
    fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn source_files(&self) -> Vec<Utf8PathBuf> {
        self.files.clone()
    }

    fn diagnostics(&self, file: &Utf8Path) -> anyhow::Result<Vec<Diagnostic>> {
        Ok(self
            .diagnostics
            .get(&self.key(file))
            .cloned()
            .unwrap_or_default())
    }

    fn fix_actions(
        &self,
        file: &Utf8Path,
        start: usize,
        end: usize,
        codes: &[u32],
        _format: &FormatOptions,
    ) -> anyhow::Result<Vec<FixAction>> {
        let key = self.key(file);
        Ok(self
            .fixes
            .iter()
            .filter(|r| {
                self.key(&r.file) == key
                    && r.start == start
                    && r.end == end
                    && codes.contains(&r.code)
            })
            .map(|r| r.action.clone())
            .collect())
    }

    fn source_text(&self, file: &Utf8Path) -> Result<String, FileNotFoundError> {
        self.texts
            .get(&self.key(file))
            .cloned()
            .ok_or_else(|| FileNotFoundError {
                path: file.to_path_buf(),
            })
    }
}

/// Loads projects from a TOML descriptor and an analysis snapshot on disk.
///
/// When the descriptor names no source patterns, the project consists of
/// every file the snapshot mentions.
#[derive(Debug, Clone, Default)]
pub struct FsAnalysisService;

impl AnalysisService for FsAnalysisService {
    fn load_project(&self, descriptor: &Utf8Path) -> Result<Box<dyn Project>, ProjectLoadError> {
        let load_err = |message: String| ProjectLoadError {
            path: descriptor.to_path_buf(),
            message,
        };

        let desc = load_descriptor(descriptor).map_err(|e| load_err(e.to_string()))?;
        let root = desc.root_dir();
        let analysis_path = desc.analysis_path();
        let receipt = load_analysis(&analysis_path)
            .map_err(|e| load_err(format!("{}: {}", analysis_path, e)))?;

        let (files, edit_targets) = if desc.sources.is_empty() {
            referenced_files(&receipt)
        } else {
            let files =
                expand_sources(&root, &desc.sources).map_err(|e| load_err(e.to_string()))?;
            (files, Vec::new())
        };

        let mut sources = Vec::with_capacity(files.len());
        for file in files {
            let text =
                fs::read_to_string(root_join(&root, &file)).map_err(|e| load_err(e.to_string()))?;
            sources.push((file, text));
        }

        // Edit-only targets are optional: a missing one surfaces later as
        // FileNotFoundError for the pass that tries to patch it.
        let mut extra_texts = Vec::new();
        for file in edit_targets {
            match fs::read_to_string(root_join(&root, &file)) {
                Ok(text) => extra_texts.push((file, text)),
                Err(e) => debug!(file = %file, error = %e, "edit target not readable"),
            }
        }

        debug!(
            descriptor = %descriptor,
            root = %root,
            files = sources.len(),
            "loaded project from disk"
        );
        let mut snapshot = ProjectSnapshot::from_receipt(root, sources, receipt);
        for (file, text) in extra_texts {
            snapshot = snapshot.with_text(file, text);
        }
        Ok(Box::new(snapshot))
    }
}

fn root_join(root: &Utf8Path, file: &Utf8Path) -> Utf8PathBuf {
    if file.is_absolute() {
        file.to_path_buf()
    } else {
        root.join(file)
    }
}

/// Files the snapshot's diagnostics and fix records are anchored to, and the
/// remaining files named only as edit targets.
fn referenced_files(receipt: &AnalysisReceipt) -> (Vec<Utf8PathBuf>, Vec<Utf8PathBuf>) {
    let mut anchored = BTreeSet::new();
    anchored.extend(receipt.diagnostics.iter().filter_map(|d| d.file.clone()));
    anchored.extend(receipt.fixes.iter().map(|r| r.file.clone()));

    let targets: BTreeSet<Utf8PathBuf> = receipt
        .fixes
        .iter()
        .flat_map(|r| &r.action.changes)
        .map(|c| c.file_name.clone())
        .filter(|f| !anchored.contains(f))
        .collect();

    (anchored.into_iter().collect(), targets.into_iter().collect())
}

/// In-memory analysis service for embedding and testing.
///
/// Each load hands out the next scripted snapshot; once the script runs out
/// the last snapshot is repeated. An empty script fails every load.
#[derive(Debug, Default)]
pub struct InMemoryAnalysisService {
    snapshots: Vec<ProjectSnapshot>,
    loads: Mutex<usize>,
}

impl InMemoryAnalysisService {
    pub fn new(snapshots: Vec<ProjectSnapshot>) -> Self {
        Self {
            snapshots,
            loads: Mutex::new(0),
        }
    }

    /// Number of successful and failed loads so far.
    pub fn load_count(&self) -> usize {
        *self.loads.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl AnalysisService for InMemoryAnalysisService {
    fn load_project(&self, descriptor: &Utf8Path) -> Result<Box<dyn Project>, ProjectLoadError> {
        let mut loads = self.loads.lock().unwrap_or_else(|e| e.into_inner());
        let index = (*loads).min(self.snapshots.len().saturating_sub(1));
        *loads += 1;

        match self.snapshots.get(index) {
            Some(snapshot) => Ok(Box::new(snapshot.clone())),
            None => Err(ProjectLoadError {
                path: descriptor.to_path_buf(),
                message: "no project scripted".to_string(),
            }),
        }
    }
}

/// Filesystem write operations.
#[derive(Debug, Clone, Default)]
pub struct FsWritePort;

impl WritePort for FsWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create parent dir for {}", path))?;
        }
        fs::write(path, contents).with_context(|| format!("write {}", path))
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        fs::create_dir_all(path).with_context(|| format!("create_dir_all {}", path))
    }
}

/// Records writes in memory, keyed by `/`-separated path.
#[derive(Debug, Default)]
pub struct MemWritePort {
    files: Mutex<HashMap<String, Vec<u8>>>,
    dirs: Mutex<Vec<String>>,
}

impl MemWritePort {
    pub fn get(&self, path: &str) -> Option<String> {
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        paths.sort();
        paths
    }

    pub fn dirs(&self) -> Vec<String> {
        self.dirs.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl WritePort for MemWritePort {
    fn write_file(&self, path: &Utf8Path, contents: &[u8]) -> anyhow::Result<()> {
        let key = path.as_str().replace('\\', "/");
        self.files
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, contents.to_vec());
        Ok(())
    }

    fn create_dir_all(&self, path: &Utf8Path) -> anyhow::Result<()> {
        let key = path.as_str().replace('\\', "/");
        self.dirs
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key);
        Ok(())
    }
}
