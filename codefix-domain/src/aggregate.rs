use camino::{Utf8Path, Utf8PathBuf};
use codefix_types::fix::{FixAction, TextChange};
use std::collections::BTreeMap;

/// Candidate edits grouped by target file.
///
/// Built once from the pass's fix actions and never mutated afterwards.
/// Per-file sequences keep encounter order (fix action, then position inside
/// the action) and may contain duplicates or overlaps; conflict resolution
/// happens later. Files iterate in path order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditSet {
    by_file: BTreeMap<Utf8PathBuf, Vec<TextChange>>,
}

impl EditSet {
    pub fn from_fix_actions(actions: &[FixAction]) -> Self {
        let mut by_file: BTreeMap<Utf8PathBuf, Vec<TextChange>> = BTreeMap::new();
        for action in actions {
            for file_changes in &action.changes {
                by_file
                    .entry(file_changes.file_name.clone())
                    .or_default()
                    .extend(file_changes.text_changes.iter().cloned());
            }
        }
        Self { by_file }
    }

    pub fn get(&self, file: &Utf8Path) -> Option<&[TextChange]> {
        self.by_file.get(file).map(Vec::as_slice)
    }

    pub fn files(&self) -> impl Iterator<Item = &Utf8Path> {
        self.by_file.keys().map(Utf8PathBuf::as_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Utf8Path, &[TextChange])> {
        self.by_file
            .iter()
            .map(|(file, changes)| (file.as_path(), changes.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.by_file.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_file.is_empty()
    }

    pub fn total_changes(&self) -> usize {
        self.by_file.values().map(Vec::len).sum()
    }
}
