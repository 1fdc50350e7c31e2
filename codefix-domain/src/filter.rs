use codefix_types::diagnostic::FileDiagnostics;

/// Diagnostics retained for fix resolution, plus tally messages for the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticSelection {
    pub files: Vec<FileDiagnostics>,
    pub messages: Vec<String>,
}

impl DiagnosticSelection {
    pub fn total(&self) -> usize {
        self.files.iter().map(|f| f.diagnostics.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Keep only diagnostics whose code is in `codes`; an empty `codes` keeps all.
///
/// One message is produced per matched code, in first-encounter order. When
/// `codes` is non-empty and nothing matched, the selection is empty and the
/// single message names the requested codes.
pub fn filter_by_code(files: Vec<FileDiagnostics>, codes: &[u32]) -> DiagnosticSelection {
    if codes.is_empty() {
        let total: usize = files.iter().map(|f| f.diagnostics.len()).sum();
        let message = format!("found {} diagnostics in {} files", total, files.len());
        return DiagnosticSelection {
            files,
            messages: vec![message],
        };
    }

    let mut counts: Vec<(u32, usize)> = Vec::new();
    let mut kept = Vec::with_capacity(files.len());

    for mut file in files {
        file.diagnostics.retain(|d| {
            if !codes.contains(&d.code) {
                return false;
            }
            match counts.iter_mut().find(|(code, _)| *code == d.code) {
                Some((_, n)) => *n += 1,
                None => counts.push((d.code, 1)),
            }
            true
        });
        kept.push(file);
    }

    if counts.is_empty() {
        let requested = codes
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        return DiagnosticSelection {
            files: Vec::new(),
            messages: vec![format!("no diagnostics found with codes {}", requested)],
        };
    }

    let messages = counts
        .into_iter()
        .map(|(code, n)| format!("found {} diagnostics with code {}", n, code))
        .collect();

    DiagnosticSelection {
        files: kept,
        messages,
    }
}
