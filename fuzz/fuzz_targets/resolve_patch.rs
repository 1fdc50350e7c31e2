#![no_main]

//! Fuzz target for conflict resolution followed by patching.
//!
//! Accepted changes must never overlap or touch, and patching must either
//! succeed or fail with a typed error, never panic.

use arbitrary::Arbitrary;
use codefix_edit::{apply_changes, resolve_conflicts};
use codefix_types::fix::TextChange;
use libfuzzer_sys::fuzz_target;

/// Mostly small offsets so spans land inside the text, plus arbitrary
/// `usize` values to reach overflowing spans.
#[derive(Debug, Arbitrary)]
enum Offset {
    Small(u8),
    Any(usize),
}

impl Offset {
    fn get(&self) -> usize {
        match *self {
            Offset::Small(n) => n as usize,
            Offset::Any(n) => n,
        }
    }
}

#[derive(Debug, Arbitrary)]
struct Input {
    text: String,
    changes: Vec<(Offset, Offset, String)>,
}

fuzz_target!(|input: Input| {
    let changes: Vec<TextChange> = input
        .changes
        .into_iter()
        .map(|(start, length, text)| TextChange::new(start.get(), length.get(), text))
        .collect();
    let total = changes.len();

    let resolution = resolve_conflicts(changes);
    assert_eq!(resolution.accepted.len() + resolution.rejected.len(), total);

    for pair in resolution.accepted.windows(2) {
        assert!(pair[1].span.start > pair[0].span.end());
    }

    let _ = apply_changes(&input.text, &resolution.accepted);
});
