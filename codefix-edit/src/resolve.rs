use codefix_types::fix::TextChange;
use tracing::debug;

/// Outcome of conflict resolution for one file.
///
/// Both lists are in sort order and together hold every input change
/// exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub accepted: Vec<TextChange>,
    pub rejected: Vec<TextChange>,
}

/// Sort by start offset, then by length (shorter first).
///
/// The sort is stable, so identical spans keep their encounter order.
/// Replacement text plays no part in ordering.
pub fn sort_changes(changes: &mut [TextChange]) {
    changes.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then(a.span.length.cmp(&b.span.length))
    });
}

/// Greedily keep the earliest non-conflicting changes.
///
/// A change is accepted only if it starts strictly after the end of the last
/// accepted change. Touching spans (`next.start == prev.end`) conflict too,
/// so two insertions at the same offset never both land.
pub fn resolve_conflicts(mut changes: Vec<TextChange>) -> Resolution {
    sort_changes(&mut changes);

    let mut resolution = Resolution::default();
    let mut current_end: Option<usize> = None;

    for change in changes {
        let clear = match current_end {
            None => true,
            Some(end) => change.span.start > end,
        };

        if clear {
            current_end = Some(change.span.end());
            resolution.accepted.push(change);
        } else {
            debug!(
                start = change.span.start,
                length = change.span.length,
                current_end = ?current_end,
                "rejecting conflicting change"
            );
            resolution.rejected.push(change);
        }
    }

    resolution
}
