use crate::error::{EditError, EditResult};
use codefix_types::fix::TextChange;

/// Replace one span of `text`.
pub fn apply_change(text: &str, change: &TextChange) -> EditResult<String> {
    let (start, end) = check_span(text, change)?;

    let mut out = String::with_capacity(text.len() - (end - start) + change.new_text.len());
    out.push_str(&text[..start]);
    out.push_str(&change.new_text);
    out.push_str(&text[end..]);
    Ok(out)
}

/// Apply accepted changes to `original`.
///
/// `accepted` must be sorted by start and free of overlaps, as produced by
/// [`resolve_conflicts`](crate::resolve_conflicts). Changes are applied last
/// to first so the offsets of earlier changes, which are still in original
/// coordinates, stay valid.
pub fn apply_changes(original: &str, accepted: &[TextChange]) -> EditResult<String> {
    let mut text = original.to_string();
    for change in accepted.iter().rev() {
        let (start, end) = check_span(&text, change)?;
        text.replace_range(start..end, &change.new_text);
    }
    Ok(text)
}

/// Validated `(start, end)` of `change` within `text`.
fn check_span(text: &str, change: &TextChange) -> EditResult<(usize, usize)> {
    let start = change.span.start;
    let end = match change.span.checked_end() {
        Some(end) if end <= text.len() => end,
        _ => {
            return Err(EditError::SpanOutOfBounds {
                start,
                end: change.span.end(),
                len: text.len(),
            });
        }
    };
    for offset in [start, end] {
        if !text.is_char_boundary(offset) {
            return Err(EditError::NotCharBoundary { offset });
        }
    }
    Ok((start, end))
}
