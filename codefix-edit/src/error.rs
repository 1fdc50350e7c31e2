//! Error types for codefix-edit.
//!
//! Every error here means the edit data and the file text disagree: the
//! change was computed against different contents than the ones being
//! patched.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The span reaches past the end of the text.
    #[error("span [{start}, {end}) is outside text of length {len}")]
    SpanOutOfBounds { start: usize, end: usize, len: usize },

    /// The span starts or ends inside a multi-byte character.
    #[error("offset {offset} is not on a UTF-8 character boundary")]
    NotCharBoundary { offset: usize },
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;

#[cfg(test)]
mod tests {
    use super::EditError;

    #[test]
    fn out_of_bounds_display_names_span_and_length() {
        let err = EditError::SpanOutOfBounds {
            start: 4,
            end: 9,
            len: 6,
        };
        assert_eq!(err.to_string(), "span [4, 9) is outside text of length 6");
    }

    #[test]
    fn char_boundary_display_names_offset() {
        let err = EditError::NotCharBoundary { offset: 1 };
        assert!(err.to_string().contains("offset 1"));
    }
}
