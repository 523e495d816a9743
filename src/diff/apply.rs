//! Applying an edit script.

use thiserror::Error;

use super::TextChange;
use crate::base::TextRange;

/// Errors raised when an edit script does not fit the text it is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    #[error("change at {offset} overlaps or precedes the previous change")]
    OverlappingChanges { offset: usize },

    #[error("span {span:?} is outside text of length {len}")]
    SpanOutOfBounds { span: TextRange, len: usize },

    #[error("span {span:?} does not fall on character boundaries")]
    NotCharBoundary { span: TextRange },
}

/// Apply `changes` to `old`. Spans refer to the original text and must be sorted
/// and non-overlapping; several insertions may share one offset.
pub fn apply_text_changes(old: &str, changes: &[TextChange]) -> Result<String, DiffError> {
    let mut output = String::with_capacity(old.len());
    let mut copied = 0;
    for change in changes {
        let start = usize::from(change.span.start());
        let end = usize::from(change.span.end());
        if start < copied {
            return Err(DiffError::OverlappingChanges { offset: start });
        }
        if end > old.len() {
            return Err(DiffError::SpanOutOfBounds {
                span: change.span,
                len: old.len(),
            });
        }
        if !old.is_char_boundary(start) || !old.is_char_boundary(end) {
            return Err(DiffError::NotCharBoundary { span: change.span });
        }
        output.push_str(&old[copied..start]);
        output.push_str(&change.new_text);
        copied = end;
    }
    output.push_str(&old[copied..]);
    Ok(output)
}
