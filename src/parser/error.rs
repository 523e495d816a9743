//! Error types for caller contract violations.
//!
//! Malformed source text is never an error here; it becomes `UNKNOWN` tokens and
//! diagnostics. These variants report a defect in the calling code.

use thiserror::Error;

use super::SyntaxKind;

/// Errors raised when a tokenizer-framework operation is called outside its contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LanguageError {
    /// `split_token` offset past the token's width.
    #[error("split offset {offset} is outside token of width {width}")]
    SplitOutOfRange { offset: usize, width: usize },

    /// `split_token` offset inside a multi-byte character.
    #[error("split offset {offset} is not on a character boundary")]
    SplitNotCharBoundary { offset: usize },

    /// `flip_bracket` on a kind the language does not treat as a bracket.
    #[error("{0:?} is not a bracket kind of this language")]
    NotABracket(SyntaxKind),

    /// Cursor seek past the end of the text.
    #[error("seek offset {offset} is outside text of length {len}")]
    SeekOutOfRange { offset: usize, len: usize },

    /// Cursor seek into the middle of a multi-byte character.
    #[error("seek offset {offset} is not on a character boundary")]
    SeekNotCharBoundary { offset: usize },
}

impl LanguageError {
    /// Check a split offset against a token's content.
    pub(crate) fn check_split(content: &str, offset: usize) -> Result<(), Self> {
        if offset > content.len() {
            return Err(Self::SplitOutOfRange {
                offset,
                width: content.len(),
            });
        }
        if !content.is_char_boundary(offset) {
            return Err(Self::SplitNotCharBoundary { offset });
        }
        Ok(())
    }
}
