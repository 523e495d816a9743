//! Tokenizer contract and the driving loop.
//!
//! A tokenizer is a stateful scanner bound to one [`SourceCursor`]. It produces one
//! token per call and `None` once the input is exhausted. [`TokenStream`] turns a
//! tokenizer into a lazy iterator that owns (and releases) the cursor.

use std::iter::FusedIterator;

use text_size::{TextRange, TextSize};
use tracing::trace;

use super::{SourceCursor, SyntaxKind, Token};
use crate::base::{Diagnostic, DiagnosticCode};

/// A scanner producing tokens from a [`SourceCursor`].
pub trait Tokenizer {
    /// The next token, or `None` at the end of input.
    fn next_token(&mut self) -> Option<Token>;

    /// The cursor the tokenizer reads from.
    fn cursor(&self) -> &SourceCursor<'_>;
}

/// Lazy, finite, non-restartable token sequence.
///
/// The tokenizer (and the cursor it owns) is dropped as soon as it reports the end
/// of input. Dropping the stream early releases it as well.
#[derive(Debug)]
pub struct TokenStream<T> {
    tokenizer: Option<T>,
}

impl<T: Tokenizer> TokenStream<T> {
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer: Some(tokenizer),
        }
    }

    /// Whether the underlying cursor is still held.
    pub fn is_live(&self) -> bool {
        self.tokenizer.is_some()
    }
}

impl<T: Tokenizer> Iterator for TokenStream<T> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let token = self.tokenizer.as_mut()?.next_token();
        if token.is_none() {
            if let Some(tokenizer) = self.tokenizer.take() {
                trace!(
                    offset = tokenizer.cursor().absolute_offset(),
                    "token stream exhausted, releasing cursor"
                );
            }
        }
        token
    }
}

impl<T: Tokenizer> FusedIterator for TokenStream<T> {}

// ============================================================================
// Helpers shared by the concrete tokenizers
// ============================================================================

/// Build a token from everything the cursor consumed since `start` (local offset).
pub(crate) fn token_since(cursor: &SourceCursor<'_>, start: usize, kind: SyntaxKind) -> Token {
    Token::new(kind, &cursor.text()[start..cursor.offset()])
}

/// Absolute range of everything consumed since `start` (local offset).
pub(crate) fn span_since(cursor: &SourceCursor<'_>, start: usize) -> TextRange {
    let base = cursor.origin().absolute_index;
    TextRange::new(
        TextSize::new((base + start) as u32),
        TextSize::new(cursor.absolute_offset() as u32),
    )
}

/// Diagnostic covering everything consumed since `start`.
pub(crate) fn diagnostic_since(
    cursor: &SourceCursor<'_>,
    start: usize,
    code: DiagnosticCode,
    message: &str,
) -> Diagnostic {
    Diagnostic::new(code, span_since(cursor, start), message)
        .with_file_path(cursor.origin().file_path.clone())
}

// ============================================================================
// Template comments: @* … *@
// ============================================================================

/// Position inside a `@* … *@` comment.
///
/// Both sub-languages recognise template comments and emit the same token sequence:
/// `COMMENT_TRANSITION COMMENT_STAR [COMMENT_BODY] COMMENT_STAR COMMENT_TRANSITION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum CommentState {
    #[default]
    Inactive,
    OpeningStar,
    Body,
    ClosingStar,
    ClosingTransition,
}

impl CommentState {
    pub(crate) fn is_active(self) -> bool {
        self != CommentState::Inactive
    }

    /// Emit the opening `@` of `@*` and enter the comment.
    pub(crate) fn open(&mut self, cursor: &mut SourceCursor<'_>) -> Token {
        let start = cursor.offset();
        cursor.advance();
        *self = CommentState::OpeningStar;
        token_since(cursor, start, SyntaxKind::COMMENT_TRANSITION)
    }

    /// The next token inside the comment. Only valid while [`Self::is_active`].
    pub(crate) fn next_token(&mut self, cursor: &mut SourceCursor<'_>) -> Option<Token> {
        let start = cursor.offset();
        match *self {
            CommentState::Inactive => None,
            CommentState::OpeningStar => {
                cursor.advance();
                let star = token_since(cursor, start, SyntaxKind::COMMENT_STAR);
                if cursor.is_eof() {
                    // `@*` at the very end: nothing left to carry the diagnostic.
                    *self = CommentState::Inactive;
                    let diagnostic = diagnostic_since(
                        cursor,
                        start,
                        DiagnosticCode::UnterminatedTemplateComment,
                        "template comment is missing its closing '*@'",
                    );
                    return Some(star.with_diagnostic(diagnostic));
                }
                *self = CommentState::Body;
                Some(star)
            }
            CommentState::Body => {
                let body_len = cursor.rest().find("*@");
                match body_len {
                    Some(0) => {
                        *self = CommentState::ClosingStar;
                        self.next_token(cursor)
                    }
                    Some(len) => {
                        cursor.advance_by(len);
                        *self = CommentState::ClosingStar;
                        Some(token_since(cursor, start, SyntaxKind::COMMENT_BODY))
                    }
                    None => {
                        cursor.advance_by(cursor.rest().len());
                        *self = CommentState::Inactive;
                        let diagnostic = diagnostic_since(
                            cursor,
                            start,
                            DiagnosticCode::UnterminatedTemplateComment,
                            "template comment is missing its closing '*@'",
                        );
                        Some(
                            token_since(cursor, start, SyntaxKind::COMMENT_BODY)
                                .with_diagnostic(diagnostic),
                        )
                    }
                }
            }
            CommentState::ClosingStar => {
                cursor.advance();
                *self = CommentState::ClosingTransition;
                Some(token_since(cursor, start, SyntaxKind::COMMENT_STAR))
            }
            CommentState::ClosingTransition => {
                cursor.advance();
                *self = CommentState::Inactive;
                Some(token_since(cursor, start, SyntaxKind::COMMENT_TRANSITION))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Drive only the comment states, starting on `@*`.
    fn scan_comment(text: &str) -> Vec<Token> {
        let mut cursor = SourceCursor::new(text);
        let mut state = CommentState::default();
        let mut tokens = vec![state.open(&mut cursor)];
        while state.is_active() {
            match state.next_token(&mut cursor) {
                Some(token) => tokens.push(token),
                None => break,
            }
        }
        tokens
    }

    #[test]
    fn test_comment_token_sequence() {
        let tokens = scan_comment("@* note *@");
        let kinds: Vec<_> = tokens.iter().map(Token::kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::COMMENT_TRANSITION,
                SyntaxKind::COMMENT_STAR,
                SyntaxKind::COMMENT_BODY,
                SyntaxKind::COMMENT_STAR,
                SyntaxKind::COMMENT_TRANSITION,
            ]
        );
        assert_eq!(tokens[2].text(), " note ");
    }

    #[test]
    fn test_empty_comment_has_no_body() {
        let tokens = scan_comment("@**@");
        assert_eq!(tokens.len(), 4);
        assert!(tokens.iter().all(|t| t.diagnostics().is_empty()));
    }

    #[test]
    fn test_unterminated_comment_reports_on_body() {
        let tokens = scan_comment("@* open");
        assert_eq!(tokens.len(), 3);
        let body = &tokens[2];
        assert_eq!(body.text(), " open");
        assert_eq!(
            body.diagnostics()[0].code,
            DiagnosticCode::UnterminatedTemplateComment
        );
        assert_eq!(body.diagnostics()[0].span, TextRange::new(2.into(), 7.into()));
    }

    #[test]
    fn test_unterminated_empty_comment_reports_on_star() {
        let tokens = scan_comment("@*");
        assert_eq!(tokens.len(), 2);
        assert!(tokens[1].has_errors());
    }
}
