//! Per-language classification and tokenizer factory.
//!
//! Every embedded sub-language exposes the same capability set through
//! [`LanguageCharacteristics`]: create a tokenizer, classify kinds into
//! language-agnostic [`KnownTokenType`] categories, flip brackets, build marker
//! tokens, show sample text, and split tokens. Parsers consult it as an oracle so
//! they never hard-code one language's kinds.

use super::{LanguageError, SourceCursor, SyntaxKind, Token, TokenStream, Tokenizer};
use crate::base::SourceLocation;

/// Language-agnostic token roles every sub-language maps onto its own kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownTokenType {
    Whitespace,
    NewLine,
    Identifier,
    Keyword,
    Transition,
    CommentStart,
    CommentStar,
    CommentBody,
    Unknown,
}

impl KnownTokenType {
    pub const ALL: [KnownTokenType; 9] = [
        KnownTokenType::Whitespace,
        KnownTokenType::NewLine,
        KnownTokenType::Identifier,
        KnownTokenType::Keyword,
        KnownTokenType::Transition,
        KnownTokenType::CommentStart,
        KnownTokenType::CommentStar,
        KnownTokenType::CommentBody,
        KnownTokenType::Unknown,
    ];
}

/// Capability set of one sub-language.
///
/// Implementations are stateless and shared process-wide. The only per-scan state
/// lives in the tokenizers returned by [`Self::create_tokenizer`].
pub trait LanguageCharacteristics: Send + Sync {
    /// The tokenizer scanning this language over a borrowed document.
    type Tokenizer<'a>: Tokenizer;

    /// A fresh tokenizer positioned wherever `cursor` currently is.
    fn create_tokenizer<'a>(&self, cursor: SourceCursor<'a>) -> Self::Tokenizer<'a>;

    /// The kind this language uses for `category`, or `None` when unsupported.
    fn map_token_type(&self, category: KnownTokenType) -> Option<SyntaxKind>;

    /// Opposite bracket of `kind`.
    fn flip_bracket(&self, kind: SyntaxKind) -> Result<SyntaxKind, LanguageError>;

    /// Canonical display text for `kind`.
    fn sample(&self, kind: SyntaxKind) -> &'static str;

    /// Total mapping: unsupported categories fall back to `UNKNOWN`.
    fn known_token_type(&self, category: KnownTokenType) -> SyntaxKind {
        self.map_token_type(category).unwrap_or(SyntaxKind::UNKNOWN)
    }

    fn knows_token_type(&self, category: KnownTokenType) -> bool {
        category == KnownTokenType::Unknown || self.map_token_type(category).is_some()
    }

    fn is_known_token_type(&self, token: Option<&Token>, category: KnownTokenType) -> bool {
        token.is_some_and(|token| token.kind() == self.known_token_type(category))
    }

    fn is_whitespace(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::Whitespace)
    }

    fn is_new_line(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::NewLine)
    }

    fn is_identifier(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::Identifier)
    }

    fn is_keyword(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::Keyword)
    }

    fn is_transition(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::Transition)
    }

    fn is_comment_start(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::CommentStart)
    }

    fn is_comment_star(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::CommentStar)
    }

    fn is_comment_body(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::CommentBody)
    }

    fn is_unknown(&self, token: Option<&Token>) -> bool {
        self.is_known_token_type(token, KnownTokenType::Unknown)
    }

    /// Zero-width placeholder token.
    fn create_marker_token(&self) -> Token {
        Token::empty(SyntaxKind::MARKER)
    }

    /// Split `token` at byte `offset`, re-kinding the prefix as `left_kind`.
    ///
    /// The prefix carries no diagnostics. The suffix keeps the original kind and all
    /// original diagnostics, and is absent when `offset` equals the token width.
    fn split_token(
        &self,
        token: &Token,
        offset: usize,
        left_kind: SyntaxKind,
    ) -> Result<(Token, Option<Token>), LanguageError> {
        let text = token.text();
        LanguageError::check_split(text, offset)?;

        let left = Token::new(left_kind, &text[..offset]);
        let right = (offset < text.len()).then(|| {
            Token::with_diagnostics(
                token.kind(),
                &text[offset..],
                token.diagnostics().to_vec(),
            )
        });
        Ok((left, right))
    }

    /// Tokenize a standalone string.
    fn tokenize_string<'a>(&self, text: &'a str) -> TokenStream<Self::Tokenizer<'a>> {
        self.tokenize_string_at(SourceLocation::ZERO, text)
    }

    /// Tokenize `text` as if it started at `start` in an enclosing document.
    fn tokenize_string_at<'a>(
        &self,
        start: SourceLocation,
        text: &'a str,
    ) -> TokenStream<Self::Tokenizer<'a>> {
        TokenStream::new(self.create_tokenizer(SourceCursor::with_origin(text, start)))
    }
}

/// Shared table lookup for `flip_bracket`.
pub(crate) fn flip_in(
    pairs: &[(SyntaxKind, SyntaxKind)],
    kind: SyntaxKind,
) -> Result<SyntaxKind, LanguageError> {
    pairs
        .iter()
        .find_map(|&(open, close)| {
            if kind == open {
                Some(close)
            } else if kind == close {
                Some(open)
            } else {
                None
            }
        })
        .ok_or(LanguageError::NotABracket(kind))
}
