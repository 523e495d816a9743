//! Markup (host language) tokenizer.
//!
//! Markup is scanned coarsely: tag punctuation, quotes, whitespace, line breaks,
//! transitions and template comments are separate tokens, everything else is
//! `TEXT`. The lexeme table is generated by logos; the template comment states are
//! driven by hand because their body is not a regular token.

use logos::Logos;

use super::language::flip_in;
use super::tokenizer::{CommentState, diagnostic_since, token_since};
use super::{
    KnownTokenType, LanguageCharacteristics, LanguageError, SourceCursor, SyntaxKind, Token,
    Tokenizer,
};
use crate::base::DiagnosticCode;

/// Markup lexemes. Every character matches exactly one rule.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum MarkupLexeme {
    #[regex(r"[ \t\x0B\x0C]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    NewLine,

    #[token("@*")]
    CommentOpen,

    #[token("@")]
    Transition,

    #[token("<")]
    OpenAngle,
    #[token(">")]
    CloseAngle,
    #[token("/")]
    Slash,
    #[token("!")]
    Bang,
    #[token("=")]
    Eq,
    #[token("\"")]
    DoubleQuote,
    #[token("'")]
    SingleQuote,
    #[token("?")]
    Question,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,

    #[regex(r#"[^<>/!="'?\[\]@ \t\x0B\x0C\r\n]+"#)]
    Text,
}

impl From<MarkupLexeme> for SyntaxKind {
    fn from(lexeme: MarkupLexeme) -> Self {
        match lexeme {
            MarkupLexeme::Whitespace => SyntaxKind::WHITESPACE,
            MarkupLexeme::NewLine => SyntaxKind::NEW_LINE,
            MarkupLexeme::CommentOpen => SyntaxKind::COMMENT_TRANSITION,
            MarkupLexeme::Transition => SyntaxKind::TRANSITION,
            MarkupLexeme::OpenAngle => SyntaxKind::OPEN_ANGLE,
            MarkupLexeme::CloseAngle => SyntaxKind::CLOSE_ANGLE,
            MarkupLexeme::Slash => SyntaxKind::SLASH,
            MarkupLexeme::Bang => SyntaxKind::BANG,
            MarkupLexeme::Eq => SyntaxKind::EQ,
            MarkupLexeme::DoubleQuote => SyntaxKind::DOUBLE_QUOTE,
            MarkupLexeme::SingleQuote => SyntaxKind::SINGLE_QUOTE,
            MarkupLexeme::Question => SyntaxKind::QUESTION,
            MarkupLexeme::LBracket => SyntaxKind::L_BRACKET,
            MarkupLexeme::RBracket => SyntaxKind::R_BRACKET,
            MarkupLexeme::Text => SyntaxKind::TEXT,
        }
    }
}

/// Tokenizer for markup regions.
#[derive(Debug)]
pub struct MarkupTokenizer<'a> {
    cursor: SourceCursor<'a>,
    comment: CommentState,
}

impl<'a> MarkupTokenizer<'a> {
    pub fn new(cursor: SourceCursor<'a>) -> Self {
        Self {
            cursor,
            comment: CommentState::default(),
        }
    }
}

impl Tokenizer for MarkupTokenizer<'_> {
    fn next_token(&mut self) -> Option<Token> {
        if self.comment.is_active() {
            return self.comment.next_token(&mut self.cursor);
        }

        let start = self.cursor.offset();
        let mut lexer = MarkupLexeme::lexer(self.cursor.rest());
        let kind = match lexer.next()? {
            Ok(MarkupLexeme::CommentOpen) => return Some(self.comment.open(&mut self.cursor)),
            Ok(lexeme) => {
                self.cursor.advance_by(lexer.span().end);
                SyntaxKind::from(lexeme)
            }
            Err(()) => {
                self.cursor.advance();
                let diagnostic = diagnostic_since(
                    &self.cursor,
                    start,
                    DiagnosticCode::UnexpectedCharacter,
                    "unexpected character in markup",
                );
                return Some(
                    token_since(&self.cursor, start, SyntaxKind::UNKNOWN)
                        .with_diagnostic(diagnostic),
                );
            }
        };
        Some(token_since(&self.cursor, start, kind))
    }

    fn cursor(&self) -> &SourceCursor<'_> {
        &self.cursor
    }
}

const MARKUP_BRACKETS: &[(SyntaxKind, SyntaxKind)] = &[
    (SyntaxKind::OPEN_ANGLE, SyntaxKind::CLOSE_ANGLE),
    (SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET),
];

/// Characteristics of the markup host language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkupLanguage;

impl MarkupLanguage {
    /// Kinds the markup tokenizer can produce.
    pub fn produces(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::WHITESPACE
                | SyntaxKind::NEW_LINE
                | SyntaxKind::TRANSITION
                | SyntaxKind::COMMENT_TRANSITION
                | SyntaxKind::COMMENT_STAR
                | SyntaxKind::COMMENT_BODY
                | SyntaxKind::MARKER
                | SyntaxKind::UNKNOWN
                | SyntaxKind::TEXT
                | SyntaxKind::OPEN_ANGLE
                | SyntaxKind::CLOSE_ANGLE
                | SyntaxKind::DOUBLE_QUOTE
                | SyntaxKind::SINGLE_QUOTE
                | SyntaxKind::L_BRACKET
                | SyntaxKind::R_BRACKET
                | SyntaxKind::SLASH
                | SyntaxKind::BANG
                | SyntaxKind::EQ
                | SyntaxKind::QUESTION
        )
    }
}

impl LanguageCharacteristics for MarkupLanguage {
    type Tokenizer<'a> = MarkupTokenizer<'a>;

    fn create_tokenizer<'a>(&self, cursor: SourceCursor<'a>) -> MarkupTokenizer<'a> {
        MarkupTokenizer::new(cursor)
    }

    fn map_token_type(&self, category: KnownTokenType) -> Option<SyntaxKind> {
        let kind = match category {
            KnownTokenType::Whitespace => SyntaxKind::WHITESPACE,
            KnownTokenType::NewLine => SyntaxKind::NEW_LINE,
            KnownTokenType::Identifier => SyntaxKind::TEXT,
            KnownTokenType::Keyword => return None,
            KnownTokenType::Transition => SyntaxKind::TRANSITION,
            KnownTokenType::CommentStart => SyntaxKind::COMMENT_TRANSITION,
            KnownTokenType::CommentStar => SyntaxKind::COMMENT_STAR,
            KnownTokenType::CommentBody => SyntaxKind::COMMENT_BODY,
            KnownTokenType::Unknown => SyntaxKind::UNKNOWN,
        };
        Some(kind)
    }

    fn flip_bracket(&self, kind: SyntaxKind) -> Result<SyntaxKind, LanguageError> {
        flip_in(MARKUP_BRACKETS, kind)
    }

    fn sample(&self, kind: SyntaxKind) -> &'static str {
        if !Self::produces(kind) {
            return "<unknown>";
        }
        match kind {
            SyntaxKind::TEXT => "<text>",
            SyntaxKind::WHITESPACE => "<whitespace>",
            SyntaxKind::NEW_LINE => "<newline>",
            SyntaxKind::COMMENT_BODY => "<comment>",
            SyntaxKind::MARKER => "<marker>",
            _ => kind.fixed_text().unwrap_or("<unknown>"),
        }
    }
}
