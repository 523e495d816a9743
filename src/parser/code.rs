//! Embedded code tokenizer (C#-like).
//!
//! Fixed lexemes (operators, keywords, ASCII identifiers, numbers) come from the
//! logos table. String and character literals, block comments and template
//! comments are scanned by hand so that unterminated forms become diagnostics
//! instead of lexer errors. Identifiers outside ASCII fall back to the XID tables.

use logos::Logos;

use super::language::flip_in;
use super::tokenizer::{CommentState, diagnostic_since, token_since};
use super::{
    KnownTokenType, LanguageCharacteristics, LanguageError, SourceCursor, SyntaxKind, Token,
    Tokenizer,
};
use crate::base::{DiagnosticCode, text_utils};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum CodeLexeme {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\x0B\x0C]+")]
    Whitespace,

    #[regex(r"\r\n|\n|\r")]
    NewLine,

    #[regex(r"//[^\r\n]*")]
    LineComment,

    #[token("/*")]
    BlockCommentOpen,

    #[token("@*")]
    CommentOpen,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[0-9][0-9_]*([uU][lL]?|[lL][uU]?)?")]
    #[regex(r"0[xX][0-9a-fA-F_]+([uU][lL]?|[lL][uU]?)?")]
    #[regex(r"0[bB][01_]+")]
    Integer,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdDmM]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[fFdDmM]")]
    Real,

    // A radix prefix or exponent with no digits after it.
    #[regex(r"0[xXbB]")]
    IncompleteInteger,

    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?[eE][+-]?")]
    #[regex(r"\.[0-9][0-9_]*[eE][+-]?")]
    IncompleteReal,

    #[token("\"")]
    #[token("$\"")]
    StringOpen,

    #[token("@\"")]
    VerbatimStringOpen,

    #[token("'")]
    CharOpen,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,

    // =========================================================================
    // KEYWORDS (reserved words only; tokens beat the identifier regex)
    // =========================================================================
    #[token("abstract")]
    #[token("as")]
    #[token("base")]
    #[token("bool")]
    #[token("break")]
    #[token("byte")]
    #[token("case")]
    #[token("catch")]
    #[token("char")]
    #[token("checked")]
    #[token("class")]
    #[token("const")]
    #[token("continue")]
    #[token("decimal")]
    #[token("default")]
    #[token("delegate")]
    #[token("do")]
    #[token("double")]
    #[token("else")]
    #[token("enum")]
    #[token("event")]
    #[token("explicit")]
    #[token("extern")]
    #[token("false")]
    #[token("finally")]
    #[token("fixed")]
    #[token("float")]
    #[token("for")]
    #[token("foreach")]
    #[token("goto")]
    #[token("if")]
    #[token("implicit")]
    #[token("in")]
    #[token("int")]
    #[token("interface")]
    #[token("internal")]
    #[token("is")]
    #[token("lock")]
    #[token("long")]
    #[token("namespace")]
    #[token("new")]
    #[token("null")]
    #[token("object")]
    #[token("operator")]
    #[token("out")]
    #[token("override")]
    #[token("params")]
    #[token("private")]
    #[token("protected")]
    #[token("public")]
    #[token("readonly")]
    #[token("ref")]
    #[token("return")]
    #[token("sbyte")]
    #[token("sealed")]
    #[token("short")]
    #[token("sizeof")]
    #[token("stackalloc")]
    #[token("static")]
    #[token("string")]
    #[token("struct")]
    #[token("switch")]
    #[token("this")]
    #[token("throw")]
    #[token("true")]
    #[token("try")]
    #[token("typeof")]
    #[token("uint")]
    #[token("ulong")]
    #[token("unchecked")]
    #[token("unsafe")]
    #[token("ushort")]
    #[token("using")]
    #[token("virtual")]
    #[token("void")]
    #[token("volatile")]
    #[token("while")]
    Keyword,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("<<=")]
    LtLtEq,
    #[token(">>=")]
    GtGtEq,
    #[token("::")]
    ColonColon,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    LtLt,
    #[token(">>")]
    GtGt,
    #[token("++")]
    PlusPlus,
    #[token("+=")]
    PlusEq,
    #[token("--")]
    MinusMinus,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&&")]
    AmpAmp,
    #[token("&=")]
    AmpEq,
    #[token("||")]
    PipePipe,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("??")]
    QuestionQuestion,
    #[token("?.")]
    QuestionDot,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("@")]
    Transition,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("#")]
    Hash,
    #[token("~")]
    Tilde,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
}

impl From<CodeLexeme> for SyntaxKind {
    fn from(lexeme: CodeLexeme) -> Self {
        use CodeLexeme::*;
        match lexeme {
            Whitespace => SyntaxKind::WHITESPACE,
            NewLine => SyntaxKind::NEW_LINE,
            LineComment | BlockCommentOpen => SyntaxKind::CODE_COMMENT,
            CommentOpen => SyntaxKind::COMMENT_TRANSITION,
            Integer | IncompleteInteger => SyntaxKind::INTEGER_LITERAL,
            Real | IncompleteReal => SyntaxKind::REAL_LITERAL,
            StringOpen | VerbatimStringOpen => SyntaxKind::STRING_LITERAL,
            CharOpen => SyntaxKind::CHAR_LITERAL,
            Ident => SyntaxKind::IDENT,
            Keyword => SyntaxKind::KEYWORD,
            LtLtEq => SyntaxKind::LT_LT_EQ,
            GtGtEq => SyntaxKind::GT_GT_EQ,
            ColonColon => SyntaxKind::COLON_COLON,
            Arrow => SyntaxKind::ARROW,
            FatArrow => SyntaxKind::FAT_ARROW,
            EqEq => SyntaxKind::EQ_EQ,
            BangEq => SyntaxKind::BANG_EQ,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            LtLt => SyntaxKind::LT_LT,
            GtGt => SyntaxKind::GT_GT,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            MinusEq => SyntaxKind::MINUS_EQ,
            StarEq => SyntaxKind::STAR_EQ,
            SlashEq => SyntaxKind::SLASH_EQ,
            PercentEq => SyntaxKind::PERCENT_EQ,
            AmpAmp => SyntaxKind::AMP_AMP,
            AmpEq => SyntaxKind::AMP_EQ,
            PipePipe => SyntaxKind::PIPE_PIPE,
            PipeEq => SyntaxKind::PIPE_EQ,
            CaretEq => SyntaxKind::CARET_EQ,
            QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            QuestionDot => SyntaxKind::QUESTION_DOT,
            Transition => SyntaxKind::TRANSITION,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Hash => SyntaxKind::HASH,
            Tilde => SyntaxKind::TILDE,
            Eq => SyntaxKind::EQ,
            Bang => SyntaxKind::BANG,
            Question => SyntaxKind::QUESTION,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
        }
    }
}

/// Tokenizer for embedded code regions.
#[derive(Debug)]
pub struct CodeTokenizer<'a> {
    cursor: SourceCursor<'a>,
    comment: CommentState,
}

impl<'a> CodeTokenizer<'a> {
    pub fn new(cursor: SourceCursor<'a>) -> Self {
        Self {
            cursor,
            comment: CommentState::default(),
        }
    }

    /// Rest of a `"…"` or `'…'` literal after its opening delimiter.
    fn scan_quoted(&mut self, start: usize, quote: char, kind: SyntaxKind) -> Token {
        loop {
            match self.cursor.peek() {
                None | Some('\r' | '\n') => {
                    let (code, message) = if kind == SyntaxKind::CHAR_LITERAL {
                        (
                            DiagnosticCode::UnterminatedCharLiteral,
                            "character literal is missing its closing quote",
                        )
                    } else {
                        (
                            DiagnosticCode::UnterminatedStringLiteral,
                            "string literal is missing its closing quote",
                        )
                    };
                    let diagnostic = diagnostic_since(&self.cursor, start, code, message);
                    return token_since(&self.cursor, start, kind).with_diagnostic(diagnostic);
                }
                Some('\\') => {
                    self.cursor.advance();
                    if !matches!(self.cursor.peek(), None | Some('\r' | '\n')) {
                        self.cursor.advance();
                    }
                }
                Some(c) => {
                    self.cursor.advance();
                    if c == quote {
                        return token_since(&self.cursor, start, kind);
                    }
                }
            }
        }
    }

    /// Rest of a `@"…"` literal. Line breaks are allowed and `""` is an escaped quote.
    fn scan_verbatim(&mut self, start: usize) -> Token {
        loop {
            match self.cursor.advance() {
                None => {
                    let diagnostic = diagnostic_since(
                        &self.cursor,
                        start,
                        DiagnosticCode::UnterminatedStringLiteral,
                        "verbatim string literal is missing its closing quote",
                    );
                    return token_since(&self.cursor, start, SyntaxKind::STRING_LITERAL)
                        .with_diagnostic(diagnostic);
                }
                Some('"') if self.cursor.peek() == Some('"') => {
                    self.cursor.advance();
                }
                Some('"') => return token_since(&self.cursor, start, SyntaxKind::STRING_LITERAL),
                Some(_) => {}
            }
        }
    }

    /// Rest of a `/* … */` comment.
    fn scan_block_comment(&mut self, start: usize) -> Token {
        match self.cursor.rest().find("*/") {
            Some(end) => {
                self.cursor.advance_by(end + 2);
                token_since(&self.cursor, start, SyntaxKind::CODE_COMMENT)
            }
            None => {
                self.cursor.advance_by(self.cursor.rest().len());
                let diagnostic = diagnostic_since(
                    &self.cursor,
                    start,
                    DiagnosticCode::UnterminatedBlockComment,
                    "block comment is missing its closing '*/'",
                );
                token_since(&self.cursor, start, SyntaxKind::CODE_COMMENT)
                    .with_diagnostic(diagnostic)
            }
        }
    }

    /// A character the lexeme table rejects: either a non-ASCII identifier or junk.
    fn scan_unexpected(&mut self, start: usize) -> Token {
        let is_ident = self.cursor.peek().is_some_and(text_utils::is_identifier_start);
        self.cursor.advance();
        if is_ident {
            self.cursor.advance_while(text_utils::is_word_character);
            return token_since(&self.cursor, start, SyntaxKind::IDENT);
        }
        let diagnostic = diagnostic_since(
            &self.cursor,
            start,
            DiagnosticCode::UnexpectedCharacter,
            "unexpected character in code",
        );
        token_since(&self.cursor, start, SyntaxKind::UNKNOWN).with_diagnostic(diagnostic)
    }
}

impl Tokenizer for CodeTokenizer<'_> {
    fn next_token(&mut self) -> Option<Token> {
        if self.comment.is_active() {
            return self.comment.next_token(&mut self.cursor);
        }

        let start = self.cursor.offset();
        let mut lexer = CodeLexeme::lexer(self.cursor.rest());
        let lexeme = match lexer.next()? {
            Ok(lexeme) => lexeme,
            Err(()) => return Some(self.scan_unexpected(start)),
        };
        let len = lexer.span().end;

        let token = match lexeme {
            CodeLexeme::CommentOpen => self.comment.open(&mut self.cursor),
            CodeLexeme::StringOpen => {
                self.cursor.advance_by(len);
                self.scan_quoted(start, '"', SyntaxKind::STRING_LITERAL)
            }
            CodeLexeme::CharOpen => {
                self.cursor.advance_by(len);
                self.scan_quoted(start, '\'', SyntaxKind::CHAR_LITERAL)
            }
            CodeLexeme::VerbatimStringOpen => {
                self.cursor.advance_by(len);
                self.scan_verbatim(start)
            }
            CodeLexeme::BlockCommentOpen => {
                self.cursor.advance_by(len);
                self.scan_block_comment(start)
            }
            CodeLexeme::IncompleteInteger | CodeLexeme::IncompleteReal => {
                self.cursor.advance_by(len);
                let diagnostic = diagnostic_since(
                    &self.cursor,
                    start,
                    DiagnosticCode::MalformedNumericLiteral,
                    "numeric literal is missing its digits",
                );
                token_since(&self.cursor, start, SyntaxKind::from(lexeme))
                    .with_diagnostic(diagnostic)
            }
            CodeLexeme::Ident | CodeLexeme::Keyword => {
                self.cursor.advance_by(len);
                // `naïve` lexes as `na` first; keep eating XID characters.
                let extended = self.cursor.advance_while(text_utils::is_word_character) > 0;
                let kind = if extended {
                    SyntaxKind::IDENT
                } else {
                    SyntaxKind::from(lexeme)
                };
                token_since(&self.cursor, start, kind)
            }
            other => {
                self.cursor.advance_by(len);
                token_since(&self.cursor, start, SyntaxKind::from(other))
            }
        };
        Some(token)
    }

    fn cursor(&self) -> &SourceCursor<'_> {
        &self.cursor
    }
}

const CODE_BRACKETS: &[(SyntaxKind, SyntaxKind)] = &[
    (SyntaxKind::L_PAREN, SyntaxKind::R_PAREN),
    (SyntaxKind::L_BRACE, SyntaxKind::R_BRACE),
    (SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET),
    (SyntaxKind::LT, SyntaxKind::GT),
];

/// Characteristics of the embedded code language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeLanguage;

impl CodeLanguage {
    /// Kinds the code tokenizer can produce.
    pub fn produces(kind: SyntaxKind) -> bool {
        kind.is_punct()
            || kind.is_literal()
            || matches!(
                kind,
                SyntaxKind::IDENT
                    | SyntaxKind::KEYWORD
                    | SyntaxKind::CODE_COMMENT
                    | SyntaxKind::WHITESPACE
                    | SyntaxKind::NEW_LINE
                    | SyntaxKind::TRANSITION
                    | SyntaxKind::COMMENT_TRANSITION
                    | SyntaxKind::COMMENT_STAR
                    | SyntaxKind::COMMENT_BODY
                    | SyntaxKind::MARKER
                    | SyntaxKind::UNKNOWN
                    | SyntaxKind::L_BRACKET
                    | SyntaxKind::R_BRACKET
                    | SyntaxKind::SLASH
                    | SyntaxKind::BANG
                    | SyntaxKind::EQ
                    | SyntaxKind::QUESTION
            )
    }
}

impl LanguageCharacteristics for CodeLanguage {
    type Tokenizer<'a> = CodeTokenizer<'a>;

    fn create_tokenizer<'a>(&self, cursor: SourceCursor<'a>) -> CodeTokenizer<'a> {
        CodeTokenizer::new(cursor)
    }

    fn map_token_type(&self, category: KnownTokenType) -> Option<SyntaxKind> {
        let kind = match category {
            KnownTokenType::Whitespace => SyntaxKind::WHITESPACE,
            KnownTokenType::NewLine => SyntaxKind::NEW_LINE,
            KnownTokenType::Identifier => SyntaxKind::IDENT,
            KnownTokenType::Keyword => SyntaxKind::KEYWORD,
            KnownTokenType::Transition => SyntaxKind::TRANSITION,
            KnownTokenType::CommentStart => SyntaxKind::COMMENT_TRANSITION,
            KnownTokenType::CommentStar => SyntaxKind::COMMENT_STAR,
            KnownTokenType::CommentBody => SyntaxKind::COMMENT_BODY,
            KnownTokenType::Unknown => SyntaxKind::UNKNOWN,
        };
        Some(kind)
    }

    fn flip_bracket(&self, kind: SyntaxKind) -> Result<SyntaxKind, LanguageError> {
        flip_in(CODE_BRACKETS, kind)
    }

    fn sample(&self, kind: SyntaxKind) -> &'static str {
        if !Self::produces(kind) {
            return "<unknown>";
        }
        match kind {
            SyntaxKind::IDENT => "<identifier>",
            SyntaxKind::KEYWORD => "<keyword>",
            SyntaxKind::INTEGER_LITERAL => "<integer>",
            SyntaxKind::REAL_LITERAL => "<real>",
            SyntaxKind::STRING_LITERAL => "<string>",
            SyntaxKind::CHAR_LITERAL => "<char>",
            SyntaxKind::CODE_COMMENT | SyntaxKind::COMMENT_BODY => "<comment>",
            SyntaxKind::WHITESPACE => "<whitespace>",
            SyntaxKind::NEW_LINE => "<newline>",
            SyntaxKind::MARKER => "<marker>",
            _ => kind.fixed_text().unwrap_or("<unknown>"),
        }
    }
}
