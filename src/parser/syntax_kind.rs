//! Syntax kinds for the Rowan-based CST
//!
//! One closed enumeration covers the tokens of every sub-language (markup and
//! embedded code) plus the composite node kinds. A single enum keeps mixed-language
//! trees addressable with one `rowan::Language`.

/// All syntax kinds (tokens and nodes) of a template document
///
/// Tokens are leaves (text, punctuation, keywords, trivia).
/// Nodes are composite (tags, code blocks, comments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // SHARED TOKENS (every sub-language produces these)
    // =========================================================================
    WHITESPACE = 0,
    NEW_LINE,
    TRANSITION,         // @
    COMMENT_TRANSITION, // @ opening or closing @* *@
    COMMENT_STAR,       // * inside @* *@
    COMMENT_BODY,       // text between @* and *@
    MARKER,             // zero-width placeholder
    UNKNOWN,            // unscannable input / unmapped category
    END_OF_FILE,

    // =========================================================================
    // MARKUP TOKENS
    // =========================================================================
    TEXT,
    OPEN_ANGLE,         // <
    CLOSE_ANGLE,        // >
    DOUBLE_QUOTE,       // "
    SINGLE_QUOTE,       // '

    // =========================================================================
    // PUNCTUATION (shared by markup and code where the meaning coincides)
    // =========================================================================
    L_BRACKET,          // [
    R_BRACKET,          // ]
    SLASH,              // /
    BANG,               // !
    EQ,                 // =
    QUESTION,           // ?

    // =========================================================================
    // CODE TOKENS
    // =========================================================================
    IDENT,
    KEYWORD,
    INTEGER_LITERAL,
    REAL_LITERAL,
    STRING_LITERAL,
    CHAR_LITERAL,
    CODE_COMMENT,       // // … or /* … */

    L_PAREN,            // (
    R_PAREN,            // )
    L_BRACE,            // {
    R_BRACE,            // }
    LT,                 // <
    GT,                 // >
    SEMICOLON,          // ;
    COLON,              // :
    COLON_COLON,        // ::
    COMMA,              // ,
    DOT,                // .
    HASH,               // #
    TILDE,              // ~
    ARROW,              // ->
    FAT_ARROW,          // =>
    EQ_EQ,              // ==
    BANG_EQ,            // !=
    LT_EQ,              // <=
    GT_EQ,              // >=
    LT_LT,              // <<
    LT_LT_EQ,           // <<=
    GT_GT,              // >>
    GT_GT_EQ,           // >>=
    PLUS,               // +
    PLUS_PLUS,          // ++
    PLUS_EQ,            // +=
    MINUS,              // -
    MINUS_MINUS,        // --
    MINUS_EQ,           // -=
    STAR,               // *
    STAR_EQ,            // *=
    SLASH_EQ,           // /=
    PERCENT,            // %
    PERCENT_EQ,         // %=
    AMP,                // &
    AMP_AMP,            // &&
    AMP_EQ,             // &=
    PIPE,               // |
    PIPE_PIPE,          // ||
    PIPE_EQ,            // |=
    CARET,              // ^
    CARET_EQ,           // ^=
    QUESTION_QUESTION,  // ??
    QUESTION_DOT,       // ?.

    // =========================================================================
    // NODES
    // =========================================================================
    DOCUMENT,
    MARKUP_BLOCK,
    MARKUP_TAG,
    MARKUP_TEXT,
    CODE_BLOCK,
    CODE_EXPRESSION,
    TEMPLATE_COMMENT,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Whitespace or a line break
    pub fn is_whitespace(self) -> bool {
        matches!(self, Self::WHITESPACE | Self::NEW_LINE)
    }

    /// Check if this is a trivia token (whitespace, newline or comment)
    pub fn is_trivia(self) -> bool {
        self.is_whitespace() || self == Self::CODE_COMMENT
    }

    /// Check if this is a code punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_PAREN as u16) && (self as u16) <= (Self::QUESTION_DOT as u16)
    }

    /// Check if this is a code literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INTEGER_LITERAL | Self::REAL_LITERAL | Self::STRING_LITERAL | Self::CHAR_LITERAL
        )
    }

    /// The exact text of tokens whose content never varies.
    pub fn fixed_text(self) -> Option<&'static str> {
        let text = match self {
            Self::TRANSITION | Self::COMMENT_TRANSITION => "@",
            Self::COMMENT_STAR => "*",
            Self::MARKER | Self::END_OF_FILE => "",
            Self::OPEN_ANGLE => "<",
            Self::CLOSE_ANGLE => ">",
            Self::DOUBLE_QUOTE => "\"",
            Self::SINGLE_QUOTE => "'",
            Self::L_BRACKET => "[",
            Self::R_BRACKET => "]",
            Self::SLASH => "/",
            Self::BANG => "!",
            Self::EQ => "=",
            Self::QUESTION => "?",
            Self::L_PAREN => "(",
            Self::R_PAREN => ")",
            Self::L_BRACE => "{",
            Self::R_BRACE => "}",
            Self::LT => "<",
            Self::GT => ">",
            Self::SEMICOLON => ";",
            Self::COLON => ":",
            Self::COLON_COLON => "::",
            Self::COMMA => ",",
            Self::DOT => ".",
            Self::HASH => "#",
            Self::TILDE => "~",
            Self::ARROW => "->",
            Self::FAT_ARROW => "=>",
            Self::EQ_EQ => "==",
            Self::BANG_EQ => "!=",
            Self::LT_EQ => "<=",
            Self::GT_EQ => ">=",
            Self::LT_LT => "<<",
            Self::LT_LT_EQ => "<<=",
            Self::GT_GT => ">>",
            Self::GT_GT_EQ => ">>=",
            Self::PLUS => "+",
            Self::PLUS_PLUS => "++",
            Self::PLUS_EQ => "+=",
            Self::MINUS => "-",
            Self::MINUS_MINUS => "--",
            Self::MINUS_EQ => "-=",
            Self::STAR => "*",
            Self::STAR_EQ => "*=",
            Self::SLASH_EQ => "/=",
            Self::PERCENT => "%",
            Self::PERCENT_EQ => "%=",
            Self::AMP => "&",
            Self::AMP_AMP => "&&",
            Self::AMP_EQ => "&=",
            Self::PIPE => "|",
            Self::PIPE_PIPE => "||",
            Self::PIPE_EQ => "|=",
            Self::CARET => "^",
            Self::CARET_EQ => "^=",
            Self::QUESTION_QUESTION => "??",
            Self::QUESTION_DOT => "?.",
            _ => return None,
        };
        Some(text)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateLanguage {}

impl rowan::Language for TemplateLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<TemplateLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<TemplateLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<TemplateLanguage>;
