//! Reference document parser.
//!
//! Groups markup and code tokens into a rowan green tree:
//!
//! ```text
//! DOCUMENT
//!   MARKUP_BLOCK
//!     MARKUP_TEXT | MARKUP_TAG | TEMPLATE_COMMENT | CODE_BLOCK | CODE_EXPRESSION ...
//!   END_OF_FILE ""
//! ```
//!
//! Each region is scanned by a fresh tokenizer of its language, positioned at the
//! byte where the previous region ended. A tag at the start of a statement inside
//! a braced code block switches back to markup until its element closes; that
//! markup lands in a nested `MARKUP_BLOCK`.

use std::collections::VecDeque;
use std::sync::Arc;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use tracing::{debug, trace};

use super::{
    CodeLanguage, CodeTokenizer, LanguageCharacteristics, MarkupLanguage, MarkupTokenizer,
    SourceCursor, SyntaxKind, SyntaxNode, SyntaxToken, Token, TokenStream, Tokenizer,
};
use crate::base::{
    Diagnostic, DiagnosticCode, LineCol, LineIndex, SourceLocation, TextRange, TextSize,
    text_utils,
};

/// Keywords that open a statement block after `@`.
const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "foreach", "while", "switch", "using", "lock", "do", "try",
];

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Options for [`parse_with_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Stamped into every diagnostic.
    pub file_path: Option<Arc<str>>,
}

impl ParseOptions {
    pub fn with_file_path(mut self, file_path: impl Into<Arc<str>>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }
}

/// Parse result: the green tree plus diagnostics anchored to token ranges.
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    diagnostics: Vec<(TextRange, Diagnostic)>,
    line_index: Arc<LineIndex>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Reconstructed source text.
    pub fn text(&self) -> String {
        self.syntax().text().to_string()
    }

    /// Every diagnostic, in document order of the token it is attached to.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().map(|(_, diagnostic)| diagnostic)
    }

    /// Diagnostics attached to one token.
    pub fn diagnostics_for<'p>(
        &'p self,
        token: &SyntaxToken,
    ) -> impl Iterator<Item = &'p Diagnostic> + 'p {
        let range = token.text_range();
        self.diagnostics
            .iter()
            .filter(move |(anchor, _)| *anchor == range)
            .map(|(_, diagnostic)| diagnostic)
    }

    /// True when no error-severity diagnostic was produced.
    pub fn ok(&self) -> bool {
        !self.diagnostics().any(Diagnostic::is_error)
    }

    pub fn line_col(&self, offset: TextSize) -> LineCol {
        self.line_index.line_col(offset)
    }
}

/// Parse a template document.
pub fn parse(source: &str) -> Parse {
    parse_with_options(source, &ParseOptions::default())
}

/// Parse a template document with options.
pub fn parse_with_options(source: &str, options: &ParseOptions) -> Parse {
    let mut parser = Parser::new(source, options);
    parser.parse_document();
    let parse = parser.finish();
    debug!(
        len = source.len(),
        diagnostics = parse.diagnostics.len(),
        file = options.file_path.as_deref().unwrap_or("<anonymous>"),
        "parsed template document"
    );
    parse
}

// ============================================================================
// Token lookahead
// ============================================================================

/// Lookahead buffer over a token stream.
struct TokenBuffer<T: Tokenizer> {
    stream: TokenStream<T>,
    lookahead: VecDeque<Token>,
}

impl<T: Tokenizer> TokenBuffer<T> {
    fn new(tokenizer: T) -> Self {
        Self {
            stream: TokenStream::new(tokenizer),
            lookahead: VecDeque::new(),
        }
    }

    fn nth(&mut self, n: usize) -> Option<&Token> {
        while self.lookahead.len() <= n {
            let token = self.stream.next()?;
            self.lookahead.push_back(token);
        }
        self.lookahead.get(n)
    }

    fn peek(&mut self) -> Option<&Token> {
        self.nth(0)
    }

    fn peek_kind(&mut self) -> Option<SyntaxKind> {
        self.peek().map(Token::kind)
    }

    fn next(&mut self) -> Option<Token> {
        self.lookahead.pop_front().or_else(|| self.stream.next())
    }

    /// First token that is not trivia, without consuming anything.
    fn peek_significant(&mut self) -> Option<&Token> {
        let mut n = 0;
        while self.nth(n)?.kind().is_trivia() {
            n += 1;
        }
        self.nth(n)
    }

    fn at_significant(&mut self, kind: SyntaxKind) -> bool {
        self.peek_significant().is_some_and(|token| token.kind() == kind)
    }

    fn at_significant_keyword(&mut self, keyword: &str) -> bool {
        self.peek_significant()
            .is_some_and(|token| token.kind() == SyntaxKind::KEYWORD && token.text() == keyword)
    }
}

type CodeBuffer<'a> = TokenBuffer<CodeTokenizer<'a>>;

/// True when the code ahead starts a markup tag: `<name` or `</`.
fn at_markup_start(code: &mut CodeBuffer<'_>) -> bool {
    code.peek_kind() == Some(SyntaxKind::LT)
        && code.nth(1).is_some_and(|token| {
            matches!(
                token.kind(),
                SyntaxKind::IDENT | SyntaxKind::KEYWORD | SyntaxKind::SLASH
            )
        })
}

// ============================================================================
// Markup elements
// ============================================================================

/// A tag whose `<` has been pushed but whose `>` has not.
#[derive(Debug)]
struct OpenTag {
    /// Range of the `<`.
    range: TextRange,
    name: String,
    closing: bool,
}

/// Why [`Parser::parse_markup`] stopped before the end of input.
enum MarkupStop {
    /// An `@` was pushed; code follows.
    Transition(Checkpoint, TextRange),
    /// The element a markup block inside code was opened for has closed.
    ElementClosed,
}

/// Nesting of the element that a markup block inside code belongs to.
#[derive(Debug, Default)]
struct ElementScope {
    name: Option<String>,
    depth: usize,
}

impl ElementScope {
    /// Account for a finished tag. True once the outermost element is closed.
    fn close_tag(&mut self, tag: &OpenTag, self_closing: bool) -> bool {
        let name = self.name.get_or_insert_with(|| tag.name.clone());
        if !name.eq_ignore_ascii_case(&tag.name) {
            return false;
        }
        if tag.closing {
            self.depth = self.depth.saturating_sub(1);
        } else if !self_closing && !is_void_element(&tag.name) {
            self.depth += 1;
        }
        self.depth == 0
    }
}

fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

// ============================================================================
// Parser state
// ============================================================================

struct Parser<'a> {
    source: &'a str,
    options: &'a ParseOptions,
    line_index: Arc<LineIndex>,
    /// Bytes already pushed into the tree.
    offset: usize,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Vec<(TextRange, Diagnostic)>,
    open_tag: Option<OpenTag>,
    in_text: bool,
    /// Kind of the last non-trivia token pushed.
    last_kind: Option<SyntaxKind>,
    /// Last pushed token was markup text ending in a word character.
    after_word: bool,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str, options: &'a ParseOptions) -> Self {
        Self {
            source,
            options,
            line_index: Arc::new(LineIndex::new(source)),
            offset: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Vec::new(),
            open_tag: None,
            in_text: false,
            last_kind: None,
            after_word: false,
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            diagnostics: self.diagnostics,
            line_index: self.line_index,
        }
    }

    /// A cursor over the unparsed remainder, located in the whole document.
    fn cursor(&self) -> SourceCursor<'a> {
        let rest = self.source.get(self.offset..).unwrap_or_default();
        let LineCol { line, col } = self.line_index.line_col(TextSize::new(self.offset as u32));
        let mut origin = SourceLocation::new(self.offset, line as usize, col as usize);
        origin.file_path = self.options.file_path.clone();
        SourceCursor::with_origin(rest, origin)
    }

    fn markup_buffer(&self) -> TokenBuffer<MarkupTokenizer<'a>> {
        TokenBuffer::new(MarkupLanguage.create_tokenizer(self.cursor()))
    }

    fn code_buffer(&self) -> CodeBuffer<'a> {
        TokenBuffer::new(CodeLanguage.create_tokenizer(self.cursor()))
    }

    // =========================================================================
    // Tree building
    // =========================================================================

    /// Range the next pushed token of `width` will occupy.
    fn next_range(&self, width: TextSize) -> TextRange {
        TextRange::at(TextSize::new(self.offset as u32), width)
    }

    fn push(&mut self, token: Token) {
        let range = self.next_range(token.width());
        for diagnostic in token.diagnostics() {
            self.diagnostics.push((range, diagnostic.clone()));
        }
        self.after_word = token.kind() == SyntaxKind::TEXT
            && token
                .text()
                .chars()
                .next_back()
                .is_some_and(text_utils::is_word_character);
        if !token.kind().is_trivia() {
            self.last_kind = Some(token.kind());
        }
        self.builder.token(token.kind().into(), token.text());
        self.offset += token.text().len();
    }

    fn diagnose(&mut self, anchor: TextRange, code: DiagnosticCode, message: &str) {
        let diagnostic = Diagnostic::new(code, anchor, message)
            .with_file_path(self.options.file_path.clone());
        self.diagnostics.push((anchor, diagnostic));
    }

    fn wrap(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
        self.builder.finish_node();
    }

    // =========================================================================
    // Markup
    // =========================================================================

    fn parse_document(&mut self) {
        self.builder.start_node(SyntaxKind::DOCUMENT.into());
        self.builder.start_node(SyntaxKind::MARKUP_BLOCK.into());

        let mut markup = self.markup_buffer();
        while let Some(MarkupStop::Transition(checkpoint, transition)) =
            self.parse_markup(&mut markup, None)
        {
            self.parse_code(checkpoint, transition);
            markup = self.markup_buffer();
        }

        self.close_text();
        self.close_unterminated_tag();
        self.builder.finish_node();

        self.push(Token::empty(SyntaxKind::END_OF_FILE));
        self.builder.finish_node();
    }

    /// Push markup until a code transition, the end of `scope`'s element or the
    /// end of input.
    ///
    /// On a transition the `@` has been pushed and its checkpoint and range are
    /// returned; the caller continues with a code tokenizer right after it.
    fn parse_markup<T: Tokenizer>(
        &mut self,
        markup: &mut TokenBuffer<T>,
        mut scope: Option<&mut ElementScope>,
    ) -> Option<MarkupStop> {
        while let Some(token) = markup.next() {
            match token.kind() {
                SyntaxKind::TRANSITION => {
                    let escaped = markup.peek_kind() == Some(SyntaxKind::TRANSITION);
                    let in_word = self.after_word
                        && markup.peek().is_some_and(|next| {
                            next.kind() == SyntaxKind::TEXT
                                && next.text().starts_with(text_utils::is_word_character)
                        });
                    if escaped || in_word {
                        self.push_markup(as_text(token));
                        if escaped {
                            if let Some(second) = markup.next() {
                                self.push_markup(as_text(second));
                            }
                        }
                        continue;
                    }

                    self.close_text();
                    let checkpoint = self.builder.checkpoint();
                    let range = self.next_range(token.width());
                    self.push(token);
                    return Some(MarkupStop::Transition(checkpoint, range));
                }
                SyntaxKind::COMMENT_TRANSITION => {
                    self.close_text();
                    self.parse_template_comment(token, markup);
                }
                SyntaxKind::OPEN_ANGLE => {
                    self.close_text();
                    self.close_unterminated_tag();
                    self.builder.start_node(SyntaxKind::MARKUP_TAG.into());
                    let range = self.next_range(token.width());
                    self.push(token);
                    let closing = markup.peek_kind() == Some(SyntaxKind::SLASH);
                    let name = markup
                        .nth(usize::from(closing))
                        .filter(|next| next.kind() == SyntaxKind::TEXT)
                        .map(|next| next.text().to_owned())
                        .unwrap_or_default();
                    self.open_tag = Some(OpenTag {
                        range,
                        name,
                        closing,
                    });
                }
                SyntaxKind::CLOSE_ANGLE if self.open_tag.is_some() => {
                    let self_closing = self.last_kind == Some(SyntaxKind::SLASH);
                    self.push(token);
                    self.builder.finish_node();
                    let closed = self.open_tag.take();
                    if let (Some(scope), Some(tag)) = (scope.as_deref_mut(), closed) {
                        if scope.close_tag(&tag, self_closing) {
                            return Some(MarkupStop::ElementClosed);
                        }
                    }
                }
                _ => self.push_markup(token),
            }
        }
        None
    }

    /// Push a markup token, opening a text run outside of tags.
    fn push_markup(&mut self, token: Token) {
        if self.open_tag.is_none() && !self.in_text {
            self.builder.start_node(SyntaxKind::MARKUP_TEXT.into());
            self.in_text = true;
        }
        self.push(token);
    }

    fn close_text(&mut self) {
        if self.in_text {
            self.builder.finish_node();
            self.in_text = false;
        }
    }

    /// Report and close a tag that never got its `>`.
    fn close_unterminated_tag(&mut self) {
        if let Some(tag) = self.open_tag.take() {
            self.diagnose(
                tag.range,
                DiagnosticCode::UnterminatedTag,
                "tag is missing its closing '>'",
            );
            self.builder.finish_node();
        }
    }

    /// One markup element inside a code block, from its `<` through the matching
    /// close tag. Code transitions inside it are parsed as usual.
    fn parse_markup_element(&mut self) {
        let outer_tag = self.open_tag.take();
        let outer_text = std::mem::replace(&mut self.in_text, false);
        self.builder.start_node(SyntaxKind::MARKUP_BLOCK.into());

        let mut scope = ElementScope::default();
        let mut markup = self.markup_buffer();
        while let Some(MarkupStop::Transition(checkpoint, transition)) =
            self.parse_markup(&mut markup, Some(&mut scope))
        {
            self.parse_code(checkpoint, transition);
            markup = self.markup_buffer();
        }

        self.close_text();
        self.close_unterminated_tag();
        self.builder.finish_node();
        self.open_tag = outer_tag;
        self.in_text = outer_text;
    }

    /// `@* … *@`, starting from its opening `@`.
    fn parse_template_comment<T: Tokenizer>(&mut self, open: Token, tokens: &mut TokenBuffer<T>) {
        self.builder.start_node(SyntaxKind::TEMPLATE_COMMENT.into());
        self.push(open);
        let mut stars = 0;
        while let Some(kind) = tokens.peek_kind() {
            match kind {
                SyntaxKind::COMMENT_STAR => {
                    stars += 1;
                    self.bump(tokens);
                    if stars == 2 {
                        if tokens.peek_kind() == Some(SyntaxKind::COMMENT_TRANSITION) {
                            self.bump(tokens);
                        }
                        break;
                    }
                }
                SyntaxKind::COMMENT_BODY => self.bump(tokens),
                _ => break,
            }
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Code
    // =========================================================================

    fn bump<T: Tokenizer>(&mut self, tokens: &mut TokenBuffer<T>) {
        if let Some(token) = tokens.next() {
            self.push(token);
        }
    }

    fn bump_trivia<T: Tokenizer>(&mut self, tokens: &mut TokenBuffer<T>) {
        while tokens.peek_kind().is_some_and(SyntaxKind::is_trivia) {
            self.bump(tokens);
        }
    }

    /// The construct following an `@` at `transition`.
    fn parse_code(&mut self, checkpoint: Checkpoint, transition: TextRange) {
        let mut code = self.code_buffer();
        let Some(first) = code.peek() else {
            self.diagnose(
                transition,
                DiagnosticCode::EndOfInputAfterTransition,
                "'@' at the end of the input",
            );
            self.wrap(checkpoint, SyntaxKind::CODE_EXPRESSION);
            return;
        };
        let kind = first.kind();
        let is_control = kind == SyntaxKind::KEYWORD && CONTROL_KEYWORDS.contains(&first.text());
        trace!(offset = self.offset, ?kind, "code transition");

        match kind {
            SyntaxKind::L_BRACE => {
                self.bump_balanced(&mut code);
                self.wrap(checkpoint, SyntaxKind::CODE_BLOCK);
            }
            SyntaxKind::L_PAREN => {
                self.bump_balanced(&mut code);
                self.wrap(checkpoint, SyntaxKind::CODE_EXPRESSION);
            }
            SyntaxKind::KEYWORD if is_control => {
                self.parse_control(&mut code);
                self.wrap(checkpoint, SyntaxKind::CODE_BLOCK);
            }
            SyntaxKind::IDENT | SyntaxKind::KEYWORD => {
                self.parse_implicit(&mut code);
                self.wrap(checkpoint, SyntaxKind::CODE_EXPRESSION);
            }
            SyntaxKind::WHITESPACE | SyntaxKind::NEW_LINE => {
                self.diagnose(
                    transition,
                    DiagnosticCode::WhitespaceAfterTransition,
                    "whitespace is not allowed after '@'",
                );
                self.wrap(checkpoint, SyntaxKind::CODE_EXPRESSION);
            }
            _ => {
                self.diagnose(
                    transition,
                    DiagnosticCode::UnexpectedAfterTransition,
                    "'@' must be followed by an identifier, '(' or '{'",
                );
                self.wrap(checkpoint, SyntaxKind::CODE_EXPRESSION);
            }
        }
    }

    /// An opening bracket through its partner. A missing partner is reported on the
    /// opening bracket and everything to the end of input is consumed.
    ///
    /// Inside braces, a tag at the start of a statement is parsed as markup.
    fn bump_balanced(&mut self, code: &mut CodeBuffer<'a>) {
        let Some(open) = code.next() else {
            return;
        };
        let open_kind = open.kind();
        let open_range = self.next_range(open.width());
        self.push(open);
        let Ok(close_kind) = CodeLanguage.flip_bracket(open_kind) else {
            return;
        };

        let mut depth = 1usize;
        loop {
            if open_kind == SyntaxKind::L_BRACE && self.at_statement_start() {
                self.bump_trivia(code);
                if at_markup_start(code) {
                    self.parse_markup_element();
                    *code = self.code_buffer();
                    continue;
                }
            }
            let Some(token) = code.next() else {
                break;
            };
            let kind = token.kind();
            self.push(token);
            if kind == open_kind {
                depth += 1;
            } else if kind == close_kind {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
        self.diagnose(
            open_range,
            DiagnosticCode::UnbalancedBracket,
            "bracket is never closed",
        );
    }

    /// The last significant token opens a block, ends a statement or ends an element.
    fn at_statement_start(&self) -> bool {
        matches!(
            self.last_kind,
            Some(
                SyntaxKind::L_BRACE
                    | SyntaxKind::R_BRACE
                    | SyntaxKind::SEMICOLON
                    | SyntaxKind::CLOSE_ANGLE
            )
        )
    }

    /// `(…)` after optional trivia, if present.
    fn parse_condition(&mut self, code: &mut CodeBuffer<'a>) {
        if code.at_significant(SyntaxKind::L_PAREN) {
            self.bump_trivia(code);
            self.bump_balanced(code);
        }
    }

    /// `{…}` after optional trivia; reported on `keyword` when missing.
    fn parse_body(&mut self, code: &mut CodeBuffer<'a>, keyword: TextRange) {
        if code.at_significant(SyntaxKind::L_BRACE) {
            self.bump_trivia(code);
            self.bump_balanced(code);
        } else {
            self.diagnose(
                keyword,
                DiagnosticCode::ExpectedBlock,
                "expected a '{' block after the keyword",
            );
        }
    }

    /// Push `keyword` (after trivia) and return its range.
    fn bump_keyword(&mut self, code: &mut CodeBuffer<'a>) -> TextRange {
        self.bump_trivia(code);
        let width = code.peek().map(Token::width).unwrap_or_default();
        let range = self.next_range(width);
        self.bump(code);
        range
    }

    fn parse_control(&mut self, code: &mut CodeBuffer<'a>) {
        let keyword = code.peek().map(|token| token.text().to_owned()).unwrap_or_default();
        let keyword_range = self.bump_keyword(code);

        match keyword.as_str() {
            "do" => {
                self.parse_body(code, keyword_range);
                if code.at_significant_keyword("while") {
                    self.bump_keyword(code);
                    self.parse_condition(code);
                    if code.at_significant(SyntaxKind::SEMICOLON) {
                        self.bump_trivia(code);
                        self.bump(code);
                    }
                }
            }
            "try" => {
                self.parse_body(code, keyword_range);
                loop {
                    if code.at_significant_keyword("catch") {
                        let catch = self.bump_keyword(code);
                        self.parse_condition(code);
                        self.parse_body(code, catch);
                    } else if code.at_significant_keyword("finally") {
                        let finally = self.bump_keyword(code);
                        self.parse_body(code, finally);
                        break;
                    } else {
                        break;
                    }
                }
            }
            "if" => {
                self.parse_condition(code);
                self.parse_body(code, keyword_range);
                while code.at_significant_keyword("else") {
                    let mut branch = self.bump_keyword(code);
                    if code.at_significant_keyword("if") {
                        branch = self.bump_keyword(code);
                        self.parse_condition(code);
                    }
                    self.parse_body(code, branch);
                }
            }
            "using" if !code.at_significant(SyntaxKind::L_PAREN) => {
                // `@using Some.Namespace` directive: the rest of the line.
                while code
                    .peek_kind()
                    .is_some_and(|kind| kind != SyntaxKind::NEW_LINE && kind != SyntaxKind::SEMICOLON)
                {
                    self.bump(code);
                }
                if code.peek_kind() == Some(SyntaxKind::SEMICOLON) {
                    self.bump(code);
                }
            }
            _ => {
                self.parse_condition(code);
                self.parse_body(code, keyword_range);
            }
        }
    }

    /// `@name.member(args)[index]…`
    fn parse_implicit(&mut self, code: &mut CodeBuffer<'a>) {
        self.bump(code);
        loop {
            match code.peek_kind() {
                Some(SyntaxKind::DOT | SyntaxKind::QUESTION_DOT) => {
                    let member_follows = code.nth(1).is_some_and(|token| {
                        matches!(token.kind(), SyntaxKind::IDENT | SyntaxKind::KEYWORD)
                    });
                    if !member_follows {
                        break;
                    }
                    self.bump(code);
                    self.bump(code);
                }
                Some(SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET) => self.bump_balanced(code),
                _ => break,
            }
        }
    }
}

/// Re-kind a markup token as plain text.
fn as_text(token: Token) -> Token {
    MarkupLanguage
        .split_token(&token, token.text().len(), SyntaxKind::TEXT)
        .map(|(left, _)| left)
        .unwrap_or(token)
}
