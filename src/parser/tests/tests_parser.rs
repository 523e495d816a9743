//! Tests for the document parser

use crate::base::{DiagnosticCode, LineCol, TextRange};
use crate::parser::{Parse, ParseOptions, SyntaxKind, SyntaxNode, parse, parse_with_options};
use rstest::rstest;

/// Kinds of every node in pre-order.
fn node_kinds(root: &SyntaxNode) -> Vec<SyntaxKind> {
    root.descendants().map(|node| node.kind()).collect()
}

fn codes(parse: &Parse) -> Vec<DiagnosticCode> {
    parse.diagnostics().map(|d| d.code).collect()
}

/// Text of the first node of `kind`.
fn text_of(parse: &Parse, kind: SyntaxKind) -> String {
    parse
        .syntax()
        .descendants()
        .find(|node| node.kind() == kind)
        .map(|node| node.text().to_string())
        .unwrap_or_default()
}

// ============================================================================
// Tree shape
// ============================================================================

#[test]
fn test_empty_document() {
    let parse = parse("");
    let root = parse.syntax();
    assert_eq!(root.kind(), SyntaxKind::DOCUMENT);
    assert_eq!(node_kinds(&root), vec![SyntaxKind::DOCUMENT, SyntaxKind::MARKUP_BLOCK]);
    let eof = root.last_token().unwrap();
    assert_eq!(eof.kind(), SyntaxKind::END_OF_FILE);
    assert_eq!(eof.text(), "");
    assert!(parse.ok());
}

#[test]
fn test_document_ends_with_end_of_file() {
    let parse = parse("<p>hi</p>");
    let root = parse.syntax();
    let last = root.last_child_or_token().unwrap();
    assert_eq!(last.kind(), SyntaxKind::END_OF_FILE);
    assert_eq!(last.text_range(), TextRange::empty(9.into()));
}

#[test]
fn test_markup_with_implicit_expression() {
    let parse = parse("<p>Hi @name!</p>");
    assert_eq!(
        node_kinds(&parse.syntax()),
        vec![
            SyntaxKind::DOCUMENT,
            SyntaxKind::MARKUP_BLOCK,
            SyntaxKind::MARKUP_TAG,
            SyntaxKind::MARKUP_TEXT,
            SyntaxKind::CODE_EXPRESSION,
            SyntaxKind::MARKUP_TEXT,
            SyntaxKind::MARKUP_TAG,
        ]
    );
    assert_eq!(text_of(&parse, SyntaxKind::CODE_EXPRESSION), "@name");
    assert!(parse.ok());
}

#[rstest]
#[case("@model.Items[0].Name()", "@model.Items[0].Name()")]
#[case("@user?.Name.", "@user?.Name")]
#[case("@Format(a, (b)) tail", "@Format(a, (b))")]
#[case("@(1 + 2)x", "@(1 + 2)")]
#[case("@item.", "@item")]
fn test_expression_extent(#[case] source: &str, #[case] expression: &str) {
    let parse = parse(source);
    assert_eq!(text_of(&parse, SyntaxKind::CODE_EXPRESSION), expression);
    assert_eq!(parse.text(), source);
}

#[rstest]
#[case("@{ var x = 1; }", "@{ var x = 1; }")]
#[case("@if (a) { <b>x</b> } else if (b) { } else { y }", "@if (a) { <b>x</b> } else if (b) { } else { y }")]
#[case("@if (true)\n{\n}\n<p>", "@if (true)\n{\n}")]
#[case("@foreach (var i in items) { @i }", "@foreach (var i in items) { @i }")]
#[case("@do { n++; } while (n < 3); done", "@do { n++; } while (n < 3);")]
#[case("@try { a(); } catch (E e) { } finally { } x", "@try { a(); } catch (E e) { } finally { }")]
#[case("@using System.Linq\n<p>", "@using System.Linq")]
#[case("@using (var s = Open()) { }", "@using (var s = Open()) { }")]
fn test_code_block_extent(#[case] source: &str, #[case] block: &str) {
    let parse = parse(source);
    assert_eq!(text_of(&parse, SyntaxKind::CODE_BLOCK), block);
    assert_eq!(parse.text(), source);
    assert!(parse.ok(), "{:?}", codes(&parse));
}

#[test]
fn test_template_comment_node() {
    let parse = parse("a @* note *@ b");
    assert_eq!(
        node_kinds(&parse.syntax()),
        vec![
            SyntaxKind::DOCUMENT,
            SyntaxKind::MARKUP_BLOCK,
            SyntaxKind::MARKUP_TEXT,
            SyntaxKind::TEMPLATE_COMMENT,
            SyntaxKind::MARKUP_TEXT,
        ]
    );
    assert_eq!(text_of(&parse, SyntaxKind::TEMPLATE_COMMENT), "@* note *@");
}

#[rstest]
#[case("mail a@b.com")]
#[case("@@handle")]
#[case("x@@y")]
fn test_literal_at_signs_stay_markup(#[case] source: &str) {
    let parse = parse(source);
    let kinds = node_kinds(&parse.syntax());
    assert!(!kinds.contains(&SyntaxKind::CODE_EXPRESSION), "{kinds:?}");
    assert!(!kinds.contains(&SyntaxKind::CODE_BLOCK), "{kinds:?}");
    assert!(
        parse
            .syntax()
            .descendants_with_tokens()
            .all(|element| element.kind() != SyntaxKind::TRANSITION)
    );
    assert!(parse.ok());
}

#[test]
fn test_transition_inside_attribute() {
    let parse = parse("<a href=\"@url\">x</a>");
    let tag = parse
        .syntax()
        .descendants()
        .find(|node| node.kind() == SyntaxKind::MARKUP_TAG)
        .unwrap();
    assert_eq!(tag.text().to_string(), "<a href=\"@url\">");
    assert!(
        tag.children()
            .any(|child| child.kind() == SyntaxKind::CODE_EXPRESSION)
    );
}

// ============================================================================
// Markup inside code blocks
// ============================================================================

fn count(parse: &Parse, kind: SyntaxKind) -> usize {
    parse
        .syntax()
        .descendants()
        .filter(|node| node.kind() == kind)
        .count()
}

#[rstest]
#[case("@if (a)\n{\n    <p>Don't panic</p>\n}\nelse\n{\n    <p>Panic</p>\n}", 2)]
#[case("@foreach (var x in xs) { <span>{</span> }", 1)]
#[case("@foreach (var x in xs) { <b>}}</b> }", 1)]
#[case("@{ <p>it's \"quoted\"</p> var n = 1; <i>x</i> }", 2)]
#[case("@while (x) { <div><div>'</div></div> <br /> n--; }", 2)]
#[case("@{ </p> }", 1)]
fn test_markup_elements_inside_code_blocks(#[case] source: &str, #[case] elements: usize) {
    let parse = parse(source);
    assert!(parse.ok(), "{:?}", codes(&parse));
    assert!(codes(&parse).is_empty());
    assert_eq!(text_of(&parse, SyntaxKind::CODE_BLOCK), source);
    assert_eq!(count(&parse, SyntaxKind::MARKUP_BLOCK), 1 + elements);
    assert_eq!(parse.text(), source);
}

#[test]
fn test_transitions_inside_nested_markup() {
    let parse = parse("@foreach (var i in xs) { <li>@i.Name</li> }");
    assert!(parse.ok());
    assert_eq!(count(&parse, SyntaxKind::CODE_BLOCK), 1);
    assert_eq!(count(&parse, SyntaxKind::CODE_EXPRESSION), 1);
    assert_eq!(text_of(&parse, SyntaxKind::CODE_EXPRESSION), "@i.Name");
    let inner = parse
        .syntax()
        .descendants()
        .filter(|node| node.kind() == SyntaxKind::MARKUP_BLOCK)
        .nth(1)
        .unwrap();
    assert_eq!(inner.text().to_string(), "<li>@i.Name</li>");
}

#[rstest]
#[case("@{ var ok = a < b; }")]
#[case("@{ if (a <b) { } }")]
#[case("@{ List<int> xs = null; }")]
fn test_comparisons_and_generics_stay_code(#[case] source: &str) {
    let parse = parse(source);
    assert_eq!(count(&parse, SyntaxKind::MARKUP_BLOCK), 1);
    assert!(parse.ok(), "{:?}", codes(&parse));
}

#[test]
fn test_unclosed_element_inside_code_block() {
    let parse = parse("@if (a) { <p>x }");
    let diagnostics: Vec<_> = parse.diagnostics().collect();
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, DiagnosticCode::UnbalancedBracket);
    assert_eq!(diagnostics[0].span, TextRange::new(8.into(), 9.into()));
    assert_eq!(parse.text(), "@if (a) { <p>x }");
}

// ============================================================================
// Diagnostics
// ============================================================================

#[rstest]
#[case("@ x", DiagnosticCode::WhitespaceAfterTransition, 0, 1)]
#[case("@\n", DiagnosticCode::WhitespaceAfterTransition, 0, 1)]
#[case("x @", DiagnosticCode::EndOfInputAfterTransition, 2, 3)]
#[case("@}", DiagnosticCode::UnexpectedAfterTransition, 0, 1)]
#[case("@{ a", DiagnosticCode::UnbalancedBracket, 1, 2)]
#[case("@(a", DiagnosticCode::UnbalancedBracket, 1, 2)]
#[case("@if (a)", DiagnosticCode::ExpectedBlock, 1, 3)]
#[case("@if (a) { } else", DiagnosticCode::ExpectedBlock, 12, 16)]
#[case("<div", DiagnosticCode::UnterminatedTag, 0, 1)]
fn test_structural_diagnostics(
    #[case] source: &str,
    #[case] code: DiagnosticCode,
    #[case] start: u32,
    #[case] end: u32,
) {
    let parse = parse(source);
    let diagnostics: Vec<_> = parse.diagnostics().collect();
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, code);
    assert_eq!(diagnostics[0].span, TextRange::new(start.into(), end.into()));
    assert_eq!(parse.text(), source);
}

#[test]
fn test_unterminated_tag_is_a_warning() {
    let parse = parse("<a <b>");
    assert_eq!(codes(&parse), vec![DiagnosticCode::UnterminatedTag]);
    assert!(parse.ok());
}

#[test]
fn test_lexical_diagnostics_surface_in_document_order() {
    let parse = parse("@(\"abc");
    assert_eq!(
        codes(&parse),
        vec![
            DiagnosticCode::UnterminatedStringLiteral,
            DiagnosticCode::UnbalancedBracket,
        ]
    );
    assert!(!parse.ok());
}

#[test]
fn test_diagnostics_for_token() {
    let parse = parse("@(\"abc");
    let root = parse.syntax();
    let string = root
        .descendants_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == SyntaxKind::STRING_LITERAL)
        .unwrap();
    let attached: Vec<_> = parse.diagnostics_for(&string).collect();
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].code, DiagnosticCode::UnterminatedStringLiteral);
    assert_eq!(attached[0].span, TextRange::new(2.into(), 6.into()));
}

#[test]
fn test_diagnostic_spans_are_absolute_in_later_regions() {
    let parse = parse("<p>\n  @{ `x }\n</p>");
    let diagnostic = parse.diagnostics().next().unwrap();
    assert_eq!(diagnostic.code, DiagnosticCode::UnexpectedCharacter);
    assert_eq!(diagnostic.span, TextRange::new(9.into(), 10.into()));
    assert_eq!(
        parse.line_col(diagnostic.span.start()),
        LineCol { line: 1, col: 5 }
    );
}

#[test]
fn test_file_path_is_stamped() {
    let options = ParseOptions::default().with_file_path("views/index.tpl");
    let parse = parse_with_options("<p>@</p>", &options);
    let diagnostic = parse.diagnostics().next().unwrap();
    assert_eq!(diagnostic.code, DiagnosticCode::UnexpectedAfterTransition);
    assert_eq!(diagnostic.file_path.as_deref(), Some("views/index.tpl"));
}

#[test]
fn test_line_col() {
    let parse = parse("a\r\nbc\nd");
    assert_eq!(parse.line_col(0.into()), LineCol { line: 0, col: 0 });
    assert_eq!(parse.line_col(4.into()), LineCol { line: 1, col: 1 });
    assert_eq!(parse.line_col(6.into()), LineCol { line: 2, col: 0 });
}

// ============================================================================
// Losslessness
// ============================================================================

#[rstest]
#[case("")]
#[case("<div>\r\n  @Model.Title\r\n</div>")]
#[case("@{\n  var x = \"}\";\n}\n<p>@x</p>")]
#[case("@if (x) { @* c *@ } else { <i>@(y)</i> }")]
#[case("@@ @ @* @{ @( <a <b")]
#[case("tail @")]
fn test_parse_is_lossless(#[case] source: &str) {
    let parse = parse(source);
    assert_eq!(parse.text(), source);
    assert_eq!(parse.syntax().text_range().end(), (source.len() as u32).into());
}
