#![allow(clippy::unwrap_used)]
#![allow(clippy::panic)]

mod tests_parser;

use crate::parser::{LanguageCharacteristics, SyntaxKind, Token};

/// Tokenize `text` and collect every token.
fn scan<L: LanguageCharacteristics>(language: &L, text: &str) -> Vec<Token> {
    language.tokenize_string(text).collect()
}

/// Kind and text of every token, for compact assertions.
fn kinds_and_texts<L: LanguageCharacteristics>(language: &L, text: &str) -> Vec<(SyntaxKind, String)> {
    scan(language, text)
        .into_iter()
        .map(|token| (token.kind(), token.text().to_string()))
        .collect()
}

/// Concatenated token text.
fn rejoin(tokens: &[Token]) -> String {
    tokens.iter().map(Token::text).collect()
}
