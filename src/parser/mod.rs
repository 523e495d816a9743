//! Lossless tokenization and tree construction for template documents
//!
//! A template document is markup with embedded code. Each sub-language has its own
//! tokenizer, created through a stateless [`LanguageCharacteristics`] instance:
//! - **logos** generates the lexeme tables
//! - **rowan** stores the immutable tree (green nodes keep widths only)
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! SourceCursor → Tokenizer (per language) → Token { kind, text, diagnostics }
//!     ↓
//! Document parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → absolute spans derived from the root
//! ```
//!
//! Concatenating every token's text reproduces the input exactly. Malformed input
//! never fails: it becomes `UNKNOWN` tokens and per-token diagnostics.

#[allow(clippy::module_inception)]
mod parser;

mod code;
mod cursor;
mod error;
mod language;
mod markup;
mod syntax_kind;
mod token;
mod tokenizer;

#[cfg(test)]
mod tests;

pub use code::{CodeLanguage, CodeTokenizer};
pub use cursor::SourceCursor;
pub use error::LanguageError;
pub use language::{KnownTokenType, LanguageCharacteristics};
pub use markup::{MarkupLanguage, MarkupTokenizer};
pub use parser::{Parse, ParseOptions, parse, parse_with_options};
pub use syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken, TemplateLanguage};
pub use token::Token;
pub use tokenizer::{TokenStream, Tokenizer};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, TextRange, TextSize};
