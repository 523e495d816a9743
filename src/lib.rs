//! # trellis-base
//!
//! Core library for template documents (markup with embedded code): lossless
//! tokenization, an immutable syntax tree, position lookup and minimal text diffs.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! diff      → Minimal edit scripts between text snapshots
//!   ↓
//! syntax    → find_token, descendant traversal
//!   ↓
//! parser    → Source cursor, per-language tokenizers, document parser
//!   ↓
//! base      → Primitives (TextRange, LineIndex, Diagnostic)
//! ```
//!
//! `diff` only depends on `base`.

// ============================================================================
// MODULES (dependency order: base → parser → syntax → diff)
// ============================================================================

/// Foundation types: positions, line index, diagnostics
pub mod base;

/// Parser: source cursor, language characteristics, tokenizers, document parser
pub mod parser;

/// Syntax: token lookup by offset and tree traversal
pub mod syntax;

/// Diff: minimal edit scripts at character or line granularity
pub mod diff;

// Re-export commonly needed items
pub use diff::{DiffOptions, Granularity, TextChange, apply_text_changes, diff};
pub use parser::{LanguageCharacteristics, Parse, SyntaxKind, Token, parse};
pub use syntax::find_token;

// Re-export foundation types
pub use base::{Diagnostic, LineCol, LineIndex, Position, SourceLocation, TextRange, TextSize};
