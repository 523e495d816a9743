//! Immutable full-fidelity tokens.

use smol_str::SmolStr;
use text_size::TextSize;

use super::SyntaxKind;
use crate::base::Diagnostic;

/// A token with its kind, exact source text, and diagnostics.
///
/// There is no separate trivia channel: whitespace and newlines are ordinary
/// tokens. Tokens are never mutated; the `with_*` builders return new values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: SyntaxKind,
    text: SmolStr,
    diagnostics: Vec<Diagnostic>,
}

impl Token {
    pub fn new(kind: SyntaxKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(
        kind: SyntaxKind,
        text: impl Into<SmolStr>,
        diagnostics: Vec<Diagnostic>,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            diagnostics,
        }
    }

    /// Zero-width token of the given kind.
    pub fn empty(kind: SyntaxKind) -> Self {
        Self::new(kind, SmolStr::default())
    }

    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn width(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// A copy of this token carrying one more diagnostic.
    pub fn with_diagnostic(&self, diagnostic: Diagnostic) -> Self {
        let mut diagnostics = self.diagnostics.clone();
        diagnostics.push(diagnostic);
        Self {
            kind: self.kind,
            text: self.text.clone(),
            diagnostics,
        }
    }
}
