//! Diagnostics attached to tokens.
//!
//! Lexical and structural anomalies never abort tokenization or parsing.
//! They are recorded as data on the token where they were detected.

use std::fmt;
use std::sync::Arc;

use text_size::TextRange;

// ============================================================================
// DIAGNOSTIC TYPES
// ============================================================================

/// Severity level of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

/// Stable identifier of a diagnostic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    /// A character no lexical rule accepts.
    UnexpectedCharacter,
    /// `"…` without a closing quote before the end of the line.
    UnterminatedStringLiteral,
    /// `'…` without a closing quote before the end of the line.
    UnterminatedCharLiteral,
    /// `/* …` without `*/`.
    UnterminatedBlockComment,
    /// `@* …` without `*@`.
    UnterminatedTemplateComment,
    /// `0x`, `0b` or an exponent with no digits.
    MalformedNumericLiteral,
    /// A bracket whose partner never appears.
    UnbalancedBracket,
    /// `@` followed by whitespace.
    WhitespaceAfterTransition,
    /// `@` at the very end of the input.
    EndOfInputAfterTransition,
    /// `@` followed by something that cannot start code.
    UnexpectedAfterTransition,
    /// A control keyword without its `{ … }` body.
    ExpectedBlock,
    /// A markup tag without `>`.
    UnterminatedTag,
}

impl DiagnosticCode {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::UnexpectedCharacter => "TPL0001",
            DiagnosticCode::UnterminatedStringLiteral => "TPL0002",
            DiagnosticCode::UnterminatedCharLiteral => "TPL0003",
            DiagnosticCode::UnterminatedBlockComment => "TPL0004",
            DiagnosticCode::UnterminatedTemplateComment => "TPL0005",
            DiagnosticCode::MalformedNumericLiteral => "TPL0006",
            DiagnosticCode::UnbalancedBracket => "TPL1001",
            DiagnosticCode::WhitespaceAfterTransition => "TPL1002",
            DiagnosticCode::EndOfInputAfterTransition => "TPL1003",
            DiagnosticCode::UnexpectedAfterTransition => "TPL1004",
            DiagnosticCode::ExpectedBlock => "TPL1005",
            DiagnosticCode::UnterminatedTag => "TPL1006",
        }
    }

    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::UnterminatedTag => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A diagnostic message with location.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub severity: Severity,
    pub message: Arc<str>,
    /// Absolute byte range in the document.
    pub span: TextRange,
    /// Owning file, if the tokenizer knew it.
    pub file_path: Option<Arc<str>>,
}

impl Diagnostic {
    /// Create a diagnostic with the code's default severity.
    pub fn new(code: DiagnosticCode, span: TextRange, message: impl Into<Arc<str>>) -> Self {
        Self {
            code,
            severity: code.default_severity(),
            message: message.into(),
            span,
            file_path: None,
        }
    }

    pub fn with_file_path(mut self, file_path: Option<Arc<str>>) -> Self {
        self.file_path = file_path;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}..{}]: {}",
            self.code,
            u32::from(self.span.start()),
            u32::from(self.span.end()),
            self.message
        )
    }
}
