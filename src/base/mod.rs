//! Foundation types for the trellis toolchain.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineCol`], [`LineIndex`] - Line/column conversion
//! - [`Position`], [`SourceLocation`] - Line/column positions and scan origins
//! - [`Diagnostic`], [`DiagnosticCode`], [`Severity`] - Per-token error records
//!
//! This module has NO dependencies on other trellis modules.

mod diagnostic;
mod line_index;
mod position;
pub mod text_utils;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use line_index::{LineCol, LineIndex};
pub use position::{Position, SourceLocation};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
