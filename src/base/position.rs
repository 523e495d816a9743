//! Position tracking for tokens and diagnostics
//!
//! A [`Position`] is a 0-indexed line/column pair for LSP-facing consumers.
//! A [`SourceLocation`] additionally carries the absolute byte index and the
//! file it belongs to, so sub-regions of a document can be scanned in place.

use std::sync::Arc;

/// A position in source code (0-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// Where a piece of text sits inside a document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    /// Owning file, if known.
    pub file_path: Option<Arc<str>>,
    /// Byte offset from the start of the document.
    pub absolute_index: usize,
    /// 0-indexed line.
    pub line_index: usize,
    /// 0-indexed column, in characters.
    pub character_index: usize,
}

impl SourceLocation {
    /// The start of an anonymous document.
    pub const ZERO: Self = Self {
        file_path: None,
        absolute_index: 0,
        line_index: 0,
        character_index: 0,
    };

    pub fn new(absolute_index: usize, line_index: usize, character_index: usize) -> Self {
        Self {
            file_path: None,
            absolute_index,
            line_index,
            character_index,
        }
    }

    pub fn with_file_path(mut self, file_path: impl Into<Arc<str>>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    /// Line/column part of this location.
    pub fn position(&self) -> Position {
        Position::new(self.line_index, self.character_index)
    }
}
