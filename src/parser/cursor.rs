//! Rewindable character stream over a document.
//!
//! Tokenizers pull characters from a [`SourceCursor`]. The cursor owns no text; it
//! borrows the full document and tracks a byte offset plus line/column.

use crate::base::SourceLocation;

use super::LanguageError;

/// A position-addressable cursor over a document's text.
///
/// Offsets are byte offsets into `text`. The optional origin places `text[0]` inside
/// a larger document, so every location the cursor reports is absolute.
#[derive(Debug, Clone)]
pub struct SourceCursor<'a> {
    text: &'a str,
    offset: usize,
    origin: SourceLocation,
    line: usize,
    column: usize,
}

impl<'a> SourceCursor<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_origin(text, SourceLocation::ZERO)
    }

    /// Cursor over `text`, where `text[0]` sits at `origin` in the enclosing document.
    pub fn with_origin(text: &'a str, origin: SourceLocation) -> Self {
        Self {
            text,
            offset: 0,
            origin,
            line: 0,
            column: 0,
        }
    }

    /// The whole text this cursor scans.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Byte offset into [`Self::text`].
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte offset into the enclosing document.
    pub fn absolute_offset(&self) -> usize {
        self.origin.absolute_index + self.offset
    }

    pub fn origin(&self) -> &SourceLocation {
        &self.origin
    }

    /// Everything not yet consumed.
    pub fn rest(&self) -> &'a str {
        &self.text[self.offset..]
    }

    pub fn is_eof(&self) -> bool {
        self.offset >= self.text.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Look `n` characters ahead without consuming; `peek_nth(0) == peek()`.
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Consume one character.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += c.len_utf8();
        match c {
            '\n' => self.break_line(),
            // A `\r` directly followed by `\n` breaks on the `\n`.
            '\r' if self.peek() != Some('\n') => self.break_line(),
            _ => self.column += 1,
        }
        Some(c)
    }

    /// Consume characters until `len` more bytes have been read, or the end of input.
    pub fn advance_by(&mut self, len: usize) {
        let target = (self.offset + len).min(self.text.len());
        while self.offset < target {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consume characters while `predicate` holds; returns the number of bytes read.
    pub fn advance_while(&mut self, mut predicate: impl FnMut(char) -> bool) -> usize {
        let start = self.offset;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.advance();
        }
        self.offset - start
    }

    /// Consume a line break (`\r\n`, `\n` or `\r`) if one starts here.
    pub fn eat_newline(&mut self) -> bool {
        match self.peek() {
            Some('\r') => {
                self.advance();
                if self.peek() == Some('\n') {
                    self.advance();
                }
                true
            }
            Some('\n') => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    /// Move to a byte offset of [`Self::text`], forward or backward.
    pub fn seek(&mut self, offset: usize) -> Result<(), LanguageError> {
        if offset > self.text.len() {
            return Err(LanguageError::SeekOutOfRange {
                offset,
                len: self.text.len(),
            });
        }
        if !self.text.is_char_boundary(offset) {
            return Err(LanguageError::SeekNotCharBoundary { offset });
        }
        if offset < self.offset {
            // Line/column are only tracked forward; rescan from the start.
            self.offset = 0;
            self.line = 0;
            self.column = 0;
        }
        self.advance_by(offset - self.offset);
        Ok(())
    }

    /// Absolute location of the next character.
    pub fn location(&self) -> SourceLocation {
        let character_index = if self.line == 0 {
            self.origin.character_index + self.column
        } else {
            self.column
        };
        SourceLocation {
            file_path: self.origin.file_path.clone(),
            absolute_index: self.absolute_offset(),
            line_index: self.origin.line_index + self.line,
            character_index,
        }
    }

    fn break_line(&mut self) {
        self.line += 1;
        self.column = 0;
    }
}
