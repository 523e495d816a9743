//! Offset ↔ line/column conversion.

use rustc_hash::FxHashMap;
use text_size::TextSize;

/// A 0-indexed line/column pair, column counted in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// A character longer than one byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct WideChar {
    start: TextSize,
    len: TextSize,
}

/// Start offsets of every line in a text.
///
/// `\r\n`, `\n` and a lone `\r` each end a line. Lines holding non-ASCII
/// characters remember where those characters sit so columns can be counted in
/// characters without keeping the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    wide_chars: FxHashMap<u32, Vec<WideChar>>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        let mut wide_chars: FxHashMap<u32, Vec<WideChar>> = FxHashMap::default();
        let mut chars = text.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                '\n' => line_starts.push(TextSize::new((i + 1) as u32)),
                '\r' if chars.peek().map(|&(_, next)| next) != Some('\n') => {
                    line_starts.push(TextSize::new((i + 1) as u32));
                }
                _ if !c.is_ascii() => {
                    let line = (line_starts.len() - 1) as u32;
                    wide_chars.entry(line).or_default().push(WideChar {
                        start: TextSize::new(i as u32),
                        len: TextSize::of(c),
                    });
                }
                _ => {}
            }
        }

        Self {
            line_starts,
            wide_chars,
            len: TextSize::of(text),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Convert a byte offset into a line/column pair. Offsets past the end clamp;
    /// offsets inside a character count as that character's start.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let mut col = u32::from(offset - self.line_starts[line]);
        let wide = self.wide_chars.get(&(line as u32)).map_or(&[][..], Vec::as_slice);
        for ch in wide.iter().take_while(|ch| ch.start < offset) {
            let end = ch.start + ch.len;
            col -= if end <= offset {
                u32::from(ch.len) - 1
            } else {
                u32::from(offset - ch.start)
            };
        }
        LineCol {
            line: line as u32,
            col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_mixed_line_endings() {
        let index = LineIndex::new("ab\r\ncd\ne\rf");
        assert_eq!(index.line_count(), 4);
        assert_eq!(index.line_col(TextSize::new(0)), LineCol { line: 0, col: 0 });
        assert_eq!(index.line_col(TextSize::new(4)), LineCol { line: 1, col: 0 });
        assert_eq!(index.line_col(TextSize::new(5)), LineCol { line: 1, col: 1 });
        assert_eq!(index.line_col(TextSize::new(9)), LineCol { line: 3, col: 0 });
    }

    #[test]
    fn test_line_col_counts_characters() {
        let index = LineIndex::new("héllo");
        assert_eq!(index.line_col(TextSize::new(3)), LineCol { line: 0, col: 2 });
        assert_eq!(index.line_col(TextSize::new(99)), LineCol { line: 0, col: 5 });
    }

    #[test]
    fn test_line_col_inside_a_character_floors() {
        let index = LineIndex::new("x\n€é!");
        assert_eq!(index.line_col(TextSize::new(3)), LineCol { line: 1, col: 0 });
        assert_eq!(index.line_col(TextSize::new(5)), LineCol { line: 1, col: 1 });
        assert_eq!(index.line_col(TextSize::new(6)), LineCol { line: 1, col: 1 });
        assert_eq!(index.line_col(TextSize::new(7)), LineCol { line: 1, col: 2 });
    }

    #[test]
    fn test_wide_characters_stay_on_their_line() {
        let index = LineIndex::new("ü\nab");
        assert_eq!(index.line_col(TextSize::new(4)), LineCol { line: 1, col: 1 });
    }
}
