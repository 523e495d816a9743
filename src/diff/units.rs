//! Comparison units.
//!
//! The differ runs over `u32` ids. Characters use their scalar value; lines are
//! interned so that equal lines in either text share one id. Byte bounds are kept
//! so edits on units map back to string spans.

use std::ops::Range;

use rustc_hash::FxHashMap;

use super::Granularity;

/// A text cut into units, with the byte offset where each unit starts.
#[derive(Debug)]
pub(crate) struct Units<'a> {
    text: &'a str,
    ids: Vec<u32>,
    /// `starts[i]` is the byte offset of unit `i`; one extra entry holds `text.len()`.
    starts: Vec<usize>,
}

impl<'a> Units<'a> {
    pub(crate) fn ids(&self) -> &[u32] {
        &self.ids
    }

    pub(crate) fn len(&self) -> usize {
        self.ids.len()
    }

    /// Byte offset of unit `index`; `index == len()` gives the end of the text.
    pub(crate) fn offset(&self, index: usize) -> usize {
        self.starts[index]
    }

    /// Text covered by a range of units.
    pub(crate) fn slice(&self, range: Range<usize>) -> &'a str {
        &self.text[self.starts[range.start]..self.starts[range.end]]
    }
}

/// Cut both texts at the same granularity, sharing one line table.
pub(crate) fn split_pair<'a>(
    old: &'a str,
    new: &'a str,
    granularity: Granularity,
) -> (Units<'a>, Units<'a>) {
    match granularity {
        Granularity::Character => (chars(old), chars(new)),
        Granularity::Line => {
            let mut table = FxHashMap::default();
            let old = lines(old, &mut table);
            let new = lines(new, &mut table);
            (old, new)
        }
    }
}

fn chars(text: &str) -> Units<'_> {
    let mut ids = Vec::with_capacity(text.len());
    let mut starts = Vec::with_capacity(text.len() + 1);
    for (offset, c) in text.char_indices() {
        ids.push(c as u32);
        starts.push(offset);
    }
    starts.push(text.len());
    Units { text, ids, starts }
}

fn lines<'a>(text: &'a str, table: &mut FxHashMap<&'a str, u32>) -> Units<'a> {
    let mut ids = Vec::new();
    let mut starts = Vec::new();
    for (start, end) in line_bounds(text) {
        let next_id = table.len() as u32;
        ids.push(*table.entry(&text[start..end]).or_insert(next_id));
        starts.push(start);
    }
    starts.push(text.len());
    Units { text, ids, starts }
}

/// Byte bounds of each line, terminator included. `\r\n`, `\n` and a lone `\r`
/// each end a line; a trailing line without terminator is kept.
fn line_bounds(text: &str) -> Vec<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut bounds = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let end = match bytes[i] {
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => Some(i + 2),
            b'\r' | b'\n' => Some(i + 1),
            _ => None,
        };
        match end {
            Some(end) => {
                bounds.push((start, end));
                start = end;
                i = end;
            }
            None => i += 1,
        }
    }
    if start < bytes.len() {
        bounds.push((start, bytes.len()));
    }
    bounds
}
