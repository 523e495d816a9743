//! Minimal edit scripts between two text snapshots
//!
//! [`diff`] returns the smallest set of non-overlapping [`TextChange`]s turning an
//! old text into a new one, at character or line granularity. Spans are byte
//! ranges of the old text; applying the changes with [`apply_text_changes`]
//! reproduces the new text exactly.
//!
//! The algorithm is written once over interned unit ids (see `units`) and solved
//! with Myers' difference algorithm (see `myers`).

mod apply;
mod myers;
mod units;

#[cfg(test)]
mod tests;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::base::{TextRange, TextSize};
use myers::Edit;
use units::Units;

pub use apply::{DiffError, apply_text_changes};

/// Unit of comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// Unicode scalar values.
    #[default]
    Character,
    /// Whole lines, terminator included.
    Line,
}

/// Replace `span` of the old text with `new_text`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextChange {
    pub span: TextRange,
    pub new_text: String,
}

impl TextChange {
    pub fn new(span: TextRange, new_text: impl Into<String>) -> Self {
        Self {
            span,
            new_text: new_text.into(),
        }
    }

    pub fn insert(offset: TextSize, text: impl Into<String>) -> Self {
        Self::new(TextRange::empty(offset), text)
    }

    pub fn delete(span: TextRange) -> Self {
        Self::new(span, String::new())
    }
}

/// Options for [`minimal_text_changes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffOptions {
    pub granularity: Granularity,
    /// Most frontier cells the search may record before it splits the problem in
    /// half and solves each half separately.
    pub trace_budget: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            granularity: Granularity::Character,
            trace_budget: 1 << 22,
        }
    }
}

impl DiffOptions {
    pub fn with_granularity(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }
}

/// Minimal edit script from `old` to `new`.
pub fn diff(old: &str, new: &str, granularity: Granularity) -> Vec<TextChange> {
    minimal_text_changes(
        old,
        new,
        &DiffOptions::with_granularity(granularity),
        &CancellationToken::new(),
    )
    .unwrap_or_default()
}

/// Minimal edit script with cancellation support.
/// Returns `None` if the cancellation token is signalled.
pub fn minimal_text_changes(
    old: &str,
    new: &str,
    options: &DiffOptions,
    cancel: &CancellationToken,
) -> Option<Vec<TextChange>> {
    let (old_units, new_units) = units::split_pair(old, new, options.granularity);
    let edits = myers::diff_units(
        old_units.ids(),
        new_units.ids(),
        options.trace_budget,
        cancel,
    )?;
    let changes = to_text_changes(&edits, &old_units, &new_units);
    debug!(
        granularity = ?options.granularity,
        old_units = old_units.len(),
        new_units = new_units.len(),
        changes = changes.len(),
        "computed minimal text changes"
    );
    Some(changes)
}

/// One change per maximal run of non-matching units.
fn to_text_changes(edits: &[Edit], old: &Units<'_>, new: &Units<'_>) -> Vec<TextChange> {
    let mut changes = Vec::new();
    let (mut old_index, mut new_index) = (0, 0);
    let mut pending: Option<(usize, usize)> = None;

    for edit in edits {
        match *edit {
            Edit::Equal(len) => {
                if let Some((old_start, new_start)) = pending.take() {
                    changes.push(change(old, new, old_start..old_index, new_start..new_index));
                }
                old_index += len;
                new_index += len;
            }
            Edit::Delete(len) => {
                pending.get_or_insert((old_index, new_index));
                old_index += len;
            }
            Edit::Insert(len) => {
                pending.get_or_insert((old_index, new_index));
                new_index += len;
            }
        }
    }
    if let Some((old_start, new_start)) = pending {
        changes.push(change(old, new, old_start..old_index, new_start..new_index));
    }
    changes
}

fn change(
    old: &Units<'_>,
    new: &Units<'_>,
    old_range: std::ops::Range<usize>,
    new_range: std::ops::Range<usize>,
) -> TextChange {
    let span = TextRange::new(
        TextSize::new(old.offset(old_range.start) as u32),
        TextSize::new(old.offset(old_range.end) as u32),
    );
    TextChange::new(span, new.slice(new_range))
}
