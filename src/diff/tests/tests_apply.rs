//! Tests for `apply_text_changes`

use crate::base::{TextRange, TextSize};
use crate::diff::{DiffError, TextChange, apply_text_changes};

fn span(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn test_spans_use_original_coordinates() {
    let changes = vec![
        TextChange::new(span(0, 1), "HELLO"),
        TextChange::new(span(2, 3), ""),
        TextChange::insert(TextSize::new(4), "!"),
    ];
    assert_eq!(apply_text_changes("abcd", &changes).unwrap(), "HELLObd!");
}

#[test]
fn test_no_changes_returns_input() {
    assert_eq!(apply_text_changes("keep", &[]).unwrap(), "keep");
}

#[test]
fn test_insertions_may_share_an_offset() {
    let changes = vec![
        TextChange::insert(TextSize::new(1), "x"),
        TextChange::insert(TextSize::new(1), "y"),
    ];
    assert_eq!(apply_text_changes("ab", &changes).unwrap(), "axyb");
}

#[test]
fn test_overlapping_changes_are_rejected() {
    let changes = vec![
        TextChange::new(span(0, 3), "x"),
        TextChange::new(span(2, 4), "y"),
    ];
    assert_eq!(
        apply_text_changes("abcd", &changes),
        Err(DiffError::OverlappingChanges { offset: 2 })
    );
}

#[test]
fn test_unsorted_changes_are_rejected() {
    let changes = vec![
        TextChange::delete(span(3, 4)),
        TextChange::delete(span(0, 1)),
    ];
    assert!(matches!(
        apply_text_changes("abcd", &changes),
        Err(DiffError::OverlappingChanges { offset: 0 })
    ));
}

#[test]
fn test_span_past_the_end() {
    let changes = vec![TextChange::delete(span(2, 9))];
    assert_eq!(
        apply_text_changes("abc", &changes),
        Err(DiffError::SpanOutOfBounds {
            span: span(2, 9),
            len: 3
        })
    );
}

#[test]
fn test_span_inside_a_character() {
    let changes = vec![TextChange::delete(span(1, 2))];
    assert_eq!(
        apply_text_changes("é", &changes),
        Err(DiffError::NotCharBoundary { span: span(1, 2) })
    );
}

#[test]
fn test_error_messages() {
    let error = DiffError::OverlappingChanges { offset: 7 };
    assert_eq!(
        error.to_string(),
        "change at 7 overlaps or precedes the previous change"
    );
}
