//! Tests for `diff` and `minimal_text_changes`

use crate::base::{TextRange, TextSize};
use crate::diff::{
    DiffOptions, Granularity, TextChange, apply_text_changes, diff, minimal_text_changes,
};
use proptest::prelude::*;
use rstest::rstest;
use tokio_util::sync::CancellationToken;

fn change(start: u32, end: u32, text: &str) -> TextChange {
    TextChange::new(TextRange::new(start.into(), end.into()), text)
}

fn assert_round_trip(old: &str, new: &str, granularity: Granularity) -> Vec<TextChange> {
    let changes = diff(old, new, granularity);
    assert_eq!(apply_text_changes(old, &changes).unwrap(), new);
    changes
}

/// Units touched by an edit script at character granularity.
fn edited_chars(old: &str, changes: &[TextChange]) -> usize {
    changes
        .iter()
        .map(|change| {
            let span = &old[change.span];
            span.chars().count() + change.new_text.chars().count()
        })
        .sum()
}

/// Length of a longest common subsequence, by dynamic programming.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut row = vec![0usize; b.len() + 1];
    for &x in a {
        let mut diagonal = 0;
        for (j, &y) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if x == y {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

// ============================================================================
// Worked examples
// ============================================================================

#[test]
fn test_character_diff_worked_example() {
    let old = "<div>\r\n  Hello!\r\n</div>";
    let new = "<div>\r\n  Hola!\r\n</div>";
    let changes = assert_round_trip(old, new, Granularity::Character);
    assert_eq!(changes, vec![change(10, 11, "o"), change(12, 14, "a")]);
}

#[test]
fn test_line_diff_worked_example() {
    let old = "<div>\r\n  Hello!\r\n</div>";
    let new = "<div>\r\n  Hola!\r\n</div>";
    let changes = assert_round_trip(old, new, Granularity::Line);
    assert_eq!(changes, vec![change(7, 17, "  Hola!\r\n")]);
}

#[test]
fn test_line_diff_with_bare_newlines() {
    let old = "a\nb\nc\n";
    let new = "a\nB\nc\nd";
    let changes = assert_round_trip(old, new, Granularity::Line);
    assert_eq!(changes, vec![change(2, 4, "B\n"), change(6, 6, "d")]);
}

// ============================================================================
// Edge cases
// ============================================================================

#[rstest]
#[case("")]
#[case("same")]
#[case("multi\nline\r\ntext")]
fn test_identical_inputs_have_no_changes(#[case] text: &str) {
    assert!(diff(text, text, Granularity::Character).is_empty());
    assert!(diff(text, text, Granularity::Line).is_empty());
}

#[test]
fn test_insert_into_empty() {
    let changes = assert_round_trip("", "new", Granularity::Character);
    assert_eq!(changes, vec![change(0, 0, "new")]);
}

#[test]
fn test_delete_everything() {
    let changes = assert_round_trip("old", "", Granularity::Character);
    assert_eq!(changes, vec![change(0, 3, "")]);
}

#[test]
fn test_disjoint_inputs_are_one_change() {
    let changes = assert_round_trip("abc", "xyz", Granularity::Character);
    assert_eq!(changes, vec![change(0, 3, "xyz")]);
}

#[test]
fn test_pure_insertion_in_the_middle() {
    let changes = assert_round_trip("ac", "abc", Granularity::Character);
    assert_eq!(changes, vec![TextChange::insert(TextSize::new(1), "b")]);
}

#[test]
fn test_pure_deletion_in_the_middle() {
    let changes = assert_round_trip("abc", "ac", Granularity::Character);
    assert_eq!(changes, vec![TextChange::delete(TextRange::new(1.into(), 2.into()))]);
}

#[test]
fn test_spans_are_byte_offsets() {
    let changes = assert_round_trip("naïve café", "naive cafe", Granularity::Character);
    assert_eq!(changes, vec![change(2, 4, "i"), change(10, 12, "e")]);
}

#[test]
fn test_adjacent_matches_are_not_split() {
    let changes = assert_round_trip("one two three", "one 2 three", Granularity::Character);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].new_text, "2");
}

#[test]
fn test_changes_are_sorted_and_disjoint() {
    let old = "The quick brown fox jumps over the lazy dog";
    let new = "A quick red fox leaped over a lazy cat";
    let changes = assert_round_trip(old, new, Granularity::Character);
    for pair in changes.windows(2) {
        assert!(pair[0].span.end() < pair[1].span.start(), "{pair:?}");
    }
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_default_options() {
    let options = DiffOptions::default();
    assert_eq!(options.granularity, Granularity::Character);
    assert!(options.trace_budget > 0);
    assert_eq!(
        DiffOptions::with_granularity(Granularity::Line).granularity,
        Granularity::Line
    );
}

#[test]
fn test_cancelled_diff_returns_none() {
    let cancel = CancellationToken::new();
    cancel.cancel();
    let result = minimal_text_changes("abc", "abd", &DiffOptions::default(), &cancel);
    assert!(result.is_none());
}

#[test]
fn test_small_budget_gives_same_size_script() {
    let old = "kitten sitting on the mat";
    let new = "sitting kitten at the mats";
    let options = DiffOptions {
        trace_budget: 4,
        ..DiffOptions::default()
    };
    let split = minimal_text_changes(old, new, &options, &CancellationToken::new()).unwrap();
    let full = diff(old, new, Granularity::Character);
    assert_eq!(apply_text_changes(old, &split).unwrap(), new);
    assert_eq!(edited_chars(old, &split), edited_chars(old, &full));
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_character_diff_round_trips(old in "[abc\u{e9}\n]{0,24}", new in "[abc\u{e9}\n]{0,24}") {
        let changes = diff(&old, &new, Granularity::Character);
        prop_assert_eq!(apply_text_changes(&old, &changes).unwrap(), new);
    }

    #[test]
    fn prop_line_diff_round_trips(old in "([ab]{0,2}(\n|\r\n|\r)?){0,8}", new in "([ab]{0,2}(\n|\r\n|\r)?){0,8}") {
        let changes = diff(&old, &new, Granularity::Line);
        prop_assert_eq!(apply_text_changes(&old, &changes).unwrap(), new);
    }

    #[test]
    fn prop_character_diff_is_minimal(old in "[ab]{0,16}", new in "[ab]{0,16}") {
        let changes = diff(&old, &new, Granularity::Character);
        let a: Vec<char> = old.chars().collect();
        let b: Vec<char> = new.chars().collect();
        let optimal = a.len() + b.len() - 2 * lcs_len(&a, &b);
        prop_assert_eq!(edited_chars(&old, &changes), optimal);
    }

    #[test]
    fn prop_split_search_is_minimal(old in "[abc]{0,20}", new in "[abc]{0,20}") {
        let options = DiffOptions { trace_budget: 8, ..DiffOptions::default() };
        let changes = minimal_text_changes(&old, &new, &options, &CancellationToken::new()).unwrap();
        prop_assert_eq!(apply_text_changes(&old, &changes).unwrap(), new.clone());
        let a: Vec<char> = old.chars().collect();
        let b: Vec<char> = new.chars().collect();
        prop_assert_eq!(edited_chars(&old, &changes), a.len() + b.len() - 2 * lcs_len(&a, &b));
    }
}
