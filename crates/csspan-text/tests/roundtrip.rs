//! Offset/position conversion properties for csspan-text

use csspan_text::{LineColumn, OffsetRange, SourceText};
use proptest::prelude::*;

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #[test]
    fn prop_offset_position_roundtrip(text in "[a-z{};: \n]{0,200}", seed in any::<usize>()) {
        let source = SourceText::new(text.clone());
        let offset = seed % (text.len() + 1);
        let position = source.position_of(offset).unwrap();
        prop_assert_eq!(source.offset_of(position.line, position.column, true).unwrap(), offset);
    }

    #[test]
    fn prop_non_strict_never_fails(text in "[a-z\n]{0,80}", line in 0u32..20, column in 0u32..120) {
        let source = SourceText::new(text);
        let offset = source.offset_of(line, column, false).unwrap();
        prop_assert!(offset <= source.len());
    }

    #[test]
    fn prop_slice_matches_offsets(text in "[a-z\n]{1,120}", a in any::<usize>(), b in any::<usize>()) {
        let source = SourceText::new(text.clone());
        let (start, end) = {
            let x = a % (text.len() + 1);
            let y = b % (text.len() + 1);
            (x.min(y), x.max(y))
        };
        let range = source.text_range(OffsetRange::new(start, end)).unwrap();
        prop_assert_eq!(source.slice_range(range).unwrap(), &text[start..end]);
    }
}

// ============================================================================
// LINE TABLE
// ============================================================================

#[test]
fn test_lines_iterator_matches_split() {
    let text = "@media print {\n  .a { color: red; }\n}\n";
    let source = SourceText::new(text);
    let lines: Vec<&str> = source.lines().collect();
    assert_eq!(lines, text.split('\n').collect::<Vec<_>>());
}

#[test]
fn test_end_position_after_trailing_newline() {
    let source = SourceText::new(".a {}\n");
    assert_eq!(source.end_position(), LineColumn::new(1, 0));
    assert_eq!(source.offset_at(source.end_position()), Ok(source.len()));
}
