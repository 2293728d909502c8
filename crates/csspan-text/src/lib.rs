//! csspan Source Text
//!
//! Immutable text index shared by every tree in csspan.
//! Converts between byte offsets and 0-based line/column positions
//! and slices the source by line/column ranges.

mod position;
mod source;

pub use position::{LineColumn, OffsetRange, TextRange};
pub use source::SourceText;

/// Text index error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextError {
    #[error("Line {line} out of range (document has {line_count} lines)")]
    LineOutOfRange { line: u32, line_count: usize },

    #[error("Column {column} out of range on line {line} (length {line_len})")]
    ColumnOutOfRange { line: u32, column: u32, line_len: usize },

    #[error("Offset {offset} out of range (document length {len})")]
    OffsetOutOfRange { offset: usize, len: usize },

    #[error("Reversed range: end {end} before start {start}")]
    ReversedRange { start: usize, end: usize },
}
