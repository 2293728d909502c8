//! Source text index

use crate::{LineColumn, OffsetRange, TextError, TextRange};

/// Immutable source text with a line table.
///
/// Lines are split on `\n` only; a `\r` before the newline stays part of
/// its line. The line table always holds at least one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    text: String,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl SourceText {
    /// Index `text`
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        line_starts.push(0);
        line_starts.extend(text.match_indices('\n').map(|(idx, _)| idx + 1));

        Self { text, line_starts }
    }

    /// Raw text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines (never zero)
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line content without its trailing newline
    pub fn line(&self, line: usize) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        Some(&self.text[start..start + self.line_len(line)])
    }

    /// Iterate over all lines
    pub fn lines(&self) -> impl Iterator<Item = &str> + '_ {
        (0..self.line_count()).filter_map(move |line| self.line(line))
    }

    fn line_len(&self, line: usize) -> usize {
        let start = self.line_starts[line];
        let end = match self.line_starts.get(line + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        end - start
    }

    /// Convert a 0-based line/column into a byte offset.
    ///
    /// With `strict` set, positions past the end of a line or of the
    /// document fail. Otherwise they are clamped to the nearest valid
    /// position, which never fails.
    pub fn offset_of(&self, line: u32, column: u32, strict: bool) -> Result<usize, TextError> {
        let mut line_idx = line as usize;
        if line_idx >= self.line_count() {
            if strict {
                return Err(TextError::LineOutOfRange {
                    line,
                    line_count: self.line_count(),
                });
            }
            line_idx = self.line_count() - 1;
        }

        let start = self.line_starts[line_idx];
        let line_len = self.line_len(line_idx);
        let mut column_idx = column as usize;
        if column_idx > line_len {
            if strict {
                return Err(TextError::ColumnOutOfRange { line, column, line_len });
            }
            column_idx = line_len;
        }

        let mut offset = start + column_idx;
        if !self.text.is_char_boundary(offset) {
            if strict {
                return Err(TextError::ColumnOutOfRange { line, column, line_len });
            }
            while !self.text.is_char_boundary(offset) {
                offset -= 1;
            }
        }

        Ok(offset)
    }

    /// Convert a position into a byte offset (strict)
    pub fn offset_at(&self, position: LineColumn) -> Result<usize, TextError> {
        self.offset_of(position.line, position.column, true)
    }

    /// Convert a byte offset into a 0-based line/column.
    ///
    /// The offset equal to the text length maps to the end of the last line.
    pub fn position_of(&self, offset: usize) -> Result<LineColumn, TextError> {
        if offset > self.text.len() {
            return Err(TextError::OffsetOutOfRange { offset, len: self.text.len() });
        }

        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Ok(LineColumn {
            line: line as u32,
            column: (offset - self.line_starts[line]) as u32,
        })
    }

    /// Position just past the last character
    pub fn end_position(&self) -> LineColumn {
        let line = self.line_count() - 1;
        LineColumn {
            line: line as u32,
            column: self.line_len(line) as u32,
        }
    }

    /// Extract the text between two line/column positions
    pub fn slice(
        &self,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Result<&str, TextError> {
        let start = self.offset_of(start_line, start_column, true)?;
        let end = self.offset_of(end_line, end_column, true)?;
        self.slice_offsets(OffsetRange::new(start, end))
    }

    /// Extract the text covered by a line/column range
    pub fn slice_range(&self, range: TextRange) -> Result<&str, TextError> {
        self.slice(range.start.line, range.start.column, range.end.line, range.end.column)
    }

    /// Extract the text covered by an offset range
    pub fn slice_offsets(&self, range: OffsetRange) -> Result<&str, TextError> {
        if range.end < range.start {
            return Err(TextError::ReversedRange { start: range.start, end: range.end });
        }
        if range.end > self.text.len() {
            return Err(TextError::OffsetOutOfRange { offset: range.end, len: self.text.len() });
        }
        self.text.get(range.start..range.end).ok_or(TextError::OffsetOutOfRange {
            offset: range.start,
            len: self.text.len(),
        })
    }

    /// Convert a line/column range to offsets (strict)
    pub fn offset_range(&self, range: TextRange) -> Result<OffsetRange, TextError> {
        let start = self.offset_at(range.start)?;
        let end = self.offset_at(range.end)?;
        if end < start {
            return Err(TextError::ReversedRange { start, end });
        }
        Ok(OffsetRange::new(start, end))
    }

    /// Convert an offset range to line/column positions
    pub fn text_range(&self, range: OffsetRange) -> Result<TextRange, TextError> {
        Ok(TextRange::new(self.position_of(range.start)?, self.position_of(range.end)?))
    }

    /// Convert a column counted in UTF-16 code units into a byte column.
    ///
    /// Columns past the end of the line clamp to the line length.
    pub fn utf16_to_byte_column(&self, line: u32, utf16_column: u32) -> Result<u32, TextError> {
        let content = self.line(line as usize).ok_or(TextError::LineOutOfRange {
            line,
            line_count: self.line_count(),
        })?;

        let mut units = 0u32;
        for (idx, ch) in content.char_indices() {
            if units >= utf16_column {
                return Ok(idx as u32);
            }
            units += ch.len_utf16() as u32;
        }
        Ok(content.len() as u32)
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_one_line() {
        let source = SourceText::new("");
        assert_eq!(source.line_count(), 1);
        assert_eq!(source.line(0), Some(""));
        assert_eq!(source.offset_of(0, 0, true), Ok(0));
        assert_eq!(source.end_position(), LineColumn::ZERO);
    }

    #[test]
    fn test_offset_of_multiline() {
        let source = SourceText::new("a {\n  color: red;\n}");
        assert_eq!(source.offset_of(0, 0, true), Ok(0));
        assert_eq!(source.offset_of(1, 2, true), Ok(6));
        assert_eq!(source.offset_of(2, 0, true), Ok(18));
        // End of line is a valid column
        assert_eq!(source.offset_of(0, 3, true), Ok(3));
    }

    #[test]
    fn test_strict_out_of_range() {
        let source = SourceText::new("ab\ncd");
        assert!(matches!(
            source.offset_of(2, 0, true),
            Err(TextError::LineOutOfRange { line: 2, .. })
        ));
        assert!(matches!(
            source.offset_of(0, 3, true),
            Err(TextError::ColumnOutOfRange { line: 0, column: 3, line_len: 2 })
        ));
    }

    #[test]
    fn test_non_strict_clamps() {
        let source = SourceText::new("ab\ncd");
        // One past end of line (editor cursor) clamps to the line end
        assert_eq!(source.offset_of(0, 3, false), Ok(2));
        assert_eq!(source.offset_of(9, 9, false), Ok(5));
    }

    #[test]
    fn test_position_of() {
        let source = SourceText::new("ab\ncd\n");
        assert_eq!(source.position_of(0), Ok(LineColumn::new(0, 0)));
        assert_eq!(source.position_of(2), Ok(LineColumn::new(0, 2)));
        assert_eq!(source.position_of(3), Ok(LineColumn::new(1, 0)));
        assert_eq!(source.position_of(6), Ok(LineColumn::new(2, 0)));
        assert!(source.position_of(7).is_err());
    }

    #[test]
    fn test_slice_single_and_multi_line() {
        let source = SourceText::new(".a {\n  color: red;\n}\n.b {}");
        assert_eq!(source.slice(1, 2, 1, 7), Ok("color"));
        assert_eq!(source.slice(0, 3, 2, 1), Ok("{\n  color: red;\n}"));
        assert!(matches!(source.slice(1, 2, 0, 0), Err(TextError::ReversedRange { .. })));
    }

    #[test]
    fn test_multibyte_columns() {
        let source = SourceText::new(".é { content: \"😀x\"; }");
        // 'é' is two bytes
        assert!(source.offset_of(0, 2, true).is_err());
        assert_eq!(source.offset_of(0, 2, false), Ok(1));
        // The emoji is two UTF-16 units and four bytes
        let utf16_x = ".é { content: \"".encode_utf16().count() as u32 + 2;
        let byte_x = source.utf16_to_byte_column(0, utf16_x).unwrap();
        assert_eq!(&source.text()[byte_x as usize..byte_x as usize + 1], "x");
    }

    #[test]
    fn test_crlf_keeps_carriage_return() {
        let source = SourceText::new("a\r\nb");
        assert_eq!(source.line(0), Some("a\r"));
        assert_eq!(source.offset_of(1, 0, true), Ok(3));
    }
}
