//! Three-way range comparator

use std::cmp::Ordering;

use csspan_text::OffsetRange;

/// Compare a stored range against a target offset.
///
/// Returns `Greater` when the range lies after the offset, `Less` when it
/// lies before, `Equal` when it covers it. Ranges are start-inclusive and
/// end-exclusive, so the last character (`end - 1`) still matches.
/// Shaped for `slice::binary_search_by`.
#[inline]
pub fn locate(range: &OffsetRange, offset: usize) -> Ordering {
    if offset < range.start {
        Ordering::Greater
    } else if offset >= range.end {
        Ordering::Less
    } else {
        Ordering::Equal
    }
}
