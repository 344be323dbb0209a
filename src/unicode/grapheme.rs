//! Grapheme cluster iteration.

use crate::unicode::width::{WidthMethod, grapheme_width};
use unicode_segmentation::UnicodeSegmentation;

/// Grapheme metadata for layout.
///
/// Offsets are kept in both bytes (for slicing) and chars (the unit selection
/// offsets are expressed in).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphemeInfo {
    pub byte_offset: usize,
    pub byte_len: usize,
    pub char_offset: usize,
    pub char_len: usize,
    pub col_offset: usize,
    pub width: usize,
}

impl GraphemeInfo {
    /// Char offset one past the end of this grapheme.
    #[must_use]
    pub const fn char_end(&self) -> usize {
        self.char_offset + self.char_len
    }

    /// Byte range of this grapheme within its source string.
    #[must_use]
    pub const fn byte_range(&self) -> std::ops::Range<usize> {
        self.byte_offset..self.byte_offset + self.byte_len
    }
}

/// Iterate over extended grapheme clusters in a string.
pub fn graphemes(s: &str) -> impl Iterator<Item = &str> {
    s.graphemes(true)
}

/// Check whether a grapheme is a break opportunity for word wrapping.
#[must_use]
pub fn is_whitespace_grapheme(grapheme: &str) -> bool {
    !grapheme.is_empty() && grapheme.chars().all(char::is_whitespace)
}

/// Compute grapheme info for a string.
#[must_use]
pub fn grapheme_info(s: &str, method: WidthMethod) -> Vec<GraphemeInfo> {
    let mut infos = Vec::new();
    let mut col = 0;
    let mut char_offset = 0;

    for (byte_offset, grapheme) in s.grapheme_indices(true) {
        let width = grapheme_width(grapheme, method);
        let char_len = grapheme.chars().count();
        infos.push(GraphemeInfo {
            byte_offset,
            byte_len: grapheme.len(),
            char_offset,
            char_len,
            col_offset: col,
            width,
        });
        col += width;
        char_offset += char_len;
    }

    infos
}
