//! Frame cell type representing a single column position.
//!
//! A rendered frame is a grid of cells, each holding one grapheme cluster
//! along with resolved colors and attributes.
//!
//! Wide characters (CJK, emoji) occupy two columns: the cell after a wide
//! grapheme holds [`CellContent::Continuation`].
//!
//! # Examples
//!
//! ```
//! use textpane::{Cell, Rgba, TextAttributes};
//!
//! let cell = Cell::from_grapheme("A", Rgba::GREEN, Rgba::BLACK, TextAttributes::BOLD);
//! assert_eq!(cell.display_width(), 1);
//!
//! let emoji = Cell::from_grapheme("👍", Rgba::WHITE, Rgba::BLACK, TextAttributes::empty());
//! assert_eq!(emoji.display_width(), 2);
//! ```

use crate::color::Rgba;
use crate::style::TextAttributes;
use crate::unicode::{WidthMethod, display_width_char, grapheme_width};
use std::borrow::Cow;

/// Content of a frame cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CellContent {
    /// Single-codepoint character.
    Char(char),
    /// Multi-codepoint grapheme cluster (combining marks, ZWJ emoji).
    Grapheme(Box<str>),
    /// Empty/cleared cell.
    #[default]
    Empty,
    /// Continuation of a wide character from the previous cell.
    Continuation,
}

impl CellContent {
    /// Get the display width of this content.
    #[must_use]
    pub fn display_width(&self) -> usize {
        match self {
            Self::Char(c) => display_width_char(*c, WidthMethod::WcWidth),
            Self::Grapheme(s) => grapheme_width(s, WidthMethod::WcWidth),
            Self::Empty => 1,
            Self::Continuation => 0,
        }
    }

    /// Get the string representation of this content.
    ///
    /// Empty cells render as a space; continuations render as nothing.
    #[must_use]
    pub fn as_str(&self) -> Cow<'_, str> {
        match self {
            Self::Char(c) => Cow::Owned(c.to_string()),
            Self::Grapheme(s) => Cow::Borrowed(s),
            Self::Empty => Cow::Borrowed(" "),
            Self::Continuation => Cow::Borrowed(""),
        }
    }
}

/// A single frame cell with content and resolved styling.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    /// The character or grapheme content.
    pub content: CellContent,
    /// Foreground color.
    pub fg: Rgba,
    /// Background color.
    pub bg: Rgba,
    /// Text rendering attributes.
    pub attributes: TextAttributes,
}

impl Cell {
    /// Create a cell from a grapheme cluster string.
    ///
    /// Single-codepoint strings become [`CellContent::Char`].
    #[must_use]
    pub fn from_grapheme(s: &str, fg: Rgba, bg: Rgba, attributes: TextAttributes) -> Self {
        let mut chars = s.chars();
        let content = match (chars.next(), chars.next()) {
            (None, _) => CellContent::Empty,
            (Some(c), None) => CellContent::Char(c),
            _ => CellContent::Grapheme(s.into()),
        };
        Self {
            content,
            fg,
            bg,
            attributes,
        }
    }

    /// Create a cleared/empty cell with the specified background.
    #[must_use]
    pub const fn clear(bg: Rgba) -> Self {
        Self {
            content: CellContent::Empty,
            fg: Rgba::WHITE,
            bg,
            attributes: TextAttributes::empty(),
        }
    }

    /// Create a continuation cell (placeholder for wide characters).
    #[must_use]
    pub const fn continuation(fg: Rgba, bg: Rgba) -> Self {
        Self {
            content: CellContent::Continuation,
            fg,
            bg,
            attributes: TextAttributes::empty(),
        }
    }

    /// Get the display width of this cell.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.content.display_width()
    }

    /// Check if this is a continuation cell.
    #[must_use]
    pub fn is_continuation(&self) -> bool {
        matches!(self.content, CellContent::Continuation)
    }

    /// Check if this cell is empty/cleared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.content, CellContent::Empty)
    }
}
