//! Unicode utilities for grapheme handling, display width and bidi levels.

mod bidi;
mod grapheme;
mod width;

pub use bidi::{BidiInfo, Direction, reorder_visual, resolve_bidi};
pub use grapheme::{GraphemeInfo, grapheme_info, graphemes, is_whitespace_grapheme};
pub use width::{WidthMethod, display_width, display_width_char, grapheme_width};
