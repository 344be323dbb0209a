//! Display width calculation in terminal columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Width calculation method for ambiguous-width characters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WidthMethod {
    /// POSIX-like wcwidth: ambiguous width = 1.
    #[default]
    WcWidth,
    /// Unicode East Asian Width: ambiguous width = 2.
    Unicode,
}

/// Get the display width of a string in terminal columns.
#[must_use]
pub fn display_width(s: &str, method: WidthMethod) -> usize {
    match method {
        WidthMethod::WcWidth => UnicodeWidthStr::width(s),
        WidthMethod::Unicode => UnicodeWidthStr::width_cjk(s),
    }
}

/// Get the display width of a character in terminal columns.
///
/// ASCII printable characters take a fast path; C0 controls are zero width.
#[inline]
#[must_use]
pub fn display_width_char(c: char, method: WidthMethod) -> usize {
    if c.is_ascii() && (' '..='~').contains(&c) {
        return 1;
    }
    if c < ' ' {
        return 0;
    }
    match method {
        WidthMethod::WcWidth => UnicodeWidthChar::width(c).unwrap_or(0),
        WidthMethod::Unicode => UnicodeWidthChar::width_cjk(c).unwrap_or(0),
    }
}

/// Width of one grapheme cluster as laid out in a scrollback line.
///
/// Tabs occupy a single column (IRC lines have no tab stops) and any other
/// control character is invisible.
#[must_use]
pub fn grapheme_width(grapheme: &str, method: WidthMethod) -> usize {
    if grapheme == "\t" {
        return 1;
    }
    let mut chars = grapheme.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => display_width_char(c, method),
        _ => display_width(grapheme, method),
    }
}
