//! Text styling with attributes and colors.
//!
//! - [`TextAttributes`]: Bitflags for the IRC formatting toggles
//! - [`Style`]: Colors plus attributes, as carried by every styled run
//!
//! # Examples
//!
//! ```
//! use textpane::{Rgba, Style, TextAttributes};
//!
//! let nick = Style::fg(Rgba::from_irc_colour(12)).with_attributes(TextAttributes::INVERSE);
//! let (fg, bg) = nick.resolve_colors(Rgba::WHITE, Rgba::BLACK);
//! assert_eq!((fg, bg), (Rgba::BLACK, Rgba::from_irc_colour(12)));
//! ```

use crate::color::Rgba;
use bitflags::bitflags;

bitflags! {
    /// Text rendering attributes toggled by IRC control codes.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
    pub struct TextAttributes: u8 {
        /// Bold (`\x02`).
        const BOLD          = 0x01;
        /// Italic (`\x1D`).
        const ITALIC        = 0x02;
        /// Underlined text (`\x1F`).
        const UNDERLINE     = 0x04;
        /// Swapped foreground/background (`\x16`).
        const INVERSE       = 0x08;
        /// Fixed-pitch text (`\x11`). A cell grid is always fixed pitch, so
        /// this only survives for styled copies.
        const FIXED         = 0x10;
    }
}

/// Complete text style: optional colors plus attributes.
///
/// `None` for a color means "use the pane default" so that unstyled IRC text
/// follows the host theme.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Style {
    /// Foreground color (None = pane default).
    pub fg: Option<Rgba>,
    /// Background color (None = pane default).
    pub bg: Option<Rgba>,
    /// Text rendering attributes.
    pub attributes: TextAttributes,
}

impl Style {
    /// Empty style with no colors or attributes.
    pub const NONE: Self = Self {
        fg: None,
        bg: None,
        attributes: TextAttributes::empty(),
    };

    /// Create a style with only foreground color.
    #[must_use]
    pub const fn fg(color: Rgba) -> Self {
        Self {
            fg: Some(color),
            bg: None,
            attributes: TextAttributes::empty(),
        }
    }

    /// Create a style with only background color.
    #[must_use]
    pub const fn bg(color: Rgba) -> Self {
        Self {
            fg: None,
            bg: Some(color),
            attributes: TextAttributes::empty(),
        }
    }

    /// Create a bold style.
    #[must_use]
    pub const fn bold() -> Self {
        Self {
            fg: None,
            bg: None,
            attributes: TextAttributes::BOLD,
        }
    }

    /// Create an underline style.
    #[must_use]
    pub const fn underline() -> Self {
        Self {
            fg: None,
            bg: None,
            attributes: TextAttributes::UNDERLINE,
        }
    }

    /// Return a new style with the specified background color.
    #[must_use]
    pub const fn with_bg(self, color: Rgba) -> Self {
        Self {
            bg: Some(color),
            ..self
        }
    }

    /// Return a new style with the specified attributes added.
    #[must_use]
    pub const fn with_attributes(self, attrs: TextAttributes) -> Self {
        Self {
            attributes: self.attributes.union(attrs),
            ..self
        }
    }

    /// Check if this style has any non-default properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && self.attributes.is_empty()
    }

    /// Resolve concrete colors against pane defaults, applying `INVERSE`.
    #[must_use]
    pub fn resolve_colors(&self, default_fg: Rgba, default_bg: Rgba) -> (Rgba, Rgba) {
        let fg = self.fg.unwrap_or(default_fg);
        let bg = self.bg.unwrap_or(default_bg);
        if self.attributes.contains(TextAttributes::INVERSE) {
            (bg, fg)
        } else {
            (fg, bg)
        }
    }
}
