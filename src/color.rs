//! RGBA color type and the IRC colour palette.
//!
//! This module provides the [`Rgba`] type, which represents colors using
//! floating-point RGBA components. It supports:
//!
//! - **Color creation**: From u8 components or hex strings
//! - **Alpha blending**: Porter-Duff "over" compositing for selection overlays
//! - **IRC palette**: The 16 standard mIRC colour indices used by `\x03` codes
//!
//! # Examples
//!
//! ```
//! use textpane::Rgba;
//!
//! let red = Rgba::RED;
//! let custom = Rgba::from_hex("#1a1a2e").unwrap();
//! let navy = Rgba::from_irc_colour(2);
//!
//! let tinted = Rgba { a: 0.5, ..Rgba::BLUE }.blend_over(Rgba::WHITE);
//! assert_eq!(tinted.to_rgb_u8(), (128, 128, 255));
//! ```

/// RGBA color with f32 components in range [0.0, 1.0].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// The standard mIRC palette, indexed by colour code.
const IRC_PALETTE: [(u8, u8, u8); 16] = [
    (255, 255, 255), // 0 white
    (0, 0, 0),       // 1 black
    (0, 0, 127),     // 2 navy
    (0, 147, 0),     // 3 green
    (255, 0, 0),     // 4 red
    (127, 0, 0),     // 5 maroon
    (156, 0, 156),   // 6 purple
    (252, 127, 0),   // 7 orange
    (255, 255, 0),   // 8 yellow
    (0, 252, 0),     // 9 light green
    (0, 147, 147),   // 10 teal
    (0, 255, 255),   // 11 light cyan
    (0, 0, 252),     // 12 light blue
    (255, 0, 255),   // 13 pink
    (127, 127, 127), // 14 grey
    (210, 210, 210), // 15 light grey
];

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Opaque white.
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };

    /// Opaque red.
    pub const RED: Self = Self {
        r: 1.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    /// Opaque green.
    pub const GREEN: Self = Self {
        r: 0.0,
        g: 1.0,
        b: 0.0,
        a: 1.0,
    };

    /// Opaque blue.
    pub const BLUE: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 1.0,
        a: 1.0,
    };

    /// Create an opaque color from u8 RGB components.
    #[must_use]
    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: f32::from(r) / 255.0,
            g: f32::from(g) / 255.0,
            b: f32::from(b) / 255.0,
            a: 1.0,
        }
    }

    /// Parse a hex color string (e.g., "#FF0000" or "FF0000").
    ///
    /// Supports 3-char (#RGB) and 6-char (#RRGGBB) formats.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.is_ascii() {
            return None;
        }

        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Self::from_rgb_u8(r * 17, g * 17, b * 17))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::from_rgb_u8(r, g, b))
            }
            _ => None,
        }
    }

    /// Look up an IRC colour code (`\x03NN`).
    ///
    /// Codes above 15 wrap around the 16-entry palette.
    #[must_use]
    pub fn from_irc_colour(index: u8) -> Self {
        let (r, g, b) = IRC_PALETTE[usize::from(index % 16)];
        Self::from_rgb_u8(r, g, b)
    }

    /// Blend this color over another using standard alpha compositing (Porter-Duff "over").
    ///
    /// `self` is the foreground (on top), `other` is the background.
    #[must_use]
    pub fn blend_over(self, other: Self) -> Self {
        const ALPHA_EPSILON: f32 = 1e-6;

        if self.a >= 1.0 {
            return self;
        }
        if self.a <= 0.0 {
            return other;
        }

        let inv_alpha = 1.0 - self.a;
        let out_a = other.a.mul_add(inv_alpha, self.a);
        if out_a <= ALPHA_EPSILON {
            return Self::TRANSPARENT;
        }

        Self {
            r: (other.r * other.a).mul_add(inv_alpha, self.r * self.a) / out_a,
            g: (other.g * other.a).mul_add(inv_alpha, self.g * self.a) / out_a,
            b: (other.b * other.a).mul_add(inv_alpha, self.b * self.a) / out_a,
            a: out_a,
        }
    }

    /// Convert to u8 RGB tuple, clamping values to [0, 255].
    #[must_use]
    pub fn to_rgb_u8(self) -> (u8, u8, u8) {
        let to_u8 = |value: f32| (value * 255.0).round().clamp(0.0, 255.0) as u8;
        (to_u8(self.r), to_u8(self.g), to_u8(self.b))
    }
}
