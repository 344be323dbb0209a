//! Bidirectional (BiDi) text resolution.
//!
//! Embedding levels come from `unicode-bidi` (UAX #9). Wrapped parts are
//! reordered for display with [`reorder_visual`], which applies rule L2 to a
//! slice of per-glyph levels.

use unicode_bidi::{BidiClass, BidiInfo as UnicodeBidiInfo};

/// Base paragraph direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
    /// No strong direction could be determined.
    Neutral,
}

impl Direction {
    /// Whether parts in this direction are drawn right-aligned.
    #[must_use]
    pub const fn is_rtl(self) -> bool {
        matches!(self, Self::Rtl)
    }
}

/// Result of resolving BiDi embedding levels for a string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BidiInfo {
    /// Detected base direction.
    pub base_direction: Direction,
    /// Embedding level per Unicode scalar value (`char`).
    pub levels: Vec<u8>,
}

impl BidiInfo {
    /// Whether every level is even, i.e. no reordering is ever needed.
    #[must_use]
    pub fn is_pure_ltr(&self) -> bool {
        self.levels.iter().all(|level| level % 2 == 0)
    }
}

/// Resolve bidirectional embedding levels for `text` (UAX #9).
///
/// The returned `levels` are per `char` (Unicode scalar value), not per byte.
#[must_use]
pub fn resolve_bidi(text: &str) -> BidiInfo {
    if text.is_empty() {
        return BidiInfo {
            base_direction: Direction::Neutral,
            levels: Vec::new(),
        };
    }

    let base_direction = detect_base_direction(text);
    if text.is_ascii() && base_direction != Direction::Rtl {
        return BidiInfo {
            base_direction,
            levels: vec![0; text.len()],
        };
    }

    let bidi = UnicodeBidiInfo::new(text, None);
    // `unicode-bidi` stores one level per byte, repeated across a code point.
    let levels = text
        .char_indices()
        .map(|(byte_idx, _)| bidi.levels[byte_idx].number())
        .collect();

    BidiInfo {
        base_direction,
        levels,
    }
}

fn detect_base_direction(text: &str) -> Direction {
    for ch in text.chars() {
        match unicode_bidi::bidi_class(ch) {
            BidiClass::L => return Direction::Ltr,
            BidiClass::R | BidiClass::AL => return Direction::Rtl,
            _ => {}
        }
    }
    Direction::Neutral
}

/// Compute the visual order of a run of glyphs from their embedding levels.
///
/// Returns logical indices in left-to-right display order: from the highest
/// level down to the lowest odd level, every maximal run at or above the
/// current level is reversed.
#[must_use]
pub fn reorder_visual(levels: &[u8]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..levels.len()).collect();
    let Some(&highest) = levels.iter().max() else {
        return order;
    };
    let lowest_odd = levels
        .iter()
        .copied()
        .filter(|level| level % 2 == 1)
        .min()
        .unwrap_or(highest + 1);

    let mut level = highest;
    while level >= lowest_odd && level > 0 {
        let mut i = 0;
        while i < order.len() {
            if levels[order[i]] >= level {
                let start = i;
                while i < order.len() && levels[order[i]] >= level {
                    i += 1;
                }
                order[start..i].reverse();
            } else {
                i += 1;
            }
        }
        level -= 1;
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_bidi_empty_is_neutral() {
        let info = resolve_bidi("");
        assert_eq!(info.base_direction, Direction::Neutral);
        assert!(info.levels.is_empty());
    }

    #[test]
    fn resolve_bidi_pure_ltr_levels_zero() {
        let text = "Hello, world!";
        let info = resolve_bidi(text);
        assert_eq!(info.base_direction, Direction::Ltr);
        assert_eq!(info.levels.len(), text.chars().count());
        assert!(info.is_pure_ltr());
    }

    #[test]
    fn resolve_bidi_pure_rtl_hebrew_levels_one() {
        let text = "שלום";
        let info = resolve_bidi(text);
        assert_eq!(info.base_direction, Direction::Rtl);
        assert_eq!(info.levels.len(), text.chars().count());
        assert!(info.levels.iter().all(|&l| l == 1));
    }

    #[test]
    fn resolve_bidi_mixed_contains_rtl_levels() {
        let text = "Hello שלום";
        let info = resolve_bidi(text);
        assert_eq!(info.base_direction, Direction::Ltr);
        assert!(info.levels.iter().any(|&l| l == 1));
        assert!(info.levels.iter().any(|&l| l == 0));
    }

    #[test]
    fn resolve_bidi_explicit_controls_do_not_panic() {
        let text = "abc\u{202E}def\u{202C}ghi";
        let info = resolve_bidi(text);
        assert_eq!(info.levels.len(), text.chars().count());
    }

    #[test]
    fn reorder_ltr_is_identity() {
        assert_eq!(reorder_visual(&[0, 0, 0]), vec![0, 1, 2]);
        assert!(reorder_visual(&[]).is_empty());
    }

    #[test]
    fn reorder_rtl_reverses() {
        assert_eq!(reorder_visual(&[1, 1, 1]), vec![2, 1, 0]);
    }

    #[test]
    fn reorder_embedded_run() {
        // LTR text with an RTL word in the middle.
        assert_eq!(reorder_visual(&[0, 0, 1, 1, 1, 0]), vec![0, 1, 4, 3, 2, 5]);
        // Numbers (level 2) inside RTL keep their own order.
        assert_eq!(reorder_visual(&[1, 2, 2, 1]), vec![3, 1, 2, 0]);
    }
}
