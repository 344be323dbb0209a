//! Text selection over logical lines.
//!
//! Selection points address the unwrapped logical line: `offset` counts chars
//! from the start of the line, never from the start of a wrapped part. Ranges
//! are half-open, so a caret between two wrapped parts belongs to the later
//! part.
//!
//! The pointer state machine:
//!
//! ```text
//! Idle --press--> Anchoring --drag--> Extending --release--> Idle
//!   ^                |                                        |
//!   +----release-----+                                        |
//!   +-- double click: word, triple click: line (stays Idle) --+
//! ```

use std::ops::Range;

/// A position in the document: logical line plus char offset.
///
/// Ordering is lexicographic by (line, offset).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextPoint {
    pub line: usize,
    pub offset: usize,
}

impl TextPoint {
    #[must_use]
    pub const fn new(line: usize, offset: usize) -> Self {
        Self { line, offset }
    }
}

/// An anchor point and a live point.
///
/// `start` is where the selection was anchored and `end` follows the
/// pointer, so `start` may come after `end`; use [`normalized`](Self::normalized)
/// for an ordered range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: TextPoint,
    pub end: TextPoint,
}

impl SelectionRange {
    #[must_use]
    pub const fn new(start: TextPoint, end: TextPoint) -> Self {
        Self { start, end }
    }

    /// An empty selection at `point`.
    #[must_use]
    pub const fn caret(point: TextPoint) -> Self {
        Self {
            start: point,
            end: point,
        }
    }

    /// Chars `[start, end)` of a single line.
    #[must_use]
    pub const fn within_line(line: usize, start: usize, end: usize) -> Self {
        Self {
            start: TextPoint::new(line, start),
            end: TextPoint::new(line, end),
        }
    }

    /// Ordered copy with `start <= end`.
    #[must_use]
    pub fn normalized(self) -> Self {
        if self.start <= self.end {
            self
        } else {
            Self {
                start: self.end,
                end: self.start,
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Chars of logical `line` covered by this selection.
    ///
    /// Lines strictly inside a multi-line selection are covered from 0 to
    /// `usize::MAX`, meaning "through the end of the line and beyond".
    #[must_use]
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        let range = self.normalized();
        if line < range.start.line || line > range.end.line {
            return None;
        }
        let start = if line == range.start.line {
            range.start.offset
        } else {
            0
        };
        let end = if line == range.end.line {
            range.end.offset
        } else {
            usize::MAX
        };
        Some(start..end.max(start))
    }

    /// Move both points `count` lines up after lines were trimmed from the
    /// head of the document, clamping at line 0.
    #[must_use]
    pub fn shifted_up(self, count: usize) -> Self {
        let shift = |p: TextPoint| TextPoint::new(p.line.saturating_sub(count), p.offset);
        Self {
            start: shift(self.start),
            end: shift(self.end),
        }
    }
}

/// Normalize an anchor/live pair.
#[must_use]
pub fn normalize(a: TextPoint, b: TextPoint) -> SelectionRange {
    SelectionRange::new(a, b).normalized()
}

/// Phase of the pointer-driven selection state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectionPhase {
    #[default]
    Idle,
    /// Pointer is down; the anchor is set.
    Anchoring,
    /// Pointer is being dragged; the live point follows it.
    Extending,
}

/// Selection state driven by pointer events.
#[derive(Clone, Debug, Default)]
pub struct SelectionController {
    range: SelectionRange,
    phase: SelectionPhase,
}

impl SelectionController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    /// Anchor/live range as set, possibly reversed.
    #[must_use]
    pub fn raw(&self) -> SelectionRange {
        self.range
    }

    /// Normalized selection.
    #[must_use]
    pub fn get(&self) -> SelectionRange {
        self.range.normalized()
    }

    /// Replace the selection outright.
    pub fn set(&mut self, range: SelectionRange) {
        self.range = range;
    }

    /// Collapse the selection onto its anchor.
    pub fn clear(&mut self) {
        self.range.end = self.range.start;
    }

    /// Pointer down: anchor a new empty selection.
    pub fn press(&mut self, point: TextPoint) {
        self.range = SelectionRange::caret(point);
        self.phase = SelectionPhase::Anchoring;
    }

    /// Pointer drag: move the live point. Ignored while idle.
    pub fn drag(&mut self, point: TextPoint) {
        if self.phase == SelectionPhase::Idle {
            return;
        }
        self.range.end = point;
        self.phase = SelectionPhase::Extending;
    }

    /// Pointer up. Returns whether a non-empty selection was made.
    pub fn release(&mut self) -> bool {
        let extended = self.phase == SelectionPhase::Extending;
        self.phase = SelectionPhase::Idle;
        extended && !self.range.is_empty()
    }

    /// Select `extent` (chars) of `line`, as for a double click.
    pub fn select_word(&mut self, line: usize, extent: Range<usize>) {
        self.range = SelectionRange::within_line(line, extent.start, extent.end);
        self.phase = SelectionPhase::Idle;
    }

    /// Select a whole line of `len` chars, as for a triple click.
    pub fn select_line(&mut self, line: usize, len: usize) {
        self.range = SelectionRange::within_line(line, 0, len);
        self.phase = SelectionPhase::Idle;
    }

    /// Shift after `count` lines were trimmed from the head.
    pub fn shift_up(&mut self, count: usize) {
        self.range = self.range.shifted_up(count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_orders_points() {
        let a = TextPoint::new(4, 2);
        let b = TextPoint::new(1, 9);
        assert_eq!(normalize(a, b), normalize(b, a));
        let range = normalize(a, b);
        assert_eq!(range.start, b);
        assert_eq!(range.end, a);
    }

    #[test]
    fn test_same_line_orders_by_offset() {
        let range = normalize(TextPoint::new(3, 8), TextPoint::new(3, 2));
        assert_eq!(range, SelectionRange::within_line(3, 2, 8));
    }

    #[test]
    fn test_line_range() {
        let range = SelectionRange::new(TextPoint::new(5, 3), TextPoint::new(2, 4));
        assert_eq!(range.line_range(1), None);
        assert_eq!(range.line_range(2), Some(4..usize::MAX));
        assert_eq!(range.line_range(3), Some(0..usize::MAX));
        assert_eq!(range.line_range(5), Some(0..3));
        assert_eq!(range.line_range(6), None);

        let single = SelectionRange::within_line(7, 2, 5);
        assert_eq!(single.line_range(7), Some(2..5));
    }

    #[test]
    fn test_shifted_up_clamps() {
        let range = SelectionRange::new(TextPoint::new(1, 3), TextPoint::new(10, 4));
        let shifted = range.shifted_up(5);
        assert_eq!(shifted.start, TextPoint::new(0, 3));
        assert_eq!(shifted.end, TextPoint::new(5, 4));
    }

    #[test]
    fn test_state_machine() {
        let mut sel = SelectionController::new();
        assert_eq!(sel.phase(), SelectionPhase::Idle);

        sel.press(TextPoint::new(2, 5));
        assert_eq!(sel.phase(), SelectionPhase::Anchoring);
        assert!(sel.get().is_empty());

        sel.drag(TextPoint::new(1, 0));
        assert_eq!(sel.phase(), SelectionPhase::Extending);
        assert_eq!(sel.get().start, TextPoint::new(1, 0));
        assert_eq!(sel.raw().start, TextPoint::new(2, 5));

        assert!(sel.release());
        assert_eq!(sel.phase(), SelectionPhase::Idle);

        // Drags while idle do nothing.
        sel.drag(TextPoint::new(9, 9));
        assert_eq!(sel.get().start, TextPoint::new(1, 0));
    }

    #[test]
    fn test_press_release_without_drag() {
        let mut sel = SelectionController::new();
        sel.press(TextPoint::new(0, 1));
        assert!(!sel.release());
        assert!(sel.get().is_empty());
    }

    #[test]
    fn test_word_and_line() {
        let mut sel = SelectionController::new();
        sel.select_word(4, 6..9);
        assert_eq!(sel.get(), SelectionRange::within_line(4, 6, 9));
        sel.select_line(3, 11);
        assert_eq!(sel.get(), SelectionRange::within_line(3, 0, 11));
        sel.clear();
        assert!(sel.get().is_empty());
        assert_eq!(sel.get().start, TextPoint::new(3, 0));
    }
}
