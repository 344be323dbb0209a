//! Cell-based frame buffer.
//!
//! [`FrameBuffer`] is the drawable frame handed to the host after each render
//! pass: a 2D grid of [`Cell`]s with (0, 0) at the top-left, X increasing to
//! the right and Y increasing downward.
//!
//! # Examples
//!
//! ```
//! use textpane::{FrameBuffer, Rgba, TextAttributes};
//!
//! let mut buf = FrameBuffer::new(10, 2);
//! buf.clear(Rgba::BLACK);
//! let width = buf.draw_grapheme(0, 0, "漢", Rgba::WHITE, Rgba::BLACK, TextAttributes::empty());
//! assert_eq!(width, 2);
//! assert_eq!(buf.row_text(0), "漢");
//! ```

use crate::cell::{Cell, CellContent};
use crate::color::Rgba;
use crate::style::TextAttributes;
use crate::unicode::{WidthMethod, grapheme_width};

/// Cell grid a render pass draws into.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer with the given dimensions.
    ///
    /// Zero dimensions are allowed and produce a buffer that ignores drawing.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width as usize).saturating_mul(height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::clear(Rgba::TRANSPARENT); size],
        }
    }

    /// Get buffer dimensions.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Get buffer width.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get buffer height.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn cell_index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let row_offset = (y as usize).checked_mul(self.width as usize)?;
        row_offset.checked_add(x as usize)
    }

    /// Get cell at position.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<&Cell> {
        self.cell_index(x, y).map(|idx| &self.cells[idx])
    }

    /// Get mutable cell at position.
    pub fn get_mut(&mut self, x: u32, y: u32) -> Option<&mut Cell> {
        self.cell_index(x, y).map(|idx| &mut self.cells[idx])
    }

    /// Set cell at position. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, cell: Cell) {
        if let Some(idx) = self.cell_index(x, y) {
            self.cells[idx] = cell;
        }
    }

    /// Resize the buffer, discarding its contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        *self = Self::new(width, height);
    }

    /// Clear every cell to the given background.
    pub fn clear(&mut self, bg: Rgba) {
        self.cells.fill(Cell::clear(bg));
    }

    /// Paint the background of a rectangle, keeping cell content.
    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, bg: Rgba) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for row in y..y_end {
            for col in x..x_end {
                if let Some(cell) = self.get_mut(col, row) {
                    cell.bg = bg.blend_over(cell.bg);
                }
            }
        }
    }

    /// Draw a single grapheme, returning the number of columns it occupies.
    ///
    /// Wide graphemes mark the following cell as a continuation. Zero-width
    /// graphemes occupy one column so they remain visible and hittable.
    pub fn draw_grapheme(
        &mut self,
        x: u32,
        y: u32,
        grapheme: &str,
        fg: Rgba,
        bg: Rgba,
        attributes: TextAttributes,
    ) -> u32 {
        let width = grapheme_width(grapheme, WidthMethod::WcWidth).max(1) as u32;
        let visible = grapheme.chars().any(|c| !c.is_control());
        let cell = if visible {
            Cell::from_grapheme(grapheme, fg, bg, attributes)
        } else {
            Cell {
                content: CellContent::Char(' '),
                fg,
                bg,
                attributes,
            }
        };
        self.set(x, y, cell);
        for offset in 1..width {
            self.set(x.saturating_add(offset), y, Cell::continuation(fg, bg));
        }
        width
    }

    /// Text content of one row with trailing blanks removed.
    #[must_use]
    pub fn row_text(&self, y: u32) -> String {
        let mut out = String::new();
        for x in 0..self.width {
            if let Some(cell) = self.get(x, y) {
                out.push_str(&cell.content.as_str());
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Text content of the whole frame, one row per line.
    #[must_use]
    pub fn to_text(&self) -> String {
        (0..self.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(buf: &mut FrameBuffer, x: u32, text: &str) {
        let attrs = TextAttributes::empty();
        for (i, ch) in text.chars().enumerate() {
            let col = x + i as u32;
            buf.draw_grapheme(col, 0, &ch.to_string(), Rgba::WHITE, Rgba::BLACK, attrs);
        }
    }

    #[test]
    fn test_new_and_size() {
        let buf = FrameBuffer::new(80, 24);
        assert_eq!(buf.size(), (80, 24));
        assert!(buf.get(79, 23).is_some());
        assert!(buf.get(80, 0).is_none());
    }

    #[test]
    fn test_zero_size_ignores_drawing() {
        let mut buf = FrameBuffer::new(0, 0);
        draw(&mut buf, 0, "abc");
        assert!(buf.get(0, 0).is_none());
        assert_eq!(buf.to_text(), "");
    }

    #[test]
    fn test_draw_clips_at_edge() {
        let mut buf = FrameBuffer::new(3, 1);
        draw(&mut buf, 1, "hello");
        assert_eq!(buf.row_text(0), " he");
    }

    #[test]
    fn test_control_grapheme_draws_blank() {
        let mut buf = FrameBuffer::new(3, 1);
        let attrs = TextAttributes::empty();
        let width = buf.draw_grapheme(0, 0, "\u{1}", Rgba::WHITE, Rgba::BLACK, attrs);
        assert_eq!(width, 1);
        assert_eq!(buf.get(0, 0).unwrap().content, CellContent::Char(' '));
    }

    #[test]
    fn test_wide_grapheme_sets_continuation() {
        let mut buf = FrameBuffer::new(4, 1);
        let width = buf.draw_grapheme(0, 0, "漢", Rgba::WHITE, Rgba::BLACK, TextAttributes::empty());
        assert_eq!(width, 2);
        assert!(buf.get(1, 0).is_some_and(Cell::is_continuation));
        assert_eq!(buf.row_text(0), "漢");
    }

    #[test]
    fn test_fill_rect_keeps_content() {
        let mut buf = FrameBuffer::new(4, 2);
        draw(&mut buf, 0, "ab");
        buf.fill_rect(0, 0, 10, 1, Rgba::BLUE);
        let cell = buf.get(1, 0).unwrap();
        assert_eq!(cell.content, CellContent::Char('b'));
        assert_eq!(cell.bg, Rgba::BLUE);
        assert_eq!(buf.get(0, 1).unwrap().bg, Rgba::TRANSPARENT);
    }

    #[test]
    fn test_resize_discards_content() {
        let mut buf = FrameBuffer::new(4, 1);
        draw(&mut buf, 0, "ab");
        buf.resize(6, 2);
        assert_eq!(buf.size(), (6, 2));
        assert_eq!(buf.to_text(), "\n");
    }
}
