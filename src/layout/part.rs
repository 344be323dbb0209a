//! Shaped wrapped parts.

use crate::buffer::FrameBuffer;
use crate::color::Rgba;
use crate::geometry::Point;
use crate::layout::FontMetrics;
use crate::style::{Style, TextAttributes};
use crate::unicode::Direction;
use std::ops::Range;

/// One grapheme cluster placed within a part.
#[derive(Clone, Debug, PartialEq)]
pub struct Glyph {
    /// Byte range within the part text.
    pub byte_range: Range<usize>,
    /// Char offset relative to the start of the part.
    pub char_offset: usize,
    /// Number of chars in the cluster.
    pub char_len: usize,
    /// Visual left edge relative to the part origin.
    pub x: f32,
    pub advance: f32,
    /// Resolved bidi embedding level (odd = right-to-left).
    pub level: u8,
    pub style: Style,
}

impl Glyph {
    /// Char offset one past this glyph, relative to the part.
    #[must_use]
    pub const fn char_end(&self) -> usize {
        self.char_offset + self.char_len
    }

    #[must_use]
    pub const fn is_rtl(&self) -> bool {
        self.level % 2 == 1
    }
}

/// Result of mapping a horizontal position onto a part.
///
/// `char_index` is the first char of the glyph under the position; `leading`
/// tells whether the position fell on the glyph's leading (logically earlier)
/// half.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextHitInfo {
    pub char_index: usize,
    pub char_len: usize,
    pub leading: bool,
}

impl TextHitInfo {
    /// Caret position implied by the hit: before the glyph when on its
    /// leading half, after it otherwise.
    #[must_use]
    pub const fn insertion_index(&self) -> usize {
        if self.leading {
            self.char_index
        } else {
            self.char_index + self.char_len
        }
    }
}

/// Colors used when a part draws itself.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    /// Foreground for text without a colour.
    pub foreground: Rgba,
    /// Background for text without a colour.
    pub background: Rgba,
    /// Overlay applied to selected glyphs.
    pub selection: Style,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            foreground: Rgba::WHITE,
            background: Rgba::BLACK,
            selection: Style::fg(Rgba::BLACK).with_bg(Rgba::from_rgb_u8(0x99, 0xC2, 0xFF)),
        }
    }
}

impl Palette {
    /// Resolve the cell colors and attributes for a glyph.
    #[must_use]
    pub fn resolve(&self, style: Style, selected: bool) -> (Rgba, Rgba, TextAttributes) {
        let (mut fg, mut bg) = style.resolve_colors(self.foreground, self.background);
        let mut attributes = style.attributes - TextAttributes::INVERSE;
        if selected {
            let overlay = self.selection;
            if overlay.fg.is_none()
                && overlay.bg.is_none()
                && overlay.attributes.contains(TextAttributes::INVERSE)
            {
                std::mem::swap(&mut fg, &mut bg);
            }
            fg = overlay.fg.unwrap_or(fg);
            bg = overlay.bg.unwrap_or(bg);
            attributes |= overlay.attributes - TextAttributes::INVERSE;
        }
        (fg, bg, attributes)
    }

    /// Background used for selected space past the end of a part.
    #[must_use]
    pub fn selection_background(&self) -> Rgba {
        self.selection.bg.unwrap_or(self.foreground)
    }
}

/// One wrapped sub-line of a logical line, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapedPart {
    text: String,
    /// Glyphs in logical order.
    glyphs: Vec<Glyph>,
    /// Logical glyph indices in left-to-right display order.
    visual: Vec<usize>,
    char_start: usize,
    char_count: usize,
    direction: Direction,
    advance: f32,
    metrics: FontMetrics,
}

impl ShapedPart {
    pub(crate) fn new(
        text: String,
        glyphs: Vec<Glyph>,
        visual: Vec<usize>,
        char_start: usize,
        direction: Direction,
        metrics: FontMetrics,
    ) -> Self {
        let char_count = glyphs.iter().map(|g| g.char_len).sum();
        let advance = glyphs.iter().map(|g| g.advance).sum();
        Self {
            text,
            glyphs,
            visual,
            char_start,
            char_count,
            direction,
            advance,
            metrics,
        }
    }

    /// A part with no glyphs that still occupies one line of height.
    #[must_use]
    pub fn empty(char_start: usize, direction: Direction, metrics: FontMetrics) -> Self {
        Self::new(
            String::new(),
            Vec::new(),
            Vec::new(),
            char_start,
            direction,
            metrics,
        )
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Glyphs in logical order.
    #[must_use]
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Glyphs in display order, left to right.
    pub fn visual_glyphs(&self) -> impl Iterator<Item = &Glyph> {
        self.visual.iter().map(|&idx| &self.glyphs[idx])
    }

    /// Text of one glyph.
    #[must_use]
    pub fn glyph_text(&self, glyph: &Glyph) -> &str {
        self.text.get(glyph.byte_range.clone()).unwrap_or("")
    }

    /// Char offset of this part within its logical line.
    #[must_use]
    pub fn char_start(&self) -> usize {
        self.char_start
    }

    #[must_use]
    pub fn char_count(&self) -> usize {
        self.char_count
    }

    /// Char offset one past this part within its logical line.
    #[must_use]
    pub fn char_end(&self) -> usize {
        self.char_start + self.char_count
    }

    /// Char range of this part within its logical line.
    #[must_use]
    pub fn char_range(&self) -> Range<usize> {
        self.char_start..self.char_end()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.char_count == 0
    }

    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Total horizontal advance.
    #[must_use]
    pub fn advance(&self) -> f32 {
        self.advance
    }

    #[must_use]
    pub fn ascent(&self) -> f32 {
        self.metrics.ascent
    }

    #[must_use]
    pub fn descent(&self) -> f32 {
        self.metrics.descent
    }

    #[must_use]
    pub fn leading(&self) -> f32 {
        self.metrics.leading
    }

    /// Vertical space this part consumes.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.metrics.line_height()
    }

    /// Horizontal origin when drawn in a viewport `width` wide.
    ///
    /// Right-to-left parts are right-aligned.
    #[must_use]
    pub fn origin_x(&self, width: f32, padding: f32) -> f32 {
        if self.direction.is_rtl() {
            width - self.advance - padding
        } else {
            padding
        }
    }

    /// Map a horizontal position (relative to the part origin) to a glyph.
    ///
    /// Positions left or right of the text snap to the outermost glyph.
    #[must_use]
    pub fn hit_test_char(&self, x: f32) -> TextHitInfo {
        let (Some(&first), Some(&last)) = (self.visual.first(), self.visual.last()) else {
            return TextHitInfo {
                char_index: 0,
                char_len: 0,
                leading: true,
            };
        };

        let (idx, left_half) = if x < 0.0 || x.is_nan() {
            (first, true)
        } else if x >= self.advance {
            (last, false)
        } else {
            self.visual
                .iter()
                .map(|&idx| (idx, &self.glyphs[idx]))
                .find(|(_, g)| x >= g.x && x < g.x + g.advance)
                .map_or((last, false), |(idx, g)| (idx, x < g.x + g.advance / 2.0))
        };

        let glyph = &self.glyphs[idx];
        TextHitInfo {
            char_index: glyph.char_offset,
            char_len: glyph.char_len,
            leading: left_half != glyph.is_rtl(),
        }
    }

    /// Visual x spans (relative to the origin) covering the glyphs that
    /// intersect `range`, a part-relative char range. Adjacent spans merge.
    #[must_use]
    pub fn highlight_spans(&self, range: Range<usize>) -> Vec<Range<f32>> {
        let mut spans: Vec<Range<f32>> = Vec::new();
        for glyph in self.visual_glyphs() {
            if glyph.char_offset >= range.end || glyph.char_end() <= range.start {
                continue;
            }
            let span = glyph.x..glyph.x + glyph.advance;
            match spans.last_mut() {
                Some(last) if (last.end - span.start).abs() < f32::EPSILON => last.end = span.end,
                _ => spans.push(span),
            }
        }
        spans
    }

    /// Draw this part with its top-left corner at `origin`.
    ///
    /// `selected` is a part-relative char range; glyphs intersecting it get
    /// the palette's selection overlay. `origin.y` snaps to the nearest
    /// frame row.
    pub fn draw(
        &self,
        frame: &mut FrameBuffer,
        origin: Point,
        palette: &Palette,
        selected: Range<usize>,
    ) {
        let row = (origin.y / self.height()).round();
        if !row.is_finite() || row < 0.0 {
            return;
        }
        let row = row as u32;
        let advance = self.metrics.advance;

        for glyph in self.visual_glyphs() {
            let col = if advance > 0.0 {
                ((origin.x + glyph.x) / advance).round()
            } else {
                0.0
            };
            if !col.is_finite() || col < 0.0 {
                continue;
            }
            let is_selected = glyph.char_offset < selected.end && glyph.char_end() > selected.start;
            let (fg, bg, attributes) = palette.resolve(glyph.style, is_selected);
            frame.draw_grapheme(col as u32, row, self.glyph_text(glyph), fg, bg, attributes);
        }
    }
}
