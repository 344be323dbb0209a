//! Viewport renderer.
//!
//! [`ViewportRenderer::render`] paints the window of the document that ends
//! at the scroll anchor. Only the lines needed to fill the viewport are laid
//! out: starting at the anchor, each line's parts are drawn last part first,
//! growing upward from the bottom edge until the top edge is reached or the
//! document is exhausted.
//!
//! ```text
//!  y = 0   ┌──────────────────────┐  <- stop once the cursor reaches 0
//!          │ line a-2, part 1     │
//!          │ line a-1, part 0     │
//!          │ line a-1, part 1     │
//!          │ line a,   part 0     │  <- anchor line a
//!  height  └──────────────────────┘  <- y cursor starts here
//! ```
//!
//! The cursor starts on the last whole row of the cell grid, so part
//! rectangles line up with frame rows. When the height is not a multiple of
//! the line height the strip below that row stays blank.
//!
//! Every drawn part is recorded in a [`RenderCache`] keyed by
//! ([`PartKey`]) line and part index. The cache is rebuilt on every pass and
//! is the only geometry hit testing ever consults.
//!
//! Selection highlights are drawn in the same pass: each part intersects its
//! char range with the normalized selection.

mod cache;

pub use cache::{CachedPart, PartKey, RenderCache};

use crate::buffer::FrameBuffer;
use crate::event::{LogLevel, emit_log_with};
use crate::geometry::{Point, Rect};
use crate::layout::{LineLayoutEngine, Palette, ShapedPart};
use crate::selection::SelectionRange;
use crate::text::LineSource;
use std::ops::Range;

/// Counters for one render pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Logical lines handed to the layout engine.
    pub lines_laid_out: usize,
    /// Parts drawn and cached.
    pub parts_drawn: usize,
}

/// Output of one render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderResult {
    /// Geometry of every drawn part.
    pub cache: RenderCache,
    /// Vertical space consumed, measured up from the bottom edge.
    pub extent: f32,
    /// Topmost logical line rendered (`None` for an empty document).
    pub topmost_line: Option<usize>,
    /// Anchor line after clamping (`None` for an empty document).
    pub anchor_line: Option<usize>,
    pub stats: RenderStats,
}

impl RenderResult {
    /// Whether the viewport was filled or the document was exhausted.
    #[must_use]
    pub fn is_complete(&self, height: f32) -> bool {
        self.extent >= height || self.topmost_line.is_none_or(|line| line == 0)
    }
}

/// Clamp a scroll anchor into `[0, line_count - 1]`.
#[must_use]
pub fn clamp_anchor(anchor: usize, line_count: usize) -> Option<usize> {
    line_count.checked_sub(1).map(|last| anchor.min(last))
}

/// Draws the visible window of a document and keeps the last frame's cache.
#[derive(Clone, Debug, Default)]
pub struct ViewportRenderer {
    engine: LineLayoutEngine,
    palette: Palette,
    side_padding: f32,
    last: RenderResult,
}

impl ViewportRenderer {
    #[must_use]
    pub fn new(engine: LineLayoutEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Horizontal padding on both sides of every part.
    #[must_use]
    pub fn with_side_padding(mut self, padding: f32) -> Self {
        self.side_padding = padding.max(0.0);
        self
    }

    #[must_use]
    pub fn engine(&self) -> &LineLayoutEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut LineLayoutEngine {
        &mut self.engine
    }

    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    pub fn set_side_padding(&mut self, padding: f32) {
        self.side_padding = padding.max(0.0);
    }

    /// Result of the most recent render pass.
    #[must_use]
    pub fn last(&self) -> &RenderResult {
        &self.last
    }

    /// Render the viewport whose bottom line is `anchor`.
    ///
    /// `width` and `height` are in pixels; `frame` is cleared to the palette
    /// background and drawn into. An empty document renders nothing and
    /// reports zero extent. Out-of-range anchors are clamped.
    pub fn render<S: LineSource + ?Sized>(
        &mut self,
        source: &S,
        frame: &mut FrameBuffer,
        width: f32,
        height: f32,
        anchor: usize,
        selection: &SelectionRange,
    ) -> &RenderResult {
        frame.clear(self.palette.background);
        let mut result = RenderResult::default();

        let metrics = self.engine.metrics();
        let line_count = source.line_count();
        let Some(anchor_line) = clamp_anchor(anchor, line_count) else {
            self.last = result;
            return &self.last;
        };
        if !(height.is_finite() && height > 0.0) || !metrics.is_usable() {
            self.last = result;
            return &self.last;
        }
        if anchor_line != anchor {
            emit_log_with(LogLevel::Debug, || {
                format!("scroll anchor {anchor} clamped to {anchor_line}")
            });
        }

        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let format_width = width - 2.0 * self.side_padding;
        let selection = selection.normalized();
        let mut y = grid_bottom(height, metrics.line_height());
        let mut line = anchor_line;

        loop {
            let parts = self.engine.layout_line(source, line, format_width);
            result.stats.lines_laid_out += 1;
            let line_selection = selection.line_range(line);
            let last_part = parts.len().saturating_sub(1);

            for (part_idx, part) in parts.into_iter().enumerate().rev() {
                let top = y - part.height();
                y = top;
                let rect = Rect::new(0.0, top, width, part.height());
                if rect.bottom() <= 0.0 {
                    continue;
                }

                let origin_x = part.origin_x(width, self.side_padding);
                let (local, fill) = match &line_selection {
                    Some(range) => selection_for_part(&part, range, part_idx == last_part),
                    None => (0..0, false),
                };
                part.draw(frame, Point::new(origin_x, top), &self.palette, local.clone());
                let highlight = self.draw_highlight(frame, &part, rect, origin_x, local, fill);

                result.cache.insert(
                    PartKey::new(line, part_idx),
                    CachedPart {
                        rect,
                        layout: part,
                        origin_x,
                        highlight,
                    },
                );
                result.stats.parts_drawn += 1;
            }

            result.topmost_line = Some(line);
            if y <= 0.0 || line == 0 {
                break;
            }
            line -= 1;
        }

        result.extent = height - y;
        result.anchor_line = Some(anchor_line);
        emit_log_with(LogLevel::Debug, || {
            format!(
                "rendered lines {}..={anchor_line}: {} parts, extent {}",
                result.topmost_line.unwrap_or(0),
                result.stats.parts_drawn,
                result.extent
            )
        });

        self.last = result;
        &self.last
    }

    /// Compute highlight rectangles and paint the selected space past the end
    /// of the text.
    fn draw_highlight(
        &self,
        frame: &mut FrameBuffer,
        part: &ShapedPart,
        rect: Rect,
        origin_x: f32,
        local: Range<usize>,
        fill: bool,
    ) -> Vec<Rect> {
        let mut highlight: Vec<Rect> = part
            .highlight_spans(local)
            .into_iter()
            .map(|span| Rect::new(origin_x + span.start, rect.y, span.end - span.start, rect.height))
            .collect();
        if !fill {
            return highlight;
        }

        let (start, end) = if part.direction().is_rtl() {
            (0.0, origin_x)
        } else {
            (origin_x + part.advance(), rect.width)
        };
        if end > start {
            highlight.push(Rect::new(start, rect.y, end - start, rect.height));
        }

        let metrics = self.engine.metrics();
        let row = (rect.y / rect.height).round();
        if metrics.advance > 0.0 && row >= 0.0 && end > start {
            let col_start = (start / metrics.advance).round() as u32;
            let col_end = (end / metrics.advance).ceil() as u32;
            frame.fill_rect(
                col_start,
                row as u32,
                col_end.saturating_sub(col_start),
                1,
                self.palette.selection_background(),
            );
        }
        highlight
    }
}

/// Bottom edge of the last whole cell row, or `height` when not even one
/// row fits.
fn grid_bottom(height: f32, line_height: f32) -> f32 {
    let rows = (height / line_height).floor();
    if rows >= 1.0 {
        rows * line_height
    } else {
        height
    }
}

/// Intersect a line's selected chars with one part.
///
/// Returns the part-relative selected range (possibly empty) and whether the
/// selection continues past the end of the part, in which case the space after
/// the text is highlighted too. A wrap boundary belongs to the later part, so
/// a selection that merely starts at a part's end does not fill that part.
fn selection_for_part(
    part: &ShapedPart,
    selected: &Range<usize>,
    is_last_part: bool,
) -> (Range<usize>, bool) {
    let span = part.char_range();
    let start = selected.start.max(span.start);
    let end = selected.end.min(span.end).max(start);
    let local = (start.min(span.end) - span.start)..(end - span.start);

    let continues = selected.end > span.end;
    let starts_in_part = if is_last_part {
        selected.start <= span.end
    } else {
        selected.start < span.end
    };
    (local, continues && starts_in_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::FontMetrics;
    use crate::selection::TextPoint;
    use crate::text::StyledLine;

    fn doc(n: usize) -> Vec<StyledLine> {
        (0..n).map(|i| StyledLine::plain(format!("line {i}"))).collect()
    }

    fn renderer() -> ViewportRenderer {
        ViewportRenderer::new(LineLayoutEngine::new(FontMetrics::default()))
    }

    #[test]
    fn test_anchor_fills_upward() {
        let lines = doc(100);
        let mut frame = FrameBuffer::new(40, 20);
        let mut r = renderer();
        let result = r.render(&lines, &mut frame, 40.0, 20.0, 50, &SelectionRange::default());
        assert_eq!(result.topmost_line, Some(31));
        assert!((result.extent - 20.0).abs() < f32::EPSILON);
        assert_eq!(result.stats.lines_laid_out, 20);
        assert_eq!(frame.row_text(19), "line 50");
        assert_eq!(frame.row_text(0), "line 31");
    }

    #[test]
    fn test_empty_document() {
        let lines: Vec<StyledLine> = Vec::new();
        let mut frame = FrameBuffer::new(10, 5);
        let mut r = renderer();
        let result = r.render(&lines, &mut frame, 10.0, 5.0, 0, &SelectionRange::default());
        assert!(result.cache.is_empty());
        assert!(result.extent.abs() < f32::EPSILON);
        assert_eq!(result.topmost_line, None);
    }

    #[test]
    fn test_anchor_is_clamped() {
        let lines = doc(3);
        let mut frame = FrameBuffer::new(10, 5);
        let mut r = renderer();
        let result = r.render(&lines, &mut frame, 10.0, 5.0, 99, &SelectionRange::default());
        assert_eq!(result.anchor_line, Some(2));
        assert_eq!(result.topmost_line, Some(0));
        assert!((result.extent - 3.0).abs() < f32::EPSILON);
        assert!(result.is_complete(5.0));
    }

    #[test]
    fn test_parts_drawn_in_reverse_and_cached() {
        let lines = vec![StyledLine::plain("hello world")];
        let mut frame = FrameBuffer::new(5, 3);
        let mut r = renderer();
        let result = r.render(&lines, &mut frame, 5.0, 3.0, 0, &SelectionRange::default());
        assert_eq!(result.cache.len(), 3);
        let last = result.cache.get(PartKey::new(0, 2)).unwrap();
        assert!((last.rect.y - 2.0).abs() < f32::EPSILON);
        let first = result.cache.get(PartKey::new(0, 0)).unwrap();
        assert!(first.rect.y.abs() < f32::EPSILON);
        assert_eq!(first.char_range(), 0..5);
        assert_eq!(frame.to_text(), "hello\n worl\nd");
    }

    #[test]
    fn test_parts_above_viewport_are_not_cached() {
        let lines = vec![StyledLine::plain("aaaa bbbb cccc")];
        let mut frame = FrameBuffer::new(5, 2);
        let mut r = renderer();
        let result = r.render(&lines, &mut frame, 5.0, 2.0, 0, &SelectionRange::default());
        assert_eq!(result.cache.len(), 2);
        assert!(result.cache.get(PartKey::new(0, 0)).is_none());
        assert!((result.extent - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_selection_highlight_and_fill() {
        let lines = vec![StyledLine::plain("abc"), StyledLine::plain("def")];
        let mut frame = FrameBuffer::new(6, 2);
        let mut r = renderer();
        let selection = SelectionRange::new(TextPoint::new(0, 1), TextPoint::new(1, 2));
        let result = r.render(&lines, &mut frame, 6.0, 2.0, 1, &selection);

        let top = result.cache.get(PartKey::new(0, 0)).unwrap();
        // "bc" plus the rest of the row.
        assert_eq!(top.highlight.len(), 2);
        assert!((top.highlight[0].x - 1.0).abs() < f32::EPSILON);
        assert!((top.highlight[1].x - 3.0).abs() < f32::EPSILON);
        assert!((top.highlight[1].width - 3.0).abs() < f32::EPSILON);

        let bottom = result.cache.get(PartKey::new(1, 0)).unwrap();
        assert_eq!(bottom.highlight.len(), 1);
        assert!((bottom.highlight[0].width - 2.0).abs() < f32::EPSILON);

        let sel_bg = r.palette().selection_background();
        assert_eq!(frame.get(5, 0).map(|c| c.bg), Some(sel_bg));
        assert_eq!(frame.get(0, 0).map(|c| c.bg), Some(r.palette().background));
        assert_eq!(frame.get(2, 1).map(|c| c.bg), Some(r.palette().background));
    }

    #[test]
    fn test_selection_for_part_boundaries() {
        let engine = LineLayoutEngine::new(FontMetrics::default());
        let parts = engine.layout(&StyledLine::plain("hello world"), 5.0);

        // Selection starting exactly at the wrap boundary belongs to part 1.
        let (local, fill) = selection_for_part(&parts[0], &(5..8), false);
        assert!(local.is_empty());
        assert!(!fill);
        let (local, fill) = selection_for_part(&parts[1], &(5..8), false);
        assert_eq!(local, 0..3);
        assert!(!fill);

        // Selection spanning the boundary fills the earlier part's tail.
        let (local, fill) = selection_for_part(&parts[0], &(3..7), false);
        assert_eq!(local, 3..5);
        assert!(fill);

        // Selection continuing onto the next logical line fills the last part.
        let (local, fill) = selection_for_part(&parts[2], &(11..usize::MAX), true);
        assert!(local.is_empty());
        assert!(fill);
    }

    #[test]
    fn test_narrow_viewport_terminates() {
        let lines = doc(5);
        let mut frame = FrameBuffer::new(1, 50);
        let mut r = renderer();
        let result = r.render(&lines, &mut frame, 0.5, 50.0, 4, &SelectionRange::default());
        assert_eq!(result.topmost_line, Some(0));
        // "line N" is six graphemes, one per part.
        assert!((result.extent - 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rtl_part_is_right_aligned() {
        let lines = vec![StyledLine::plain("שלום")];
        let mut frame = FrameBuffer::new(10, 1);
        let mut r = renderer();
        let result = r.render(&lines, &mut frame, 10.0, 1.0, 0, &SelectionRange::default());
        let part = result.cache.get(PartKey::new(0, 0)).unwrap();
        assert!((part.origin_x - 6.0).abs() < f32::EPSILON);
        assert_eq!(frame.row_text(0), "      םולש");
    }
}
