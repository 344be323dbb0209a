//! Hit testing and click classification.
//!
//! All lookups go through the [`RenderCache`] of the most recent render pass;
//! nothing here lays text out on its own. A point that falls outside every
//! cached rectangle is a miss (`None`), never an error.

use crate::geometry::{Point, Rect};
use crate::render::{PartKey, RenderCache};
use crate::selection::TextPoint;
use crate::text::{LineSource, SpanAttributes};

/// Which offset a hit should report.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HitMode {
    /// Caret position between chars, nearest to the pointer. Used for
    /// selection endpoints.
    #[default]
    Selection,
    /// The char under the pointer. Used for click classification and
    /// tooltips.
    Character,
}

/// A resolved position within a logical line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HitPosition {
    pub line: usize,
    pub part: usize,
    /// Char under the pointer, on the unwrapped line.
    pub offset: usize,
    /// Caret position nearest the pointer, on the unwrapped line.
    pub insertion: usize,
}

impl HitPosition {
    #[must_use]
    pub const fn key(&self) -> PartKey {
        PartKey::new(self.line, self.part)
    }

    /// Text point for the given mode.
    #[must_use]
    pub const fn to_point(&self, mode: HitMode) -> TextPoint {
        match mode {
            HitMode::Selection => TextPoint::new(self.line, self.insertion),
            HitMode::Character => TextPoint::new(self.line, self.offset),
        }
    }
}

/// Resolve a viewport point against the cache.
///
/// The horizontal position is mapped through the part's shaped layout and
/// offset by the chars of the preceding parts of the same line.
#[must_use]
pub fn resolve(cache: &RenderCache, point: Point) -> Option<HitPosition> {
    let (key, part) = cache.part_at(point)?;
    let hit = part.layout.hit_test_char(point.x - part.origin_x);
    let start = part.layout.char_start();
    Some(HitPosition {
        line: key.line,
        part: key.part,
        offset: start + hit.char_index,
        insertion: start + hit.insertion_index(),
    })
}

/// Resolve a point for drag selection.
///
/// The point is first clamped into `bounds`. Points above the topmost
/// rendered part snap to its start and points below the bottom-most part
/// snap to its end, so dragging past the text keeps extending the selection.
#[must_use]
pub fn resolve_clamped(cache: &RenderCache, point: Point, bounds: Rect) -> Option<HitPosition> {
    let point = point.clamp_to(bounds);
    if let Some(hit) = resolve(cache, point) {
        return Some(hit);
    }

    let (first_key, first) = cache.first()?;
    if point.y < first.rect.y {
        let start = first.layout.char_start();
        return Some(HitPosition {
            line: first_key.line,
            part: first_key.part,
            offset: start,
            insertion: start,
        });
    }

    let (last_key, last) = cache.last()?;
    if point.y >= last.rect.bottom() {
        let range = last.char_range();
        return Some(HitPosition {
            line: last_key.line,
            part: last_key.part,
            offset: range.end.saturating_sub(1).max(range.start),
            insertion: range.end,
        });
    }

    // Inside the band of some part but outside its horizontal extent.
    cache
        .iter()
        .find(|(_, part)| part.rect.contains_y(point.y))
        .map(|(key, part)| {
            let max = (part.rect.right() - f32::EPSILON).max(part.rect.x);
            let x = point.x.clamp(part.rect.x, max);
            let hit = part.layout.hit_test_char(x - part.origin_x);
            let start = part.layout.char_start();
            HitPosition {
                line: key.line,
                part: key.part,
                offset: start + hit.char_index,
                insertion: start + hit.insertion_index(),
            }
        })
}

/// What a click landed on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ClickType {
    #[default]
    Normal,
    Hyperlink(String),
    Channel(String),
    Nickname(String),
}

impl ClickType {
    /// The span's target, or `""` for normal text.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Normal => "",
            Self::Hyperlink(value) | Self::Channel(value) | Self::Nickname(value) => value,
        }
    }

    #[must_use]
    pub fn is_clickable(&self) -> bool {
        !matches!(self, Self::Normal)
    }

    /// Classify a run's attributes: hyperlink, then channel, then nickname.
    #[must_use]
    pub fn from_attributes(attributes: &SpanAttributes) -> Self {
        if let Some(url) = &attributes.hyperlink {
            Self::Hyperlink(url.clone())
        } else if let Some(channel) = &attributes.channel {
            Self::Channel(channel.clone())
        } else if let Some(nick) = &attributes.nickname {
            Self::Nickname(nick.clone())
        } else {
            Self::Normal
        }
    }
}

/// Classify the char at `offset` of logical line `line`.
///
/// Unknown lines and offsets past the end classify as [`ClickType::Normal`].
#[must_use]
pub fn classify<S: LineSource + ?Sized>(source: &S, line: usize, offset: usize) -> ClickType {
    source
        .line(line)
        .and_then(|l| l.attributes_at(offset))
        .map_or(ClickType::Normal, ClickType::from_attributes)
}

/// Classify the char under a viewport point.
#[must_use]
pub fn classify_point<S: LineSource + ?Sized>(
    source: &S,
    cache: &RenderCache,
    point: Point,
) -> ClickType {
    resolve(cache, point).map_or(ClickType::Normal, |hit| {
        classify(source, hit.line, hit.offset)
    })
}

/// Tooltip attached to the char under a viewport point.
#[must_use]
pub fn tooltip_at<'a, S: LineSource + ?Sized>(
    source: &'a S,
    cache: &RenderCache,
    point: Point,
) -> Option<&'a str> {
    let hit = resolve(cache, point)?;
    source
        .line(hit.line)?
        .attributes_at(hit.offset)?
        .tooltip
        .as_deref()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::FrameBuffer;
    use crate::layout::{FontMetrics, LineLayoutEngine};
    use crate::render::ViewportRenderer;
    use crate::selection::SelectionRange;
    use crate::text::{StyledLine, StyledRun};

    fn render(lines: &[StyledLine], width: u32, height: u32) -> RenderCache {
        let mut renderer = ViewportRenderer::new(LineLayoutEngine::new(FontMetrics::default()));
        let mut frame = FrameBuffer::new(width, height);
        renderer
            .render(
                lines,
                &mut frame,
                width as f32,
                height as f32,
                lines.len().saturating_sub(1),
                &SelectionRange::default(),
            )
            .cache
            .clone()
    }

    // ============================================
    // resolve
    // ============================================

    #[test]
    fn test_resolve_adds_preceding_parts() {
        let lines = vec![StyledLine::plain("hello world")];
        let cache = render(&lines, 5, 3);

        let hit = resolve(&cache, Point::new(1.2, 1.5)).unwrap();
        assert_eq!((hit.line, hit.part), (0, 1));
        assert_eq!(hit.offset, 6);
        assert_eq!(hit.insertion, 6);

        let hit = resolve(&cache, Point::new(0.2, 2.5)).unwrap();
        assert_eq!(hit.key(), PartKey::new(0, 2));
        assert_eq!(hit.offset, 10);
    }

    #[test]
    fn test_resolve_right_half_moves_caret() {
        let lines = vec![StyledLine::plain("abc")];
        let cache = render(&lines, 10, 1);
        let hit = resolve(&cache, Point::new(1.8, 0.5)).unwrap();
        assert_eq!(hit.offset, 1);
        assert_eq!(hit.insertion, 2);
        assert_eq!(hit.to_point(HitMode::Character), TextPoint::new(0, 1));
        assert_eq!(hit.to_point(HitMode::Selection), TextPoint::new(0, 2));
    }

    #[test]
    fn test_resolve_misses_outside_cache() {
        let lines = vec![StyledLine::plain("abc")];
        let cache = render(&lines, 10, 4);
        // Only the bottom row is rendered.
        assert!(resolve(&cache, Point::new(1.0, 0.5)).is_none());
        assert!(resolve(&cache, Point::new(-1.0, 3.5)).is_none());
        assert!(resolve(&RenderCache::new(), Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_resolve_past_text_end() {
        let lines = vec![StyledLine::plain("abc")];
        let cache = render(&lines, 10, 1);
        let hit = resolve(&cache, Point::new(8.0, 0.5)).unwrap();
        assert_eq!(hit.offset, 2);
        assert_eq!(hit.insertion, 3);
    }

    #[test]
    fn test_resolve_clamped_snaps() {
        let lines = vec![StyledLine::plain("abc"), StyledLine::plain("defg")];
        let cache = render(&lines, 10, 4);
        let bounds = Rect::new(0.0, 0.0, 10.0, 4.0);

        // Empty space above the first line snaps to its start.
        let hit = resolve_clamped(&cache, Point::new(5.0, 0.5), bounds).unwrap();
        assert_eq!((hit.line, hit.insertion), (0, 0));

        // Below the viewport clamps onto the last part's end.
        let hit = resolve_clamped(&cache, Point::new(50.0, 99.0), bounds).unwrap();
        assert_eq!((hit.line, hit.insertion), (1, 4));

        // Left of the viewport clamps to x = 0.
        let hit = resolve_clamped(&cache, Point::new(-3.0, 2.5), bounds).unwrap();
        assert_eq!((hit.line, hit.insertion), (0, 0));
    }

    #[test]
    fn test_resolve_clamped_zero_width_viewport() {
        let lines = vec![StyledLine::plain("abc"), StyledLine::plain("de")];
        let cache = render(&lines, 0, 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.iter().all(|(_, part)| part.rect.width == 0.0));

        let bounds = Rect::new(0.0, 0.0, 0.0, 3.0);
        let hit = resolve_clamped(&cache, Point::new(0.0, 2.5), bounds).unwrap();
        assert_eq!((hit.line, hit.part, hit.insertion), (1, 0, 0));
        let hit = resolve_clamped(&cache, Point::new(4.0, 1.5), bounds).unwrap();
        assert_eq!((hit.line, hit.insertion), (0, 0));
    }

    #[test]
    fn test_resolve_matches_drawn_rows_with_partial_row() {
        let lines: Vec<StyledLine> = (0..20)
            .map(|i| StyledLine::plain(format!("line {i}")))
            .collect();
        let engine = LineLayoutEngine::new(FontMetrics::new(8.0, 12.0, 3.0, 1.0));
        let mut renderer = ViewportRenderer::new(engine);
        // 100px tall with 16px rows: six whole rows plus a partial one.
        let mut frame = FrameBuffer::new(20, 7);
        let cache = renderer
            .render(&lines, &mut frame, 160.0, 100.0, 19, &SelectionRange::default())
            .cache
            .clone();

        assert_eq!(frame.row_text(5), "line 19");
        assert_eq!(frame.row_text(0), "line 14");
        assert_eq!(frame.row_text(6), "");

        // y = 82 falls in frame row 5.
        let hit = resolve(&cache, Point::new(4.0, 82.0)).unwrap();
        assert_eq!(hit.line, 19);
        let hit = resolve(&cache, Point::new(4.0, 8.0)).unwrap();
        assert_eq!(hit.line, 14);
        assert!(resolve(&cache, Point::new(4.0, 98.0)).is_none());
    }

    // ============================================
    // classification
    // ============================================

    fn linked_line() -> StyledLine {
        StyledLine::new(vec![
            StyledRun::plain("see "),
            StyledRun::new(
                "bob",
                SpanAttributes::default()
                    .with_nickname("bob")
                    .with_hyperlink("https://bob.example"),
            ),
            StyledRun::plain(" in "),
            StyledRun::new(
                "#rust",
                SpanAttributes::default()
                    .with_channel("#rust")
                    .with_tooltip("Rust channel"),
            ),
        ])
    }

    #[test]
    fn test_classify_priority() {
        let lines = vec![linked_line()];
        assert_eq!(
            classify(&lines, 0, 5),
            ClickType::Hyperlink("https://bob.example".to_string())
        );
        assert_eq!(classify(&lines, 0, 12), ClickType::Channel("#rust".to_string()));
        assert_eq!(classify(&lines, 0, 0), ClickType::Normal);
    }

    #[test]
    fn test_classify_out_of_range() {
        let lines = vec![linked_line()];
        let click = classify(&lines, 0, 999);
        assert_eq!(click, ClickType::Normal);
        assert_eq!(click.value(), "");
        assert_eq!(classify(&lines, 7, 0), ClickType::Normal);
    }

    #[test]
    fn test_from_attributes_nickname() {
        let attrs = SpanAttributes::default().with_nickname("alice");
        let click = ClickType::from_attributes(&attrs);
        assert_eq!(click.value(), "alice");
        assert!(click.is_clickable());
        assert!(!ClickType::Normal.is_clickable());
    }

    #[test]
    fn test_classify_point_and_tooltip() {
        let lines = vec![linked_line()];
        let cache = render(&lines, 40, 1);
        assert_eq!(
            classify_point(&lines, &cache, Point::new(13.5, 0.5)),
            ClickType::Channel("#rust".to_string())
        );
        assert_eq!(
            tooltip_at(&lines, &cache, Point::new(13.5, 0.5)),
            Some("Rust channel")
        );
        assert_eq!(tooltip_at(&lines, &cache, Point::new(1.5, 0.5)), None);
    }
}
