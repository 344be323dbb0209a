//! Line layout engine.
//!
//! [`LineLayoutEngine::layout`] wraps one logical line to a pixel width and
//! returns its [`ShapedPart`]s in order. Layout is a pure function of the
//! line content, the width and the engine configuration; nothing is cached
//! between calls.
//!
//! Geometry is expressed in pixels through [`FontMetrics`]: every display
//! column advances by `metrics.advance`, and every part is
//! `ascent + descent + leading` tall. The default metrics describe a terminal
//! cell (one pixel per column and per row).
//!
//! # Wrapping
//!
//! A part ends at the first grapheme that would push its advance past the
//! width. In [`WrapMode::Word`] the break moves back to just after the last
//! whitespace in the part, unless the part would then hold only whitespace.
//! A part always holds at least one grapheme, so widths narrower than any
//! glyph still terminate, and the parts of a line always cover every char.
//!
//! # Examples
//!
//! ```
//! use textpane::layout::{FontMetrics, LineLayoutEngine};
//! use textpane::text::StyledLine;
//!
//! let engine = LineLayoutEngine::new(FontMetrics::default());
//! let parts = engine.layout(&StyledLine::plain("hello world"), 5.0);
//! let counts: Vec<_> = parts.iter().map(|p| p.char_count()).collect();
//! assert_eq!(counts, vec![5, 5, 1]);
//! ```

mod part;

pub use part::{Glyph, Palette, ShapedPart, TextHitInfo};

use crate::text::{LineSource, StyledLine};
use crate::unicode::{
    Direction, GraphemeInfo, WidthMethod, grapheme_info, is_whitespace_grapheme, reorder_visual,
    resolve_bidi,
};
use std::ops::Range;

/// Font metrics of the monospace cell used for shaping.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontMetrics {
    /// Horizontal advance of one display column.
    pub advance: f32,
    /// Distance from the top of a part to its baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the glyphs.
    pub descent: f32,
    /// Extra spacing below each part.
    pub leading: f32,
}

impl FontMetrics {
    /// One pixel per terminal column and row.
    pub const TERMINAL: Self = Self {
        advance: 1.0,
        ascent: 1.0,
        descent: 0.0,
        leading: 0.0,
    };

    /// Create new metrics.
    #[must_use]
    pub const fn new(advance: f32, ascent: f32, descent: f32, leading: f32) -> Self {
        Self {
            advance,
            ascent,
            descent,
            leading,
        }
    }

    /// Height of one wrapped part.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.ascent + self.descent + self.leading
    }

    /// Whether these metrics can drive a render pass.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.advance.is_finite()
            && self.advance >= 0.0
            && self.line_height().is_finite()
            && self.line_height() > 0.0
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::TERMINAL
    }
}

/// Where wrapped parts may break.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WrapMode {
    /// Break at any grapheme boundary.
    Char,
    /// Prefer breaking after whitespace.
    #[default]
    Word,
}

/// Wraps and shapes logical lines.
#[derive(Clone, Debug, Default)]
pub struct LineLayoutEngine {
    metrics: FontMetrics,
    wrap_mode: WrapMode,
    width_method: WidthMethod,
}

impl LineLayoutEngine {
    /// Create an engine with word wrapping.
    #[must_use]
    pub fn new(metrics: FontMetrics) -> Self {
        Self {
            metrics,
            wrap_mode: WrapMode::Word,
            width_method: WidthMethod::WcWidth,
        }
    }

    /// Set the wrap mode.
    #[must_use]
    pub fn with_wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap_mode = mode;
        self
    }

    /// Set how ambiguous-width characters are measured.
    #[must_use]
    pub fn with_width_method(mut self, method: WidthMethod) -> Self {
        self.width_method = method;
        self
    }

    #[must_use]
    pub fn metrics(&self) -> FontMetrics {
        self.metrics
    }

    #[must_use]
    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap_mode
    }

    pub fn set_metrics(&mut self, metrics: FontMetrics) {
        self.metrics = metrics;
    }

    pub fn set_wrap_mode(&mut self, mode: WrapMode) {
        self.wrap_mode = mode;
    }

    /// Lay out line `index` of `source`; an unknown index yields no parts.
    pub fn layout_line<S: LineSource + ?Sized>(
        &self,
        source: &S,
        index: usize,
        width: f32,
    ) -> Vec<ShapedPart> {
        source
            .line(index)
            .map(|line| self.layout(line, width))
            .unwrap_or_default()
    }

    /// Wrap and shape one logical line.
    ///
    /// Always returns at least one part. A non-positive or non-finite width
    /// yields a single empty part.
    #[must_use]
    pub fn layout(&self, line: &StyledLine, width: f32) -> Vec<ShapedPart> {
        let text = line.text();
        let bidi = resolve_bidi(text);
        let direction = match bidi.base_direction {
            Direction::Rtl => Direction::Rtl,
            _ => Direction::Ltr,
        };

        if !(width.is_finite() && width > 0.0) || text.is_empty() {
            return vec![ShapedPart::empty(0, direction, self.metrics)];
        }

        let infos = grapheme_info(text, self.width_method);
        let pure_ltr = bidi.is_pure_ltr();
        self.break_parts(text, &infos, width)
            .into_iter()
            .map(|range| {
                let graphemes = &infos[range];
                let levels: Vec<u8> = if pure_ltr {
                    Vec::new()
                } else {
                    graphemes
                        .iter()
                        .map(|g| bidi.levels.get(g.char_offset).copied().unwrap_or(0))
                        .collect()
                };
                self.shape(line, graphemes, &levels, direction)
            })
            .collect()
    }

    /// Split graphemes into per-part index ranges.
    fn break_parts(&self, text: &str, infos: &[GraphemeInfo], width: f32) -> Vec<Range<usize>> {
        let mut parts = Vec::new();
        let mut start = 0;
        let mut current = 0.0f32;
        let mut has_content = false;
        let mut last_break: Option<usize> = None;
        let mut i = 0;

        while i < infos.len() {
            let info = &infos[i];
            let advance = info.width as f32 * self.metrics.advance;

            if current + advance > width && current > 0.0 {
                let break_at = match (self.wrap_mode, last_break) {
                    (WrapMode::Word, Some(at)) if at > start => at,
                    _ => i,
                };
                parts.push(start..break_at);
                start = break_at;
                current = 0.0;
                has_content = false;
                last_break = None;
                i = break_at;
                continue;
            }

            current += advance;
            if is_whitespace_grapheme(&text[info.byte_range()]) {
                if has_content {
                    last_break = Some(i + 1);
                }
            } else {
                has_content = true;
            }
            i += 1;
        }

        parts.push(start..infos.len());
        parts
    }

    fn shape(
        &self,
        line: &StyledLine,
        graphemes: &[GraphemeInfo],
        levels: &[u8],
        direction: Direction,
    ) -> ShapedPart {
        let Some(first) = graphemes.first() else {
            return ShapedPart::empty(0, direction, self.metrics);
        };
        let byte_base = first.byte_offset;
        let char_base = first.char_offset;
        let byte_end = graphemes.last().map_or(byte_base, |g| g.byte_offset + g.byte_len);
        let text = &line.text()[byte_base..byte_end];

        let mut glyphs: Vec<Glyph> = graphemes
            .iter()
            .enumerate()
            .map(|(idx, g)| Glyph {
                byte_range: g.byte_offset - byte_base..g.byte_offset - byte_base + g.byte_len,
                char_offset: g.char_offset - char_base,
                char_len: g.char_len,
                x: 0.0,
                advance: g.width as f32 * self.metrics.advance,
                level: levels.get(idx).copied().unwrap_or(0),
                style: line.style_at(g.char_offset),
            })
            .collect();

        let visual = if levels.is_empty() {
            (0..glyphs.len()).collect()
        } else {
            reorder_visual(levels)
        };
        let mut x = 0.0;
        for &idx in &visual {
            glyphs[idx].x = x;
            x += glyphs[idx].advance;
        }

        ShapedPart::new(text.to_string(), glyphs, visual, char_base, direction, self.metrics)
    }
}

/// Char range of the word around `offset` in a logical line.
///
/// Extends left while the preceding char is not whitespace and right while
/// the current char is not whitespace, so an offset just after a word (on the
/// following space) still selects that word.
#[must_use]
pub fn word_extent(text: &str, offset: usize) -> Range<usize> {
    let chars: Vec<char> = text.chars().collect();
    let offset = offset.min(chars.len());
    let mut start = offset;
    while start > 0 && !chars[start - 1].is_whitespace() {
        start -= 1;
    }
    let mut end = offset;
    while end < chars.len() && !chars[end].is_whitespace() {
        end += 1;
    }
    start..end
}
