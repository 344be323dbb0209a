//! Per-frame render cache.

use crate::geometry::{Point, Rect};
use crate::layout::ShapedPart;
use std::collections::BTreeMap;
use std::ops::Range;

/// Identity of a wrapped part: logical line plus part index within the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartKey {
    pub line: usize,
    pub part: usize,
}

impl PartKey {
    #[must_use]
    pub const fn new(line: usize, part: usize) -> Self {
        Self { line, part }
    }
}

/// A part drawn in the most recent frame.
#[derive(Clone, Debug, PartialEq)]
pub struct CachedPart {
    /// Full-width screen rectangle of the part.
    pub rect: Rect,
    /// Shaped layout the part was drawn from.
    pub layout: ShapedPart,
    /// Horizontal origin the layout was drawn at.
    pub origin_x: f32,
    /// Selection highlight rectangles drawn for this part (possibly none).
    pub highlight: Vec<Rect>,
}

impl CachedPart {
    /// Char range of the part within its logical line.
    #[must_use]
    pub fn char_range(&self) -> Range<usize> {
        self.layout.char_range()
    }
}

/// Mapping from part identity to its rectangle and layout.
///
/// Rebuilt from scratch on every render pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderCache {
    parts: BTreeMap<PartKey, CachedPart>,
}

impl RenderCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, key: PartKey, part: CachedPart) {
        self.parts.insert(key, part);
    }

    #[must_use]
    pub fn get(&self, key: PartKey) -> Option<&CachedPart> {
        self.parts.get(&key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Parts ordered top to bottom.
    pub fn iter(&self) -> impl Iterator<Item = (PartKey, &CachedPart)> {
        self.parts.iter().map(|(key, part)| (*key, part))
    }

    /// Parts of one logical line, in order.
    pub fn line_parts(&self, line: usize) -> impl Iterator<Item = (PartKey, &CachedPart)> {
        self.parts
            .range(PartKey::new(line, 0)..=PartKey::new(line, usize::MAX))
            .map(|(key, part)| (*key, part))
    }

    /// Part whose rectangle contains `point`.
    #[must_use]
    pub fn part_at(&self, point: Point) -> Option<(PartKey, &CachedPart)> {
        self.iter().find(|(_, part)| part.rect.contains(point))
    }

    /// Topmost rendered part.
    #[must_use]
    pub fn first(&self) -> Option<(PartKey, &CachedPart)> {
        self.parts.first_key_value().map(|(key, part)| (*key, part))
    }

    /// Bottom-most rendered part.
    #[must_use]
    pub fn last(&self) -> Option<(PartKey, &CachedPart)> {
        self.parts.last_key_value().map(|(key, part)| (*key, part))
    }
}
