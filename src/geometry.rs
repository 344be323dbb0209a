//! Pixel geometry shared by the renderer and hit testing.
//!
//! Coordinates are `f32` pixels relative to the viewport's top-left corner,
//! with Y increasing downward.

/// A point in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp this point into `bounds` (inclusive of the far edges).
    #[must_use]
    pub fn clamp_to(self, bounds: Rect) -> Self {
        Self {
            x: self.x.clamp(bounds.x, bounds.right().max(bounds.x)),
            y: self.y.clamp(bounds.y, bounds.bottom().max(bounds.y)),
        }
    }
}

/// An axis-aligned rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if a point is inside this rectangle (half-open on the far edges).
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    /// Check if a point is inside the vertical band of this rectangle.
    #[must_use]
    pub fn contains_y(&self, y: f32) -> bool {
        y >= self.y && y < self.bottom()
    }
}
