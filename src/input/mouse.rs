//! Mouse buttons, modifiers and multi-click detection.

use crate::geometry::Point;
use bitflags::bitflags;
use std::time::{Duration, Instant};

/// Mouse button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MouseButton {
    /// Left mouse button.
    #[default]
    Left,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Right,
    /// No button (for move events).
    None,
}

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 0b0000_0001;
        /// Alt/Option key.
        const ALT = 0b0000_0010;
        /// Control key.
        const CTRL = 0b0000_0100;
    }
}

/// Default interval between presses that still counts as a multi-click.
pub const DEFAULT_MULTI_CLICK_INTERVAL: Duration = Duration::from_millis(500);

/// Default distance (pixels, per axis) a press may drift from the previous one.
pub const DEFAULT_MULTI_CLICK_TOLERANCE: f32 = 4.0;

/// Derives click counts from successive presses.
///
/// Counts run 1, 2, 3 and then wrap back to 1, so a fourth fast click starts
/// a new single click.
#[derive(Clone, Debug)]
pub struct ClickTracker {
    interval: Duration,
    tolerance: f32,
    last: Option<(Instant, Point, MouseButton)>,
    count: u8,
}

impl Default for ClickTracker {
    fn default() -> Self {
        Self::new(DEFAULT_MULTI_CLICK_INTERVAL, DEFAULT_MULTI_CLICK_TOLERANCE)
    }
}

impl ClickTracker {
    #[must_use]
    pub fn new(interval: Duration, tolerance: f32) -> Self {
        Self {
            interval,
            tolerance: tolerance.max(0.0),
            last: None,
            count: 0,
        }
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Register a press now and return its click count.
    pub fn press(&mut self, position: Point, button: MouseButton) -> u8 {
        self.press_at(Instant::now(), position, button)
    }

    /// Register a press at `at` and return its click count.
    pub fn press_at(&mut self, at: Instant, position: Point, button: MouseButton) -> u8 {
        let continues = self.last.is_some_and(|(time, pos, last_button)| {
            last_button == button
                && at.saturating_duration_since(time) <= self.interval
                && (position.x - pos.x).abs() <= self.tolerance
                && (position.y - pos.y).abs() <= self.tolerance
        });
        self.count = if continues && self.count < 3 {
            self.count + 1
        } else {
            1
        };
        self.last = Some((at, position, button));
        self.count
    }

    /// Forget the previous press.
    pub fn reset(&mut self) {
        self.last = None;
        self.count = 0;
    }
}
