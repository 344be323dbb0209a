//! Pointer input model.
//!
//! Hosts translate their native mouse events into a [`PointerEvent`] plus a
//! [`PointerInput`] carrying the viewport-relative position, button and
//! modifier state. Hosts that do not report click counts can derive them
//! with a [`ClickTracker`].

mod mouse;

pub use mouse::{
    ClickTracker, DEFAULT_MULTI_CLICK_INTERVAL, DEFAULT_MULTI_CLICK_TOLERANCE, Modifiers,
    MouseButton,
};

use crate::geometry::Point;

/// A pointer event delivered to the pane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PointerEvent {
    /// Button pressed.
    Press,
    /// Pointer moved with a button held.
    Drag,
    /// Button released.
    Release,
    /// Completed click; `count` is 1, 2 or 3.
    Click { count: u8 },
    /// Pointer moved with no button held.
    Move,
    /// Wheel notches; positive scrolls toward newer lines.
    Wheel { delta: i32 },
}

impl PointerEvent {
    /// Listener-facing kind, for events that notify listeners.
    #[must_use]
    pub const fn event_type(&self) -> Option<MouseEventType> {
        match self {
            Self::Press => Some(MouseEventType::Pressed),
            Self::Release => Some(MouseEventType::Released),
            Self::Click { .. } => Some(MouseEventType::Clicked),
            Self::Drag | Self::Move | Self::Wheel { .. } => None,
        }
    }
}

/// Kind of pointer event reported to pane listeners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MouseEventType {
    Pressed,
    Released,
    Clicked,
}

/// Position and modifier state accompanying a pointer event.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerInput {
    /// Viewport-relative position in pixels.
    pub position: Point,
    pub button: MouseButton,
    pub modifiers: Modifiers,
}

impl PointerInput {
    /// Left-button input at (x, y) with no modifiers.
    #[must_use]
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Point::new(x, y),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.button = button;
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    #[must_use]
    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}
