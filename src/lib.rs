//! `textpane` - virtualized scrollback viewport for IRC-style styled text
//!
//! The crate renders an append-only buffer of styled logical lines into a
//! fixed-size viewport, re-wrapping each line to the current width on every
//! paint and laying out only the lines that are actually visible.
//!
//! - [`layout`]: wraps one logical line into shaped parts (grapheme-aware,
//!   word or char wrapping, right-to-left parts right-aligned)
//! - [`render`]: fills the viewport upward from a scroll anchor and records
//!   every drawn part in a per-frame [`RenderCache`]
//! - [`hit`] and [`selection`]: map pointer positions back to text through
//!   that cache, drive selections and classify clicks on hyperlinks, channels
//!   and nicknames
//! - [`pane`]: the host-facing [`ScrollbackPane`] that combines the above with
//!   scrolling, follow-tail, listeners and copy
//!
//! # Example
//!
//! ```
//! use textpane::{PaneOptions, ScrollbackDocument, ScrollbackPane};
//!
//! let mut pane = ScrollbackPane::new(ScrollbackDocument::new(), PaneOptions::default());
//! pane.resize(5.0, 3.0);
//! pane.append_raw(["hello world"]);
//! let result = pane.render();
//! assert_eq!(result.cache.len(), 3);
//! assert_eq!(pane.frame().to_text(), "hello\n worl\nd");
//! ```

// Crate-level lint configuration
#![allow(clippy::cast_possible_truncation)] // Intentional pixel to cell casts
#![allow(clippy::cast_sign_loss)] // Intentional coordinate conversions
#![allow(clippy::cast_precision_loss)] // Intentional for pixel math
#![allow(clippy::cast_possible_wrap)] // Intentional scroll delta conversions
#![allow(clippy::module_name_repetitions)] // Allow cell::CellContent etc
#![allow(clippy::missing_errors_doc)] // Docs WIP
#![allow(clippy::missing_panics_doc)] // Docs WIP
#![allow(clippy::missing_const_for_fn)] // Many functions could be const, not critical
#![allow(clippy::doc_markdown)] // Allow technical names without backticks
#![allow(clippy::use_self)] // Allow explicit type names in impl blocks
#![allow(clippy::suboptimal_flops)] // Standard math notation is clearer than mul_add
#![allow(clippy::float_cmp)] // Pixel coordinates are compared exactly in tests
#![allow(clippy::cast_lossless)] // as casts are fine for primitive widening
#![allow(clippy::items_after_statements)] // Common pattern in tests

pub mod buffer;
pub mod cell;
pub mod clipboard;
pub mod color;
pub mod error;
pub mod event;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod layout;
pub mod pane;
pub mod render;
pub mod selection;
pub mod style;
pub mod text;
pub mod unicode;

// Re-export core types at crate root
pub use buffer::FrameBuffer;
pub use cell::{Cell, CellContent};
pub use clipboard::{Clipboard, MemoryClipboard, NoClipboard, Osc52Clipboard};
pub use color::Rgba;
pub use error::{Error, Result};
pub use event::{LogLevel, clear_log_callback, emit_log, set_log_callback};
pub use geometry::{Point, Rect};
pub use style::{Style, TextAttributes};

// Re-export the viewport pipeline
pub use hit::{ClickType, HitMode, HitPosition};
pub use input::{ClickTracker, Modifiers, MouseButton, MouseEventType, PointerEvent, PointerInput};
pub use layout::{FontMetrics, LineLayoutEngine, Palette, ShapedPart, TextHitInfo, WrapMode};
pub use pane::{CursorHint, ListenerId, PaneEvent, PaneOptions, ScrollbackPane};
pub use render::{CachedPart, PartKey, RenderCache, RenderResult, RenderStats, ViewportRenderer};
pub use selection::{SelectionController, SelectionPhase, SelectionRange, TextPoint};
pub use text::{
    DocumentEvent, DocumentHandle, DocumentUpdate, LineSource, ScrollbackDocument,
    SpanAttributes, StyledLine, StyledRun,
};
pub use unicode::WidthMethod;
