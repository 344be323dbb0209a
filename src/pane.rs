//! Host-facing scrollback pane.
//!
//! [`ScrollbackPane`] ties a line source to the viewport renderer, the
//! selection controller and a clipboard. The host feeds it pointer events and
//! document notifications, calls [`render`](ScrollbackPane::render) to paint,
//! and reads back the frame, the content extent and the cursor hint.
//!
//! # Scroll model
//!
//! The scroll anchor is the logical line shown at the bottom of the viewport.
//! While the anchor sits on the last line the pane follows the tail: newly
//! appended lines move the anchor with them. Otherwise the anchor stays put
//! and the appended lines count as unread until the user scrolls down to
//! them.
//!
//! # Example
//!
//! ```
//! use textpane::{MemoryClipboard, PaneOptions, ScrollbackPane};
//!
//! let clipboard = MemoryClipboard::new();
//! let mut pane = ScrollbackPane::new(textpane::ScrollbackDocument::new(), PaneOptions::default())
//!     .with_clipboard(Box::new(clipboard.clone()));
//! pane.resize(40.0, 10.0);
//! pane.append_raw(["\x02bold\x02 and plain"]);
//! pane.render();
//! assert_eq!(pane.frame().row_text(9), "bold and plain");
//! ```

use crate::buffer::FrameBuffer;
use crate::clipboard::{Clipboard, NoClipboard};
use crate::color::Rgba;
use crate::event::{LogLevel, emit_log_with};
use crate::geometry::{Point, Rect};
use crate::hit::{self, ClickType, HitMode};
use crate::input::{MouseButton, MouseEventType, PointerEvent, PointerInput};
use crate::layout::{FontMetrics, LineLayoutEngine, Palette, WrapMode, word_extent};
use crate::render::{RenderResult, ViewportRenderer, clamp_anchor};
use crate::selection::{SelectionController, SelectionPhase, SelectionRange};
use crate::style::Style;
use crate::text::{DocumentEvent, LineSource, ScrollbackDocument};

/// Pane configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaneOptions {
    /// Copy the selection on pointer release and clear it.
    pub quick_copy: bool,
    pub metrics: FontMetrics,
    pub wrap_mode: WrapMode,
    /// Horizontal padding on both sides of the text.
    pub side_padding: f32,
    pub foreground: Rgba,
    pub background: Rgba,
    /// Overlay for selected text.
    pub selection: Style,
    /// Lines moved by page up/down.
    pub page_lines: usize,
    /// Lines moved per wheel notch.
    pub wheel_lines: usize,
    /// Report unread lines through [`ScrollbackPane::new_line_indicator`].
    pub new_line_notification: bool,
}

impl Default for PaneOptions {
    fn default() -> Self {
        let palette = Palette::default();
        Self {
            quick_copy: false,
            metrics: FontMetrics::TERMINAL,
            wrap_mode: WrapMode::Word,
            side_padding: 0.0,
            foreground: palette.foreground,
            background: palette.background,
            selection: palette.selection,
            page_lines: 10,
            wheel_lines: 3,
            new_line_notification: true,
        }
    }
}

impl PaneOptions {
    fn palette(&self) -> Palette {
        Palette {
            foreground: self.foreground,
            background: self.background,
            selection: self.selection,
        }
    }
}

/// Cursor the host should show over the pane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CursorHint {
    #[default]
    Default,
    /// Hovering a hyperlink, channel or nickname.
    Pointer,
}

/// Notification sent to pane listeners on press, release and click.
#[derive(Clone, Debug, PartialEq)]
pub struct PaneEvent {
    /// What the pointer was over.
    pub click: ClickType,
    pub kind: MouseEventType,
    pub input: PointerInput,
}

/// Handle returned by [`ScrollbackPane::add_listener`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&PaneEvent)>;

/// Scrollback viewport over a line source.
pub struct ScrollbackPane<S: LineSource = ScrollbackDocument> {
    source: S,
    options: PaneOptions,
    renderer: ViewportRenderer,
    frame: FrameBuffer,
    width: f32,
    height: f32,
    selection: SelectionController,
    clipboard: Box<dyn Clipboard>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    anchor: usize,
    /// Lines before this index have been shown.
    last_seen: usize,
    hover: Option<Point>,
    cursor: CursorHint,
}

impl<S: LineSource> ScrollbackPane<S> {
    /// Create a pane showing the tail of `source`.
    pub fn new(source: S, options: PaneOptions) -> Self {
        let engine = LineLayoutEngine::new(options.metrics).with_wrap_mode(options.wrap_mode);
        let renderer = ViewportRenderer::new(engine)
            .with_palette(options.palette())
            .with_side_padding(options.side_padding);
        let count = source.line_count();
        Self {
            source,
            options,
            renderer,
            frame: FrameBuffer::new(0, 0),
            width: 0.0,
            height: 0.0,
            selection: SelectionController::new(),
            clipboard: Box::new(NoClipboard),
            listeners: Vec::new(),
            next_listener: 0,
            anchor: count.saturating_sub(1),
            last_seen: count,
            hover: None,
            cursor: CursorHint::Default,
        }
    }

    /// Use `clipboard` for copies.
    #[must_use]
    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn set_clipboard(&mut self, clipboard: Box<dyn Clipboard>) {
        self.clipboard = clipboard;
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Mutable access to the source. Report changes through
    /// [`handle_document_event`](Self::handle_document_event).
    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    #[must_use]
    pub fn options(&self) -> &PaneOptions {
        &self.options
    }

    /// Apply a new option set; takes effect on the next render.
    pub fn set_options(&mut self, options: PaneOptions) {
        let engine = self.renderer.engine_mut();
        engine.set_metrics(options.metrics);
        engine.set_wrap_mode(options.wrap_mode);
        self.renderer.set_palette(options.palette());
        self.renderer.set_side_padding(options.side_padding);
        self.options = options;
        self.resize(self.width, self.height);
    }

    /// Set the viewport size in pixels.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        self.height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        let metrics = self.options.metrics;
        let cells = |extent: f32, unit: f32| {
            if unit > 0.0 {
                (extent / unit).ceil() as u32
            } else {
                0
            }
        };
        self.frame.resize(
            cells(self.width, metrics.advance),
            cells(self.height, metrics.line_height()),
        );
    }

    #[must_use]
    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    // ============================================
    // Rendering
    // ============================================

    /// Paint the viewport into the frame.
    pub fn render(&mut self) -> &RenderResult {
        let selection = self.selection.get();
        self.renderer.render(
            &self.source,
            &mut self.frame,
            self.width,
            self.height,
            self.anchor,
            &selection,
        );
        self.refresh_cursor();
        self.renderer.last()
    }

    /// Frame drawn by the last render.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Result of the last render.
    #[must_use]
    pub fn last_render(&self) -> &RenderResult {
        self.renderer.last()
    }

    /// Vertical space used by the last render, for sizing a scrollbar.
    #[must_use]
    pub fn content_extent(&self) -> f32 {
        self.renderer.last().extent
    }

    // ============================================
    // Scrolling
    // ============================================

    #[must_use]
    pub fn scroll_anchor(&self) -> usize {
        self.anchor
    }

    /// Show `line` at the bottom of the viewport, clamped to the document.
    pub fn set_scroll_anchor(&mut self, line: usize) {
        let count = self.source.line_count();
        let clamped = clamp_anchor(line, count).unwrap_or(0);
        if clamped != line {
            emit_log_with(LogLevel::Debug, || {
                format!("scroll anchor {line} clamped to {clamped} of {count} lines")
            });
        }
        self.anchor = clamped;
        if count > 0 {
            self.last_seen = self.last_seen.max(clamped + 1);
        }
    }

    /// Whether the anchor is on the last line (or the document is empty).
    #[must_use]
    pub fn is_at_tail(&self) -> bool {
        self.anchor + 1 >= self.source.line_count()
    }

    /// Move the anchor by `delta` lines; positive scrolls toward newer lines.
    pub fn scroll_by(&mut self, delta: isize) {
        let target = if delta < 0 {
            self.anchor.saturating_sub(delta.unsigned_abs())
        } else {
            self.anchor.saturating_add(delta.unsigned_abs())
        };
        self.set_scroll_anchor(target);
    }

    pub fn page_up(&mut self) {
        self.scroll_by(-self.page_delta());
    }

    pub fn page_down(&mut self) {
        self.scroll_by(self.page_delta());
    }

    fn page_delta(&self) -> isize {
        isize::try_from(self.options.page_lines).unwrap_or(isize::MAX)
    }

    pub fn scroll_to_home(&mut self) {
        self.set_scroll_anchor(0);
    }

    pub fn scroll_to_end(&mut self) {
        self.set_scroll_anchor(usize::MAX);
    }

    // ============================================
    // Document notifications
    // ============================================

    /// Lines past the last one shown.
    #[must_use]
    pub fn unread_lines(&self) -> usize {
        self.source.line_count().saturating_sub(self.last_seen)
    }

    /// Banner text announcing unread lines, e.g. `"↓ 3 new lines ↓"`.
    #[must_use]
    pub fn new_line_indicator(&self) -> Option<String> {
        if !self.options.new_line_notification {
            return None;
        }
        match self.unread_lines() {
            0 => None,
            1 => Some("↓ 1 new line ↓".to_string()),
            n => Some(format!("↓ {n} new lines ↓")),
        }
    }

    /// `count` lines were appended at `first`; the document now has `size`.
    pub fn lines_added(&mut self, first: usize, count: usize, size: usize) {
        let was_at_tail = first == 0 || self.anchor + 1 >= first;
        if was_at_tail {
            self.anchor = size.saturating_sub(1);
            self.last_seen = size;
        } else {
            emit_log_with(LogLevel::Debug, || {
                format!("{count} lines added below anchor {}", self.anchor)
            });
        }
    }

    /// `num_trimmed` lines were removed from the head.
    pub fn trimmed(&mut self, new_size: usize, num_trimmed: usize) {
        self.anchor = self
            .anchor
            .saturating_sub(num_trimmed)
            .min(new_size.saturating_sub(1));
        self.last_seen = self.last_seen.saturating_sub(num_trimmed);
        self.selection.shift_up(num_trimmed);
    }

    /// Every line was removed.
    pub fn cleared(&mut self) {
        self.anchor = 0;
        self.last_seen = 0;
        self.selection.set(SelectionRange::default());
    }

    /// Dispatch a document event to the matching notification.
    pub fn handle_document_event(&mut self, event: &DocumentEvent) {
        match *event {
            DocumentEvent::LinesAdded { first, count, size } => {
                self.lines_added(first, count, size);
            }
            DocumentEvent::Trimmed {
                new_size,
                num_trimmed,
            } => self.trimmed(new_size, num_trimmed),
            DocumentEvent::Cleared => self.cleared(),
        }
    }

    // ============================================
    // Selection and copy
    // ============================================

    /// Normalized selection.
    #[must_use]
    pub fn get_selection(&self) -> SelectionRange {
        self.selection.get()
    }

    pub fn set_selection(&mut self, range: SelectionRange) {
        self.selection.set(range);
    }

    /// Where the pointer-driven selection currently is.
    #[must_use]
    pub fn selection_phase(&self) -> SelectionPhase {
        self.selection.phase()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Text of the selection, lines joined with `\n`.
    ///
    /// With `styled`, control codes are kept so the copy reproduces the
    /// formatting. Returns `None` for an empty selection.
    #[must_use]
    pub fn selected_text(&self, styled: bool) -> Option<String> {
        let range = self.selection.get();
        if range.is_empty() {
            return None;
        }
        let mut parts = Vec::new();
        for index in range.start.line..=range.end.line {
            let (Some(line), Some(chars)) = (self.source.line(index), range.line_range(index))
            else {
                continue;
            };
            parts.push(if styled {
                line.styled_substring(chars.start, chars.end)
            } else {
                line.substring(chars.start, chars.end)
            });
        }
        Some(parts.join("\n"))
    }

    /// Copy a non-empty selection to the clipboard.
    ///
    /// Clipboard failures are logged and otherwise ignored. Returns whether
    /// a copy was attempted.
    pub fn copy_selection(&mut self, include_control_codes: bool) -> bool {
        let Some(text) = self.selected_text(include_control_codes) else {
            return false;
        };
        if let Err(err) = self.clipboard.set_contents(&text) {
            emit_log_with(LogLevel::Warn, || format!("copy failed: {err}"));
        }
        true
    }

    /// The word around `offset` of `line`.
    #[must_use]
    pub fn word_at(&self, line: usize, offset: usize) -> Option<String> {
        let line = self.source.line(line)?;
        let extent = word_extent(line.text(), offset);
        (!extent.is_empty()).then(|| line.substring(extent.start, extent.end))
    }

    // ============================================
    // Pointer input
    // ============================================

    /// Register a listener for press, release and click notifications.
    pub fn add_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&PaneEvent) + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, kind: MouseEventType, input: PointerInput) {
        if self.listeners.is_empty() {
            return;
        }
        let event = PaneEvent {
            click: hit::classify_point(&self.source, &self.renderer.last().cache, input.position),
            kind,
            input,
        };
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    /// Classify the text under a viewport point.
    #[must_use]
    pub fn click_type_at(&self, point: Point) -> ClickType {
        hit::classify_point(&self.source, &self.renderer.last().cache, point)
    }

    /// Tooltip of the text under a viewport point.
    #[must_use]
    pub fn tooltip_at(&self, point: Point) -> Option<&str> {
        hit::tooltip_at(&self.source, &self.renderer.last().cache, point)
    }

    #[must_use]
    pub fn cursor_hint(&self) -> CursorHint {
        self.cursor
    }

    fn refresh_cursor(&mut self) {
        self.cursor = match self.hover {
            Some(point) if self.click_type_at(point).is_clickable() => CursorHint::Pointer,
            _ => CursorHint::Default,
        };
    }

    /// Handle one pointer event. Returns whether the pane needs repainting.
    pub fn handle_pointer(&mut self, event: PointerEvent, input: PointerInput) -> bool {
        match event {
            PointerEvent::Press => {
                let hit = hit::resolve_clamped(
                    &self.renderer.last().cache,
                    input.position,
                    self.bounds(),
                );
                let mut changed = false;
                if let (MouseButton::Left, Some(hit)) = (input.button, hit) {
                    changed = !self.selection.get().is_empty();
                    self.selection.press(hit.to_point(HitMode::Selection));
                }
                self.notify(MouseEventType::Pressed, input);
                changed
            }
            PointerEvent::Drag => {
                self.hover = Some(input.position);
                let hit = hit::resolve_clamped(
                    &self.renderer.last().cache,
                    input.position,
                    self.bounds(),
                );
                match hit {
                    Some(hit) if input.button == MouseButton::Left => {
                        let before = self.selection.raw();
                        self.selection.drag(hit.to_point(HitMode::Selection));
                        self.selection.raw() != before
                    }
                    _ => false,
                }
            }
            PointerEvent::Release => {
                let selected = input.button == MouseButton::Left && self.selection.release();
                let mut changed = false;
                if selected && self.options.quick_copy {
                    self.copy_selection(input.ctrl());
                    self.selection.clear();
                    changed = true;
                }
                self.notify(MouseEventType::Released, input);
                changed
            }
            PointerEvent::Click { count } => {
                let changed = input.button == MouseButton::Left && self.multi_click(count, input);
                self.notify(MouseEventType::Clicked, input);
                changed
            }
            PointerEvent::Move => {
                self.hover = Some(input.position);
                let before = self.cursor;
                self.refresh_cursor();
                self.cursor != before
            }
            PointerEvent::Wheel { delta } => {
                let before = self.anchor;
                let lines = isize::try_from(self.options.wheel_lines).unwrap_or(isize::MAX);
                self.scroll_by((delta as isize).saturating_mul(lines));
                self.anchor != before
            }
        }
    }

    /// Double click selects a word, triple click the whole line.
    fn multi_click(&mut self, count: u8, input: PointerInput) -> bool {
        if count < 2 {
            return false;
        }
        let Some(hit) = hit::resolve(&self.renderer.last().cache, input.position) else {
            return false;
        };
        let Some(line) = self.source.line(hit.line) else {
            return false;
        };
        if count == 2 {
            let extent = word_extent(line.text(), hit.offset);
            self.selection.select_word(hit.line, extent);
        } else {
            let len = line.char_len();
            self.selection.select_line(hit.line, len);
        }
        if self.options.quick_copy {
            self.copy_selection(input.shift());
            self.selection.clear();
        }
        true
    }
}

impl ScrollbackPane<ScrollbackDocument> {
    /// Apply updates posted through document handles and react to them.
    /// Returns the number of document events processed.
    pub fn pump(&mut self) -> usize {
        let events = self.source.drain_updates();
        for event in &events {
            self.handle_document_event(event);
        }
        events.len()
    }

    /// Stylise and append raw IRC lines.
    pub fn append_raw<I, T>(&mut self, raw_lines: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let events = self.source.append_raw(raw_lines);
        for event in &events {
            self.handle_document_event(event);
        }
    }
}
