//! Styled-line sources and the scrollback document store.
//!
//! The renderer only ever reads lines through [`LineSource`]. The bundled
//! [`ScrollbackDocument`] is owned by the UI thread; producer threads (e.g. a
//! network reader) post changes through a [`DocumentHandle`], and the UI thread
//! applies them with [`ScrollbackDocument::drain_updates`] before rendering.
//!
//! ```text
//! Network Thread                        UI Thread
//! --------------                        ---------
//! handle.append_raw(line) ──────────▶  drain_updates()
//!                                        apply, trim to retention
//!                                        return DocumentEvents
//!                                      render
//! ```

use crate::event::{LogLevel, emit_log_with};
use crate::text::styled::StyledLine;
use crate::text::styliser::{LinkMarker, stylise};
use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};

/// Read interface over an indexed sequence of styled lines.
pub trait LineSource {
    /// Total number of logical lines.
    fn line_count(&self) -> usize;

    /// The line at `index`, or `None` past the end.
    fn line(&self, index: usize) -> Option<&StyledLine>;
}

impl LineSource for [StyledLine] {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&StyledLine> {
        self.get(index)
    }
}

impl LineSource for Vec<StyledLine> {
    fn line_count(&self) -> usize {
        self.len()
    }

    fn line(&self, index: usize) -> Option<&StyledLine> {
        self.get(index)
    }
}

impl<T: LineSource + ?Sized> LineSource for &T {
    fn line_count(&self) -> usize {
        (**self).line_count()
    }

    fn line(&self, index: usize) -> Option<&StyledLine> {
        (**self).line(index)
    }
}

/// A change posted to a document from another thread.
#[derive(Clone, Debug)]
pub enum DocumentUpdate {
    /// Raw IRC lines to stylise and append.
    AppendRaw(Vec<String>),
    /// Pre-styled lines to append.
    Append(Vec<StyledLine>),
    /// Remove every line.
    Clear,
}

/// A change that has been applied to a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentEvent {
    /// `count` lines were appended starting at index `first`; the document
    /// now holds `size` lines.
    LinesAdded {
        first: usize,
        count: usize,
        size: usize,
    },
    /// `num_trimmed` lines were dropped from the head, leaving `new_size`.
    Trimmed { new_size: usize, num_trimmed: usize },
    /// Every line was removed.
    Cleared,
}

/// Cloneable, `Send` handle for posting updates to a [`ScrollbackDocument`].
#[derive(Clone, Debug)]
pub struct DocumentHandle {
    tx: Sender<DocumentUpdate>,
}

impl DocumentHandle {
    /// Post an update. Returns `false` once the document has been dropped.
    pub fn post(&self, update: DocumentUpdate) -> bool {
        self.tx.send(update).is_ok()
    }

    /// Post one raw line.
    pub fn append_raw(&self, line: impl Into<String>) -> bool {
        self.post(DocumentUpdate::AppendRaw(vec![line.into()]))
    }

    /// Post pre-styled lines.
    pub fn append_lines(&self, lines: Vec<StyledLine>) -> bool {
        self.post(DocumentUpdate::Append(lines))
    }

    /// Post a clear.
    pub fn clear(&self) -> bool {
        self.post(DocumentUpdate::Clear)
    }
}

/// Append-only scrollback store with head trimming.
#[derive(Debug)]
pub struct ScrollbackDocument {
    lines: VecDeque<StyledLine>,
    retention: Option<usize>,
    marker: Option<LinkMarker>,
    tx: Sender<DocumentUpdate>,
    rx: Receiver<DocumentUpdate>,
}

impl Default for ScrollbackDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollbackDocument {
    /// Create an empty document without a retention limit.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            lines: VecDeque::new(),
            retention: None,
            marker: None,
            tx,
            rx,
        }
    }

    /// Keep at most `limit` lines (at least one), trimming from the head.
    #[must_use]
    pub fn with_retention(mut self, limit: usize) -> Self {
        self.retention = Some(limit.max(1));
        self
    }

    /// Detect URLs and channel names in raw lines before styling them.
    #[must_use]
    pub fn with_link_detection(mut self, channel_prefixes: &str) -> Self {
        self.marker = Some(LinkMarker::new(channel_prefixes));
        self
    }

    /// Current retention limit.
    #[must_use]
    pub fn retention(&self) -> Option<usize> {
        self.retention
    }

    /// Create a handle producers can use from other threads.
    #[must_use]
    pub fn handle(&self) -> DocumentHandle {
        DocumentHandle {
            tx: self.tx.clone(),
        }
    }

    /// Stylise and append raw IRC lines.
    pub fn append_raw<I, S>(&mut self, raw_lines: I) -> Vec<DocumentEvent>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lines = raw_lines
            .into_iter()
            .map(|raw| match &self.marker {
                Some(marker) => stylise(&marker.mark(raw.as_ref())),
                None => stylise(raw.as_ref()),
            })
            .collect();
        self.append_lines(lines)
    }

    /// Append pre-styled lines, trimming to the retention limit.
    pub fn append_lines(&mut self, lines: Vec<StyledLine>) -> Vec<DocumentEvent> {
        let mut events = Vec::new();
        if lines.is_empty() {
            return events;
        }
        let first = self.lines.len();
        let count = lines.len();
        self.lines.extend(lines);
        events.push(DocumentEvent::LinesAdded {
            first,
            count,
            size: self.lines.len(),
        });

        if let Some(limit) = self.retention {
            if self.lines.len() > limit {
                let num_trimmed = self.lines.len() - limit;
                self.lines.drain(..num_trimmed);
                emit_log_with(LogLevel::Debug, || {
                    format!("scrollback trimmed {num_trimmed} lines to {limit}")
                });
                events.push(DocumentEvent::Trimmed {
                    new_size: self.lines.len(),
                    num_trimmed,
                });
            }
        }
        events
    }

    /// Remove every line.
    pub fn clear(&mut self) -> DocumentEvent {
        self.lines.clear();
        emit_log_with(LogLevel::Debug, || "scrollback cleared".to_string());
        DocumentEvent::Cleared
    }

    /// Apply every update posted through handles, in order.
    pub fn drain_updates(&mut self) -> Vec<DocumentEvent> {
        let mut events = Vec::new();
        while let Ok(update) = self.rx.try_recv() {
            match update {
                DocumentUpdate::AppendRaw(raw) => events.extend(self.append_raw(raw)),
                DocumentUpdate::Append(lines) => events.extend(self.append_lines(lines)),
                DocumentUpdate::Clear => events.push(self.clear()),
            }
        }
        events
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl LineSource for ScrollbackDocument {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, index: usize) -> Option<&StyledLine> {
        self.lines.get(index)
    }
}
