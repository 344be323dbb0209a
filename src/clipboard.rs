//! Clipboard sinks for copied selections.
//!
//! The pane only ever writes to a clipboard. Hosts plug in their own
//! [`Clipboard`] or use one of the two provided sinks:
//!
//! - [`MemoryClipboard`]: shared in-memory store, handy for tests and for
//!   hosts that forward the text themselves
//! - [`Osc52Clipboard`]: OSC 52 escape sequence written to a terminal

use crate::error::{Error, Result};
use base64::Engine;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Destination for copied text.
pub trait Clipboard {
    /// Replace the clipboard contents.
    fn set_contents(&mut self, text: &str) -> Result<()>;
}

/// Clipboard that is never available.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoClipboard;

impl Clipboard for NoClipboard {
    fn set_contents(&mut self, _text: &str) -> Result<()> {
        Err(Error::ClipboardUnavailable)
    }
}

/// In-memory clipboard. Clones share the same contents.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last text written, if any.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().ok().and_then(|guard| guard.clone())
    }
}

impl Clipboard for MemoryClipboard {
    fn set_contents(&mut self, text: &str) -> Result<()> {
        let mut guard = self
            .contents
            .lock()
            .map_err(|_| Error::Clipboard("clipboard lock poisoned".to_string()))?;
        *guard = Some(text.to_string());
        Ok(())
    }
}

/// Clipboard that asks the terminal to copy via OSC 52.
///
/// Writes `ESC ] 52 ; c ; <base64> BEL` to the wrapped writer.
#[derive(Debug)]
pub struct Osc52Clipboard<W: Write> {
    writer: W,
}

impl<W: Write> Osc52Clipboard<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Clipboard for Osc52Clipboard<W> {
    fn set_contents(&mut self, text: &str) -> Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        write!(self.writer, "\x1b]52;c;{encoded}\x07")?;
        self.writer.flush()?;
        Ok(())
    }
}
