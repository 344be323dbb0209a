//! Error types for textpane.
//!
//! Layout, rendering, hit testing and selection never fail: bad inputs are
//! clamped or yield a "no hit" result. The only fallible operations are the
//! ones that reach outside the pane, i.e. clipboard writes.

use std::fmt;
use std::io;

/// Result type alias for textpane operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for textpane operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error while writing to a clipboard sink (e.g. an OSC 52 terminal).
    Io(io::Error),
    /// The clipboard rejected the contents.
    Clipboard(String),
    /// No clipboard is available to the host.
    ClipboardUnavailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Clipboard(reason) => write!(f, "clipboard write failed: {reason}"),
            Self::ClipboardUnavailable => write!(f, "clipboard unavailable"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}
