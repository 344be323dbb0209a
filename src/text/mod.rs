//! Styled scrollback text.
//!
//! Key types:
//!
//! - [`StyledLine`]: An immutable logical line made of [`StyledRun`]s
//! - [`SpanAttributes`]: Styling plus hyperlink/channel/nickname/tooltip targets
//! - [`LineSource`]: Read interface the renderer consumes
//! - [`ScrollbackDocument`]: Append-only store with retention and a
//!   cross-thread [`DocumentHandle`]
//!
//! Raw IRC formatting is handled by [`styliser`].
//!
//! # Examples
//!
//! ```
//! use textpane::text::{LineSource, ScrollbackDocument};
//!
//! let mut doc = ScrollbackDocument::new().with_retention(1000);
//! doc.append_raw(["<\x10alice\x10> hello", "<\x10bob\x10> hi"]);
//! assert_eq!(doc.line_count(), 2);
//! assert_eq!(doc.line(1).unwrap().text(), "<bob> hi");
//! ```

mod source;
mod styled;
pub mod styliser;

pub use source::{DocumentEvent, DocumentHandle, DocumentUpdate, LineSource, ScrollbackDocument};
pub use styled::{SpanAttributes, StyledLine, StyledRun};
