//! Styled runs and logical lines.

use crate::style::Style;
use std::ops::Range;

/// Attributes attached to one run of a logical line.
///
/// Besides visual styling a run may be part of a clickable span (hyperlink,
/// channel or nickname reference) whose value is the span's target, and may
/// carry a tooltip.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanAttributes {
    /// Colors and formatting toggles.
    pub style: Style,
    /// Hyperlink target.
    pub hyperlink: Option<String>,
    /// Channel reference target.
    pub channel: Option<String>,
    /// Nickname reference target.
    pub nickname: Option<String>,
    /// Tooltip shown when hovering the run.
    pub tooltip: Option<String>,
}

impl SpanAttributes {
    /// Attributes with only visual styling.
    #[must_use]
    pub fn styled(style: Style) -> Self {
        Self {
            style,
            ..Self::default()
        }
    }

    /// Return these attributes with a hyperlink target.
    #[must_use]
    pub fn with_hyperlink(mut self, target: impl Into<String>) -> Self {
        self.hyperlink = Some(target.into());
        self
    }

    /// Return these attributes with a channel target.
    #[must_use]
    pub fn with_channel(mut self, target: impl Into<String>) -> Self {
        self.channel = Some(target.into());
        self
    }

    /// Return these attributes with a nickname target.
    #[must_use]
    pub fn with_nickname(mut self, target: impl Into<String>) -> Self {
        self.nickname = Some(target.into());
        self
    }

    /// Return these attributes with a tooltip.
    #[must_use]
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    /// Whether hovering this run should show a pointer cursor.
    #[must_use]
    pub fn is_clickable(&self) -> bool {
        self.hyperlink.is_some() || self.channel.is_some() || self.nickname.is_some()
    }
}

/// A run of text sharing one attribute set.
#[derive(Clone, Debug, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub attributes: SpanAttributes,
}

impl StyledRun {
    /// Create a new run.
    #[must_use]
    pub fn new(text: impl Into<String>, attributes: SpanAttributes) -> Self {
        Self {
            text: text.into(),
            attributes,
        }
    }

    /// Create a run without any attributes.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, SpanAttributes::default())
    }
}

/// An immutable logical line: styled runs plus their concatenated text.
///
/// Character offsets are counted in Unicode scalar values over the
/// concatenated text, independent of any wrapping.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledLine {
    runs: Vec<StyledRun>,
    text: String,
    /// Char offset at which each run starts.
    run_starts: Vec<usize>,
    char_len: usize,
    /// Raw text with IRC control codes, kept for styled copies.
    raw: Option<String>,
}

impl StyledLine {
    /// Build a line from runs. Empty runs are dropped.
    #[must_use]
    pub fn new(runs: Vec<StyledRun>) -> Self {
        let runs: Vec<StyledRun> = runs.into_iter().filter(|r| !r.text.is_empty()).collect();
        let mut text = String::new();
        let mut run_starts = Vec::with_capacity(runs.len());
        let mut char_len = 0;
        for run in &runs {
            run_starts.push(char_len);
            char_len += run.text.chars().count();
            text.push_str(&run.text);
        }
        Self {
            runs,
            text,
            run_starts,
            char_len,
            raw: None,
        }
    }

    /// A single unstyled run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(vec![StyledRun::plain(text)])
    }

    /// Attach the raw control-coded form this line was parsed from.
    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Visible text of the line.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Raw control-coded text, if this line came from the styliser.
    #[must_use]
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Runs in order.
    #[must_use]
    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    /// Length in chars.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Index of the run covering `offset`, if any.
    #[must_use]
    pub fn run_index_at(&self, offset: usize) -> Option<usize> {
        if offset >= self.char_len {
            return None;
        }
        // run_starts is sorted and starts at 0, so this is at least 1.
        Some(self.run_starts.partition_point(|&start| start <= offset) - 1)
    }

    /// Attributes of the run covering `offset`.
    #[must_use]
    pub fn attributes_at(&self, offset: usize) -> Option<&SpanAttributes> {
        self.run_index_at(offset).map(|idx| &self.runs[idx].attributes)
    }

    /// Visual style at `offset`, or [`Style::NONE`] past the end.
    #[must_use]
    pub fn style_at(&self, offset: usize) -> Style {
        self.attributes_at(offset).map_or(Style::NONE, |a| a.style)
    }

    /// Char range of each run.
    pub fn run_ranges(&self) -> impl Iterator<Item = (Range<usize>, &StyledRun)> {
        self.runs.iter().enumerate().map(|(idx, run)| {
            let start = self.run_starts[idx];
            let end = self
                .run_starts
                .get(idx + 1)
                .copied()
                .unwrap_or(self.char_len);
            (start..end, run)
        })
    }

    /// Plain substring over chars `[start, end)`, clamped to the line.
    #[must_use]
    pub fn substring(&self, start: usize, end: usize) -> String {
        let end = end.min(self.char_len);
        if start >= end {
            return String::new();
        }
        self.text.chars().skip(start).take(end - start).collect()
    }

    /// Substring over chars `[start, end)` with control codes preserved.
    ///
    /// Lines without a raw form fall back to the plain substring.
    #[must_use]
    pub fn styled_substring(&self, start: usize, end: usize) -> String {
        match &self.raw {
            Some(raw) => crate::text::styliser::styled_substring(raw, start, end),
            None => self.substring(start, end),
        }
    }
}

impl From<&str> for StyledLine {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for StyledLine {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> StyledLine {
        StyledLine::new(vec![
            StyledRun::plain("<"),
            StyledRun::new("nick", SpanAttributes::default().with_nickname("nick")),
            StyledRun::plain("> see "),
            StyledRun::new(
                "http://x.y",
                SpanAttributes::styled(Style::underline()).with_hyperlink("http://x.y"),
            ),
        ])
    }

    #[test]
    fn test_text_and_length() {
        let line = sample();
        assert_eq!(line.text(), "<nick> see http://x.y");
        assert_eq!(line.char_len(), 21);
        assert_eq!(line.runs().len(), 4);
    }

    #[test]
    fn test_attributes_at_run_boundaries() {
        let line = sample();
        assert_eq!(line.run_index_at(0), Some(0));
        assert_eq!(line.run_index_at(1), Some(1));
        assert_eq!(line.run_index_at(4), Some(1));
        assert_eq!(line.run_index_at(5), Some(2));
        assert_eq!(line.run_index_at(20), Some(3));
        assert_eq!(line.run_index_at(21), None);
        assert_eq!(
            line.attributes_at(2).and_then(|a| a.nickname.as_deref()),
            Some("nick")
        );
    }

    #[test]
    fn test_empty_runs_are_dropped() {
        let line = StyledLine::new(vec![StyledRun::plain(""), StyledRun::plain("ab")]);
        assert_eq!(line.runs().len(), 1);
        assert_eq!(line.run_index_at(0), Some(0));
        assert!(StyledLine::plain("").is_empty());
        assert_eq!(StyledLine::plain("").run_index_at(0), None);
    }

    #[test]
    fn test_substring_counts_chars() {
        let line = StyledLine::plain("héllo wörld");
        assert_eq!(line.substring(1, 5), "éllo");
        assert_eq!(line.substring(6, 100), "wörld");
        assert_eq!(line.substring(5, 2), "");
    }

    #[test]
    fn test_run_ranges() {
        let ranges: Vec<_> = sample().run_ranges().map(|(r, _)| r).collect();
        assert_eq!(ranges, vec![0..1, 1..5, 5..11, 11..21]);
    }
}
