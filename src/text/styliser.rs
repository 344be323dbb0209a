//! IRC control-code styliser.
//!
//! Raw scrollback lines carry mIRC-style formatting codes. [`stylise`] turns a
//! raw line into a [`StyledLine`]; [`styled_substring`] goes the other way,
//! cutting a visible range out of the raw text while keeping the codes needed
//! to reproduce its formatting.
//!
//! | Code | Meaning |
//! |---|---|
//! | `0x02` | bold toggle |
//! | `0x03` | colour: `\x03FG[,BG]`, 1-2 digit palette indices; bare code resets |
//! | `0x04` | hex colour: `\x04RRGGBB[,RRGGBB]`; bare code resets |
//! | `0x05` | hyperlink toggle |
//! | `0x06` | channel toggle |
//! | `0x07` | smilie marker (stripped) |
//! | `0x0F` | stop: reset everything |
//! | `0x10` | nickname toggle |
//! | `0x11` | fixed-pitch toggle |
//! | `0x13` | tooltip: `\x13tooltip\x13covered text\x13` |
//! | `0x16` | negate (inverse) toggle |
//! | `0x1D` | italic toggle |
//! | `0x1F` | underline toggle |
//!
//! # Examples
//!
//! ```
//! use textpane::text::styliser::{stylise, strip_control_codes};
//!
//! let line = stylise("<\x10nick\x10> \x02hi\x02 \x0304red");
//! assert_eq!(line.text(), "<nick> hi red");
//! assert_eq!(line.attributes_at(1).and_then(|a| a.nickname.as_deref()), Some("nick"));
//! assert_eq!(strip_control_codes("\x0312,01blue"), "blue");
//! ```

use crate::color::Rgba;
use crate::style::{Style, TextAttributes};
use crate::text::styled::{SpanAttributes, StyledLine, StyledRun};
use regex::Regex;
use std::fmt::Write as _;
use std::ops::Range;

pub const BOLD: char = '\x02';
pub const COLOUR: char = '\x03';
pub const HEX_COLOUR: char = '\x04';
pub const HYPERLINK: char = '\x05';
pub const CHANNEL: char = '\x06';
pub const SMILIE: char = '\x07';
pub const STOP: char = '\x0F';
pub const NICKNAME: char = '\x10';
pub const FIXED: char = '\x11';
pub const TOOLTIP: char = '\x13';
pub const NEGATE: char = '\x16';
pub const ITALIC: char = '\x1D';
pub const UNDERLINE: char = '\x1F';

/// Check if a char is one of the recognised formatting codes.
#[must_use]
pub const fn is_control_code(c: char) -> bool {
    matches!(
        c,
        BOLD | COLOUR
            | HEX_COLOUR
            | HYPERLINK
            | CHANNEL
            | SMILIE
            | STOP
            | NICKNAME
            | FIXED
            | TOOLTIP
            | NEGATE
            | ITALIC
            | UNDERLINE
    )
}

/// A colour as written in the raw text.
#[derive(Clone, Copy, Debug, PartialEq)]
enum ColourCode {
    Palette(u8),
    Hex(Rgba),
}

impl ColourCode {
    fn rgba(self) -> Rgba {
        match self {
            Self::Palette(index) => Rgba::from_irc_colour(index),
            Self::Hex(color) => color,
        }
    }

    fn hex_digits(self) -> String {
        let (r, g, b) = self.rgba().to_rgb_u8();
        format!("{r:02X}{g:02X}{b:02X}")
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Toggle(TextAttributes),
    Colour {
        fg: Option<ColourCode>,
        bg: Option<ColourCode>,
    },
    Hyperlink,
    Channel,
    Nickname,
    Smilie,
    Stop,
    Tooltip,
}

/// Splits raw text into text runs and formatting codes.
struct Tokens<'a> {
    raw: &'a str,
    pos: usize,
}

impl<'a> Tokens<'a> {
    fn new(raw: &'a str) -> Self {
        Self { raw, pos: 0 }
    }

    /// Read up to two ASCII digits starting at `at`.
    fn digits(&self, at: usize) -> Option<(u8, usize)> {
        let bytes = self.raw.as_bytes();
        let mut value = 0u8;
        let mut len = 0;
        while len < 2 {
            match bytes.get(at + len) {
                Some(b) if b.is_ascii_digit() => {
                    value = value * 10 + (b - b'0');
                    len += 1;
                }
                _ => break,
            }
        }
        (len > 0).then_some((value, len))
    }

    /// Read exactly six hex digits starting at `at`.
    fn hex(&self, at: usize) -> Option<Rgba> {
        let digits = self.raw.get(at..at + 6)?;
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Rgba::from_hex(digits)
    }

    fn colour(&self, at: usize) -> (Token<'a>, usize) {
        let Some((fg, fg_len)) = self.digits(at) else {
            return (Token::Colour { fg: None, bg: None }, at);
        };
        let mut end = at + fg_len;
        let mut bg = None;
        if self.raw.as_bytes().get(end) == Some(&b',') {
            if let Some((value, len)) = self.digits(end + 1) {
                bg = Some(ColourCode::Palette(value));
                end += 1 + len;
            }
        }
        (
            Token::Colour {
                fg: Some(ColourCode::Palette(fg)),
                bg,
            },
            end,
        )
    }

    fn hex_colour(&self, at: usize) -> (Token<'a>, usize) {
        let Some(fg) = self.hex(at) else {
            return (Token::Colour { fg: None, bg: None }, at);
        };
        let mut end = at + 6;
        let mut bg = None;
        if self.raw.as_bytes().get(end) == Some(&b',') {
            if let Some(color) = self.hex(end + 1) {
                bg = Some(ColourCode::Hex(color));
                end += 7;
            }
        }
        (
            Token::Colour {
                fg: Some(ColourCode::Hex(fg)),
                bg,
            },
            end,
        )
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = (Token<'a>, Range<usize>);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.pos;
        let rest = self.raw.get(start..).filter(|rest| !rest.is_empty())?;
        let first = rest.chars().next()?;

        if !is_control_code(first) {
            let len = rest.find(is_control_code).unwrap_or(rest.len());
            self.pos = start + len;
            return Some((Token::Text(&rest[..len]), start..self.pos));
        }

        // Every control code is a single ASCII byte.
        let after = start + 1;
        let (token, end) = match first {
            BOLD => (Token::Toggle(TextAttributes::BOLD), after),
            ITALIC => (Token::Toggle(TextAttributes::ITALIC), after),
            UNDERLINE => (Token::Toggle(TextAttributes::UNDERLINE), after),
            NEGATE => (Token::Toggle(TextAttributes::INVERSE), after),
            FIXED => (Token::Toggle(TextAttributes::FIXED), after),
            COLOUR => self.colour(after),
            HEX_COLOUR => self.hex_colour(after),
            HYPERLINK => (Token::Hyperlink, after),
            CHANNEL => (Token::Channel, after),
            NICKNAME => (Token::Nickname, after),
            SMILIE => (Token::Smilie, after),
            STOP => (Token::Stop, after),
            _ => (Token::Tooltip, after),
        };
        self.pos = end;
        Some((token, start..end))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
enum TooltipState {
    #[default]
    Off,
    /// Between the first and second `0x13`: collecting the tooltip text.
    Capturing(String),
    /// Between the second and third `0x13`: the covered text.
    Covering(String),
}

/// Formatting in effect at some position of a raw line.
#[derive(Clone, Debug, Default)]
struct FormatState {
    attributes: TextAttributes,
    fg: Option<ColourCode>,
    bg: Option<ColourCode>,
    hyperlink: bool,
    channel: bool,
    nickname: bool,
    tooltip: TooltipState,
}

impl FormatState {
    fn apply(&mut self, token: &Token<'_>) {
        match *token {
            Token::Text(text) => {
                if let TooltipState::Capturing(tip) = &mut self.tooltip {
                    tip.push_str(text);
                }
            }
            Token::Toggle(flag) => self.attributes.toggle(flag),
            Token::Colour { fg: None, bg: None } => {
                self.fg = None;
                self.bg = None;
            }
            Token::Colour { fg, bg } => {
                self.fg = fg.or(self.fg);
                self.bg = bg.or(self.bg);
            }
            Token::Hyperlink => self.hyperlink = !self.hyperlink,
            Token::Channel => self.channel = !self.channel,
            Token::Nickname => self.nickname = !self.nickname,
            Token::Smilie => {}
            Token::Stop => *self = Self::default(),
            Token::Tooltip => {
                self.tooltip = match std::mem::take(&mut self.tooltip) {
                    TooltipState::Off => TooltipState::Capturing(String::new()),
                    TooltipState::Capturing(tip) => TooltipState::Covering(tip),
                    TooltipState::Covering(_) => TooltipState::Off,
                };
            }
        }
    }

    fn is_capturing(&self) -> bool {
        matches!(self.tooltip, TooltipState::Capturing(_))
    }

    fn style(&self) -> Style {
        Style {
            fg: self.fg.map(ColourCode::rgba),
            bg: self.bg.map(ColourCode::rgba),
            attributes: self.attributes,
        }
    }

    fn tooltip(&self) -> Option<&str> {
        match &self.tooltip {
            TooltipState::Covering(tip) => Some(tip),
            _ => None,
        }
    }

    /// Control codes that reproduce this state from a clean slate.
    fn prefix(&self) -> String {
        let mut out = String::new();
        for (flag, code) in [
            (TextAttributes::BOLD, BOLD),
            (TextAttributes::ITALIC, ITALIC),
            (TextAttributes::UNDERLINE, UNDERLINE),
            (TextAttributes::INVERSE, NEGATE),
            (TextAttributes::FIXED, FIXED),
        ] {
            if self.attributes.contains(flag) {
                out.push(code);
            }
        }
        match (self.fg, self.bg) {
            (Some(ColourCode::Palette(fg)), None) => {
                let _ = write!(out, "{COLOUR}{fg:02}");
            }
            (Some(ColourCode::Palette(fg)), Some(ColourCode::Palette(bg))) => {
                let _ = write!(out, "{COLOUR}{fg:02},{bg:02}");
            }
            (Some(fg), None) => {
                let _ = write!(out, "{HEX_COLOUR}{}", fg.hex_digits());
            }
            (Some(fg), Some(bg)) => {
                let _ = write!(out, "{HEX_COLOUR}{},{}", fg.hex_digits(), bg.hex_digits());
            }
            (None, _) => {}
        }
        if self.hyperlink {
            out.push(HYPERLINK);
        }
        if self.channel {
            out.push(CHANNEL);
        }
        if self.nickname {
            out.push(NICKNAME);
        }
        if let Some(tip) = self.tooltip() {
            let _ = write!(out, "{TOOLTIP}{tip}{TOOLTIP}");
        }
        out
    }
}

/// Run under construction; span targets are resolved once the line ends.
struct PendingRun {
    text: String,
    style: Style,
    hyperlink: Option<usize>,
    channel: Option<usize>,
    nickname: Option<usize>,
    tooltip: Option<String>,
}

/// Convert a raw line with control codes into a [`StyledLine`].
///
/// Hyperlink, channel and nickname spans take the visible text between their
/// opening and closing codes as their target. Unclosed spans end with the line.
#[must_use]
pub fn stylise(raw: &str) -> StyledLine {
    let mut state = FormatState::default();
    let mut pending: Vec<PendingRun> = Vec::new();
    let mut values: Vec<String> = Vec::new();
    let mut slots: [Option<usize>; 3] = [None; 3];

    for (token, _) in Tokens::new(raw) {
        if let Token::Text(text) = token {
            if state.is_capturing() {
                state.apply(&token);
                continue;
            }
            for slot in slots.iter().flatten() {
                values[*slot].push_str(text);
            }
            let run = PendingRun {
                text: text.to_string(),
                style: state.style(),
                hyperlink: slots[0],
                channel: slots[1],
                nickname: slots[2],
                tooltip: state.tooltip().map(str::to_string),
            };
            match pending.last_mut() {
                Some(last) if same_attributes(last, &run) => last.text.push_str(text),
                _ => pending.push(run),
            }
            continue;
        }

        state.apply(&token);
        for (slot, open) in slots
            .iter_mut()
            .zip([state.hyperlink, state.channel, state.nickname])
        {
            match (open, *slot) {
                (true, None) => {
                    *slot = Some(values.len());
                    values.push(String::new());
                }
                (false, Some(_)) => *slot = None,
                _ => {}
            }
        }
    }

    let value = |slot: Option<usize>| slot.map(|idx| values[idx].clone());
    let runs = pending
        .into_iter()
        .map(|run| {
            StyledRun::new(
                run.text,
                SpanAttributes {
                    style: run.style,
                    hyperlink: value(run.hyperlink),
                    channel: value(run.channel),
                    nickname: value(run.nickname),
                    tooltip: run.tooltip,
                },
            )
        })
        .collect();
    StyledLine::new(runs).with_raw(raw)
}

fn same_attributes(a: &PendingRun, b: &PendingRun) -> bool {
    a.style == b.style
        && a.hyperlink == b.hyperlink
        && a.channel == b.channel
        && a.nickname == b.nickname
        && a.tooltip == b.tooltip
}

/// Remove every control code (and tooltip text) from a raw line.
#[must_use]
pub fn strip_control_codes(raw: &str) -> String {
    let mut state = FormatState::default();
    let mut out = String::with_capacity(raw.len());
    for (token, _) in Tokens::new(raw) {
        match token {
            Token::Text(text) if !state.is_capturing() => out.push_str(text),
            _ => state.apply(&token),
        }
    }
    out
}

/// Cut visible chars `[start, end)` out of a raw line, keeping formatting.
///
/// The result starts with the codes needed to reproduce the formatting active
/// at `start`, followed by the raw text (codes included) up to `end`.
#[must_use]
pub fn styled_substring(raw: &str, start: usize, end: usize) -> String {
    let mut out = String::new();
    if start >= end {
        return out;
    }
    let mut state = FormatState::default();
    let mut visible = 0usize;
    let mut started = false;

    for (token, range) in Tokens::new(raw) {
        if visible >= end {
            break;
        }
        match token {
            Token::Text(text) if !state.is_capturing() => {
                for ch in text.chars() {
                    if visible >= end {
                        break;
                    }
                    if visible == start {
                        let prefix = state.prefix();
                        out.push_str(&prefix);
                        // A comma right after a colour code would read as ",BG".
                        if ch == ',' && prefix.ends_with(|c: char| c.is_ascii_hexdigit()) {
                            out.push(BOLD);
                            out.push(BOLD);
                        }
                        started = true;
                    }
                    if started {
                        out.push(ch);
                    }
                    visible += 1;
                }
            }
            _ => {
                if started {
                    out.push_str(&raw[range]);
                }
                state.apply(&token);
            }
        }
    }
    out
}

/// Automatic hyperlink and channel detection for raw lines.
///
/// Detected URLs are wrapped in hyperlink codes and channel names (words
/// starting with one of the configured prefixes) in channel codes. Text that
/// is already inside a hyperlink, channel or nickname span is left alone.
#[derive(Clone, Debug)]
pub struct LinkMarker {
    url: Option<Regex>,
    channel: Option<Regex>,
}

const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"', ')', ']', '>'];

impl LinkMarker {
    /// Create a marker recognising channels with the given prefix chars
    /// (typically `"#&"`). An empty prefix set disables channel detection.
    #[must_use]
    pub fn new(channel_prefixes: &str) -> Self {
        let url = Regex::new(r"(?i)\b(?:[a-z][a-z0-9+.\-]*://|www\.)[^\s\x00-\x1F<>]+").ok();

        let mut prefixes: Vec<char> = channel_prefixes.chars().collect();
        prefixes.sort_unstable();
        prefixes.dedup();
        let channel = if prefixes.is_empty() {
            None
        } else {
            let class: String = prefixes
                .iter()
                .map(|c| regex::escape(&c.to_string()))
                .collect();
            Regex::new(&format!(r"(?:^|[\s(\[])([{class}][^\s,\x00-\x1F]+)")).ok()
        };

        Self { url, channel }
    }

    /// Return `raw` with detected links wrapped in control codes.
    #[must_use]
    pub fn mark(&self, raw: &str) -> String {
        let mut free: Vec<Range<usize>> = Vec::new();
        let mut state = FormatState::default();
        for (token, range) in Tokens::new(raw) {
            if matches!(token, Token::Text(_))
                && !state.is_capturing()
                && !state.hyperlink
                && !state.channel
                && !state.nickname
            {
                free.push(range);
            }
            state.apply(&token);
        }

        let mut marks: Vec<(Range<usize>, char)> = Vec::new();
        for range in &free {
            let text = &raw[range.clone()];
            if let Some(url) = &self.url {
                for m in url.find_iter(text) {
                    let found = trim_trailing(m.as_str());
                    if !found.is_empty() {
                        let start = range.start + m.start();
                        marks.push((start..start + found.len(), HYPERLINK));
                    }
                }
            }
            if let Some(channel) = &self.channel {
                for caps in channel.captures_iter(text) {
                    if let Some(m) = caps.get(1) {
                        let found = trim_trailing(m.as_str());
                        if found.chars().count() > 1 {
                            let start = range.start + m.start();
                            marks.push((start..start + found.len(), CHANNEL));
                        }
                    }
                }
            }
        }
        if marks.is_empty() {
            return raw.to_string();
        }

        marks.sort_by_key(|(range, _)| range.start);
        let mut out = String::with_capacity(raw.len() + marks.len() * 2);
        let mut pos = 0;
        for (range, code) in marks {
            if range.start < pos {
                continue;
            }
            out.push_str(&raw[pos..range.start]);
            out.push(code);
            out.push_str(&raw[range.clone()]);
            out.push(code);
            pos = range.end;
        }
        out.push_str(&raw[pos..]);
        out
    }
}

fn trim_trailing(found: &str) -> &str {
    found.trim_end_matches(TRAILING_PUNCTUATION)
}

/// Convenience wrapper around [`LinkMarker::mark`].
#[must_use]
pub fn mark_links(raw: &str, channel_prefixes: &str) -> String {
    LinkMarker::new(channel_prefixes).mark(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        let line = stylise("hello world");
        assert_eq!(line.text(), "hello world");
        assert_eq!(line.runs().len(), 1);
        assert!(line.runs()[0].attributes.style.is_empty());
        assert_eq!(line.raw(), Some("hello world"));
    }

    #[test]
    fn test_bold_toggle() {
        let line = stylise("a\x02b\x02c");
        assert_eq!(line.text(), "abc");
        assert_eq!(line.runs().len(), 3);
        assert!(line.style_at(1).attributes.contains(TextAttributes::BOLD));
        assert!(!line.style_at(2).attributes.contains(TextAttributes::BOLD));
    }

    #[test]
    fn test_colour_codes() {
        let line = stylise("\x0304,02red on navy\x03 plain");
        assert_eq!(line.text(), "red on navy plain");
        let style = line.style_at(0);
        assert_eq!(style.fg, Some(Rgba::RED));
        assert_eq!(style.bg, Some(Rgba::from_irc_colour(2)));
        assert_eq!(line.style_at(13).fg, None);
    }

    #[test]
    fn test_colour_keeps_background_when_only_fg_changes() {
        let line = stylise("\x0301,04a\x0309b");
        assert_eq!(line.style_at(1).bg, Some(Rgba::RED));
        assert_eq!(line.style_at(1).fg, Some(Rgba::from_irc_colour(9)));
    }

    #[test]
    fn test_colour_digits_limit() {
        // Only two digits belong to the code.
        let line = stylise("\x031234");
        assert_eq!(line.text(), "34");
        assert_eq!(line.style_at(0).fg, Some(Rgba::from_irc_colour(12)));
        // A comma without a digit is text.
        assert_eq!(stylise("\x034,x").text(), ",x");
    }

    #[test]
    fn test_hex_colour() {
        let line = stylise("\x04FF0000,0000FFx\x04y");
        assert_eq!(line.text(), "xy");
        assert_eq!(line.style_at(0).fg, Some(Rgba::RED));
        assert_eq!(line.style_at(0).bg, Some(Rgba::BLUE));
        assert_eq!(line.style_at(1).fg, None);
    }

    #[test]
    fn test_span_values_are_visible_text() {
        let line = stylise("see \x05http://a.b/\x02c\x02\x05 and \x06#rust\x06");
        assert_eq!(line.text(), "see http://a.b/c and #rust");
        let link = line.attributes_at(4).and_then(|a| a.hyperlink.clone());
        assert_eq!(link.as_deref(), Some("http://a.b/c"));
        // Bold split the span into two runs; both carry the full target.
        let link_end = line.attributes_at(15).and_then(|a| a.hyperlink.clone());
        assert_eq!(link_end.as_deref(), Some("http://a.b/c"));
        let channel = line.attributes_at(21).and_then(|a| a.channel.clone());
        assert_eq!(channel.as_deref(), Some("#rust"));
        assert!(line.attributes_at(17).is_some_and(|a| a.hyperlink.is_none()));
    }

    #[test]
    fn test_unclosed_span_closes_at_end() {
        let line = stylise("hi \x10bob");
        assert_eq!(
            line.attributes_at(3).and_then(|a| a.nickname.as_deref()),
            Some("bob")
        );
    }

    #[test]
    fn test_stop_resets_everything() {
        let line = stylise("\x02\x1F\x0304\x05x\x0Fy");
        assert!(!line.style_at(0).is_empty());
        assert!(line.attributes_at(0).is_some_and(|a| a.hyperlink.is_some()));
        assert!(line.style_at(1).is_empty());
        assert!(line.attributes_at(1).is_some_and(|a| a.hyperlink.is_none()));
    }

    #[test]
    fn test_tooltip() {
        let line = stylise("a\x13the tip\x13covered\x13b");
        assert_eq!(line.text(), "acoveredb");
        assert_eq!(
            line.attributes_at(1).and_then(|a| a.tooltip.as_deref()),
            Some("the tip")
        );
        assert!(line.attributes_at(8).is_some_and(|a| a.tooltip.is_none()));
    }

    #[test]
    fn test_smilie_and_fixed_are_stripped() {
        assert_eq!(strip_control_codes("\x07:)\x07 \x11mono\x11"), ":) mono");
        assert_eq!(strip_control_codes("\x13tip\x13x\x13"), "x");
    }

    #[test]
    fn test_styled_substring_prefix() {
        let raw = "ab\x02cd\x0304ef";
        assert_eq!(styled_substring(raw, 0, 2), "ab");
        assert_eq!(styled_substring(raw, 3, 6), "\x02d\x0304ef");
        assert_eq!(styled_substring(raw, 5, 6), "\x02\x0304f");
        assert_eq!(styled_substring(raw, 4, 4), "");
        assert_eq!(styled_substring(raw, 10, 20), "");
    }

    #[test]
    fn test_styled_substring_comma_after_colour() {
        let raw = "\x0304a\x02,5";
        let cut = styled_substring(raw, 1, 3);
        assert_eq!(cut, "\x02\x0304\x02\x02,5");
        assert_eq!(strip_control_codes(&cut), ",5");
        assert_eq!(stylise(&cut).style_at(0).fg, Some(Rgba::from_irc_colour(4)));
    }

    #[test]
    fn test_styled_substring_round_trips_visible_text() {
        let raw = "\x05http://x\x05 \x13tip\x13y\x13 z";
        let visible = strip_control_codes(raw);
        let len = visible.chars().count();
        for start in 0..len {
            for end in start..=len {
                let cut = styled_substring(raw, start, end);
                let expected: String = visible.chars().skip(start).take(end - start).collect();
                assert_eq!(strip_control_codes(&cut), expected, "cut {start}..{end}");
            }
        }
    }

    #[test]
    fn test_mark_links_urls() {
        let marked = mark_links("see http://example.com/a, or www.rust-lang.org.", "#");
        assert_eq!(
            marked,
            "see \x05http://example.com/a\x05, or \x05www.rust-lang.org\x05."
        );
    }

    #[test]
    fn test_mark_links_channels() {
        let marked = mark_links("join #rust or &local, not a#b", "#&");
        assert_eq!(marked, "join \x06#rust\x06 or \x06&local\x06, not a#b");
        assert_eq!(mark_links("#", "#"), "#");
    }

    #[test]
    fn test_mark_links_skips_existing_spans() {
        let raw = "\x05http://a.b\x05 \x10#nick\x10";
        assert_eq!(mark_links(raw, "#"), raw);
    }
}
