//! Fuzz target for the IRC styliser.
//!
//! Raw lines with arbitrary control codes must never panic, and the styled
//! line's text must always match the stripped text.

#![no_main]

use libfuzzer_sys::fuzz_target;
use textpane::text::styliser::{mark_links, strip_control_codes, styled_substring, stylise};

fuzz_target!(|data: &str| {
    let line = stylise(data);
    assert_eq!(line.text(), strip_control_codes(data));

    let len = line.char_len();
    for (start, end) in [(0, len), (len / 3, len / 2), (len / 2, len + 5)] {
        let styled = styled_substring(data, start, end);
        // Re-stylising a styled cut reproduces the plain cut.
        assert_eq!(strip_control_codes(&styled), line.substring(start, end));
    }

    let marked = mark_links(data, "#&");
    assert_eq!(strip_control_codes(&marked), strip_control_codes(data));
});
