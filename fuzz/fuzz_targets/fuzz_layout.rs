//! Fuzz target for line layout, rendering and hit testing.
//!
//! Generates structured documents and viewports to check that wrapping always
//! covers the line and that every rendered part can be hit.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use textpane::hit::resolve;
use textpane::{
    FontMetrics, FrameBuffer, LineLayoutEngine, SelectionRange, StyledLine, TextPoint,
    ViewportRenderer, WrapMode,
};

#[derive(Arbitrary, Debug)]
struct Viewport {
    lines: Vec<String>,
    width: u8,
    height: u8,
    anchor: u16,
    char_wrap: bool,
    selection: (u8, u8, u8, u8),
}

fuzz_target!(|input: Viewport| {
    if input.lines.len() > 64 {
        return;
    }
    let mode = if input.char_wrap { WrapMode::Char } else { WrapMode::Word };
    let engine = LineLayoutEngine::new(FontMetrics::TERMINAL).with_wrap_mode(mode);
    let lines: Vec<StyledLine> = input.lines.iter().map(|l| StyledLine::plain(l.as_str())).collect();

    let width = f32::from(input.width);
    for line in &lines {
        let parts = engine.layout(line, width);
        assert!(!parts.is_empty());
        if width > 0.0 {
            let total: usize = parts.iter().map(|p| p.char_count()).sum();
            assert_eq!(total, line.char_len());
        }
    }

    let (a, b, c, d) = input.selection;
    let selection = SelectionRange::new(
        TextPoint::new(usize::from(a), usize::from(b)),
        TextPoint::new(usize::from(c), usize::from(d)),
    );
    let mut renderer = ViewportRenderer::new(engine);
    let mut frame = FrameBuffer::new(u32::from(input.width), u32::from(input.height));
    let height = f32::from(input.height);
    let result = renderer.render(
        &lines,
        &mut frame,
        width,
        height,
        usize::from(input.anchor),
        &selection,
    );

    if !lines.is_empty() && height > 0.0 {
        assert!(result.extent >= height || result.topmost_line == Some(0));
    }
    for (key, part) in result.cache.iter() {
        if part.rect.y >= 0.0 && part.rect.width > 0.0 {
            let hit = resolve(&result.cache, part.rect.center()).expect("center hit");
            assert_eq!((hit.line, hit.part), (key.line, key.part));
        }
    }
});
