#![allow(clippy::nursery)] // Test infra prioritizes clarity over pedantry
#![allow(clippy::pedantic)] // Test infra prioritizes clarity over pedantry
#![allow(dead_code)] // Each test binary uses a different subset

use std::sync::Once;
use textpane::{
    FontMetrics, FrameBuffer, LineLayoutEngine, LogLevel, RenderResult, SelectionRange,
    StyledLine, ViewportRenderer,
};
use tracing::Level;

static INIT: Once = Once::new();

/// Install a test subscriber and forward pane logs into it.
pub fn init_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_test_writer()
            .try_init();
        textpane::set_log_callback(|level, message| match level {
            LogLevel::Debug => tracing::debug!(target: "textpane", "{message}"),
            LogLevel::Info => tracing::info!(target: "textpane", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "textpane", "{message}"),
            LogLevel::Error => tracing::error!(target: "textpane", "{message}"),
        });
    });
}

/// `count` unstyled lines reading "line N".
pub fn numbered_lines(count: usize) -> Vec<StyledLine> {
    (0..count)
        .map(|i| StyledLine::plain(format!("line {i}")))
        .collect()
}

/// Lines from plain strings.
pub fn plain_lines(texts: &[&str]) -> Vec<StyledLine> {
    texts.iter().map(|t| StyledLine::plain(*t)).collect()
}

/// Renderer using one pixel per column and row.
pub fn cell_renderer() -> ViewportRenderer {
    ViewportRenderer::new(LineLayoutEngine::new(FontMetrics::TERMINAL))
}

/// Render `lines` into a fresh `width` x `height` frame.
pub fn render_frame(
    lines: &[StyledLine],
    width: u32,
    height: u32,
    anchor: usize,
    selection: &SelectionRange,
) -> (FrameBuffer, RenderResult) {
    let mut renderer = cell_renderer();
    let mut frame = FrameBuffer::new(width, height);
    let result = renderer
        .render(lines, &mut frame, width as f32, height as f32, anchor, selection)
        .clone();
    (frame, result)
}

/// Frame rows, with row numbers prefixed and trailing blanks trimmed.
pub fn numbered_rows(frame: &FrameBuffer) -> String {
    (0..frame.height())
        .map(|y| format!("{y:02}|{}", frame.row_text(y)))
        .collect::<Vec<_>>()
        .join("\n")
}
