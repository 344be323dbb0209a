//! Viewport render and hit-test performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use textpane::hit::resolve;
use textpane::text::styliser::stylise;
use textpane::{
    FontMetrics, FrameBuffer, LineLayoutEngine, Point, SelectionRange, StyledLine, TextPoint,
    ViewportRenderer,
};

fn document(lines: usize) -> Vec<StyledLine> {
    (0..lines)
        .map(|i| {
            stylise(&format!(
                "[12:{:02}] <\x10user{}\x10> message number {i} with some \x02bold\x02 text \
                 that wraps on narrow panes",
                i % 60,
                i % 7
            ))
        })
        .collect()
}

fn render_viewport(c: &mut Criterion) {
    let doc = document(100_000);
    let mut group = c.benchmark_group("render_viewport");
    for (width, height) in [(80u32, 24u32), (200, 60)] {
        let mut renderer = ViewportRenderer::new(LineLayoutEngine::new(FontMetrics::TERMINAL));
        let mut frame = FrameBuffer::new(width, height);
        let none = SelectionRange::default();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{width}x{height}")),
            &(width, height),
            |b, &(w, h)| {
                b.iter(|| {
                    renderer
                        .render(&doc, &mut frame, w as f32, h as f32, black_box(50_000), &none)
                        .extent
                })
            },
        );
    }
    group.finish();
}

fn render_with_selection(c: &mut Criterion) {
    let doc = document(1_000);
    let mut renderer = ViewportRenderer::new(LineLayoutEngine::new(FontMetrics::TERMINAL));
    let mut frame = FrameBuffer::new(80, 24);
    let selection = SelectionRange::new(TextPoint::new(980, 5), TextPoint::new(995, 12));
    c.bench_function("render_selection_80x24", |b| {
        b.iter(|| {
            renderer
                .render(&doc, &mut frame, 80.0, 24.0, 999, black_box(&selection))
                .extent
        })
    });
}

fn hit_testing(c: &mut Criterion) {
    let doc = document(1_000);
    let mut renderer = ViewportRenderer::new(LineLayoutEngine::new(FontMetrics::TERMINAL));
    let mut frame = FrameBuffer::new(80, 24);
    let cache = renderer
        .render(&doc, &mut frame, 80.0, 24.0, 999, &SelectionRange::default())
        .cache
        .clone();
    c.bench_function("hit_resolve", |b| {
        b.iter(|| resolve(&cache, black_box(Point::new(37.3, 12.5))))
    });
}

criterion_group!(benches, render_viewport, render_with_selection, hit_testing);
criterion_main!(benches);
