//! Line layout and styliser performance benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use textpane::text::styliser::{mark_links, strip_control_codes, stylise};
use textpane::{FontMetrics, LineLayoutEngine, StyledLine, WrapMode};

const CHAT_LINE: &str = "<\x10alice\x10> has anyone tried \x02\x0304the new build\x03\x02? \
                         logs at https://example.org/ci/1234 and discussion in #rust-dev";

fn layout_widths(c: &mut Criterion) {
    let engine = LineLayoutEngine::new(FontMetrics::TERMINAL);
    let line = stylise(CHAT_LINE);
    let mut group = c.benchmark_group("layout_width");
    for width in [20.0f32, 80.0, 200.0] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| engine.layout(black_box(&line), black_box(width)))
        });
    }
    group.finish();
}

fn layout_scripts(c: &mut Criterion) {
    let engine = LineLayoutEngine::new(FontMetrics::TERMINAL);
    let ascii = StyledLine::plain("lorem ipsum dolor sit amet ".repeat(20));
    let cjk = StyledLine::plain("日本語のテキストを折り返す".repeat(20));
    let rtl = StyledLine::plain("שלום עולם מה שלומך ".repeat(20));

    c.bench_function("layout_ascii_word", |b| {
        b.iter(|| engine.layout(black_box(&ascii), 80.0))
    });
    let char_engine = engine.clone().with_wrap_mode(WrapMode::Char);
    c.bench_function("layout_ascii_char", |b| {
        b.iter(|| char_engine.layout(black_box(&ascii), 80.0))
    });
    c.bench_function("layout_cjk", |b| b.iter(|| engine.layout(black_box(&cjk), 80.0)));
    c.bench_function("layout_rtl", |b| b.iter(|| engine.layout(black_box(&rtl), 80.0)));
}

fn styliser(c: &mut Criterion) {
    c.bench_function("stylise_chat_line", |b| b.iter(|| stylise(black_box(CHAT_LINE))));
    c.bench_function("strip_control_codes", |b| {
        b.iter(|| strip_control_codes(black_box(CHAT_LINE)))
    });
    c.bench_function("mark_links", |b| b.iter(|| mark_links(black_box(CHAT_LINE), "#&")));
}

criterion_group!(benches, layout_widths, layout_scripts, styliser);
criterion_main!(benches);
