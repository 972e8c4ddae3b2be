//! Reveal pipeline benchmark: layout, rect extraction, tokenization.
//!
//! Target: a full delta-to-rects pass well under one 16ms frame.

use cascade::{
    rects_for_range, safe_chunks, MarkdownTokenizer, MonospaceLayout, RevealSession,
    SessionConfig, Segmentation, TextLayout, TokenizerConfig,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

/// Build a paragraph-heavy document of roughly `target_len` characters.
fn sample_text(target_len: usize) -> String {
    let para = "The quick brown fox jumps over the lazy dog, while a second \
                fox waits in the tall grass for its turn to cross the field.\n\n";
    let mut text = String::with_capacity(target_len + para.len());
    while text.len() < target_len {
        text.push_str(para);
    }
    text
}

/// The same document with inline markdown sprinkled in.
fn sample_markdown(target_len: usize) -> String {
    let para = "The **quick** brown fox `jumps` over the _lazy_ dog, while a \
                ~~slow~~ second fox waits in the tall grass.\n\n";
    let mut text = String::with_capacity(target_len + para.len());
    while text.len() < target_len {
        text.push_str(para);
    }
    text
}

fn layout_wrap(c: &mut Criterion) {
    let text = sample_text(10_000);

    c.bench_function("layout_10k_chars_80col", |b| {
        b.iter(|| MonospaceLayout::new(black_box(&text), 80));
    });
}

fn rects_segmentation(c: &mut Criterion) {
    let text = sample_text(10_000);
    let layout = MonospaceLayout::new(&text, 80);
    let last = layout.char_count() - 1;

    let mut group = c.benchmark_group("rects_10k_chars");
    for (name, segmentation) in [
        ("line", Segmentation::Line),
        ("word", Segmentation::Word),
        ("chunk8", Segmentation::Chunk(8)),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &segmentation, |b, &s| {
            b.iter(|| rects_for_range(black_box(&layout), 0, last, s));
        });
    }
    group.finish();
}

fn tokenizer_throughput(c: &mut Criterion) {
    let text = sample_markdown(10_000);
    let fragments: Vec<&str> = text
        .as_bytes()
        .chunks(8)
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect();

    c.bench_function("tokenizer_10k_chars_8byte_frags", |b| {
        b.iter(|| {
            let mut tokenizer = MarkdownTokenizer::new();
            let mut emitted = 0usize;
            for fragment in &fragments {
                for chunk in tokenizer.push(black_box(fragment)) {
                    emitted += chunk.len();
                }
            }
            for chunk in tokenizer.finish() {
                emitted += chunk.len();
            }
            emitted
        })
    });
}

fn safe_chunks_iterator(c: &mut Criterion) {
    let text = sample_markdown(10_000);
    let fragments: Vec<String> = text
        .as_bytes()
        .chunks(8)
        .map(|chunk| String::from_utf8(chunk.to_vec()).unwrap())
        .collect();

    c.bench_function("safe_chunks_10k_chars", |b| {
        b.iter(|| {
            safe_chunks(fragments.iter().cloned(), TokenizerConfig::default())
                .map(|chunk| chunk.len())
                .sum::<usize>()
        })
    });
}

fn session_streaming(c: &mut Criterion) {
    let text = sample_text(2_000);
    let fragments: Vec<&str> = text
        .as_bytes()
        .chunks(12)
        .map(|chunk| std::str::from_utf8(chunk).unwrap())
        .collect();
    let tick = Duration::from_millis(16);

    c.bench_function("session_stream_2k_chars", |b| {
        b.iter(|| {
            let mut session = RevealSession::new(80, SessionConfig::default());
            for fragment in &fragments {
                session.push_delta(black_box(fragment), &mut ());
                session.tick(tick, &mut ());
            }
            session.finish(&mut ());
            session.snapshot().len()
        })
    });
}

criterion_group!(
    benches,
    layout_wrap,
    rects_segmentation,
    tokenizer_throughput,
    safe_chunks_iterator,
    session_streaming
);
criterion_main!(benches);
