//! Benchmarks for lane allocation and track rendering at varying stream sizes.
//!
//! Run with: `cargo bench --bench layout_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use chatroll::layout::{layout, LayoutConfig, OccupancyPolicy};
use chatroll::{Comment, TrackEmitter};

/// Generate a chat stream with `count` comments at roughly 20 per second.
///
/// Lengths cycle between one-word reactions and full sentences so lanes see
/// a realistic mix of slow and fast comments.
fn generate_stream(count: u64) -> Vec<Comment> {
    const MESSAGES: [&str; 6] = [
        "lol",
        "GG",
        "that was actually insane",
        "no way he hits that shot",
        "first time here, love the stream",
        "KEKW",
    ];
    (0..count)
        .map(|i| {
            let text = MESSAGES[(i % MESSAGES.len() as u64) as usize];
            Comment::new(i * 5, format!("user{}", i % 97), text)
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for count in [1_000_u64, 10_000, 100_000] {
        let comments = generate_stream(count);
        group.throughput(Throughput::Elements(count));

        let config = LayoutConfig::default();
        group.bench_with_input(BenchmarkId::new("most_recent", count), &comments, |b, comments| {
            b.iter(|| layout(black_box(comments), &config));
        });

        let config = LayoutConfig::default().with_occupancy(OccupancyPolicy::StillVisible);
        group.bench_with_input(BenchmarkId::new("still_visible", count), &comments, |b, comments| {
            b.iter(|| layout(black_box(comments), &config));
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let emitter = TrackEmitter::new(LayoutConfig::default());
    for count in [1_000_u64, 10_000] {
        let comments = generate_stream(count);
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &comments, |b, comments| {
            b.iter(|| emitter.render(black_box(comments)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_render);
criterion_main!(benches);
