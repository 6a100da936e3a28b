//! Criterion benchmarks for the channel buffer hot paths.
//!
//! The ingestion loop pushes one sample per channel per frame and the range
//! adapter scans whole windows on every good record, so push, snapshot, and
//! max_abs are the paths worth baselining.
//!
//! Run with: cargo bench --bench channel_buffer

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use motorscope::telemetry::channel::ChannelBuffer;

/// Push throughput at the window sizes the shipped configs use.
fn channel_buffer_push(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_buffer_push");

    for capacity in [100usize, 3000, 6000] {
        let mut buf = ChannelBuffer::new(capacity);
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(
            BenchmarkId::new("push", capacity),
            &capacity,
            |b, _| {
                let mut value = 0i32;
                b.iter(|| {
                    value = value.wrapping_add(17);
                    buf.push(black_box(value));
                });
            },
        );
    }

    group.finish();
}

/// Snapshot copies the whole window; measures the copy-on-read cost the
/// consumer pays per tick.
fn channel_buffer_snapshot(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_buffer_snapshot");

    for capacity in [100usize, 3000, 6000] {
        let mut buf = ChannelBuffer::new(capacity);
        for i in 0..capacity {
            buf.push(i as i32);
        }
        group.bench_with_input(
            BenchmarkId::new("snapshot", capacity),
            &capacity,
            |b, _| {
                b.iter(|| {
                    let snapshot = buf.snapshot();
                    black_box(snapshot);
                });
            },
        );
    }

    group.finish();
}

/// Whole-window absolute-max scan, paid once per range group per record.
fn channel_buffer_max_abs(c: &mut Criterion) {
    let mut group = c.benchmark_group("channel_buffer_max_abs");

    for capacity in [100usize, 3000, 6000] {
        let mut buf = ChannelBuffer::new(capacity);
        for i in 0..capacity {
            buf.push((i as i32).wrapping_mul(-3));
        }
        group.bench_with_input(
            BenchmarkId::new("max_abs", capacity),
            &capacity,
            |b, _| {
                b.iter(|| {
                    black_box(buf.max_abs());
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    channel_buffer_push,
    channel_buffer_snapshot,
    channel_buffer_max_abs
);
criterion_main!(benches);
