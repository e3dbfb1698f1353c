//! Microbenchmarks for the `count()` hot path.
//!
//! Measures the cost of an increment against a mapped counter file and of
//! the disabled no-op path.
//!
//! Run with: `cargo bench -p tally -- count`

#![allow(missing_docs)]

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use tally::Recorder;
use tempfile::tempdir;

const NCOUNTER: usize = 1024;

/// Creates an enabled recorder backed by a file in a fresh tempdir.
fn setup_recorder() -> (Recorder<NCOUNTER>, tempfile::TempDir) {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("bench.counters");
    let recorder = Recorder::with_file(&path).unwrap();
    (recorder, temp_dir)
}

fn bench_count_single_label(c: &mut Criterion) {
    let (recorder, _dir) = setup_recorder();

    c.bench_function("count/single_label", |b| {
        b.iter(|| {
            recorder.count(black_box(0));
        });
    });
}

fn bench_count_spread_labels(c: &mut Criterion) {
    let (recorder, _dir) = setup_recorder();
    let mut label = 0usize;

    c.bench_function("count/spread_labels", |b| {
        b.iter(|| {
            label = (label + 1) % NCOUNTER;
            recorder.count(black_box(label));
        });
    });
}

fn bench_count_disabled(c: &mut Criterion) {
    let recorder: Recorder<NCOUNTER> = Recorder::disabled();

    c.bench_function("count/disabled", |b| {
        b.iter(|| {
            recorder.count(black_box(0));
        });
    });
}

criterion_group!(
    benches,
    bench_count_single_label,
    bench_count_spread_labels,
    bench_count_disabled,
);
criterion_main!(benches);
