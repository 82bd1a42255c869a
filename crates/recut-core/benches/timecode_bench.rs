//! Benchmarks for recut-core timecode encoding.
//!
//! Run with: cargo bench -p recut-core

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_rational::Rational64;
use recut_core::{limit_denominator, FrameRate, RationalTimecode};

fn bench_exact_scaling(c: &mut Criterion) {
    let rate = FrameRate::FPS_30;

    c.bench_function("encode_whole_frames_30fps", |bencher| {
        bencher.iter(|| {
            RationalTimecode::from_frames(black_box(Rational64::from_integer(86_400)), rate)
        });
    });

    c.bench_function("encode_whole_frames_29.97", |bencher| {
        bencher.iter(|| {
            RationalTimecode::from_frames(
                black_box(Rational64::from_integer(86_400)),
                FrameRate::FPS_29_97,
            )
        });
    });
}

fn bench_fallback(c: &mut Criterion) {
    // 150% speed: lands on the 1/30 s grid
    c.bench_function("encode_float_150_percent", |bencher| {
        bencher.iter(|| RationalTimecode::from_frames_f64(black_box(1000.0 / 1.5), FrameRate::FPS_30));
    });
}

fn bench_limit_denominator(c: &mut Criterion) {
    let value = num_rational::Ratio::new(3_141_592_653_589_793i128, 1_000_000_000_000_000);

    c.bench_function("limit_denominator_1e6", |bencher| {
        bencher.iter(|| limit_denominator(black_box(value), 1_000_000));
    });
}

criterion_group!(
    benches,
    bench_exact_scaling,
    bench_fallback,
    bench_limit_denominator,
);
criterion_main!(benches);
