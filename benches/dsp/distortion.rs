//! Benchmarks for waveshaping distortion.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgroove::dsp::distortion;

use crate::BLOCK_SIZES;

pub fn bench_distortion(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/distortion");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sine-like values)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.1).sin())
            .collect();
        let mut buffer = vec![0.0f32; size];

        // Soft clip - rational saturation
        group.bench_with_input(BenchmarkId::new("soft_clip", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = distortion::soft_clip(black_box(x), 1.4);
                }
            })
        });

        // Tanh - master bus drive
        group.bench_with_input(BenchmarkId::new("tanh_clip", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = distortion::tanh_clip(black_box(x), 2.0);
                }
            })
        });

        // Three asymmetric stages, as in the amp drone
        group.bench_with_input(BenchmarkId::new("asym_cascade", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    let mut s = black_box(x);
                    for drive in [2.0, 3.5, 5.0] {
                        s = distortion::asym_stage(s, drive);
                    }
                    *out = s;
                }
            })
        });
    }

    group.finish();
}
