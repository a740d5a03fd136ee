//! Benchmarks for the state-variable and one-pole filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgroove::dsp::filter::{SVFilter, SvfCoefs};
use flowgroove::dsp::one_pole::{cutoff_coef, OnePole};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Lowpass SVF
        let mut filter = SVFilter::lowpass();
        let coefs = SvfCoefs::new(SAMPLE_RATE, 1_000.0, 0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("svf_lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(coefs));
            })
        });

        // Notch SVF, as on the amp drone
        let mut filter = SVFilter::notch();
        let coefs = SvfCoefs::new(SAMPLE_RATE, 700.0, 0.3);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("svf_notch", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(coefs));
            })
        });

        // One-pole tone filter
        let mut tone = OnePole::new(0.0);
        let coef = cutoff_coef(SAMPLE_RATE, 1_800.0);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("one_pole", size), &size, |b, _| {
            b.iter(|| {
                for (out, &x) in buffer.iter_mut().zip(input.iter()) {
                    *out = tone.process(black_box(x), coef);
                }
            })
        });
    }

    group.finish();
}
