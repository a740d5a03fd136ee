//! Benchmarks for the percussion send reverb.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgroove::dsp::reverb::SendReverb;

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    // room sizes across the range the macros sweep
    let settings: &[(&str, f32)] = &[("tight", 0.2), ("default", 0.6), ("blast", 0.95)];

    for &size in BLOCK_SIZES {
        // A snare-ish burst followed by silence
        let input: Vec<f32> = (0..size)
            .map(|i| if i < 32 { 1.0 - i as f32 / 32.0 } else { 0.0 })
            .collect();

        for &(name, room) in settings {
            let mut reverb = SendReverb::new(SAMPLE_RATE);
            reverb.set_size(room);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    input
                        .iter()
                        .map(|&x| reverb.process(black_box(x)))
                        .sum::<f32>()
                })
            });
        }
    }

    group.finish();
}
