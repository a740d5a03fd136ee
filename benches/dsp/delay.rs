//! Benchmarks for delay line operations.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgroove::dsp::delay::{DelayLine, DelaySettings, StereoDelay};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Delay times in seconds
    let delay_times: &[f32] = &[0.01, 0.1, 1.0];

    for &size in BLOCK_SIZES {
        // Generate a test signal
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 * 0.1).sin())
            .collect();

        for &secs in delay_times {
            let mut delay = StereoDelay::new(SAMPLE_RATE, 2.0);
            let settings = DelaySettings {
                delay_samples: secs * SAMPLE_RATE,
                feedback: 0.35,
                mix: 0.25,
            };
            group.bench_with_input(
                BenchmarkId::new(format!("stereo_{}ms", (secs * 1000.0) as u32), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &x in &input {
                            let (l, r) = delay.process(black_box(x), settings);
                            sum += l + r;
                        }
                        sum
                    })
                },
            );
        }

        // Fractional read with a moving offset
        let mut line = DelayLine::new(4_800);
        for &sample in &input {
            line.write(sample);
        }
        group.bench_with_input(
            BenchmarkId::new("read_interpolated", size),
            &size,
            |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for i in 0..size {
                        let delay_time = 480.0 + (i as f32 * 0.1).sin() * 48.0;
                        sum += line.read(black_box(delay_time));
                    }
                    sum
                })
            },
        );
    }

    group.finish();
}
