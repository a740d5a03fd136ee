//! Benchmarks for oscillator waveform generation.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgroove::dsp::oscillator::{sine, triangle, BlepSaw, Noise, Phasor};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - uses sin() transcendental function
        let mut phasor = Phasor::new(0.0);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    let (phase, _) = phasor.tick(black_box(440.0), SAMPLE_RATE);
                    *out = sine(phase);
                }
            })
        });

        // Triangle - absolute value
        let mut phasor = Phasor::new(0.0);
        group.bench_with_input(BenchmarkId::new("triangle", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    let (phase, _) = phasor.tick(black_box(440.0), SAMPLE_RATE);
                    *out = triangle(phase);
                }
            })
        });

        // Band-limited saw - polyBLEP correction near the wrap
        let mut saw = BlepSaw::with_phase(0.0);
        group.bench_with_input(BenchmarkId::new("blep_saw", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = saw.next_sample(black_box(440.0), SAMPLE_RATE);
                }
            })
        });

        // Noise - xorshift PRNG
        let mut noise = Noise::new(0x5eed);
        group.bench_with_input(BenchmarkId::new("noise", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = noise.next_sample();
                }
            })
        });
    }

    group.finish();
}
