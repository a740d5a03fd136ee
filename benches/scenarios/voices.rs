//! Benchmarks for the synth voices.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgroove::dsp::ArCoefs;
use flowgroove::synth::drone::{Drone, DroneInput};
use flowgroove::synth::lead::Lead;
use flowgroove::synth::pad::{bright_coef, PadBank};
use flowgroove::synth::string::{string_bright_coef, AmpDrone, KarplusString};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let coefs = ArCoefs::from_ms(SAMPLE_RATE, 10.0, 300.0);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Drone bed: two triangles, sub and noise
        let mut drone = Drone::new(SAMPLE_RATE);
        let input = DroneInput {
            freq: 55.0,
            detune: 0.006,
            sub: 0.5,
            noise: 0.02,
            pulse_amt: 0.3,
            tick_amt: 0.2,
        };
        group.bench_with_input(BenchmarkId::new("drone", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = drone.next_sample(black_box(&input));
                }
            })
        });

        // Four detuned saws through a one-pole
        let mut pad = PadBank::new(SAMPLE_RATE);
        let tone = bright_coef(SAMPLE_RATE, 0.4);
        group.bench_with_input(BenchmarkId::new("pad", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = pad.next_sample(black_box(220.0), 0.006, tone);
                }
            })
        });

        // FM saw with envelope
        let mut lead = Lead::new(SAMPLE_RATE);
        let tone = bright_coef(SAMPLE_RATE, 0.5);
        group.bench_with_input(BenchmarkId::new("lead", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = lead.next_sample(black_box(329.63), tone, 1.0, coefs);
                }
            })
        });

        // Plucked string, re-plucked every block so it never decays to zero
        let mut string = KarplusString::new(SAMPLE_RATE);
        let tone = string_bright_coef(SAMPLE_RATE, 0.6);
        group.bench_with_input(BenchmarkId::new("karplus", size), &size, |b, _| {
            b.iter(|| {
                string.pluck(black_box(110.0), 0.8);
                for out in buffer.iter_mut() {
                    *out = string.next_sample(tone);
                }
            })
        });

        // Distortion cascade, shelf and notch
        let mut amp = AmpDrone::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("amp_drone", size), &size, |b, _| {
            b.iter(|| {
                for out in buffer.iter_mut() {
                    *out = amp.next_sample(black_box(82.4), 1.0, coefs);
                }
            })
        });
    }

    group.finish();
}
