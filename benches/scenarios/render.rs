//! Benchmarks for a full render quantum.
//!
//! Everything the audio callback does per block: message drain, timed
//! dispatch, all synth voices, sample players with the send reverb, limiter.

use std::collections::VecDeque;
use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use flowgroove::config::SynthConfig;
use flowgroove::engine::AudioClock;
use flowgroove::samples::{BuiltinKit, SampleVoice};
use flowgroove::synth::{NoteKind, RenderMessage, Renderer, SynthParams};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn busy_renderer() -> Renderer<VecDeque<RenderMessage>> {
    let kit = BuiltinKit::new(SAMPLE_RATE as u32);
    let mut queue = VecDeque::new();
    for voice in SampleVoice::ALL {
        queue.push_back(RenderMessage::InstallSample {
            voice,
            buffer: kit.render(voice).into(),
        });
    }

    let mut params = SynthParams::default();
    params.lead_gain = 0.4;
    params.lead_gate = 0.5;
    params.guitar_gate = 1.0;
    queue.push_back(RenderMessage::Params(params));
    queue.push_back(RenderMessage::Gate {
        note_gate: 1.0,
        gate: 1.0,
    });
    queue.push_back(RenderMessage::Start);
    queue.push_back(RenderMessage::Note {
        kind: NoteKind::Melody,
        frame: 0,
        freq: 220.0,
        gain: 0.8,
    });
    // keep a handful of sample players busy
    for (i, voice) in SampleVoice::ALL.iter().cycle().take(12).enumerate() {
        queue.push_back(RenderMessage::Hit {
            voice: *voice,
            frame: i as u64,
            gain: 0.8,
            rate: 1.0,
            send: voice.send_level(),
        });
    }

    Renderer::new(queue, AudioClock::new(SAMPLE_RATE), &SynthConfig::default())
}

pub fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/render");

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        let mut renderer = busy_renderer();
        group.bench_with_input(BenchmarkId::new("quantum", size), &size, |b, _| {
            b.iter(|| {
                renderer.render_stereo(black_box(&mut left), black_box(&mut right));
            })
        });

        // Interleaved stereo as cpal hands it over
        let mut interleaved = vec![0.0f32; size * 2];
        let mut renderer = busy_renderer();
        group.bench_with_input(BenchmarkId::new("interleaved", size), &size, |b, _| {
            b.iter(|| {
                renderer.render_interleaved(black_box(&mut interleaved), 2);
            })
        });
    }

    group.finish();
}
