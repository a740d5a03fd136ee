//! Benchmarks for the scheduler side: one engine tick.

use std::collections::VecDeque;
use std::hint::black_box;

use criterion::Criterion;
use flowgroove::samples::{BuiltinKit, LoaderChain};
use flowgroove::synth::RenderMessage;
use flowgroove::{Engine, EngineConfig};

use crate::SAMPLE_RATE;

pub fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/scheduler");

    let mut config = EngineConfig::default();
    config.tempo.fixed_bpm = Some(138.0);
    let mut engine = Engine::new(config, SAMPLE_RATE, VecDeque::<RenderMessage>::new());
    let loaders = LoaderChain::new().with(BuiltinKit::new(SAMPLE_RATE as u32));
    engine.load_samples(None, &loaders);
    let _ = engine.start(0.0);

    // 25 ms ticks, advancing through the arrangement
    let mut now = 0.0;
    group.bench_function("tick", |b| {
        b.iter(|| {
            now += 0.025;
            let report = engine.advance(black_box(now));
            engine.sink_mut().clear();
            report
        })
    });

    group.finish();
}
