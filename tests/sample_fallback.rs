use std::collections::VecDeque;
use std::path::Path;

use flowgroove::samples::{BuiltinKit, LoaderChain, SampleVoice, WavLoader};
use flowgroove::synth::RenderMessage;
use flowgroove::{Engine, EngineConfig};

const SR: f32 = 48_000.0;

fn write_wav(path: &Path, sample_rate: u32, channels: u16, frames: usize) {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for i in 0..frames {
        let v = ((i as f32 * 0.05).sin() * 16_000.0) as i16;
        for _ in 0..channels {
            writer.write_sample(v).unwrap();
        }
    }
    writer.finalize().unwrap();
}

fn engine() -> Engine<VecDeque<RenderMessage>> {
    Engine::new(EngineConfig::default(), SR, VecDeque::new())
}

fn installed(engine: &mut Engine<VecDeque<RenderMessage>>) -> Vec<(SampleVoice, usize)> {
    engine
        .sink_mut()
        .drain(..)
        .filter_map(|msg| match msg {
            RenderMessage::InstallSample { voice, buffer } => Some((voice, buffer.len())),
            _ => None,
        })
        .collect()
}

#[test]
fn wav_files_win_over_the_builtin_kit() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("kick.wav"), 24_000, 2, 1_200);

    let mut engine = engine();
    let loaders = LoaderChain::new()
        .with(WavLoader)
        .with(BuiltinKit::new(SR as u32));
    assert_eq!(engine.load_samples(Some(dir.path()), &loaders), SampleVoice::COUNT);

    let kick = engine.samples().get(SampleVoice::Kick).unwrap();
    assert!(kick.source.ends_with("kick.wav"));
    assert_eq!(kick.buffer.len(), 1_200);
    assert!((kick.base_rate - 0.5).abs() < 1e-6);

    let snare = engine.samples().get(SampleVoice::Snare).unwrap();
    assert_eq!(snare.source, "builtin:snare");

    let sent = installed(&mut engine);
    assert_eq!(sent.len(), SampleVoice::COUNT);
    assert!(sent.contains(&(SampleVoice::Kick, 1_200)));
    assert!(engine.status().unavailable_voices.is_empty());
}

#[test]
fn undecodable_file_falls_through_to_builtin() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("hat.wav"), b"not a wav file").unwrap();

    let mut engine = engine();
    let loaders = LoaderChain::new()
        .with(WavLoader)
        .with(BuiltinKit::new(SR as u32));
    engine.load_samples(Some(dir.path()), &loaders);

    let hat = engine.samples().get(SampleVoice::Hat).unwrap();
    assert_eq!(hat.source, "builtin:hat");
}

#[test]
fn missing_everything_disables_voices_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    write_wav(&dir.path().join("snare.wav"), 48_000, 1, 480);

    let mut engine = engine();
    // no builtin kit: only the snare can load
    let loaders = LoaderChain::new().with(WavLoader);
    assert_eq!(engine.load_samples(Some(dir.path()), &loaders), 1);

    let status = engine.status();
    assert_eq!(status.unavailable_voices, vec!["kick", "rim", "hat", "openhat"]);
    assert!(status.last_error.is_some());
    assert!(engine.samples().is_unavailable(SampleVoice::Kick));
    assert!(engine.samples().is_ready(SampleVoice::Snare));

    // a second pass does not bring them back
    assert_eq!(engine.load_samples(Some(dir.path()), &loaders), 1);
    assert!(engine.start(0.0).is_ok());
}
