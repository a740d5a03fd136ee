//! Synthesized percussion kit, the last link of every fallback chain.

use std::f32::consts::TAU;

use super::loader::{DecodedSample, SampleLoader, SampleSource};
use super::SampleVoice;
use crate::dsp::one_pole::{cutoff_coef, OnePole};
use crate::dsp::oscillator::Noise;
use crate::error::LoadError;

#[derive(Debug, Clone, Copy)]
pub struct BuiltinKit {
    sample_rate: u32,
}

impl BuiltinKit {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(8_000),
        }
    }

    pub fn render(&self, voice: SampleVoice) -> Vec<f32> {
        let sr = self.sample_rate as f32;
        match voice {
            SampleVoice::Kick => kick(sr),
            SampleVoice::Snare => snare(sr),
            SampleVoice::Rim => rim(sr),
            SampleVoice::Hat => hat(sr, 0.045, 0x4a7),
            SampleVoice::OpenHat => hat(sr, 0.28, 0x9e3),
        }
    }
}

impl SampleLoader for BuiltinKit {
    fn load(&self, source: &SampleSource) -> Result<DecodedSample, LoadError> {
        match source {
            SampleSource::Builtin(voice) => Ok(DecodedSample {
                data: self.render(*voice),
                sample_rate: self.sample_rate,
            }),
            other => Err(LoadError::Unsupported(other.describe())),
        }
    }
}

fn frames(sr: f32, secs: f32) -> usize {
    (sr * secs) as usize
}

fn kick(sr: f32) -> Vec<f32> {
    let mut phase = 0.0f32;
    (0..frames(sr, 0.45))
        .map(|i| {
            let t = i as f32 / sr;
            // pitch sweep 150 Hz down to 45 Hz
            let freq = 45.0 + 105.0 * (-t * 28.0).exp();
            phase = (phase + freq / sr).fract();
            let body = (phase * TAU).sin() * (-t * 7.5).exp();
            let click = if t < 0.004 { 0.4 * (1.0 - t / 0.004) } else { 0.0 };
            (body + click).clamp(-1.0, 1.0)
        })
        .collect()
}

fn snare(sr: f32) -> Vec<f32> {
    let mut noise = Noise::new(0x51a7e);
    let mut hp = OnePole::new(0.0);
    let hp_coef = cutoff_coef(sr, 1_200.0);
    (0..frames(sr, 0.25))
        .map(|i| {
            let t = i as f32 / sr;
            let tone = (t * 185.0 * TAU).sin() * (-t * 30.0).exp() * 0.5;
            let rattle = hp.process_highpass(noise.next_sample(), hp_coef) * (-t * 16.0).exp();
            (tone + 0.8 * rattle).clamp(-1.0, 1.0)
        })
        .collect()
}

fn rim(sr: f32) -> Vec<f32> {
    (0..frames(sr, 0.06))
        .map(|i| {
            let t = i as f32 / sr;
            let env = (-t * 90.0).exp();
            ((t * 1_700.0 * TAU).sin() * 0.7 + (t * 420.0 * TAU).sin() * 0.3) * env
        })
        .collect()
}

fn hat(sr: f32, length: f32, seed: u32) -> Vec<f32> {
    let mut noise = Noise::new(seed);
    let mut hp = OnePole::new(0.0);
    let hp_coef = cutoff_coef(sr, 7_000.0);
    let decay = 5.0 / length;
    (0..frames(sr, length))
        .map(|i| {
            let t = i as f32 / sr;
            hp.process_highpass(noise.next_sample(), hp_coef) * (-t * decay).exp() * 0.7
        })
        .collect()
}
