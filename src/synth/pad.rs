//! Pad bank: detuned polyBLEP saws with chorus-rate drift.

use crate::dsp::distortion::soft_clip;
use crate::dsp::lfo::Lfo;
use crate::dsp::one_pole::{cutoff_coef, OnePole};
use crate::dsp::oscillator::BlepSaw;

pub const PAD_VOICES: usize = 4;

/// Interval of each oscillator over the pad root: root, root, fifth, octave.
const RATIOS: [f32; PAD_VOICES] = [1.0, 1.0, 1.498_307, 2.0];
/// Static detune spread, scaled by the detune parameter.
const SPREAD: [f32; PAD_VOICES] = [-1.0, 1.0, -0.5, 0.5];
const CHORUS_HZ: [f32; PAD_VOICES] = [0.13, 0.17, 0.21, 0.11];

#[derive(Debug, Clone)]
pub struct PadBank {
    sample_rate: f32,
    saws: [BlepSaw; PAD_VOICES],
    chorus: [Lfo; PAD_VOICES],
    tone: OnePole,
}

/// Brightness 0..1 to the tone filter coefficient, 200 Hz to 8 kHz.
pub fn bright_coef(sample_rate: f32, bright: f32) -> f32 {
    let b = bright.clamp(0.0, 1.0);
    cutoff_coef(sample_rate, 200.0 + b * b * 7_800.0)
}

impl PadBank {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            saws: [
                BlepSaw::with_phase(0.0),
                BlepSaw::with_phase(0.37),
                BlepSaw::with_phase(0.61),
                BlepSaw::with_phase(0.83),
            ],
            chorus: [
                Lfo::with_phase(0.0),
                Lfo::with_phase(0.25),
                Lfo::with_phase(0.5),
                Lfo::with_phase(0.75),
            ],
            tone: OnePole::new(0.0),
        }
    }

    #[inline]
    pub fn next_sample(&mut self, freq: f32, detune: f32, tone_coef: f32) -> f32 {
        let sr = self.sample_rate;
        let mut sum = 0.0;
        for i in 0..PAD_VOICES {
            let drift = self.chorus[i].next_sample(CHORUS_HZ[i], sr);
            let ratio = RATIOS[i] * (1.0 + detune * (SPREAD[i] + 0.3 * drift));
            sum += self.saws[i].next_sample(freq * ratio, sr);
        }
        let filtered = self.tone.process(sum / PAD_VOICES as f32, tone_coef);
        soft_clip(filtered, 1.4)
    }

    pub fn reset(&mut self) {
        self.tone.reset(0.0);
    }
}
