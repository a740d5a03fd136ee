//! Lead: one polyBLEP saw with a touch of FM, a tone filter and an
//! attack/release envelope.

use crate::dsp::envelope::{ArCoefs, AttackRelease};
use crate::dsp::one_pole::OnePole;
use crate::dsp::oscillator::{sine, BlepSaw, Phasor};

const FM_RATIO: f32 = 2.0;
const FM_DEPTH: f32 = 0.004;

#[derive(Debug, Clone)]
pub struct Lead {
    sample_rate: f32,
    saw: BlepSaw,
    modulator: Phasor,
    tone: OnePole,
    env: AttackRelease,
}

impl Lead {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            saw: BlepSaw::with_phase(0.0),
            modulator: Phasor::new(0.0),
            tone: OnePole::new(0.0),
            env: AttackRelease::new(),
        }
    }

    /// `gate` is the envelope target for this sample.
    #[inline]
    pub fn next_sample(&mut self, freq: f32, tone_coef: f32, gate: f32, coefs: ArCoefs) -> f32 {
        let sr = self.sample_rate;
        let (mp, _) = self.modulator.tick(freq * FM_RATIO, sr);
        let fm = sine(mp) * FM_DEPTH;
        let raw = self.saw.next_sample(freq * (1.0 + fm), sr);
        let env = self.env.next_sample(gate, coefs);
        self.tone.process(raw, tone_coef) * env
    }

    pub fn envelope(&self) -> f32 {
        self.env.level()
    }

    pub fn reset(&mut self) {
        self.env.reset();
        self.tone.reset(0.0);
    }
}
