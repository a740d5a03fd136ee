//! Send-bus reverb ("rumble" bus) built from a Schroeder delay network.
//!
//! ```text
//! send ──→ [lowpass] ──┬──→ [Comb 1] ──┐
//!                      ├──→ [Comb 2] ──┤
//!                      ├──→ [Comb 3] ──┼──→ (+) ──→ [Allpass 1] ──→ [Allpass 2] ──→ out
//!                      └──→ [Comb 4] ──┘
//! ```
//!
//! Percussion hits feed this bus through a per-hit send level. The input is
//! darkened by a one-pole lowpass first, so the tail reads as a low rumble
//! under the dry kit rather than a bright room.
//!
//! Comb delays are mutually prime-ish so their echo trains do not line up;
//! the allpasses add density without colouring the spectrum. All buffers are
//! allocated in `new` from the sample rate and never resized.

use crate::dsp::one_pole::{cutoff_coef, OnePole};

const COMB_DELAYS_MS: [f32; 4] = [29.7, 37.1, 41.1, 43.7];
const ALLPASS_DELAYS_MS: [f32; 2] = [5.0, 1.7];
/// High-frequency loss in the comb loops
const DAMP: f32 = 0.45;

struct Comb {
    buffer: Vec<f32>,
    pos: usize,
    damp_state: f32,
}

impl Comb {
    fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            pos: 0,
            damp_state: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32, feedback: f32, damp: f32) -> f32 {
        let out = self.buffer[self.pos];
        self.damp_state = out * (1.0 - damp) + self.damp_state * damp;
        self.buffer[self.pos] = input + self.damp_state * feedback;
        self.pos = (self.pos + 1) % self.buffer.len();
        out
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.damp_state = 0.0;
        self.pos = 0;
    }
}

struct Allpass {
    buffer: Vec<f32>,
    pos: usize,
}

impl Allpass {
    fn new(len: usize) -> Self {
        Self {
            buffer: vec![0.0; len.max(1)],
            pos: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32, gain: f32) -> f32 {
        let delayed = self.buffer[self.pos];
        let out = -gain * input + delayed;
        self.buffer[self.pos] = input + gain * out;
        self.pos = (self.pos + 1) % self.buffer.len();
        out
    }

    fn reset(&mut self) {
        self.buffer.fill(0.0);
        self.pos = 0;
    }
}

pub struct SendReverb {
    combs: [Comb; 4],
    allpasses: [Allpass; 2],
    pre_filter: OnePole,
    pre_coef: f32,
    feedback: f32,
}

impl SendReverb {
    pub fn new(sample_rate: f32) -> Self {
        let samples = |ms: f32| (ms * sample_rate / 1000.0) as usize;
        Self {
            combs: COMB_DELAYS_MS.map(|ms| Comb::new(samples(ms))),
            allpasses: ALLPASS_DELAYS_MS.map(|ms| Allpass::new(samples(ms))),
            pre_filter: OnePole::default(),
            pre_coef: cutoff_coef(sample_rate, 900.0),
            feedback: 0.84,
        }
    }

    /// Tail length: 0 is short, 1 is long (comb feedback 0.7..0.97).
    pub fn set_size(&mut self, size: f32) {
        self.feedback = 0.7 + size.clamp(0.0, 1.0) * 0.27;
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let input = self.pre_filter.process(input, self.pre_coef);
        let mut out = 0.0;
        for comb in &mut self.combs {
            out += comb.process(input, self.feedback, DAMP);
        }
        out *= 0.25;
        for allpass in &mut self.allpasses {
            out = allpass.process(out, 0.5);
        }
        out
    }

    pub fn reset(&mut self) {
        for comb in &mut self.combs {
            comb.reset();
        }
        for allpass in &mut self.allpasses {
            allpass.reset();
        }
        self.pre_filter.reset(0.0);
    }
}
