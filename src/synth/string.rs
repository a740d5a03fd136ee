/*
Plucked String and Amp Layer
============================

Karplus-Strong: a ring buffer of length L = round(sr / freq) is filled with
a noise burst. Every sample we read two adjacent taps, average them, run the
average through a one-pole lowpass and write it back scaled by a feedback
gain just below one:

    y[n] = g * lp( (x[i] + x[i+1]) / 2 )      i advances mod L

The averaging is itself a gentle lowpass, so high partials die first and the
burst settles into a decaying pitched tone. The extra one-pole is the
brightness control.

The buffer is allocated once for the lowest pitch we accept; a pluck only
changes the loop length.

The amp layer is separate: a sustained saw pushed through cascaded
asymmetric saturators, a crude low shelf (dry plus lowpassed dry) and a notch
that scoops the boxy midrange. It is gated by "string pressed" rather than
plucked.
*/

use crate::dsp::distortion::{asym_stage, soft_clip};
use crate::dsp::envelope::{ArCoefs, AttackRelease};
use crate::dsp::filter::{SVFilter, SvfCoefs};
use crate::dsp::one_pole::{cutoff_coef, OnePole};
use crate::dsp::oscillator::{BlepSaw, Noise};

pub const MIN_STRING_HZ: f32 = 30.0;
const FEEDBACK: f32 = 0.996;

#[derive(Debug, Clone)]
pub struct KarplusString {
    sample_rate: f32,
    buffer: Vec<f32>,
    len: usize,
    index: usize,
    damping: OnePole,
    noise: Noise,
}

impl KarplusString {
    pub fn new(sample_rate: f32) -> Self {
        let capacity = (sample_rate / MIN_STRING_HZ) as usize + 2;
        Self {
            sample_rate,
            buffer: vec![0.0; capacity],
            len: 2,
            index: 0,
            damping: OnePole::new(0.0),
            noise: Noise::new(0x5eed_c0de),
        }
    }

    /// Loop length the string rings at for `freq`, limited to the buffer.
    pub fn loop_len(&self, freq: f32) -> usize {
        let freq = freq.max(MIN_STRING_HZ);
        let len = (self.sample_rate / freq).round() as usize;
        len.clamp(2, self.buffer.len())
    }

    /// Refill the loop with a noise burst scaled by `gain`.
    pub fn pluck(&mut self, freq: f32, gain: f32) {
        self.len = self.loop_len(freq);
        let gain = gain.clamp(0.0, 1.0);
        for slot in &mut self.buffer[..self.len] {
            *slot = self.noise.next_sample() * gain;
        }
        self.index = 0;
        self.damping.reset(0.0);
    }

    /// `bright_coef` is a one-pole coefficient; 1.0 leaves only the
    /// two-tap average.
    #[inline]
    pub fn next_sample(&mut self, bright_coef: f32) -> f32 {
        let i = self.index;
        let j = if i + 1 >= self.len { 0 } else { i + 1 };
        let avg = 0.5 * (self.buffer[i] + self.buffer[j]);
        let out = self.damping.process(avg, bright_coef) * FEEDBACK;
        self.buffer[i] = out;
        self.index = j;
        out
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn reset(&mut self) {
        self.buffer.iter_mut().for_each(|s| *s = 0.0);
        self.index = 0;
        self.damping.reset(0.0);
    }
}

/// String brightness to a damping coefficient, 1 kHz to 12 kHz.
pub fn string_bright_coef(sample_rate: f32, bright: f32) -> f32 {
    let b = bright.clamp(0.0, 1.0);
    cutoff_coef(sample_rate, 1_000.0 + b * 11_000.0)
}

const AMP_DRIVES: [f32; 3] = [2.0, 3.5, 5.0];
const SHELF_GAIN: f32 = 0.6;
const NOTCH_HZ: f32 = 700.0;

#[derive(Debug, Clone)]
pub struct AmpDrone {
    sample_rate: f32,
    saw: BlepSaw,
    shelf: OnePole,
    shelf_coef: f32,
    notch: SVFilter,
    notch_coefs: SvfCoefs,
    env: AttackRelease,
}

impl AmpDrone {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            saw: BlepSaw::with_phase(0.0),
            shelf: OnePole::new(0.0),
            shelf_coef: cutoff_coef(sample_rate, 180.0),
            notch: SVFilter::notch(),
            notch_coefs: SvfCoefs::new(sample_rate, NOTCH_HZ, 0.4),
            env: AttackRelease::new(),
        }
    }

    #[inline]
    pub fn next_sample(&mut self, freq: f32, gate: f32, coefs: ArCoefs) -> f32 {
        let env = self.env.next_sample(gate, coefs);
        let mut s = self.saw.next_sample(freq, self.sample_rate);
        for drive in AMP_DRIVES {
            s = asym_stage(s, drive);
        }
        s = soft_clip(s, 1.5);
        let low = self.shelf.process(s, self.shelf_coef);
        let shelved = s + SHELF_GAIN * low;
        self.notch.process(shelved, self.notch_coefs) * env * 0.5
    }

    pub fn envelope(&self) -> f32 {
        self.env.level()
    }

    pub fn reset(&mut self) {
        self.shelf.reset(0.0);
        self.notch.reset();
        self.env.reset();
    }
}
