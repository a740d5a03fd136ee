//! Render core: the per-sample synthesis loop.
//!
//! Owned by the render thread. Parameter snapshots become glide targets;
//! every coefficient the loop needs is derived in [`SynthCore::begin_quantum`]
//! and reused for each sample of the quantum.

use crate::dsp::delay::{DelaySettings, StereoDelay};
use crate::dsp::distortion::tanh_clip;
use crate::dsp::envelope::{ArCoefs, AttackRelease};
use crate::dsp::lfo::Lfo;
use crate::dsp::one_pole::{cutoff_coef, ms_coef, OnePole};
use crate::dsp::oscillator::Noise;

use super::drone::{Drone, DroneInput};
use super::lead::Lead;
use super::message::NoteKind;
use super::pad::{bright_coef, PadBank};
use super::params::{LeadMode, SynthParams};
use super::string::{string_bright_coef, AmpDrone, KarplusString};

const GLIDE_MS: f32 = 25.0;
const PAD_ATTACK_MS: f32 = 300.0;
const PAD_RELEASE_MS: f32 = 1_200.0;
const LEAD_ATTACK_MS: f32 = 12.0;
const LEAD_RELEASE_MS: f32 = 220.0;
const AMP_ATTACK_MS: f32 = 15.0;
const AMP_RELEASE_MS: f32 = 250.0;
const STRING_LEVEL: f32 = 0.6;
const PLUCK_GAIN: f32 = 0.8;

/// Continuous values gliding toward the latest snapshot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothed {
    pub freq: f32,
    pub gain: f32,
    pub cutoff: f32,
    pub drive: f32,
    pub detune: f32,
    pub sub: f32,
    pub noise: f32,
    pub delay_time: f32,
    pub delay_fb: f32,
    pub delay_mix: f32,
    pub pad_freq: f32,
    pub pad_gain: f32,
    pub pad_bright: f32,
    pub lead_freq: f32,
    pub lead_gain: f32,
    pub lead_bright: f32,
    pub guitar_freq: f32,
    pub guitar_bright: f32,
}

impl Smoothed {
    fn from_params(p: &SynthParams) -> Self {
        Self {
            freq: p.freq,
            gain: p.gain,
            cutoff: p.cutoff,
            drive: p.drive,
            detune: p.detune,
            sub: p.sub,
            noise: p.noise,
            delay_time: p.delay_time,
            delay_fb: p.delay_fb,
            delay_mix: p.delay_mix,
            pad_freq: p.pad_freq,
            pad_gain: p.pad_gain,
            pad_bright: p.pad_bright,
            lead_freq: p.lead_freq,
            lead_gain: p.lead_gain,
            lead_bright: p.lead_bright,
            guitar_freq: p.guitar_freq,
            guitar_bright: p.guitar_bright,
        }
    }

    #[inline]
    fn glide(&mut self, t: &SynthParams, coef: f32) {
        #[inline(always)]
        fn step(v: &mut f32, target: f32, coef: f32) {
            *v += coef * (target - *v);
        }
        step(&mut self.freq, t.freq, coef);
        step(&mut self.gain, t.gain, coef);
        step(&mut self.cutoff, t.cutoff, coef);
        step(&mut self.drive, t.drive, coef);
        step(&mut self.detune, t.detune, coef);
        step(&mut self.sub, t.sub, coef);
        step(&mut self.noise, t.noise, coef);
        step(&mut self.delay_time, t.delay_time, coef);
        step(&mut self.delay_fb, t.delay_fb, coef);
        step(&mut self.delay_mix, t.delay_mix, coef);
        step(&mut self.pad_freq, t.pad_freq, coef);
        step(&mut self.pad_gain, t.pad_gain, coef);
        step(&mut self.pad_bright, t.pad_bright, coef);
        step(&mut self.lead_freq, t.lead_freq, coef);
        step(&mut self.lead_gain, t.lead_gain, coef);
        step(&mut self.lead_bright, t.lead_bright, coef);
        step(&mut self.guitar_freq, t.guitar_freq, coef);
        step(&mut self.guitar_bright, t.guitar_bright, coef);
    }
}

/// Everything derived once per quantum.
#[derive(Debug, Clone, Copy)]
struct QuantumCoefs {
    master: ArCoefs,
    pad: ArCoefs,
    lead: ArCoefs,
    amp: ArCoefs,
    tone: f32,
    pad_tone: f32,
    lead_tone: f32,
    string_tone: f32,
    delay: DelaySettings,
    lead_gate: f32,
}

/// Per-voice peak levels since the last [`SynthCore::take_peaks`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CorePeaks {
    pub drone: f32,
    pub pad: f32,
    pub lead: f32,
    pub string: f32,
}

pub struct SynthCore {
    sample_rate: f32,
    target: SynthParams,
    smoothed: Smoothed,
    glide_coef: f32,
    note_gate: f32,
    gate: f32,
    last_pluck: u32,

    lfo: Lfo,
    drone: Drone,
    pad: PadBank,
    pad_env: AttackRelease,
    lead: Lead,
    lead_dice: Noise,
    string: KarplusString,
    amp: AmpDrone,
    master_env: AttackRelease,
    tone: OnePole,
    delay: StereoDelay,

    coefs: QuantumCoefs,
    peaks: CorePeaks,
}

impl SynthCore {
    pub fn new(sample_rate: f32, max_delay_secs: f32) -> Self {
        let target = SynthParams::default();
        let mut core = Self {
            sample_rate,
            target,
            smoothed: Smoothed::from_params(&target),
            glide_coef: ms_coef(sample_rate, GLIDE_MS),
            note_gate: 0.0,
            gate: 0.0,
            last_pluck: target.guitar_pluck,
            lfo: Lfo::with_phase(0.0),
            drone: Drone::new(sample_rate),
            pad: PadBank::new(sample_rate),
            pad_env: AttackRelease::new(),
            lead: Lead::new(sample_rate),
            lead_dice: Noise::new(0x1ead),
            string: KarplusString::new(sample_rate),
            amp: AmpDrone::new(sample_rate),
            master_env: AttackRelease::new(),
            tone: OnePole::new(0.0),
            delay: StereoDelay::new(sample_rate, max_delay_secs.max(0.1)),
            coefs: QuantumCoefs {
                master: ArCoefs::from_ms(sample_rate, target.attack_ms, target.release_ms),
                pad: ArCoefs::from_ms(sample_rate, PAD_ATTACK_MS, PAD_RELEASE_MS),
                lead: ArCoefs::from_ms(sample_rate, LEAD_ATTACK_MS, LEAD_RELEASE_MS),
                amp: ArCoefs::from_ms(sample_rate, AMP_ATTACK_MS, AMP_RELEASE_MS),
                tone: 1.0,
                pad_tone: 1.0,
                lead_tone: 1.0,
                string_tone: 1.0,
                delay: DelaySettings {
                    delay_samples: 1.0,
                    feedback: 0.0,
                    mix: 0.0,
                },
                lead_gate: 0.0,
            },
            peaks: CorePeaks::default(),
        };
        core.begin_quantum();
        core
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// New glide target. In-flight smoothing and envelopes are kept.
    pub fn set_target(&mut self, params: SynthParams) {
        let params = params.clamped();
        if params.guitar_pluck != self.last_pluck {
            self.last_pluck = params.guitar_pluck;
            self.string.pluck(params.guitar_freq, PLUCK_GAIN);
        }
        self.target = params;
    }

    pub fn target(&self) -> &SynthParams {
        &self.target
    }

    pub fn smoothed(&self) -> &Smoothed {
        &self.smoothed
    }

    pub fn set_gate(&mut self, note_gate: f32, gate: f32) {
        self.note_gate = note_gate.clamp(0.0, 1.0);
        self.gate = gate.clamp(0.0, 1.0);
    }

    /// Frame-accurate note from the scheduler.
    pub fn note(&mut self, kind: NoteKind, freq: f32, gain: f32) {
        if !freq.is_finite() || freq <= 0.0 {
            return;
        }
        match kind {
            NoteKind::Bass => {
                self.target.freq = freq;
                self.smoothed.freq = freq;
                self.drone.retrigger(gain);
            }
            NoteKind::Melody => self.string.pluck(freq, gain),
            NoteKind::Pad => {
                self.target.pad_freq = freq;
                self.smoothed.pad_freq = freq;
            }
            NoteKind::Lead => {
                self.target.lead_freq = freq;
                self.smoothed.lead_freq = freq;
            }
        }
    }

    /// Derive this quantum's coefficients from the current smoothed state.
    pub fn begin_quantum(&mut self) {
        let sr = self.sample_rate;
        let s = &self.smoothed;
        let t = &self.target;

        let lead_gate = match t.lead_mode {
            LeadMode::Performance => self.note_gate,
            LeadMode::Drone => {
                if self.lead_dice.next_unit() < t.lead_gate {
                    1.0
                } else {
                    0.0
                }
            }
        };

        self.coefs = QuantumCoefs {
            master: ArCoefs::from_ms(sr, t.attack_ms, t.release_ms),
            pad: self.coefs.pad,
            lead: self.coefs.lead,
            amp: self.coefs.amp,
            tone: cutoff_coef(sr, s.cutoff),
            pad_tone: bright_coef(sr, s.pad_bright),
            lead_tone: bright_coef(sr, s.lead_bright),
            string_tone: string_bright_coef(sr, s.guitar_bright),
            delay: DelaySettings {
                delay_samples: s.delay_time * sr,
                feedback: s.delay_fb,
                mix: s.delay_mix,
            },
            lead_gate,
        };
    }

    #[inline]
    pub fn next_frame(&mut self) -> (f32, f32) {
        self.smoothed.glide(&self.target, self.glide_coef);
        let s = self.smoothed;
        let t = &self.target;
        let c = self.coefs;

        let lfo = self.lfo.next_sample(t.lfo_hz, self.sample_rate);
        let wobble = 1.0 + t.lfo_amt * lfo;

        let drone = self.drone.next_sample(&DroneInput {
            freq: s.freq * wobble,
            detune: s.detune,
            sub: s.sub,
            noise: s.noise,
            pulse_amt: t.pulse_amt,
            tick_amt: t.tick_amt,
        }) * s.gain;

        let pad_env = self.pad_env.next_sample(t.pad_gate, c.pad);
        let pad = self.pad.next_sample(s.pad_freq, t.pad_detune, c.pad_tone) * s.pad_gain * pad_env;

        let lead = self
            .lead
            .next_sample(s.lead_freq * wobble, c.lead_tone, c.lead_gate, c.lead)
            * s.lead_gain;

        let string = self.string.next_sample(c.string_tone) * STRING_LEVEL
            + self.amp.next_sample(s.guitar_freq, t.guitar_gate, c.amp);

        let env = self.master_env.next_sample(self.gate, c.master);
        let mix = (drone + pad + lead + string) * env;

        let filtered = self.tone.process(mix, c.tone);
        let clipped = tanh_clip(filtered, s.drive);

        let peaks = &mut self.peaks;
        peaks.drone = peaks.drone.max((drone * env).abs());
        peaks.pad = peaks.pad.max((pad * env).abs());
        peaks.lead = peaks.lead.max((lead * env).abs());
        peaks.string = peaks.string.max((string * env).abs());

        self.delay.process(clipped, c.delay)
    }

    /// Convenience loop over a whole quantum.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32]) {
        self.begin_quantum();
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let (a, b) = self.next_frame();
            *l = a;
            *r = b;
        }
    }

    pub fn take_peaks(&mut self) -> CorePeaks {
        std::mem::take(&mut self.peaks)
    }

    pub fn master_level(&self) -> f32 {
        self.master_env.level()
    }

    /// Back to silence without touching the current target.
    pub fn reset(&mut self) {
        self.drone.reset();
        self.pad.reset();
        self.pad_env.reset();
        self.lead.reset();
        self.string.reset();
        self.amp.reset();
        self.master_env.reset();
        self.tone.reset(0.0);
        self.delay.reset();
        self.note_gate = 0.0;
        self.gate = 0.0;
        self.smoothed = Smoothed::from_params(&self.target);
        self.peaks = CorePeaks::default();
    }
}
