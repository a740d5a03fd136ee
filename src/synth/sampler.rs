//! One-shot sample playback with a shared send bus.
//!
//! Buffers arrive as `Arc<[f32]>` installs. The sample bank on the scheduler
//! side holds a clone of every buffer it sends, so replacing or dropping a
//! slot here never frees memory on the render thread.

use std::sync::Arc;

use crate::dsp::envelope::{decay_mult, Decay};
use crate::dsp::reverb::SendReverb;
use crate::samples::SampleVoice;

pub const MAX_PLAYERS: usize = 32;

const DUCK_DEPTH: f32 = 0.7;
const DUCK_MS: f32 = 120.0;

#[derive(Debug, Clone, Copy)]
struct Playback {
    voice: SampleVoice,
    position: f64,
    rate: f64,
    gain: f32,
    send: f32,
    started: u64,
}

/// Per-voice peak levels since the last [`SamplePlayer::take_peaks`].
pub type SamplePeaks = [f32; SampleVoice::COUNT];

pub struct SamplePlayer {
    buffers: [Option<Arc<[f32]>>; SampleVoice::COUNT],
    players: [Option<Playback>; MAX_PLAYERS],
    started: u64,
    reverb: SendReverb,
    send_level: f32,
    duck: Decay,
    duck_mult: f32,
    peaks: SamplePeaks,
}

impl SamplePlayer {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            buffers: Default::default(),
            players: [None; MAX_PLAYERS],
            started: 0,
            reverb: SendReverb::new(sample_rate),
            send_level: 0.3,
            duck: Decay::default(),
            duck_mult: decay_mult(sample_rate, DUCK_MS),
            peaks: [0.0; SampleVoice::COUNT],
        }
    }

    pub fn install(&mut self, voice: SampleVoice, buffer: Arc<[f32]>) {
        self.buffers[voice.index()] = Some(buffer);
    }

    pub fn has_buffer(&self, voice: SampleVoice) -> bool {
        self.buffers[voice.index()].is_some()
    }

    /// Reverb size and overall send level, once per quantum.
    pub fn set_bus(&mut self, size: f32, send: f32) {
        self.reverb.set_size(size);
        self.send_level = send.clamp(0.0, 1.0);
    }

    /// Start a hit now. `rate` is in source samples per output sample.
    /// When every player is busy the oldest one is replaced.
    pub fn trigger(&mut self, voice: SampleVoice, gain: f32, rate: f32, send: f32) {
        if self.buffers[voice.index()].is_none() || gain <= 0.0 || !rate.is_finite() {
            return;
        }
        if voice == SampleVoice::Kick {
            self.duck.trigger(DUCK_DEPTH);
        }
        self.started += 1;
        let playback = Playback {
            voice,
            position: 0.0,
            rate: rate.clamp(0.05, 8.0) as f64,
            gain: gain.clamp(0.0, 2.0),
            send: send.clamp(0.0, 1.0),
            started: self.started,
        };

        let slot = match self.players.iter().position(Option::is_none) {
            Some(free) => free,
            None => self
                .players
                .iter()
                .enumerate()
                .min_by_key(|(_, p)| p.map_or(0, |p| p.started))
                .map(|(i, _)| i)
                .unwrap_or(0),
        };
        self.players[slot] = Some(playback);
    }

    pub fn active(&self) -> usize {
        self.players.iter().filter(|p| p.is_some()).count()
    }

    /// Dry and send-bus output for one frame, summed to mono.
    #[inline]
    pub fn next_frame(&mut self) -> f32 {
        let mut dry = 0.0;
        let mut send = 0.0;
        for slot in self.players.iter_mut() {
            let Some(play) = slot else { continue };
            let Some(buffer) = self.buffers[play.voice.index()].as_deref() else {
                *slot = None;
                continue;
            };
            let i = play.position as usize;
            if i + 1 >= buffer.len() {
                *slot = None;
                continue;
            }
            let frac = (play.position - i as f64) as f32;
            let s = (buffer[i] + (buffer[i + 1] - buffer[i]) * frac) * play.gain;
            play.position += play.rate;

            let peak = &mut self.peaks[play.voice.index()];
            *peak = peak.max(s.abs());
            dry += s;
            send += s * play.send;
        }

        let duck = 1.0 - self.duck.next_sample(self.duck_mult);
        let wet = self.reverb.process(send * self.send_level * duck);
        dry + wet
    }

    pub fn take_peaks(&mut self) -> SamplePeaks {
        std::mem::replace(&mut self.peaks, [0.0; SampleVoice::COUNT])
    }

    /// Drop every playing voice and clear the bus tail.
    pub fn silence(&mut self) {
        self.players = [None; MAX_PLAYERS];
        self.duck.reset();
        self.reverb.reset();
    }
}
