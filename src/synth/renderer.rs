//! The render-thread object.
//!
//! Drains the message ring once per quantum, dispatches timed hits and notes
//! at their exact frame, runs the synth core and the sample player, and
//! finishes with the stop ramp, master gain and limiter. After construction
//! nothing here allocates, locks or blocks.

use rtrb::Producer;

use crate::config::SynthConfig;
use crate::dsp::limiter::Limiter;
use crate::engine::AudioClock;
use crate::samples::SampleVoice;
use crate::MAX_BLOCK_SIZE;

use super::core::SynthCore;
use super::message::{Activity, ActivityVoice, MessageReceiver, RenderMessage};
use super::sampler::SamplePlayer;

/// Timed messages waiting for their frame.
pub const PENDING_CAPACITY: usize = 512;

const LIMITER_CEILING: f32 = 0.95;
const LIMITER_RELEASE_MS: f32 = 80.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transport {
    Stopped,
    Running,
    /// Ramping down; silence follows when the gain reaches zero
    Stopping,
}

pub struct Renderer<R: MessageReceiver> {
    rx: R,
    core: SynthCore,
    sampler: SamplePlayer,
    limiter: Limiter,
    clock: AudioClock,
    frame: u64,
    quantum: usize,
    pending: Vec<RenderMessage>,
    next_due: u64,
    transport: Transport,
    ramp: f32,
    ramp_step: f32,
    master_gain: f32,
    left: Vec<f32>,
    right: Vec<f32>,
    activity_tx: Option<Producer<Activity>>,
    scope_tx: Option<Producer<f32>>,
    late_events: u64,
}

impl<R: MessageReceiver> Renderer<R> {
    pub fn new(rx: R, clock: AudioClock, config: &SynthConfig) -> Self {
        let sample_rate = clock.sample_rate() as f32;
        let ramp_frames = (config.stop_ramp_ms.max(1.0) * 0.001 * sample_rate).max(1.0);
        Self {
            rx,
            core: SynthCore::new(sample_rate, config.max_delay_secs),
            sampler: SamplePlayer::new(sample_rate),
            limiter: Limiter::new(sample_rate, LIMITER_CEILING, LIMITER_RELEASE_MS),
            frame: clock.frames(),
            clock,
            quantum: config.render_quantum.clamp(1, MAX_BLOCK_SIZE),
            pending: Vec::with_capacity(PENDING_CAPACITY),
            next_due: u64::MAX,
            transport: Transport::Stopped,
            ramp: 0.0,
            ramp_step: 1.0 / ramp_frames,
            master_gain: config.master_gain.clamp(0.0, 1.0),
            left: vec![0.0; MAX_BLOCK_SIZE],
            right: vec![0.0; MAX_BLOCK_SIZE],
            activity_tx: None,
            scope_tx: None,
            late_events: 0,
        }
    }

    /// Per-quantum voice peaks go here. Dropped when the ring is full.
    pub fn with_activity(mut self, tx: Producer<Activity>) -> Self {
        self.activity_tx = Some(tx);
        self
    }

    /// Mono output samples for the waveform and spectrum views.
    pub fn with_scope(mut self, tx: Producer<f32>) -> Self {
        self.scope_tx = Some(tx);
        self
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }

    pub fn core(&self) -> &SynthCore {
        &self.core
    }

    pub fn sampler(&self) -> &SamplePlayer {
        &self.sampler
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Hits and notes that arrived after their frame and played late.
    pub fn late_events(&self) -> u64 {
        self.late_events
    }

    /// Fill an interleaved device buffer. Extra channels beyond two repeat
    /// the stereo pair; a mono device gets the average.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total = data.len() / channels;
        let mut written = 0;
        while written < total {
            let n = (total - written).min(self.quantum);
            self.render_quantum(n);
            let out = &mut data[written * channels..(written + n) * channels];
            for (i, frame) in out.chunks_exact_mut(channels).enumerate() {
                let (l, r) = (self.left[i], self.right[i]);
                if channels == 1 {
                    frame[0] = 0.5 * (l + r);
                } else {
                    for (ch, s) in frame.iter_mut().enumerate() {
                        *s = if ch % 2 == 0 { l } else { r };
                    }
                }
            }
            written += n;
        }
    }

    /// Fill separate left/right buffers of equal length.
    pub fn render_stereo(&mut self, left: &mut [f32], right: &mut [f32]) {
        let total = left.len().min(right.len());
        let mut written = 0;
        while written < total {
            let n = (total - written).min(self.quantum);
            self.render_quantum(n);
            left[written..written + n].copy_from_slice(&self.left[..n]);
            right[written..written + n].copy_from_slice(&self.right[..n]);
            written += n;
        }
    }

    fn render_quantum(&mut self, frames: usize) {
        let frames = frames.min(MAX_BLOCK_SIZE);
        self.drain_messages();
        self.core.begin_quantum();
        let target = *self.core.target();
        self.sampler.set_bus(target.reverb_size, target.reverb_send);

        for i in 0..frames {
            let frame = self.frame + i as u64;
            if self.next_due <= frame {
                self.dispatch_due(frame);
            }

            let (mut l, mut r) = match self.transport {
                Transport::Stopped => (0.0, 0.0),
                _ => {
                    let (cl, cr) = self.core.next_frame();
                    let perc = self.sampler.next_frame();
                    (cl + perc, cr + perc)
                }
            };

            match self.transport {
                Transport::Running => self.ramp = (self.ramp + self.ramp_step).min(1.0),
                Transport::Stopping => {
                    self.ramp -= self.ramp_step;
                    if self.ramp <= 0.0 {
                        self.finish_stop();
                    }
                }
                Transport::Stopped => {}
            }

            let gain = self.ramp * self.master_gain;
            l *= gain;
            r *= gain;
            let (l, r) = self.limiter.process(l, r);
            self.left[i] = l;
            self.right[i] = r;
        }

        self.publish(frames);
        self.frame += frames as u64;
        self.clock.advance(frames as u64);
    }

    fn drain_messages(&mut self) {
        while let Some(msg) = self.rx.pop() {
            match msg {
                RenderMessage::Params(params) => self.core.set_target(params),
                RenderMessage::Gate { note_gate, gate } => self.core.set_gate(note_gate, gate),
                RenderMessage::InstallSample { voice, buffer } => {
                    self.sampler.install(voice, buffer)
                }
                RenderMessage::Start => {
                    match self.transport {
                        Transport::Running => {}
                        Transport::Stopping => {
                            self.finish_stop();
                            self.limiter.reset();
                        }
                        Transport::Stopped => self.limiter.reset(),
                    }
                    self.transport = Transport::Running;
                }
                RenderMessage::Stop => {
                    if self.transport == Transport::Running {
                        self.transport = Transport::Stopping;
                        // nothing scheduled by the old session may play
                        self.pending.clear();
                        self.next_due = u64::MAX;
                    }
                }
                timed @ (RenderMessage::Hit { .. } | RenderMessage::Note { .. }) => {
                    if self.transport != Transport::Running {
                        continue;
                    }
                    let due = timed.due_frame().unwrap_or(self.frame);
                    if self.pending.len() < PENDING_CAPACITY {
                        self.next_due = self.next_due.min(due);
                        self.pending.push(timed);
                    } else {
                        // no room to wait: play it now rather than grow
                        self.late_events += 1;
                        self.play(timed);
                    }
                }
            }
        }
    }

    fn dispatch_due(&mut self, frame: u64) {
        let mut i = 0;
        let mut next = u64::MAX;
        while i < self.pending.len() {
            let due = self.pending[i].due_frame().unwrap_or(frame);
            if due <= frame {
                if due < frame && frame == self.frame {
                    self.late_events += 1;
                }
                let msg = self.pending.swap_remove(i);
                self.play(msg);
            } else {
                next = next.min(due);
                i += 1;
            }
        }
        self.next_due = next;
    }

    fn play(&mut self, msg: RenderMessage) {
        match msg {
            RenderMessage::Hit {
                voice,
                gain,
                rate,
                send,
                ..
            } => self.sampler.trigger(voice, gain, rate, send),
            RenderMessage::Note {
                kind, freq, gain, ..
            } => self.core.note(kind, freq, gain),
            _ => {}
        }
    }

    fn finish_stop(&mut self) {
        self.ramp = 0.0;
        self.transport = Transport::Stopped;
        self.sampler.silence();
        self.core.reset();
        self.pending.clear();
        self.next_due = u64::MAX;
    }

    fn publish(&mut self, frames: usize) {
        let core = self.core.take_peaks();
        let samples = self.sampler.take_peaks();

        if let Some(tx) = self.activity_tx.as_mut() {
            let scale = self.ramp * self.master_gain;
            let mut levels = [0.0f32; ActivityVoice::COUNT];
            for voice in SampleVoice::ALL {
                let slot = &mut levels[ActivityVoice::for_sample(voice).index()];
                *slot = slot.max(samples[voice.index()]);
            }
            levels[ActivityVoice::Pad.index()] = core.pad;
            levels[ActivityVoice::Lead.index()] = core.lead;
            levels[ActivityVoice::String.index()] = core.string;
            levels[ActivityVoice::Drone.index()] = core.drone;

            for voice in ActivityVoice::ALL {
                let raw = levels[voice.index()];
                let activity = Activity {
                    voice,
                    level: (raw * scale).clamp(0.0, 1.0),
                };
                if tx.push(activity).is_err() {
                    break;
                }
            }
        }

        if let Some(tx) = self.scope_tx.as_mut() {
            for i in 0..frames {
                if tx.push(0.5 * (self.left[i] + self.right[i])).is_err() {
                    break;
                }
            }
        }
    }
}
