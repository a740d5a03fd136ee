//! Scheduler-side half of the parameter snapshot channel.
//!
//! Full snapshots are throttled; gates bypass the throttle so note on/off
//! reaches the render thread on the next quantum.

use super::message::{MessageSender, RenderMessage};
use super::params::SynthParams;

#[derive(Debug, Clone)]
pub struct ParamSender {
    interval: f64,
    last_sent_at: Option<f64>,
    last_params: Option<SynthParams>,
    last_gate: Option<(f32, f32)>,
    dropped: u64,
}

impl ParamSender {
    pub fn new(throttle_ms: f64) -> Self {
        Self {
            interval: throttle_ms.max(0.0) / 1000.0,
            last_sent_at: None,
            last_params: None,
            last_gate: None,
            dropped: 0,
        }
    }

    /// Post a snapshot if the throttle interval has passed since the last
    /// one. `build` only runs when a post will happen. Returns true if sent.
    pub fn post_params<S, F>(&mut self, now: f64, sink: &mut S, build: F) -> bool
    where
        S: MessageSender + ?Sized,
        F: FnOnce() -> SynthParams,
    {
        if let Some(last) = self.last_sent_at {
            if now - last < self.interval {
                return false;
            }
        }
        let params = build().clamped();
        if self.last_params == Some(params) {
            self.last_sent_at = Some(now);
            return false;
        }
        if sink.push(RenderMessage::Params(params)) {
            self.last_sent_at = Some(now);
            self.last_params = Some(params);
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    /// Post the gates immediately when they changed.
    pub fn post_gate<S>(&mut self, note_gate: f32, gate: f32, sink: &mut S) -> bool
    where
        S: MessageSender + ?Sized,
    {
        let gates = (note_gate.clamp(0.0, 1.0), gate.clamp(0.0, 1.0));
        if self.last_gate == Some(gates) {
            return false;
        }
        if sink.push(RenderMessage::Gate {
            note_gate: gates.0,
            gate: gates.1,
        }) {
            self.last_gate = Some(gates);
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    /// Forget what was sent so the next post goes through unconditionally.
    pub fn invalidate(&mut self) {
        self.last_sent_at = None;
        self.last_params = None;
        self.last_gate = None;
    }

    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}
