use std::collections::VecDeque;
use std::sync::Arc;

use rtrb::{Consumer, Producer};

use super::params::SynthParams;
use crate::samples::SampleVoice;

/// Synth-backed notes, placed at an exact frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoteKind {
    /// Retunes the drone and retriggers its sub pulse
    Bass,
    /// Plucks the string
    Melody,
    /// Retunes the pad bank
    Pad,
    /// Retunes the lead
    Lead,
}

/// Scheduler/control side to render side. One direction only.
#[derive(Debug, Clone)]
pub enum RenderMessage {
    /// New smoothing target; replaces the previous one whole
    Params(SynthParams),
    /// Immediate gates, posted outside the parameter throttle
    Gate { note_gate: f32, gate: f32 },
    Hit {
        voice: SampleVoice,
        frame: u64,
        gain: f32,
        rate: f32,
        send: f32,
    },
    Note {
        kind: NoteKind,
        frame: u64,
        freq: f32,
        gain: f32,
    },
    /// Buffer for a sample voice. The sender keeps its own reference.
    InstallSample { voice: SampleVoice, buffer: Arc<[f32]> },
    Start,
    /// Ramp to silence, then drop every playing voice
    Stop,
}

impl RenderMessage {
    /// Frame a timed message is due at.
    pub fn due_frame(&self) -> Option<u64> {
        match self {
            RenderMessage::Hit { frame, .. } | RenderMessage::Note { frame, .. } => Some(*frame),
            _ => None,
        }
    }
}

/// Render side to the outside world: per-quantum peak levels.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ActivityVoice {
    Kick,
    Snare,
    Hats,
    Pad,
    Lead,
    String,
    Drone,
}

impl ActivityVoice {
    pub const COUNT: usize = 7;

    pub const ALL: [ActivityVoice; ActivityVoice::COUNT] = [
        ActivityVoice::Kick,
        ActivityVoice::Snare,
        ActivityVoice::Hats,
        ActivityVoice::Pad,
        ActivityVoice::Lead,
        ActivityVoice::String,
        ActivityVoice::Drone,
    ];

    pub fn index(self) -> usize {
        match self {
            ActivityVoice::Kick => 0,
            ActivityVoice::Snare => 1,
            ActivityVoice::Hats => 2,
            ActivityVoice::Pad => 3,
            ActivityVoice::Lead => 4,
            ActivityVoice::String => 5,
            ActivityVoice::Drone => 6,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ActivityVoice::Kick => "kick",
            ActivityVoice::Snare => "snare",
            ActivityVoice::Hats => "hats",
            ActivityVoice::Pad => "pad",
            ActivityVoice::Lead => "lead",
            ActivityVoice::String => "string",
            ActivityVoice::Drone => "drone",
        }
    }

    pub fn for_sample(voice: SampleVoice) -> Self {
        match voice {
            SampleVoice::Kick => ActivityVoice::Kick,
            SampleVoice::Snare | SampleVoice::Rim => ActivityVoice::Snare,
            SampleVoice::Hat | SampleVoice::OpenHat => ActivityVoice::Hats,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Activity {
    pub voice: ActivityVoice,
    pub level: f32,
}

pub trait MessageReceiver {
    fn pop(&mut self) -> Option<RenderMessage>;
}

impl MessageReceiver for Consumer<RenderMessage> {
    fn pop(&mut self) -> Option<RenderMessage> {
        Consumer::pop(self).ok()
    }
}

impl MessageReceiver for VecDeque<RenderMessage> {
    fn pop(&mut self) -> Option<RenderMessage> {
        self.pop_front()
    }
}

pub trait MessageSender {
    /// Best effort. Returns false when the message was dropped.
    fn push(&mut self, msg: RenderMessage) -> bool;
}

impl MessageSender for Producer<RenderMessage> {
    fn push(&mut self, msg: RenderMessage) -> bool {
        Producer::push(self, msg).is_ok()
    }
}

impl MessageSender for VecDeque<RenderMessage> {
    fn push(&mut self, msg: RenderMessage) -> bool {
        self.push_back(msg);
        true
    }
}
