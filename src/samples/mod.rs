//! Percussion samples: which voices exist, where their buffers come from,
//! and what happens when none of those places deliver.
//!
//! Loading is non-fatal. A voice whose whole fallback chain fails is marked
//! unavailable for the session and its events are skipped.

pub mod bank;
pub mod kit;
pub mod loader;

pub use bank::{LoadedSample, SampleBank};
pub use kit::BuiltinKit;
pub use loader::{DecodedSample, LoaderChain, SampleLoader, SampleSource, WavLoader};

use crate::engine::StepKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleVoice {
    Kick,
    Snare,
    Rim,
    Hat,
    OpenHat,
}

impl SampleVoice {
    pub const COUNT: usize = 5;

    pub const ALL: [SampleVoice; SampleVoice::COUNT] = [
        SampleVoice::Kick,
        SampleVoice::Snare,
        SampleVoice::Rim,
        SampleVoice::Hat,
        SampleVoice::OpenHat,
    ];

    pub fn index(self) -> usize {
        match self {
            SampleVoice::Kick => 0,
            SampleVoice::Snare => 1,
            SampleVoice::Rim => 2,
            SampleVoice::Hat => 3,
            SampleVoice::OpenHat => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SampleVoice::Kick => "kick",
            SampleVoice::Snare => "snare",
            SampleVoice::Rim => "rim",
            SampleVoice::Hat => "hat",
            SampleVoice::OpenHat => "openhat",
        }
    }

    pub fn from_kind(kind: StepKind) -> Option<Self> {
        match kind {
            StepKind::Kick => Some(SampleVoice::Kick),
            StepKind::Snare => Some(SampleVoice::Snare),
            StepKind::Rim => Some(SampleVoice::Rim),
            StepKind::Hat => Some(SampleVoice::Hat),
            StepKind::OpenHat => Some(SampleVoice::OpenHat),
            _ => None,
        }
    }

    /// Level sent to the rumble bus per hit.
    pub fn send_level(self) -> f32 {
        match self {
            SampleVoice::Kick => 0.15,
            SampleVoice::Snare => 0.35,
            SampleVoice::Rim => 0.3,
            SampleVoice::Hat => 0.1,
            SampleVoice::OpenHat => 0.25,
        }
    }
}
