//! Timed events produced by the step scheduler.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Kick,
    Hat,
    OpenHat,
    Snare,
    Rim,
    Bass,
    Melody,
    Pad,
    Lead,
}

impl StepKind {
    /// Percussion kinds are realized by sample playback; the rest are notes
    /// for the synth core.
    pub fn is_percussion(self) -> bool {
        matches!(
            self,
            StepKind::Kick | StepKind::Hat | StepKind::OpenHat | StepKind::Snare | StepKind::Rim
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            StepKind::Kick => "kick",
            StepKind::Hat => "hat",
            StepKind::OpenHat => "openhat",
            StepKind::Snare => "snare",
            StepKind::Rim => "rim",
            StepKind::Bass => "bass",
            StepKind::Melody => "melody",
            StepKind::Pad => "pad",
            StepKind::Lead => "lead",
        }
    }
}

/// One trigger at an absolute audio-clock time. Lives for a single scheduler
/// tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    pub kind: StepKind,
    /// Audio-clock seconds
    pub time: f64,
    pub gain: f32,
    /// Zero for unpitched percussion
    pub pitch_hz: f32,
    pub playback_rate: f32,
}

impl StepEvent {
    pub fn hit(kind: StepKind, time: f64, gain: f32) -> Self {
        Self {
            kind,
            time,
            gain,
            pitch_hz: 0.0,
            playback_rate: 1.0,
        }
    }

    pub fn note(kind: StepKind, time: f64, gain: f32, pitch_hz: f32) -> Self {
        Self {
            kind,
            time,
            gain,
            pitch_hz,
            playback_rate: 1.0,
        }
    }
}
