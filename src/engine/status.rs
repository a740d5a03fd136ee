//! Read-only snapshot of the scheduler side, published for the HUD.

use crate::arrangement::{Fill, MacroLevels, Stage, Variant};
use crate::sequencing::patterns::{GrooveId, StepMask};

/// Pulse decay time constant after each quarter note, in seconds.
pub const PULSE_TAU: f64 = 0.12;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineStatus {
    pub running: bool,
    /// Bar and step currently sounding (not the lookahead cursor)
    pub bar: u64,
    pub step: usize,
    pub stage: Stage,
    pub section: u8,
    pub groove: GrooveId,
    pub variant: Variant,
    pub fill: Fill,
    pub breakdown: bool,
    pub flow_scene: u8,
    pub harmony_index: usize,
    pub chord: &'static str,
    pub macros: MacroLevels,
    pub bpm: f32,
    /// 1.0 on each quarter note, decaying toward 0
    pub pulse: f32,
    pub kick: StepMask,
    pub snare: StepMask,
    pub hats: StepMask,
    pub bass: StepMask,
    pub melody: StepMask,
    pub skipped_steps: u64,
    pub dropped_messages: u64,
    pub unavailable_voices: Vec<&'static str>,
    pub last_error: Option<String>,
}

impl Default for EngineStatus {
    fn default() -> Self {
        Self {
            running: false,
            bar: 0,
            step: 0,
            stage: Stage::Intro,
            section: 0,
            groove: GrooveId::FourFloor,
            variant: Variant::Normal,
            fill: Fill::None,
            breakdown: false,
            flow_scene: 0,
            harmony_index: 0,
            chord: "Am",
            macros: MacroLevels::default(),
            bpm: 0.0,
            pulse: 0.0,
            kick: StepMask::EMPTY,
            snare: StepMask::EMPTY,
            hats: StepMask::EMPTY,
            bass: StepMask::EMPTY,
            melody: StepMask::EMPTY,
            skipped_steps: 0,
            dropped_messages: 0,
            unavailable_voices: Vec::new(),
            last_error: None,
        }
    }
}

/// Pulse level `elapsed` seconds after a quarter note.
pub fn pulse_level(elapsed: f64) -> f32 {
    if elapsed < 0.0 {
        return 0.0;
    }
    (-elapsed / PULSE_TAU).exp() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulse_starts_at_one_and_decays() {
        assert_eq!(pulse_level(0.0), 1.0);
        assert!(pulse_level(0.12) < 0.4);
        assert!(pulse_level(1.0) < 0.001);
        assert_eq!(pulse_level(-0.1), 0.0);
    }
}
