//! Stage progression and flow scenes.

use crate::config::ArrangementConfig;
use crate::engine::StepKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Intro,
    KickIn,
    Full,
}

impl Stage {
    pub fn for_bar(bar: u64, config: &ArrangementConfig) -> Self {
        if bar >= config.stage_synth_bar {
            Stage::Full
        } else if bar >= config.stage_kick_bar {
            Stage::KickIn
        } else {
            Stage::Intro
        }
    }

    /// Which event kinds are allowed to sound at this stage.
    pub fn allows(self, kind: StepKind) -> bool {
        match kind {
            StepKind::Hat | StepKind::Pad => true,
            StepKind::Kick | StepKind::Rim | StepKind::Bass => self >= Stage::KickIn,
            StepKind::Snare | StepKind::OpenHat | StepKind::Melody | StepKind::Lead => {
                self == Stage::Full
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Intro => "intro",
            Stage::KickIn => "kick-in",
            Stage::Full => "full",
        }
    }
}

/// Fixed mix multipliers for one flow scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowScene {
    pub hat: f32,
    pub perc: f32,
    pub lead: f32,
    pub pad_bright_bias: f32,
    pub fx_send: f32,
}

pub static FLOW_SCENES: [FlowScene; 4] = [
    FlowScene {
        hat: 1.0,
        perc: 1.0,
        lead: 0.8,
        pad_bright_bias: 0.0,
        fx_send: 0.25,
    },
    FlowScene {
        hat: 1.1,
        perc: 1.2,
        lead: 1.0,
        pad_bright_bias: 0.1,
        fx_send: 0.35,
    },
    FlowScene {
        hat: 1.25,
        perc: 1.3,
        lead: 1.15,
        pad_bright_bias: 0.15,
        fx_send: 0.3,
    },
    FlowScene {
        hat: 0.8,
        perc: 0.85,
        lead: 1.2,
        pad_bright_bias: 0.25,
        fx_send: 0.5,
    },
];

pub fn scene(index: u8) -> &'static FlowScene {
    &FLOW_SCENES[index as usize % FLOW_SCENES.len()]
}

/// Scene in effect at `bar`. Scenes only move while in Full; before that the
/// first scene applies.
pub fn scene_for_bar(bar: u64, config: &ArrangementConfig) -> u8 {
    if bar < config.stage_synth_bar {
        return 0;
    }
    let elapsed = bar - config.stage_synth_bar;
    ((elapsed / config.scene_bars.max(1)) % FLOW_SCENES.len() as u64) as u8
}
