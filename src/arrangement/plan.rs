//! Per-bar plan and per-step event generation.
//!
//! The plan is resolved once at the bar boundary from the arrangement state
//! and the control snapshot. Stepping through the bar is then a pure lookup,
//! so every event of a bar agrees with the decisions made at its start.

use super::macros::MacroLevels;
use super::scene::{scene, Stage};
use super::variant::{Fill, Variant};
use crate::engine::{StepEvent, StepKind};
use crate::io::ControlState;
use crate::sequencing::euclid::euclidean_mask;
use crate::sequencing::harmony::{Chord, MELODY_RATIOS, PROGRESSION};
use crate::sequencing::patterns::{accent, GrooveId, StepMask, OFFBEATS, STEPS_PER_BAR};
use crate::sequencing::rng::Xorshift32;

const KICK_LEVEL: f32 = 0.95;
const SNARE_LEVEL: f32 = 0.8;
const RIM_LEVEL: f32 = 0.45;
const HAT_LEVEL: f32 = 0.35;
const OPEN_HAT_LEVEL: f32 = 0.4;
const BASS_LEVEL: f32 = 0.7;
const MELODY_LEVEL: f32 = 0.5;
const PAD_LEVEL: f32 = 0.6;
const LEAD_LEVEL: f32 = 0.5;

/// Everything the plan is derived from.
#[derive(Debug, Clone, Copy)]
pub struct PlanInput<'a> {
    pub bar: u64,
    pub stage: Stage,
    pub section: u8,
    pub groove: GrooveId,
    pub variant: Variant,
    pub fill: Fill,
    /// 1.0 outside a breakdown
    pub breakdown_mix: f32,
    pub flow_scene: u8,
    pub chord: &'static Chord,
    pub control: &'a ControlState,
    pub macros: MacroLevels,
}

#[derive(Debug, Clone)]
pub struct BarPlan {
    pub bar: u64,
    pub stage: Stage,
    pub kick: StepMask,
    pub snare: StepMask,
    pub rim: StepMask,
    pub hats: StepMask,
    pub open_hats: StepMask,
    pub bass: StepMask,
    pub melody: StepMask,
    pub melody_pitch: [f32; STEPS_PER_BAR],
    pub chord: &'static Chord,
    pub perc_gain: f32,
    pub hat_gain: f32,
    pub lead_gain: f32,
    pub fx_swell: f32,
}

impl Default for BarPlan {
    fn default() -> Self {
        Self {
            bar: 0,
            stage: Stage::Intro,
            kick: StepMask::EMPTY,
            snare: StepMask::EMPTY,
            rim: StepMask::EMPTY,
            hats: StepMask::EMPTY,
            open_hats: StepMask::EMPTY,
            bass: StepMask::EMPTY,
            melody: StepMask::EMPTY,
            melody_pitch: [0.0; STEPS_PER_BAR],
            chord: &PROGRESSION[0],
            perc_gain: 1.0,
            hat_gain: 1.0,
            lead_gain: 1.0,
            fx_swell: 0.0,
        }
    }
}

fn gate(stage: Stage, kind: StepKind, mask: StepMask) -> StepMask {
    if stage.allows(kind) {
        mask
    } else {
        StepMask::EMPTY
    }
}

impl BarPlan {
    pub fn build(input: PlanInput<'_>, rng: &mut Xorshift32) -> Self {
        let control = input.control;
        let groove = input.groove.pattern();
        let rule = input.variant.rule();

        let mut kick = rule.kick.apply(groove.kick);
        let (mut snare, rim) = if rule.snare {
            (groove.snare, groove.rim)
        } else {
            (StepMask::EMPTY, StepMask::EMPTY)
        };

        // hat density follows the right hand
        let pulses = 4 + (control.right_y * 8.0).round() as i32 + groove.hat_pulse_offset;
        let rotation = (control.right_x * 4.0).round() as i32 + groove.hat_rotation;
        let grid = euclidean_mask(STEPS_PER_BAR, pulses, rotation);
        let (mut hats, variant_hat_gain) = rule.hats.apply(grid);

        let mut open_hats = if groove.open_hats && input.variant == Variant::Normal {
            OFFBEATS
        } else {
            StepMask::EMPTY
        };

        match input.fill {
            Fill::None => {}
            Fill::SnareRoll => snare = snare.union(input.fill.roll()),
            Fill::HatRoll => {
                hats = hats.union(input.fill.roll());
                open_hats = StepMask::EMPTY;
            }
            Fill::KickRoll => kick = kick.union(input.fill.roll()),
        }
        let stage = input.stage;
        let kick = gate(stage, StepKind::Kick, kick);
        let snare = gate(stage, StepKind::Snare, snare);
        let rim = gate(stage, StepKind::Rim, rim);
        let open_hats = gate(stage, StepKind::OpenHat, open_hats);
        // a step is either open or closed, never both
        let hats = gate(stage, StepKind::Hat, StepMask(hats.0 & !open_hats.0));
        let bass = gate(stage, StepKind::Bass, groove.bass);

        let mut melody = StepMask::EMPTY;
        let mut melody_pitch = [0.0; STEPS_PER_BAR];
        if stage.allows(StepKind::Melody) {
            let pulses = 2 + (control.left_y * 4.0).round() as i32;
            melody = euclidean_mask(STEPS_PER_BAR, pulses, 2 + input.section as i32);
            for (step, pitch) in melody_pitch.iter_mut().enumerate() {
                if melody.contains(step) {
                    let degree = rng.range_inclusive(0, MELODY_RATIOS.len() as u64 - 1);
                    *pitch = input.chord.high_pitch * MELODY_RATIOS[degree as usize];
                }
            }
        }

        let flow = scene(input.flow_scene);
        let boost = 1.0 + 0.5 * input.macros.perc_boost;
        let perc_gain = flow.perc * input.breakdown_mix * boost;
        let hat_gain = flow.hat * variant_hat_gain * input.breakdown_mix * boost;

        Self {
            bar: input.bar,
            stage,
            kick,
            snare,
            rim,
            hats,
            open_hats,
            bass,
            melody,
            melody_pitch,
            chord: input.chord,
            perc_gain,
            hat_gain,
            lead_gain: flow.lead,
            fx_swell: rule.fx_swell,
        }
    }

    /// Append the events for `step` at `time`, in a fixed kind order.
    pub fn events_at(&self, step: usize, time: f64, out: &mut Vec<StepEvent>) {
        let acc = accent(step);
        if self.kick.contains(step) {
            out.push(StepEvent::hit(StepKind::Kick, time, KICK_LEVEL * self.perc_gain));
        }
        if self.snare.contains(step) {
            out.push(StepEvent::hit(StepKind::Snare, time, SNARE_LEVEL * acc * self.perc_gain));
        }
        if self.rim.contains(step) {
            out.push(StepEvent::hit(StepKind::Rim, time, RIM_LEVEL * acc * self.perc_gain));
        }
        if self.hats.contains(step) {
            out.push(StepEvent::hit(StepKind::Hat, time, HAT_LEVEL * acc * self.hat_gain));
        }
        if self.open_hats.contains(step) {
            out.push(StepEvent::hit(StepKind::OpenHat, time, OPEN_HAT_LEVEL * self.hat_gain));
        }
        if self.bass.contains(step) {
            out.push(StepEvent::note(
                StepKind::Bass,
                time,
                BASS_LEVEL * acc,
                self.chord.low_pitch,
            ));
        }
        if self.melody.contains(step) {
            out.push(StepEvent::note(
                StepKind::Melody,
                time,
                MELODY_LEVEL * self.lead_gain,
                self.melody_pitch[step],
            ));
        }
        if step == 0 {
            out.push(StepEvent::note(StepKind::Pad, time, PAD_LEVEL, self.chord.high_pitch));
            if self.stage.allows(StepKind::Lead) {
                out.push(StepEvent::note(
                    StepKind::Lead,
                    time,
                    LEAD_LEVEL * self.lead_gain,
                    self.chord.lead_pitch,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(control: &'a ControlState, stage: Stage, variant: Variant) -> PlanInput<'a> {
        PlanInput {
            bar: 20,
            stage,
            section: 2,
            groove: GrooveId::FourFloor,
            variant,
            fill: Fill::None,
            breakdown_mix: 1.0,
            flow_scene: 0,
            chord: &PROGRESSION[0],
            control,
            macros: MacroLevels::default(),
        }
    }

    fn kinds_in_bar(plan: &BarPlan) -> Vec<StepKind> {
        let mut out = Vec::new();
        for step in 0..STEPS_PER_BAR {
            plan.events_at(step, step as f64, &mut out);
        }
        out.iter().map(|e| e.kind).collect()
    }

    #[test]
    fn intro_only_has_hats_and_pad() {
        let control = ControlState::default();
        let mut rng = Xorshift32::new(1);
        let plan = BarPlan::build(input(&control, Stage::Intro, Variant::Normal), &mut rng);
        for kind in kinds_in_bar(&plan) {
            assert!(
                matches!(kind, StepKind::Hat | StepKind::Pad),
                "{} leaked into intro",
                kind.name()
            );
        }
    }

    #[test]
    fn kick_drop_silences_kicks_for_the_bar() {
        let control = ControlState::default();
        let mut rng = Xorshift32::new(1);
        let plan = BarPlan::build(input(&control, Stage::Full, Variant::KickDrop), &mut rng);
        assert!(!kinds_in_bar(&plan).contains(&StepKind::Kick));
        assert!(plan.snare.count() > 0);
    }

    #[test]
    fn hats_only_keeps_hats_and_nothing_percussive_else() {
        let control = ControlState::default();
        let mut rng = Xorshift32::new(1);
        let plan = BarPlan::build(input(&control, Stage::Full, Variant::HatsOnly), &mut rng);
        assert_eq!(plan.kick, StepMask::EMPTY);
        assert_eq!(plan.snare, StepMask::EMPTY);
        assert_eq!(plan.rim, StepMask::EMPTY);
        assert!(plan.hats.count() > 0);
    }

    #[test]
    fn hat_density_follows_right_hand() {
        let sparse = ControlState {
            right_y: 0.0,
            ..ControlState::default()
        };
        let dense = ControlState {
            right_y: 1.0,
            ..ControlState::default()
        };
        let mut rng = Xorshift32::new(3);
        let a = BarPlan::build(input(&sparse, Stage::KickIn, Variant::Normal), &mut rng);
        let b = BarPlan::build(input(&dense, Stage::KickIn, Variant::Normal), &mut rng);
        assert!(b.hats.count() > a.hats.count());
    }

    #[test]
    fn breakdown_attenuates_percussion() {
        let control = ControlState::default();
        let mut rng = Xorshift32::new(1);
        let normal = BarPlan::build(input(&control, Stage::Full, Variant::Normal), &mut rng);
        let mut quiet = input(&control, Stage::Full, Variant::Normal);
        quiet.breakdown_mix = 0.5;
        let quiet = BarPlan::build(quiet, &mut rng);
        assert!(quiet.perc_gain < normal.perc_gain);
        assert!(quiet.hat_gain < normal.hat_gain);
    }

    #[test]
    fn melody_pitches_sit_on_the_chord_scale() {
        let control = ControlState::default();
        let mut rng = Xorshift32::new(9);
        let plan = BarPlan::build(input(&control, Stage::Full, Variant::Normal), &mut rng);
        assert!(plan.melody.count() > 0);
        for step in 0..STEPS_PER_BAR {
            if plan.melody.contains(step) {
                let ratio = plan.melody_pitch[step] / plan.chord.high_pitch;
                assert!(MELODY_RATIOS.iter().any(|r| (r - ratio).abs() < 1e-4));
            }
        }
    }
}
