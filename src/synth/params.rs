//! The synthesis parameter snapshot.
//!
//! Built on the scheduler side from arrangement state and controls, posted
//! whole, and treated by the render core as the next smoothing target.
//! Values are clamped here, before they cross into the DSP.

use crate::arrangement::{ArrangementState, BarPlan, Stage};
use crate::arrangement::scene::scene;
use crate::io::ControlState;
use crate::sequencing::harmony::Chord;

/// How the lead voice is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LeadMode {
    /// Follows the note gate (live MIDI)
    Performance,
    /// Opens at random per render block with probability `lead_gate`
    #[default]
    Drone,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParams {
    pub freq: f32,
    pub gain: f32,
    pub cutoff: f32,
    pub drive: f32,
    pub lfo_hz: f32,
    pub lfo_amt: f32,
    pub attack_ms: f32,
    pub release_ms: f32,
    pub detune: f32,
    pub sub: f32,
    pub noise: f32,
    pub delay_time: f32,
    pub delay_fb: f32,
    pub delay_mix: f32,
    pub bpm: f32,
    pub pulse_amt: f32,
    pub tick_amt: f32,

    pub pad_freq: f32,
    pub pad_gain: f32,
    pub pad_bright: f32,
    pub pad_gate: f32,
    pub pad_detune: f32,

    pub lead_freq: f32,
    pub lead_gain: f32,
    pub lead_bright: f32,
    pub lead_gate: f32,
    pub lead_mode: LeadMode,

    pub guitar_freq: f32,
    pub guitar_gate: f32,
    pub guitar_bright: f32,
    /// Bumped once per requested pluck; the render side plucks on change.
    pub guitar_pluck: u32,

    pub reverb_size: f32,
    pub reverb_send: f32,
}

impl Default for SynthParams {
    fn default() -> Self {
        Self {
            freq: 55.0,
            gain: 0.5,
            cutoff: 1_800.0,
            drive: 1.2,
            lfo_hz: 0.2,
            lfo_amt: 0.004,
            attack_ms: 40.0,
            release_ms: 400.0,
            detune: 0.006,
            sub: 0.5,
            noise: 0.02,
            delay_time: 0.33,
            delay_fb: 0.35,
            delay_mix: 0.25,
            bpm: 128.0,
            pulse_amt: 0.2,
            tick_amt: 0.0,
            pad_freq: 220.0,
            pad_gain: 0.25,
            pad_bright: 0.4,
            pad_gate: 1.0,
            pad_detune: 0.006,
            lead_freq: 329.63,
            lead_gain: 0.0,
            lead_bright: 0.5,
            lead_gate: 0.0,
            lead_mode: LeadMode::Drone,
            guitar_freq: 110.0,
            guitar_gate: 0.0,
            guitar_bright: 0.6,
            guitar_pluck: 0,
            reverb_size: 0.6,
            reverb_send: 0.3,
        }
    }
}

#[inline]
fn finite_clamp(v: f32, lo: f32, hi: f32, fallback: f32) -> f32 {
    if v.is_finite() {
        v.clamp(lo, hi)
    } else {
        fallback
    }
}

impl SynthParams {
    /// Force every field into the range the DSP is stable in.
    pub fn clamped(&self) -> Self {
        let d = Self::default();
        Self {
            freq: finite_clamp(self.freq, 20.0, 2_000.0, d.freq),
            gain: finite_clamp(self.gain, 0.0, 1.0, 0.0),
            cutoff: finite_clamp(self.cutoff, 40.0, 16_000.0, d.cutoff),
            drive: finite_clamp(self.drive, 0.1, 8.0, d.drive),
            lfo_hz: finite_clamp(self.lfo_hz, 0.0, 20.0, d.lfo_hz),
            lfo_amt: finite_clamp(self.lfo_amt, 0.0, 0.1, 0.0),
            attack_ms: finite_clamp(self.attack_ms, 1.0, 5_000.0, d.attack_ms),
            release_ms: finite_clamp(self.release_ms, 1.0, 10_000.0, d.release_ms),
            detune: finite_clamp(self.detune, 0.0, 0.05, 0.0),
            sub: finite_clamp(self.sub, 0.0, 1.0, 0.0),
            noise: finite_clamp(self.noise, 0.0, 0.5, 0.0),
            delay_time: finite_clamp(self.delay_time, 0.01, 1.9, d.delay_time),
            delay_fb: finite_clamp(self.delay_fb, 0.0, 0.95, 0.0),
            delay_mix: finite_clamp(self.delay_mix, 0.0, 1.0, 0.0),
            bpm: finite_clamp(self.bpm, 40.0, 240.0, d.bpm),
            pulse_amt: finite_clamp(self.pulse_amt, 0.0, 1.0, 0.0),
            tick_amt: finite_clamp(self.tick_amt, 0.0, 1.0, 0.0),
            pad_freq: finite_clamp(self.pad_freq, 20.0, 4_000.0, d.pad_freq),
            pad_gain: finite_clamp(self.pad_gain, 0.0, 1.0, 0.0),
            pad_bright: finite_clamp(self.pad_bright, 0.0, 1.0, d.pad_bright),
            pad_gate: finite_clamp(self.pad_gate, 0.0, 1.0, 0.0),
            pad_detune: finite_clamp(self.pad_detune, 0.0, 0.05, 0.0),
            lead_freq: finite_clamp(self.lead_freq, 20.0, 4_000.0, d.lead_freq),
            lead_gain: finite_clamp(self.lead_gain, 0.0, 1.0, 0.0),
            lead_bright: finite_clamp(self.lead_bright, 0.0, 1.0, d.lead_bright),
            lead_gate: finite_clamp(self.lead_gate, 0.0, 1.0, 0.0),
            lead_mode: self.lead_mode,
            guitar_freq: finite_clamp(self.guitar_freq, 30.0, 2_000.0, d.guitar_freq),
            guitar_gate: finite_clamp(self.guitar_gate, 0.0, 1.0, 0.0),
            guitar_bright: finite_clamp(self.guitar_bright, 0.0, 1.0, d.guitar_bright),
            guitar_pluck: self.guitar_pluck,
            reverb_size: finite_clamp(self.reverb_size, 0.0, 1.0, d.reverb_size),
            reverb_send: finite_clamp(self.reverb_send, 0.0, 1.0, 0.0),
        }
    }
}

/// Inputs for [`compose`].
#[derive(Debug, Clone, Copy)]
pub struct ParamInput<'a> {
    pub state: &'a ArrangementState,
    pub plan: &'a BarPlan,
    pub control: &'a ControlState,
    pub bpm: f32,
    /// Chord of the bar now sounding. The scheduled bar may already be
    /// ahead by one lookahead; its timed notes retune at their own frame.
    pub chord: &'a Chord,
    /// Held live note, switches the lead to performance mode
    pub lead_note: Option<f32>,
    pub guitar_pluck: u32,
}

/// Map arrangement and controls onto a clamped parameter snapshot.
pub fn compose(input: &ParamInput<'_>) -> SynthParams {
    let state = input.state;
    let plan = input.plan;
    let c = input.control;
    let macros = state.macro_levels;
    let flow = scene(state.flow_scene);
    let chord = input.chord;
    let full = state.stage == Stage::Full;

    let beat = 60.0 / input.bpm.max(1.0);
    let swell = plan.fx_swell;

    let (lead_mode, lead_freq, lead_gate) = match input.lead_note {
        Some(freq) => (LeadMode::Performance, freq, 1.0),
        None => (
            LeadMode::Drone,
            chord.lead_pitch,
            if full { 0.35 + 0.4 * c.build } else { 0.0 },
        ),
    };

    SynthParams {
        freq: chord.low_pitch,
        gain: 0.5 + 0.3 * c.build,
        cutoff: 300.0 + c.left_y * c.left_y * 6_000.0 + macros.fx_blast * 3_000.0,
        drive: 1.0 + 2.5 * c.build,
        lfo_hz: 0.1 + 4.0 * c.speed_right,
        lfo_amt: 0.002 + 0.01 * c.right_x,
        attack_ms: 30.0 + 400.0 * (1.0 - c.pinch_left),
        release_ms: 250.0 + 900.0 * (1.0 - c.pinch_left),
        detune: 0.003 + 0.01 * c.left_x,
        sub: 0.5,
        noise: 0.015 + 0.04 * c.build,
        delay_time: beat * 0.75,
        delay_fb: 0.3 + 0.35 * macros.fx_blast + 0.2 * swell,
        delay_mix: flow.fx_send + 0.3 * swell + 0.3 * macros.fx_blast,
        bpm: input.bpm,
        pulse_amt: if state.stage >= Stage::KickIn { 0.6 } else { 0.2 },
        tick_amt: 0.5 * c.right_y,
        pad_freq: chord.high_pitch,
        pad_gain: 0.22 * (1.0 + macros.pad_lift),
        pad_bright: 0.3 + flow.pad_bright_bias + 0.3 * macros.pad_lift + 0.3 * c.left_y,
        pad_gate: if c.kill { 0.0 } else { 1.0 },
        pad_detune: 0.004 + 0.008 * c.left_x,
        lead_freq,
        lead_gain: if full || input.lead_note.is_some() {
            0.18 * flow.lead
        } else {
            0.0
        },
        lead_bright: 0.4 + 0.4 * c.right_y,
        lead_gate,
        lead_mode,
        guitar_freq: chord.low_pitch * 2.0,
        guitar_gate: if c.pinch_right > 0.5 { 1.0 } else { 0.0 },
        guitar_bright: 0.5 + 0.4 * c.right_x,
        guitar_pluck: input.guitar_pluck,
        reverb_size: 0.55 + 0.35 * macros.fx_blast,
        reverb_send: 0.25 + 0.5 * macros.perc_boost + 0.3 * swell,
    }
    .clamped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencing::harmony::PROGRESSION;

    #[test]
    fn clamp_replaces_nan_and_bounds_feedback() {
        let wild = SynthParams {
            cutoff: f32::NAN,
            delay_fb: 3.0,
            delay_time: 50.0,
            gain: -2.0,
            ..SynthParams::default()
        };
        let p = wild.clamped();
        assert_eq!(p.cutoff, SynthParams::default().cutoff);
        assert!(p.delay_fb < 1.0);
        assert!(p.delay_time < 2.0);
        assert_eq!(p.gain, 0.0);
    }

    #[test]
    fn compose_follows_chord_and_stage() {
        let plan = BarPlan::default();
        let control = ControlState::default();
        let params_for = |state: &ArrangementState| {
            compose(&ParamInput {
                state,
                plan: &plan,
                control: &control,
                bpm: 138.0,
                chord: state.harmony.chord(),
                lead_note: None,
                guitar_pluck: 0,
            })
        };

        let mut state = ArrangementState::default();
        let intro = params_for(&state);
        assert_eq!(intro.freq, 55.0);
        assert_eq!(intro.lead_gain, 0.0);

        state.stage = Stage::Full;
        let full = params_for(&state);
        assert!(full.lead_gain > 0.0);
        assert!(full.lead_gate > 0.0);
        assert_eq!(full.lead_mode, LeadMode::Drone);
    }

    #[test]
    fn held_note_switches_lead_to_performance() {
        let state = ArrangementState::default();
        let plan = BarPlan::default();
        let control = ControlState::default();
        let p = compose(&ParamInput {
            state: &state,
            plan: &plan,
            control: &control,
            bpm: 120.0,
            chord: state.harmony.chord(),
            lead_note: Some(440.0),
            guitar_pluck: 3,
        });
        assert_eq!(p.lead_mode, LeadMode::Performance);
        assert_eq!(p.lead_freq, 440.0);
        assert_eq!(p.guitar_pluck, 3);
    }

    #[test]
    fn pitch_follows_the_given_chord_not_the_scheduled_one() {
        let mut state = ArrangementState::default();
        state.harmony.on_bar(4);
        let plan = BarPlan::default();
        let control = ControlState::default();
        let p = compose(&ParamInput {
            state: &state,
            plan: &plan,
            control: &control,
            bpm: 120.0,
            chord: &PROGRESSION[0],
            lead_note: None,
            guitar_pluck: 0,
        });
        assert_eq!(state.harmony.index, 1);
        assert_eq!(p.freq, PROGRESSION[0].low_pitch);
        assert_eq!(p.pad_freq, PROGRESSION[0].high_pitch);
    }
}
