//! The bar-driven arrangement state machine.

use log::debug;

use super::macros::{MacroKind, MacroLevels, Macros};
use super::plan::{BarPlan, PlanInput};
use super::scene::{scene_for_bar, Stage};
use super::variant::{Fill, Variant, VariantWindow};
use crate::config::ArrangementConfig;
use crate::engine::StepEvent;
use crate::io::ControlState;
use crate::sequencing::harmony::HarmonyCursor;
use crate::sequencing::patterns::GrooveId;
use crate::sequencing::rng::Xorshift32;

const SECTIONS: u64 = 4;

/// Snapshot of every arrangement decision. Changes only at bar boundaries,
/// apart from the macro levels.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrangementState {
    pub bar: u64,
    pub section: u8,
    pub groove: GrooveId,
    pub variant: VariantWindow,
    pub fill: Fill,
    pub fill_until_bar: i64,
    pub breakdown_active: bool,
    pub breakdown_until_bar: i64,
    /// Percussion mix while the breakdown holds
    pub breakdown_mix: f32,
    pub stage: Stage,
    pub flow_scene: u8,
    pub harmony: HarmonyCursor,
    pub macro_levels: MacroLevels,
}

impl Default for ArrangementState {
    fn default() -> Self {
        Self {
            bar: 0,
            section: 0,
            groove: GrooveId::FourFloor,
            variant: VariantWindow::default(),
            fill: Fill::None,
            fill_until_bar: -1,
            breakdown_active: false,
            breakdown_until_bar: -1,
            breakdown_mix: 1.0,
            stage: Stage::Intro,
            flow_scene: 0,
            harmony: HarmonyCursor::default(),
            macro_levels: MacroLevels::default(),
        }
    }
}

impl ArrangementState {
    pub fn variant_at(&self, bar: u64) -> Variant {
        if self.variant.is_active(bar) {
            self.variant.variant
        } else {
            Variant::Normal
        }
    }

    pub fn fill_at(&self, bar: u64) -> Fill {
        if self.fill != Fill::None && (bar as i64) <= self.fill_until_bar {
            self.fill
        } else {
            Fill::None
        }
    }
}

/// Owns the PRNG and every decision derived from it.
///
/// Only [`Arrangement::on_bar`] draws random numbers, in a fixed order, so
/// a seed plus the sequence of control snapshots seen at bar boundaries
/// reproduces the arrangement exactly.
#[derive(Debug, Clone)]
pub struct Arrangement {
    config: ArrangementConfig,
    seed: u32,
    rng: Xorshift32,
    state: ArrangementState,
    plan: BarPlan,
    macros: Macros,
    next_groove_bar: u64,
    next_breakdown_bar: u64,
    /// Last bar a variant or breakdown began or a breakdown ended
    last_break_bar: u64,
    /// Variants are held back until this bar
    cooldown_until_bar: u64,
}

impl Arrangement {
    pub fn new(config: ArrangementConfig, seed: u32) -> Self {
        let mut rng = Xorshift32::new(seed);
        let first_gap = breakdown_gap(&mut rng);
        Self {
            next_breakdown_bar: config.stage_synth_bar + first_gap,
            config,
            seed,
            rng,
            state: ArrangementState::default(),
            plan: BarPlan::default(),
            macros: Macros::default(),
            next_groove_bar: 0,
            last_break_bar: 0,
            cooldown_until_bar: 0,
        }
    }

    /// Back to bar 0 with the original seed.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone(), self.seed);
    }

    pub fn state(&self) -> &ArrangementState {
        &self.state
    }

    pub fn plan(&self) -> &BarPlan {
        &self.plan
    }

    pub fn config(&self) -> &ArrangementConfig {
        &self.config
    }

    pub fn macros(&self) -> &Macros {
        &self.macros
    }

    pub fn next_breakdown_bar(&self) -> u64 {
        self.next_breakdown_bar
    }

    /// Bar-boundary update. Runs at step 0 of every bar the scheduler
    /// reaches; bars skipped by stall recovery are never visited.
    pub fn on_bar(&mut self, bar: u64, control: &ControlState) -> &BarPlan {
        self.state.bar = bar;
        self.update_timeline(bar);
        self.expire_windows(bar);
        self.update_breakdown(bar);
        self.update_groove(bar);
        self.update_variant(bar, control);
        self.update_fill(bar);

        let state = &self.state;
        let input = PlanInput {
            bar,
            stage: state.stage,
            section: state.section,
            groove: state.groove,
            variant: state.variant_at(bar),
            fill: state.fill_at(bar),
            breakdown_mix: if state.breakdown_active {
                state.breakdown_mix
            } else {
                1.0
            },
            flow_scene: state.flow_scene,
            chord: state.harmony.chord(),
            control,
            macros: state.macro_levels,
        };
        self.plan = BarPlan::build(input, &mut self.rng);
        &self.plan
    }

    pub fn step_events(&self, step: usize, time: f64, out: &mut Vec<StepEvent>) {
        self.plan.events_at(step, time, out);
    }

    pub fn trigger_macro(&mut self, kind: MacroKind, strength: f32, now: f64) {
        debug!(target: "arrangement", "macro {:?} strength {:.2}", kind, strength);
        self.macros.trigger(kind, strength, now);
    }

    /// Control-rate smoothing of the macro levels.
    pub fn tick_macros(&mut self, now: f64, dt: f32) {
        self.macros.tick(now, dt);
        self.state.macro_levels = self.macros.levels();
    }

    fn update_timeline(&mut self, bar: u64) {
        let cfg = &self.config;
        let state = &mut self.state;

        let stage = Stage::for_bar(bar, cfg);
        if stage != state.stage {
            debug!(target: "arrangement", "bar {}: stage {} -> {}", bar, state.stage.name(), stage.name());
            state.stage = stage;
        }
        state.section = ((bar / cfg.section_bars) % SECTIONS) as u8;
        state.flow_scene = scene_for_bar(bar, cfg);
        if state.harmony.on_bar(bar) {
            debug!(target: "arrangement", "bar {}: chord {}", bar, state.harmony.chord().name);
        }
    }

    fn expire_windows(&mut self, bar: u64) {
        let state = &mut self.state;
        if state.variant.expire(bar) {
            self.cooldown_until_bar = bar + self.config.variant_cooldown_bars;
        }
        if state.fill != Fill::None && (bar as i64) > state.fill_until_bar {
            state.fill = Fill::None;
            state.fill_until_bar = -1;
        }
    }

    fn update_breakdown(&mut self, bar: u64) {
        let state = &mut self.state;
        if state.breakdown_active && (bar as i64) > state.breakdown_until_bar {
            state.breakdown_active = false;
            state.breakdown_mix = 1.0;
            self.next_breakdown_bar = bar + breakdown_gap(&mut self.rng);
            self.last_break_bar = bar;
            debug!(target: "arrangement", "bar {}: breakdown out, next at {}", bar, self.next_breakdown_bar);
        }
        if !state.breakdown_active && bar >= self.next_breakdown_bar {
            let bars = if self.rng.rand01() < 0.5 { 4 } else { 6 };
            state.breakdown_active = true;
            state.breakdown_until_bar = (bar + bars - 1) as i64;
            state.breakdown_mix = 0.45 + self.rng.rand01() * 0.15;
            self.last_break_bar = bar;
            debug!(target: "arrangement", "bar {}: breakdown in for {} bars", bar, bars);
        }
    }

    fn update_groove(&mut self, bar: u64) {
        if bar < self.next_groove_bar {
            return;
        }
        let index = self.rng.weighted_index(&GrooveId::WEIGHTS);
        let groove = GrooveId::from_index(index as u8);
        let r = self.rng.rand01();
        let bars = if r < 0.3 {
            2
        } else if r < 0.7 {
            4
        } else {
            8
        };
        self.state.groove = groove;
        self.next_groove_bar = bar + bars;
        debug!(target: "arrangement", "bar {}: groove {} for {} bars", bar, groove.name(), bars);
    }

    fn update_variant(&mut self, bar: u64, control: &ControlState) {
        let state = &self.state;
        if state.variant.is_active(bar)
            || state.stage < Stage::KickIn
            || state.breakdown_active
            || bar < self.cooldown_until_bar
        {
            return;
        }

        let forced = bar.saturating_sub(self.last_break_bar) >= self.config.anti_stale_bars;
        let mut p = self.config.section_variant_prob[state.section as usize % 4];
        if control.is_idle() {
            p += self.config.idle_variant_boost;
        }
        if !(forced || self.rng.chance(p)) {
            return;
        }

        let index = self.rng.weighted_index(&Variant::PICK_WEIGHTS);
        let variant = Variant::PICKABLE[index.min(Variant::PICKABLE.len() - 1)];
        let bars = variant.duration_bars(self.rng.rand01());
        self.state.variant = VariantWindow::starting(variant, bar, bars);
        self.last_break_bar = bar;
        debug!(
            target: "arrangement",
            "bar {}: variant {} for {} bars{}",
            bar,
            variant.name(),
            bars,
            if forced { " (anti-stale)" } else { "" }
        );
    }

    fn update_fill(&mut self, bar: u64) {
        let section_bars = self.config.section_bars;
        let last_bar_of_section = bar % section_bars == section_bars - 1;
        let state = &self.state;
        if !last_bar_of_section
            || state.stage < Stage::KickIn
            || state.variant.is_active(bar)
            || state.fill != Fill::None
        {
            return;
        }
        if self.rng.chance(self.config.fill_probability) {
            let index = self.rng.range_inclusive(0, Fill::PICKABLE.len() as u64 - 1);
            let fill = Fill::PICKABLE[index as usize];
            self.state.fill = fill;
            self.state.fill_until_bar = bar as i64;
            debug!(target: "arrangement", "bar {}: fill {}", bar, fill.name());
        }
    }
}

fn breakdown_gap(rng: &mut Xorshift32) -> u64 {
    12 + (rng.rand01() * 11.0) as u64
}
