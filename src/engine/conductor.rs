//! The scheduler-side engine.
//!
//! Everything that decides what plays lives behind [`Engine`]: control
//! intake, MIDI commands, the lookahead scheduler driving the arrangement,
//! the trigger path into render messages, and parameter posting. It never
//! renders audio and never reads the wall clock; callers pass audio-clock
//! time in.

use std::collections::VecDeque;
use std::path::Path;

use log::{debug, info};

use super::clock::MonotonicClock;
use super::events::{StepEvent, StepKind};
use super::scheduler::{LookaheadScheduler, StepSource, TickReport};
use super::status::{pulse_level, EngineStatus};
use crate::arrangement::{Arrangement, MacroKind};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::io::{midi_to_command, ControlAxis, ControlState, MidiCommand, MidiEvent};
use crate::samples::{LoaderChain, SampleBank, SampleSource, SampleVoice};
use crate::sequencing::harmony::PROGRESSION;
use crate::sequencing::rng::Xorshift32;
use crate::synth::channel::ParamSender;
use crate::synth::message::{MessageSender, NoteKind, RenderMessage};
use crate::synth::params::{compose, ParamInput};

const PINCH_ON: f32 = 0.5;
const FAST_HAND: f32 = 0.85;
/// Separate jitter stream so live hits never disturb the arrangement PRNG.
const JITTER_SEED_SALT: u32 = 0x9e37_79b9;

/// CC values that took over a gesture axis.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct AxisOverrides {
    build: Option<f32>,
    left_y: Option<f32>,
    right_y: Option<f32>,
}

impl AxisOverrides {
    fn apply(&self, mut control: ControlState) -> ControlState {
        if let Some(v) = self.build {
            control.build = v;
        }
        if let Some(v) = self.left_y {
            control.left_y = v;
        }
        if let Some(v) = self.right_y {
            control.right_y = v;
        }
        control
    }
}

/// A scheduled step, kept until the audio clock reaches it.
#[derive(Debug, Clone, Copy)]
struct Slot {
    bar: u64,
    step: usize,
    time: f64,
    chord: usize,
}

/// Adapts the arrangement to the scheduler's callbacks and remembers which
/// step slots were scheduled so status and pitch follow the audible position.
struct ArrangementSource<'a> {
    arrangement: &'a mut Arrangement,
    control: &'a ControlState,
    slots: &'a mut VecDeque<Slot>,
}

impl StepSource for ArrangementSource<'_> {
    fn on_bar(&mut self, bar: u64) {
        self.arrangement.on_bar(bar, self.control);
    }

    fn on_step(&mut self, bar: u64, step: usize, time: f64, out: &mut Vec<StepEvent>) {
        self.slots.push_back(Slot {
            bar,
            step,
            time,
            chord: self.arrangement.state().harmony.index,
        });
        self.arrangement.step_events(step, time, out);
    }
}

pub struct Engine<S: MessageSender> {
    config: EngineConfig,
    sink: S,
    sample_rate: f64,
    arrangement: Arrangement,
    scheduler: LookaheadScheduler,
    gesture: ControlState,
    control: ControlState,
    overrides: AxisOverrides,
    trigger_clock: MonotonicClock,
    params: ParamSender,
    bank: SampleBank,
    jitter: Xorshift32,
    events: Vec<StepEvent>,
    slots: VecDeque<Slot>,
    /// Harmony index of the last slot the audio clock reached
    sounding_chord: usize,
    running: bool,
    last_tick: Option<f64>,
    last_quarter: Option<f64>,
    lead_note: Option<(u8, f32)>,
    guitar_pluck: u32,
    pinch_left_on: bool,
    pinch_right_on: bool,
    fast_hand: bool,
    dropped: u64,
    status: EngineStatus,
}

impl<S: MessageSender> Engine<S> {
    pub fn new(config: EngineConfig, sample_rate: f32, sink: S) -> Self {
        let config = config.sanitized();
        let arrangement = Arrangement::new(config.arrangement.clone(), config.seed);
        let scheduler = LookaheadScheduler::new(&config.scheduler);
        let trigger_clock = MonotonicClock::new(config.scheduler.trigger_epsilon_ms / 1000.0);
        let params = ParamSender::new(config.scheduler.param_throttle_ms);
        let jitter = Xorshift32::new(config.seed ^ JITTER_SEED_SALT);
        Self {
            sink,
            sample_rate: sample_rate.max(1.0) as f64,
            arrangement,
            scheduler,
            gesture: ControlState::default(),
            control: ControlState::default(),
            overrides: AxisOverrides::default(),
            trigger_clock,
            params,
            bank: SampleBank::new(sample_rate),
            jitter,
            events: Vec::with_capacity(64),
            slots: VecDeque::with_capacity(64),
            sounding_chord: 0,
            running: false,
            last_tick: None,
            last_quarter: None,
            lead_note: None,
            guitar_pluck: 0,
            pinch_left_on: false,
            pinch_right_on: false,
            fast_hand: false,
            dropped: 0,
            status: EngineStatus::default(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    pub fn scheduler(&self) -> &LookaheadScheduler {
        &self.scheduler
    }

    pub fn control(&self) -> &ControlState {
        &self.control
    }

    pub fn samples(&self) -> &SampleBank {
        &self.bank
    }

    pub fn status(&self) -> &EngineStatus {
        &self.status
    }

    pub fn last_error(&self) -> Option<&str> {
        self.status.last_error.as_deref()
    }

    /// The message sink, for tests and tools that inspect what was posted.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Tempo for the next tick: the fixed tempo if configured, otherwise
    /// the left hand's horizontal axis across the tempo range.
    pub fn bpm(&self) -> f32 {
        let tempo = &self.config.tempo;
        match tempo.fixed_bpm {
            Some(bpm) => bpm,
            None => tempo.min_bpm + self.control.left_x * (tempo.max_bpm - tempo.min_bpm),
        }
    }

    /// Resolve every percussion voice through its fallback chain and hand
    /// the buffers to the render side. Voices whose chain fails stay silent
    /// for the session. Returns how many voices are ready.
    pub fn load_samples(&mut self, dir: Option<&Path>, loaders: &LoaderChain) -> usize {
        for voice in SampleVoice::ALL {
            if self.bank.is_ready(voice) {
                continue;
            }
            let sources = SampleSource::default_chain(voice, dir);
            match self.bank.load(voice, &sources, loaders) {
                Ok(loaded) => {
                    let msg = RenderMessage::InstallSample {
                        voice,
                        buffer: loaded.buffer.clone(),
                    };
                    if !self.sink.push(msg) {
                        self.dropped += 1;
                    }
                }
                Err(e) => {
                    self.status.last_error = Some(e.to_string());
                }
            }
        }
        self.status.unavailable_voices = SampleVoice::ALL
            .iter()
            .filter(|v| self.bank.is_unavailable(**v))
            .map(|v| v.name())
            .collect();
        SampleVoice::ALL
            .iter()
            .filter(|v| self.bank.is_ready(**v))
            .count()
    }

    /// Begin playback with the first step `start_offset_ms` after `now`.
    pub fn start(&mut self, now: f64) -> Result<(), EngineError> {
        if self.running {
            return Err(EngineError::AlreadyRunning);
        }
        self.arrangement.reset();
        let offset = self.config.scheduler.start_offset_ms / 1000.0;
        self.scheduler.reset(now + offset);
        self.trigger_clock.reset();
        self.params.invalidate();
        self.slots.clear();
        self.sounding_chord = 0;
        self.last_tick = Some(now);
        self.last_quarter = None;
        self.running = true;

        self.send(RenderMessage::Start);
        self.post_gates();
        self.post_params(now);
        self.refresh_status(now, TickReport::default());
        info!(target: "engine", "started at {:.3}s, seed {:#010x}", now, self.config.seed);
        Ok(())
    }

    /// Ramp out, silence every sample voice and rewind the arrangement so
    /// the next start begins at bar 0.
    pub fn stop(&mut self) -> Result<(), EngineError> {
        if !self.running {
            return Err(EngineError::NotRunning);
        }
        self.running = false;
        self.send(RenderMessage::Stop);
        self.arrangement.reset();
        self.scheduler.reset(0.0);
        self.lead_note = None;
        self.slots.clear();
        self.sounding_chord = 0;
        self.events.clear();
        self.last_quarter = None;
        self.post_gates();
        self.params.invalidate();

        let last_error = self.status.last_error.take();
        let unavailable = std::mem::take(&mut self.status.unavailable_voices);
        self.status = EngineStatus {
            last_error,
            unavailable_voices: unavailable,
            dropped_messages: self.dropped,
            ..EngineStatus::default()
        };
        info!(target: "engine", "stopped");
        Ok(())
    }

    /// New gesture snapshot. Pinch and speed edges fire macros.
    pub fn set_control(&mut self, control: ControlState, now: f64) {
        self.gesture = control.clamped();
        self.control = self.overrides.apply(self.gesture);
        let c = self.control;

        let pinch_left = c.pinch_left > PINCH_ON;
        if pinch_left && !self.pinch_left_on {
            self.arrangement.trigger_macro(MacroKind::PadLift, c.pinch_left, now);
        }
        self.pinch_left_on = pinch_left;

        let pinch_right = c.pinch_right > PINCH_ON;
        if pinch_right && !self.pinch_right_on {
            self.arrangement.trigger_macro(MacroKind::PercBoost, c.pinch_right, now);
            self.guitar_pluck = self.guitar_pluck.wrapping_add(1);
        }
        self.pinch_right_on = pinch_right;

        let fast = c.speed_right > FAST_HAND;
        if fast && !self.fast_hand {
            self.arrangement.trigger_macro(MacroKind::FxBlast, c.speed_right, now);
        }
        self.fast_hand = fast;

        self.post_gates();
    }

    pub fn handle_midi(&mut self, event: MidiEvent, now: f64) {
        let Some(command) = midi_to_command(event) else {
            return;
        };
        debug!(target: "engine", "midi {:?}", command);
        match command {
            MidiCommand::Hit { kind, velocity } => {
                if self.running {
                    let time = self.trigger_clock.next(now);
                    self.dispatch(StepEvent::hit(kind, time, velocity));
                }
            }
            MidiCommand::Macro { kind, strength } => {
                self.arrangement.trigger_macro(kind, strength, now);
            }
            MidiCommand::LeadOn {
                note,
                freq,
                velocity,
            } => {
                self.lead_note = Some((note, freq));
                if self.running {
                    let time = self.trigger_clock.next(now);
                    self.dispatch(StepEvent::note(StepKind::Lead, time, velocity, freq));
                }
                self.params.invalidate();
                self.post_gates();
            }
            MidiCommand::LeadOff { note } => {
                if matches!(self.lead_note, Some((held, _)) if held == note) {
                    self.lead_note = None;
                    self.params.invalidate();
                    self.post_gates();
                }
            }
            MidiCommand::Axis { axis, value } => {
                match axis {
                    ControlAxis::Build => self.overrides.build = Some(value),
                    ControlAxis::LeftY => self.overrides.left_y = Some(value),
                    ControlAxis::RightY => self.overrides.right_y = Some(value),
                }
                self.control = self.overrides.apply(self.gesture);
            }
        }
    }

    /// One scheduler tick at audio-clock time `now`.
    pub fn advance(&mut self, now: f64) -> TickReport {
        if !self.running {
            return TickReport::default();
        }
        let dt = match self.last_tick {
            Some(last) => (now - last).clamp(0.0, 0.25) as f32,
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.arrangement.tick_macros(now, dt);

        let bpm = self.bpm();
        let mut events = std::mem::take(&mut self.events);
        events.clear();
        let report = {
            let mut source = ArrangementSource {
                arrangement: &mut self.arrangement,
                control: &self.control,
                slots: &mut self.slots,
            };
            self.scheduler.tick(now, bpm, &mut source, &mut events)
        };
        for event in events.iter().copied() {
            self.dispatch(event);
        }
        self.events = events;

        self.follow_clock(now);
        self.post_params(now);
        self.refresh_status(now, report);
        report
    }

    fn dispatch(&mut self, event: StepEvent) {
        let frame = (event.time.max(0.0) * self.sample_rate).round() as u64;
        let msg = if event.kind.is_percussion() {
            let Some(voice) = SampleVoice::from_kind(event.kind) else {
                return;
            };
            if self.control.kill {
                return;
            }
            let Some(loaded) = self.bank.get(voice) else {
                return;
            };
            let jitter = &self.config.samples;
            let gain = event.gain * (1.0 + 0.5 * jitter.hit_jitter_gain * self.jitter.next_bipolar());
            let rate = loaded.base_rate
                * event.playback_rate
                * (1.0 + 0.5 * jitter.hit_jitter_rate * self.jitter.next_bipolar());
            RenderMessage::Hit {
                voice,
                frame,
                gain,
                rate,
                send: voice.send_level(),
            }
        } else {
            let kind = match event.kind {
                StepKind::Bass => NoteKind::Bass,
                StepKind::Melody => NoteKind::Melody,
                StepKind::Pad => NoteKind::Pad,
                _ => NoteKind::Lead,
            };
            RenderMessage::Note {
                kind,
                frame,
                freq: event.pitch_hz,
                gain: event.gain,
            }
        };
        self.send(msg);
    }

    fn send(&mut self, msg: RenderMessage) {
        if !self.sink.push(msg) {
            self.dropped += 1;
        }
    }

    fn post_gates(&mut self) {
        let note_gate = if self.lead_note.is_some() { 1.0 } else { 0.0 };
        let gate = if self.running && !self.control.kill {
            1.0
        } else {
            0.0
        };
        self.params.post_gate(note_gate, gate, &mut self.sink);
    }

    fn post_params(&mut self, now: f64) {
        let input = ParamInput {
            state: self.arrangement.state(),
            plan: self.arrangement.plan(),
            control: &self.control,
            bpm: self.bpm(),
            chord: &PROGRESSION[self.sounding_chord % PROGRESSION.len()],
            lead_note: self.lead_note.map(|(_, freq)| freq),
            guitar_pluck: self.guitar_pluck,
        };
        self.params.post_params(now, &mut self.sink, || compose(&input));
    }

    /// Retire the slots the audio clock has reached.
    fn follow_clock(&mut self, now: f64) {
        while let Some(&slot) = self.slots.front() {
            if slot.time > now {
                break;
            }
            self.slots.pop_front();
            self.status.bar = slot.bar;
            self.status.step = slot.step;
            self.sounding_chord = slot.chord;
            if slot.step % 4 == 0 {
                self.last_quarter = Some(slot.time);
            }
        }
    }

    fn refresh_status(&mut self, now: f64, report: TickReport) {
        let bpm = self.bpm();
        let state = self.arrangement.state();
        let plan = self.arrangement.plan();
        let status = &mut self.status;
        status.running = self.running;
        status.stage = state.stage;
        status.section = state.section;
        status.groove = state.groove;
        status.variant = state.variant_at(state.bar);
        status.fill = state.fill_at(state.bar);
        status.breakdown = state.breakdown_active;
        status.flow_scene = state.flow_scene;
        status.harmony_index = state.harmony.index;
        status.chord = state.harmony.chord().name;
        status.macros = state.macro_levels;
        status.kick = plan.kick;
        status.snare = plan.snare;
        status.hats = plan.hats.union(plan.open_hats);
        status.bass = plan.bass;
        status.melody = plan.melody;
        status.skipped_steps += report.skipped_steps;
        status.dropped_messages = self.dropped + self.params.dropped();
        status.pulse = self
            .last_quarter
            .map_or(0.0, |t| pulse_level(now - t));
        status.bpm = bpm;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arrangement::Stage;
    use crate::samples::BuiltinKit;

    const SR: f32 = 48_000.0;

    fn engine() -> Engine<VecDeque<RenderMessage>> {
        let mut config = EngineConfig::default();
        config.tempo.fixed_bpm = Some(120.0);
        Engine::new(config, SR, VecDeque::new())
    }

    fn with_kit(engine: &mut Engine<VecDeque<RenderMessage>>) {
        let loaders = LoaderChain::new().with(BuiltinKit::new(SR as u32));
        assert_eq!(engine.load_samples(None, &loaders), SampleVoice::COUNT);
    }

    fn drain(engine: &mut Engine<VecDeque<RenderMessage>>) -> Vec<RenderMessage> {
        engine.sink_mut().drain(..).collect()
    }

    #[test]
    fn start_twice_and_stop_idle_are_errors() {
        let mut engine = engine();
        assert_eq!(engine.stop(), Err(EngineError::NotRunning));
        engine.start(0.0).unwrap();
        assert_eq!(engine.start(0.1), Err(EngineError::AlreadyRunning));
        engine.stop().unwrap();
        assert!(!engine.is_running());
    }

    #[test]
    fn start_posts_start_gate_and_params() {
        let mut engine = engine();
        engine.start(1.0).unwrap();
        let msgs = drain(&mut engine);
        assert!(matches!(msgs[0], RenderMessage::Start));
        assert!(msgs
            .iter()
            .any(|m| matches!(m, RenderMessage::Gate { gate, .. } if *gate == 1.0)));
        assert!(msgs.iter().any(|m| matches!(m, RenderMessage::Params(_))));
    }

    #[test]
    fn first_tick_schedules_downbeat_kick_free_intro() {
        let mut engine = engine();
        with_kit(&mut engine);
        engine.start(0.0).unwrap();
        drain(&mut engine);
        engine.advance(0.0);
        let msgs = drain(&mut engine);
        // intro: hats, pad and drone only
        let hits: Vec<_> = msgs
            .iter()
            .filter_map(|m| match m {
                RenderMessage::Hit { voice, frame, .. } => Some((*voice, *frame)),
                _ => None,
            })
            .collect();
        assert!(hits.iter().all(|(v, _)| *v == SampleVoice::Hat));
        // first step lands at the start offset: 50 ms
        let pad = msgs.iter().find_map(|m| match m {
            RenderMessage::Note {
                kind: NoteKind::Pad,
                frame,
                ..
            } => Some(*frame),
            _ => None,
        });
        assert_eq!(pad, Some(2_400));
    }

    #[test]
    fn unavailable_voice_is_skipped() {
        let mut engine = engine();
        let loaders = LoaderChain::new();
        assert_eq!(engine.load_samples(None, &loaders), 0);
        assert_eq!(engine.status().unavailable_voices.len(), SampleVoice::COUNT);
        assert!(engine.last_error().is_some());

        engine.start(0.0).unwrap();
        for i in 0..40 {
            engine.advance(i as f64 * 0.025);
        }
        let msgs = drain(&mut engine);
        assert!(!msgs.iter().any(|m| matches!(m, RenderMessage::Hit { .. })));
        assert!(msgs.iter().any(|m| matches!(m, RenderMessage::Note { .. })));
    }

    #[test]
    fn midi_burst_gets_strictly_increasing_frames() {
        let mut engine = engine();
        with_kit(&mut engine);
        engine.start(0.0).unwrap();
        drain(&mut engine);
        for _ in 0..5 {
            engine.handle_midi(MidiEvent::NoteOn { note: 36, velocity: 1.0 }, 2.0);
        }
        let frames: Vec<u64> = drain(&mut engine)
            .iter()
            .filter_map(|m| match m {
                RenderMessage::Hit { frame, .. } => Some(*frame),
                _ => None,
            })
            .collect();
        assert_eq!(frames.len(), 5);
        assert!(frames.windows(2).all(|w| w[1] > w[0]), "{:?}", frames);
        assert_eq!(frames[0], 96_000);
    }

    #[test]
    fn cc_overrides_gesture_axis() {
        let mut engine = engine();
        engine.handle_midi(MidiEvent::cc_u7(1, 127), 0.0);
        assert_eq!(engine.control().build, 1.0);
        engine.set_control(
            ControlState {
                build: 0.1,
                ..ControlState::default()
            },
            0.1,
        );
        assert_eq!(engine.control().build, 1.0);
    }

    #[test]
    fn pinch_edge_fires_macro_once() {
        let mut engine = engine();
        engine.start(0.0).unwrap();
        let pinched = ControlState {
            pinch_left: 1.0,
            ..ControlState::default()
        };
        engine.set_control(pinched, 0.0);
        let deadline = engine.arrangement().macros().deadline(MacroKind::PadLift);
        engine.set_control(pinched, 1.0);
        assert_eq!(engine.arrangement().macros().deadline(MacroKind::PadLift), deadline);
        assert!(deadline > 0.0);
    }

    #[test]
    fn kill_closes_gate_and_skips_hits() {
        let mut engine = engine();
        with_kit(&mut engine);
        engine.start(0.0).unwrap();
        engine.set_control(
            ControlState {
                kill: true,
                ..ControlState::default()
            },
            0.0,
        );
        let msgs = drain(&mut engine);
        assert!(matches!(
            msgs.last(),
            Some(RenderMessage::Gate { gate, .. }) if *gate == 0.0
        ));
        engine.advance(0.0);
        assert!(!drain(&mut engine)
            .iter()
            .any(|m| matches!(m, RenderMessage::Hit { .. })));
    }

    #[test]
    fn stall_mid_bar_plans_the_bar_it_lands_in() {
        let mut engine = engine();
        with_kit(&mut engine);
        engine.start(0.0).unwrap();
        engine.advance(0.0);
        drain(&mut engine);

        // 2 s per bar at 120 bpm: 40.56 s is bar 20 step 4
        let report = engine.advance(40.56);
        assert_eq!(report.skipped_steps, 323);
        assert_eq!(engine.scheduler().bar(), 20);
        assert_eq!(engine.arrangement().state().bar, 20);
        assert_eq!(engine.arrangement().state().stage, Stage::Full);

        // the rest of the bar plays from its own plan
        let mut now = 40.56;
        while now < 41.8 {
            now += 0.025;
            engine.advance(now);
        }
        assert_eq!(engine.status().stage, Stage::Full);
        assert_eq!(engine.arrangement().state().bar, 20);
    }

    #[test]
    fn params_keep_the_sounding_chord_until_the_downbeat() {
        let mut engine = engine();
        engine.start(0.0).unwrap();
        let pad_freqs = |msgs: &[RenderMessage]| -> Vec<f32> {
            msgs.iter()
                .filter_map(|m| match m {
                    RenderMessage::Params(p) => Some(p.pad_freq),
                    _ => None,
                })
                .collect()
        };

        // bar 4 starts at 8.05 s and is scheduled from 7.93 s on
        let mut now = 0.0;
        while now < 8.0 {
            engine.advance(now);
            now += 0.025;
        }
        assert_eq!(engine.arrangement().state().harmony.index, 1);
        let before = pad_freqs(&drain(&mut engine));
        assert!(!before.is_empty());
        assert!(before.iter().all(|&f| f == PROGRESSION[0].high_pitch), "{:?}", before);

        while now < 8.2 {
            engine.advance(now);
            now += 0.025;
        }
        let after = pad_freqs(&drain(&mut engine));
        assert_eq!(after.last(), Some(&PROGRESSION[1].high_pitch));
    }

    #[test]
    fn stop_rewinds_to_bar_zero() {
        let mut engine = engine();
        engine.start(0.0).unwrap();
        for i in 0..200 {
            engine.advance(i as f64 * 0.025);
        }
        assert!(engine.scheduler().bar() > 0);
        engine.stop().unwrap();
        assert_eq!(engine.scheduler().bar(), 0);
        assert_eq!(engine.arrangement().state().bar, 0);
        assert!(matches!(
            drain(&mut engine).iter().find(|m| matches!(m, RenderMessage::Stop)),
            Some(_)
        ));
    }
}
