//! Lookahead step scheduler.
//!
//! Runs on a coarse timer and schedules every step whose start falls inside
//! the lookahead window, stamped with audio-clock time:
//!
//! ```text
//!   now                    now + lookahead
//!    |------------------------|
//!      ^     ^     ^     ^
//!      step  step  step  step      <- emitted this tick
//! ```
//!
//! If the clock jumped ahead (the process was descheduled, the device
//! stalled) the missed steps are skipped, not replayed. When that lands in
//! the middle of a bar the source still hears about the bar first, so the
//! rest of it plays from its own plan.

use log::warn;

use super::events::StepEvent;
use crate::config::SchedulerConfig;
use crate::sequencing::patterns::STEPS_PER_BAR;

/// Receives bar boundaries and step slots from the scheduler.
pub trait StepSource {
    /// `bar` is about to be scheduled: step 0 normally, or the step stall
    /// recovery landed on.
    fn on_bar(&mut self, bar: u64);
    /// Push the events for one step. `time` is never earlier than `now`.
    fn on_step(&mut self, bar: u64, step: usize, time: f64, out: &mut Vec<StepEvent>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickReport {
    /// Steps dropped by stall recovery
    pub skipped_steps: u64,
    /// Step slots scheduled this tick
    pub scheduled_steps: u32,
}

#[derive(Debug, Clone)]
pub struct LookaheadScheduler {
    step: usize,
    bar: u64,
    next_step_time: f64,
    /// Last bar handed to `on_bar`
    announced: Option<u64>,
    lookahead: f64,
    stall_slack: f64,
}

pub fn sec_per_step(bpm: f32) -> f64 {
    60.0 / bpm.max(1.0) as f64 / 4.0
}

impl LookaheadScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        Self {
            step: 0,
            bar: 0,
            next_step_time: 0.0,
            announced: None,
            lookahead: config.lookahead_ms / 1000.0,
            stall_slack: config.stall_slack_ms / 1000.0,
        }
    }

    /// Rewind to bar 0, step 0, with the first step at `start_time`.
    pub fn reset(&mut self, start_time: f64) {
        self.step = 0;
        self.bar = 0;
        self.next_step_time = start_time;
        self.announced = None;
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn bar(&self) -> u64 {
        self.bar
    }

    pub fn next_step_time(&self) -> f64 {
        self.next_step_time
    }

    /// One scheduler tick at audio-clock time `now`. `bpm` is sampled once
    /// by the caller and holds for the whole tick.
    pub fn tick<S: StepSource>(
        &mut self,
        now: f64,
        bpm: f32,
        source: &mut S,
        out: &mut Vec<StepEvent>,
    ) -> TickReport {
        let mut report = TickReport::default();
        let step_len = sec_per_step(bpm);

        let behind = now - self.next_step_time;
        if behind > self.stall_slack {
            let missed = (behind / step_len).floor() as u64;
            let total = self.step as u64 + missed;
            self.bar += total / STEPS_PER_BAR as u64;
            self.step = (total % STEPS_PER_BAR as u64) as usize;
            self.next_step_time += missed as f64 * step_len;
            report.skipped_steps = missed;
            warn!(
                target: "engine",
                "scheduler stalled {:.0} ms, skipped {} steps to bar {} step {}",
                behind * 1000.0,
                missed,
                self.bar,
                self.step
            );
            if self.step != 0 && self.announced != Some(self.bar) {
                source.on_bar(self.bar);
                self.announced = Some(self.bar);
            }
        }

        while self.next_step_time < now + self.lookahead {
            if self.step == 0 {
                source.on_bar(self.bar);
                self.announced = Some(self.bar);
            }
            let time = self.next_step_time.max(now);
            source.on_step(self.bar, self.step, time, out);
            report.scheduled_steps += 1;

            self.step += 1;
            if self.step == STEPS_PER_BAR {
                self.step = 0;
                self.bar += 1;
            }
            self.next_step_time += step_len;
        }
        report
    }
}
