use flowgroove::config::SchedulerConfig;
use flowgroove::engine::{
    sec_per_step, LookaheadScheduler, MonotonicClock, StepEvent, StepKind, StepSource,
};

#[derive(Default)]
struct Log {
    bars: Vec<u64>,
    slots: Vec<(u64, usize, f64)>,
}

impl StepSource for Log {
    fn on_bar(&mut self, bar: u64) {
        self.bars.push(bar);
    }

    fn on_step(&mut self, bar: u64, step: usize, time: f64, out: &mut Vec<StepEvent>) {
        self.slots.push((bar, step, time));
        out.push(StepEvent::hit(StepKind::Hat, time, 0.5));
    }
}

#[test]
fn stall_at_138_bpm_lands_on_bar_5_step_12() {
    let mut sched = LookaheadScheduler::new(&SchedulerConfig::default());
    let mut log = Log::default();
    let mut out = Vec::new();
    sched.reset(0.0);

    let report = sched.tick(10.05, 138.0, &mut log, &mut out);
    assert_eq!(report.skipped_steps, 92);
    assert_eq!(log.slots.first().map(|s| (s.0, s.1)), Some((5, 12)));
    // first emitted slot is not in the past
    assert!(log.slots.iter().all(|s| s.2 >= 10.05));
    // only the bar it landed in is announced, skipped bars are not replayed
    assert_eq!(log.bars, vec![5]);
}

#[test]
fn steady_ticks_cover_every_step_once() {
    let mut sched = LookaheadScheduler::new(&SchedulerConfig::default());
    let mut log = Log::default();
    let mut out = Vec::new();
    sched.reset(0.05);

    let mut now = 0.0;
    while now < 8.0 {
        let report = sched.tick(now, 138.0, &mut log, &mut out);
        assert_eq!(report.skipped_steps, 0);
        now += 0.025;
    }

    let step = sec_per_step(138.0);
    for (i, &(bar, s, time)) in log.slots.iter().enumerate() {
        assert_eq!(bar, (i / 16) as u64);
        assert_eq!(s, i % 16);
        assert!((time - (0.05 + i as f64 * step)).abs() < 1e-9);
    }
    assert_eq!(out.len(), log.slots.len());
}

#[test]
fn tempo_change_applies_from_the_next_tick() {
    let mut sched = LookaheadScheduler::new(&SchedulerConfig::default());
    let mut log = Log::default();
    let mut out = Vec::new();
    sched.reset(0.0);

    sched.tick(0.0, 120.0, &mut log, &mut out);
    let before = sched.next_step_time();
    sched.tick(before - 0.1, 150.0, &mut log, &mut out);
    let after = sched.next_step_time();
    assert!((after - before - sec_per_step(150.0)).abs() < 1e-9);
}

#[test]
fn bursty_triggers_stay_strictly_ordered() {
    let epsilon = 0.002;
    let mut clock = MonotonicClock::new(epsilon);
    let mut times = Vec::new();
    // 40 hits arriving in four bursts, some with clock jitter backwards
    for burst in 0..4 {
        let base = burst as f64 * 0.03;
        for i in 0..10 {
            let jitter = if i % 3 == 0 { -0.001 } else { 0.0 };
            times.push(clock.next(base + jitter));
        }
    }
    for pair in times.windows(2) {
        assert!(pair[1] >= pair[0] + epsilon - 1e-12, "{:?}", pair);
    }
}
