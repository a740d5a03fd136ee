//! Keyboard-driven control loop around a running engine.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::DefaultTerminal;

use flowgroove::analysis::{ActivityMeters, SpectrumAnalyzer, WaveformTap};
use flowgroove::io::{ControlState, MidiEvent};
use flowgroove::runtime::RuntimeHandle;
use flowgroove::EngineStatus;

use super::ui;

/// Samples shown by the waveform and fed to the FFT
pub const VIS_BUFFER_SIZE: usize = 1024;
const AXIS_STEP: f32 = 0.05;
/// Per-frame falloff of the hand speed after a flick
const SPEED_DECAY: f32 = 0.8;

pub struct App {
    runtime: RuntimeHandle,
    pub control: ControlState,
    pub status: EngineStatus,
    pub meters: ActivityMeters,
    pub spectrum: SpectrumAnalyzer,
    waveform: WaveformTap,
    pub scope: Vec<f32>,
    pub sample_rate: f32,
    pub message: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(runtime: RuntimeHandle) -> Self {
        let sample_rate = runtime.sample_rate();
        Self {
            status: runtime.status(),
            runtime,
            control: ControlState::default(),
            meters: ActivityMeters::new(),
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            waveform: WaveformTap::new(VIS_BUFFER_SIZE),
            scope: Vec::with_capacity(VIS_BUFFER_SIZE),
            sample_rate,
            message: None,
            should_quit: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.runtime.is_playing()
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last = Instant::now();
        while !self.should_quit {
            let dt = last.elapsed().as_secs_f32();
            last = Instant::now();
            self.poll(dt);

            terminal.draw(|frame| ui::render(frame, self))?;

            // ~60 fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        if self.runtime.is_playing() {
            self.runtime.stop()?;
        }
        Ok(())
    }

    fn poll(&mut self, dt: f32) {
        self.control.dt = dt;
        self.runtime.set_control(self.control);
        self.control.speed_right *= SPEED_DECAY;

        self.meters.update(self.runtime.activity(), dt);
        self.waveform.drain(self.runtime.scope());
        self.waveform.snapshot(&mut self.scope);
        self.spectrum.update(&self.scope);
        self.status = self.runtime.status();
    }

    fn handle_key(&mut self, key: KeyCode) {
        let c = &mut self.control;
        let nudge = |v: &mut f32, d: f32| *v = (*v + d).clamp(0.0, 1.0);
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(' ') => {
                let result = if self.runtime.is_playing() {
                    self.runtime.stop()
                } else {
                    self.runtime.start()
                };
                self.message = result.err().map(|e| e.to_string());
            }
            // left hand: tempo and filter
            KeyCode::Char('a') => nudge(&mut c.left_x, -AXIS_STEP),
            KeyCode::Char('d') => nudge(&mut c.left_x, AXIS_STEP),
            KeyCode::Char('w') => nudge(&mut c.left_y, AXIS_STEP),
            KeyCode::Char('s') => nudge(&mut c.left_y, -AXIS_STEP),
            // right hand: hat rotation and density
            KeyCode::Char('j') => nudge(&mut c.right_x, -AXIS_STEP),
            KeyCode::Char('l') => nudge(&mut c.right_x, AXIS_STEP),
            KeyCode::Char('i') => nudge(&mut c.right_y, AXIS_STEP),
            KeyCode::Char('k') => nudge(&mut c.right_y, -AXIS_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => nudge(&mut c.build, 0.1),
            KeyCode::Char('-') => nudge(&mut c.build, -0.1),
            KeyCode::Char('z') => c.pinch_left = if c.pinch_left > 0.5 { 0.0 } else { 1.0 },
            KeyCode::Char('x') => c.pinch_right = if c.pinch_right > 0.5 { 0.0 } else { 1.0 },
            KeyCode::Char('c') => c.speed_right = 1.0,
            KeyCode::Char('h') => c.hand_count = (c.hand_count + 1) % 3,
            KeyCode::Char('m') => c.kill = !c.kill,
            KeyCode::Char(ch @ '1'..='3') => {
                let note = 48 + (ch as u8 - b'1');
                self.runtime.midi(MidiEvent::note_on_u7(note, 127));
            }
            KeyCode::Char(ch @ '5'..='9') => {
                const DRUMS: [u8; 5] = [36, 38, 37, 42, 46];
                let note = DRUMS[(ch as u8 - b'5') as usize];
                self.runtime.midi(MidiEvent::note_on_u7(note, 110));
            }
            _ => {}
        }
    }
}
