//! Audio graph assembly.
//!
//! Three threads meet here: the cpal callback owns the [`Renderer`], a
//! scheduler thread owns the [`Engine`] and ticks it on a fixed interval,
//! and the caller (the HUD) talks to both through rings and a shared status
//! snapshot. Messages only flow toward the render thread; what comes back
//! is best-effort visualization data.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info, warn};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::config::EngineConfig;
use crate::engine::{AudioClock, Engine, EngineStatus};
use crate::error::EngineError;
use crate::io::{ControlState, MidiEvent};
use crate::samples::{BuiltinKit, LoaderChain, WavLoader};
use crate::synth::message::{Activity, RenderMessage};
use crate::synth::Renderer;

const MESSAGE_RING: usize = 1_024;
const COMMAND_RING: usize = 64;
const ACTIVITY_RING: usize = 256;
/// Scope samples buffered for the UI (about a third of a second at 48 kHz)
pub const SCOPE_RING: usize = 16_384;

/// Caller to scheduler thread.
#[derive(Debug, Clone, Copy)]
pub enum Command {
    Start,
    Stop,
    Control(ControlState),
    Midi(MidiEvent),
}

pub struct RuntimeOptions {
    pub config: EngineConfig,
    /// Directory searched for `<voice>.wav` before the built-in kit
    pub sample_dir: Option<PathBuf>,
}

/// A running output stream plus its scheduler thread. Dropping the handle
/// stops both.
pub struct RuntimeHandle {
    _stream: cpal::Stream,
    commands: Producer<Command>,
    status: Arc<Mutex<EngineStatus>>,
    activity: Consumer<Activity>,
    scope: Consumer<f32>,
    clock: AudioClock,
    channels: usize,
    playing: bool,
    shutdown: Arc<AtomicBool>,
    scheduler: Option<JoinHandle<()>>,
}

/// Open the default output device and start rendering. Playback itself
/// begins with [`RuntimeHandle::start`].
pub fn launch(options: RuntimeOptions) -> Result<RuntimeHandle, EngineError> {
    let config = options.config.sanitized();

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(EngineError::NoOutputDevice)?;
    let supported = device
        .default_output_config()
        .map_err(|e| EngineError::StreamConfig(e.to_string()))?;
    let sample_rate = supported.sample_rate().0 as f32;
    let channels = supported.channels() as usize;
    info!(
        target: "runtime",
        "output {} Hz, {} channels, quantum {}",
        sample_rate,
        channels,
        config.synth.render_quantum
    );

    let (msg_tx, msg_rx) = RingBuffer::<RenderMessage>::new(MESSAGE_RING);
    let (activity_tx, activity_rx) = RingBuffer::<Activity>::new(ACTIVITY_RING);
    let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_RING);
    let (cmd_tx, cmd_rx) = RingBuffer::<Command>::new(COMMAND_RING);

    let clock = AudioClock::new(sample_rate);
    let mut renderer = Renderer::new(msg_rx, clock.clone(), &config.synth)
        .with_activity(activity_tx)
        .with_scope(scope_tx);

    let stream = device
        .build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _| renderer.render_interleaved(data, channels),
            |err| error!(target: "runtime", "stream error: {}", err),
            None,
        )
        .map_err(|e| EngineError::StreamBuild(e.to_string()))?;
    stream
        .play()
        .map_err(|e| EngineError::StreamPlay(e.to_string()))?;

    let tick = Duration::from_millis(config.scheduler.tick_interval_ms);
    let mut engine = Engine::new(config, sample_rate, msg_tx);
    let loaders = LoaderChain::new()
        .with(WavLoader)
        .with(BuiltinKit::new(sample_rate as u32));
    let ready = engine.load_samples(options.sample_dir.as_deref(), &loaders);
    info!(target: "runtime", "{} sample voices ready", ready);

    let status = Arc::new(Mutex::new(engine.status().clone()));
    let shutdown = Arc::new(AtomicBool::new(false));
    let scheduler = thread::Builder::new()
        .name("flowgroove-scheduler".into())
        .spawn({
            let status = Arc::clone(&status);
            let shutdown = Arc::clone(&shutdown);
            let clock = clock.clone();
            move || scheduler_loop(engine, cmd_rx, clock, status, shutdown, tick)
        })
        .map_err(|e| EngineError::StreamBuild(e.to_string()))?;

    Ok(RuntimeHandle {
        _stream: stream,
        commands: cmd_tx,
        status,
        activity: activity_rx,
        scope: scope_rx,
        clock,
        channels,
        playing: false,
        shutdown,
        scheduler: Some(scheduler),
    })
}

fn scheduler_loop(
    mut engine: Engine<Producer<RenderMessage>>,
    mut commands: Consumer<Command>,
    clock: AudioClock,
    status: Arc<Mutex<EngineStatus>>,
    shutdown: Arc<AtomicBool>,
    tick: Duration,
) {
    while !shutdown.load(Ordering::Acquire) {
        let now = clock.now();
        while let Ok(command) = commands.pop() {
            let result = match command {
                Command::Start => engine.start(now),
                Command::Stop => engine.stop(),
                Command::Control(control) => {
                    engine.set_control(control, now);
                    Ok(())
                }
                Command::Midi(event) => {
                    engine.handle_midi(event, now);
                    Ok(())
                }
            };
            if let Err(e) = result {
                warn!(target: "runtime", "{}", e);
            }
        }

        engine.advance(now);
        if let Ok(mut shared) = status.lock() {
            shared.clone_from(engine.status());
        }
        thread::sleep(tick);
    }
    info!(target: "runtime", "scheduler thread exiting");
}

impl RuntimeHandle {
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.playing {
            return Err(EngineError::AlreadyRunning);
        }
        self.send(Command::Start);
        self.playing = true;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), EngineError> {
        if !self.playing {
            return Err(EngineError::NotRunning);
        }
        self.send(Command::Stop);
        self.playing = false;
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn set_control(&mut self, control: ControlState) {
        self.send(Command::Control(control));
    }

    pub fn midi(&mut self, event: MidiEvent) {
        self.send(Command::Midi(event));
    }

    fn send(&mut self, command: Command) {
        if self.commands.push(command).is_err() {
            warn!(target: "runtime", "command ring full, dropped {:?}", command);
        }
    }

    /// Latest scheduler-side snapshot.
    pub fn status(&self) -> EngineStatus {
        match self.status.lock() {
            Ok(status) => status.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn activity(&mut self) -> &mut Consumer<Activity> {
        &mut self.activity
    }

    pub fn scope(&mut self) -> &mut Consumer<f32> {
        &mut self.scope
    }

    pub fn sample_rate(&self) -> f32 {
        self.clock.sample_rate() as f32
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Audio-clock seconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }
}

impl Drop for RuntimeHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.scheduler.take() {
            if handle.join().is_err() {
                error!(target: "runtime", "scheduler thread panicked");
            }
        }
    }
}
