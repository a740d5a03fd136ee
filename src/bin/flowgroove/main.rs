//! flowgroove - terminal front end for the groove engine
//!
//! The keyboard stands in for the gesture tracker. Run with: cargo run

mod app;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::Parser;
use color_eyre::eyre::{Result as EyreResult, WrapErr};

use flowgroove::{runtime, EngineConfig};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
struct Args {
    /// TOML file merged over the built-in defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory with kick.wav, snare.wav, rim.wav, hat.wav, openhat.wav
    #[arg(long)]
    samples: Option<PathBuf>,

    /// Arrangement seed (overrides the config)
    #[arg(long)]
    seed: Option<u32>,

    /// Fixed tempo instead of the tempo axis
    #[arg(long)]
    bpm: Option<f32>,

    /// Start playing immediately
    #[arg(long, default_value_t = false)]
    autoplay: bool,

    /// Log file (the terminal belongs to the HUD)
    #[arg(long, default_value = "flowgroove.log")]
    log: PathBuf,

    /// Debug-level logging
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_logging(path: &Path, verbose: bool) -> EyreResult<()> {
    use simplelog::{Config, LevelFilter, WriteLogger};

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let file = File::create(path)
        .wrap_err_with(|| format!("cannot create log file {}", path.display()))?;
    WriteLogger::init(level, Config::default(), file).wrap_err("failed to initialize logger")?;
    log::info!("flowgroove starting (log level: {:?})", level);
    Ok(())
}

fn main() -> EyreResult<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(&args.log, args.verbose)?;

    let mut config = EngineConfig::load(args.config.as_deref());
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(bpm) = args.bpm {
        config.tempo.fixed_bpm = Some(bpm);
    }

    let mut handle = runtime::launch(runtime::RuntimeOptions {
        config,
        sample_dir: args.samples,
    })
    .wrap_err("failed to open audio output")?;
    if args.autoplay {
        handle.start()?;
    }

    let mut terminal = ratatui::init();
    let result = app::App::new(handle).run(&mut terminal);
    ratatui::restore();
    result
}
