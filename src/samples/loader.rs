//! Sources and loaders for decoded sample buffers.

use std::path::{Path, PathBuf};

use super::SampleVoice;
use crate::error::LoadError;

/// Mono PCM at its native rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSample {
    pub data: Vec<f32>,
    pub sample_rate: u32,
}

/// One place a voice's buffer may come from. A voice has a list of these
/// in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleSource {
    File(PathBuf),
    Builtin(SampleVoice),
}

impl SampleSource {
    pub fn describe(&self) -> String {
        match self {
            SampleSource::File(path) => path.display().to_string(),
            SampleSource::Builtin(voice) => format!("builtin:{}", voice.name()),
        }
    }

    /// Default chain: a WAV file in `dir` if given, then the built-in kit.
    pub fn default_chain(voice: SampleVoice, dir: Option<&Path>) -> Vec<SampleSource> {
        let mut chain = Vec::with_capacity(2);
        if let Some(dir) = dir {
            chain.push(SampleSource::File(dir.join(format!("{}.wav", voice.name()))));
        }
        chain.push(SampleSource::Builtin(voice));
        chain
    }
}

pub trait SampleLoader {
    /// Decode `source`. Return [`LoadError::Unsupported`] for sources this
    /// loader does not handle so the next loader gets a turn.
    fn load(&self, source: &SampleSource) -> Result<DecodedSample, LoadError>;
}

/// Loaders tried in order for each source.
#[derive(Default)]
pub struct LoaderChain {
    loaders: Vec<Box<dyn SampleLoader + Send>>,
}

impl LoaderChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, loader: impl SampleLoader + Send + 'static) -> Self {
        self.loaders.push(Box::new(loader));
        self
    }

    pub fn load(&self, source: &SampleSource) -> Result<DecodedSample, LoadError> {
        let mut last = LoadError::Unsupported(source.describe());
        for loader in &self.loaders {
            match loader.load(source) {
                Ok(sample) => return Ok(sample),
                Err(LoadError::Unsupported(_)) => continue,
                Err(e) => last = e,
            }
        }
        Err(last)
    }
}

/// WAV files through `hound`. Multi-channel files are folded to mono.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavLoader;

impl SampleLoader for WavLoader {
    fn load(&self, source: &SampleSource) -> Result<DecodedSample, LoadError> {
        let path = match source {
            SampleSource::File(path) => path,
            other => return Err(LoadError::Unsupported(other.describe())),
        };
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("wav"))
            .unwrap_or(false);
        if !is_wav {
            return Err(LoadError::Unsupported(source.describe()));
        }
        if !path.exists() {
            return Err(LoadError::Missing(source.describe()));
        }

        let mut reader =
            hound::WavReader::open(path).map_err(|e| LoadError::Decode(e.to_string()))?;
        let spec = reader.spec();
        let raw: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| LoadError::Decode(e.to_string()))?,
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / max))
                    .collect::<Result<_, _>>()
                    .map_err(|e| LoadError::Decode(e.to_string()))?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let data: Vec<f32> = raw
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        if data.is_empty() {
            return Err(LoadError::Decode(format!("{} has no audio", source.describe())));
        }
        Ok(DecodedSample {
            data,
            sample_rate: spec.sample_rate,
        })
    }
}
