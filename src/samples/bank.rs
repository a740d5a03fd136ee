//! Per-voice sample slots with fallback chains.

use std::sync::Arc;

use log::{debug, warn};

use super::loader::{LoaderChain, SampleSource};
use super::SampleVoice;
use crate::error::LoadError;

/// A ready buffer plus the rate correction for its native sample rate.
#[derive(Debug, Clone)]
pub struct LoadedSample {
    pub buffer: Arc<[f32]>,
    /// `native_rate / engine_rate`
    pub base_rate: f32,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
enum Slot {
    #[default]
    Pending,
    Ready(LoadedSample),
    /// Every source failed. Never retried this session.
    Unavailable,
}

/// Scheduler-side record of which percussion voices can sound.
///
/// The bank keeps a clone of every installed buffer for the whole session,
/// so the render thread never drops the last reference to one.
#[derive(Debug, Clone)]
pub struct SampleBank {
    slots: [Slot; SampleVoice::COUNT],
    sample_rate: f32,
    last_error: Option<String>,
}

impl SampleBank {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            slots: Default::default(),
            sample_rate: sample_rate.max(1.0),
            last_error: None,
        }
    }

    /// Try `sources` in order until one decodes. Exhausting the list marks
    /// the voice unavailable; later calls return the same error without
    /// touching the loaders again.
    pub fn load(
        &mut self,
        voice: SampleVoice,
        sources: &[SampleSource],
        loaders: &LoaderChain,
    ) -> Result<&LoadedSample, LoadError> {
        let index = voice.index();
        match &self.slots[index] {
            Slot::Ready(_) => return self.get(voice).ok_or_else(|| exhausted(voice)),
            Slot::Unavailable => return Err(exhausted(voice)),
            Slot::Pending => {}
        }

        for source in sources {
            match loaders.load(source) {
                Ok(decoded) => {
                    let loaded = LoadedSample {
                        buffer: Arc::from(decoded.data),
                        base_rate: decoded.sample_rate as f32 / self.sample_rate,
                        source: source.describe(),
                    };
                    debug!(target: "samples", "{} loaded from {}", voice.name(), loaded.source);
                    self.slots[index] = Slot::Ready(loaded);
                    return self.get(voice).ok_or_else(|| exhausted(voice));
                }
                Err(e) => {
                    debug!(target: "samples", "{}: {} failed: {}", voice.name(), source.describe(), e);
                }
            }
        }

        let err = exhausted(voice);
        warn!(target: "samples", "{}", err);
        self.last_error = Some(err.to_string());
        self.slots[index] = Slot::Unavailable;
        Err(err)
    }

    pub fn get(&self, voice: SampleVoice) -> Option<&LoadedSample> {
        match &self.slots[voice.index()] {
            Slot::Ready(loaded) => Some(loaded),
            _ => None,
        }
    }

    pub fn is_ready(&self, voice: SampleVoice) -> bool {
        self.get(voice).is_some()
    }

    pub fn is_unavailable(&self, voice: SampleVoice) -> bool {
        matches!(self.slots[voice.index()], Slot::Unavailable)
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

fn exhausted(voice: SampleVoice) -> LoadError {
    LoadError::Exhausted(voice.name().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::loader::{DecodedSample, SampleLoader};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: Arc<AtomicUsize>,
    }

    impl SampleLoader for Counting {
        fn load(&self, source: &SampleSource) -> Result<DecodedSample, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(LoadError::Missing(source.describe()))
        }
    }

    struct Fixed;

    impl SampleLoader for Fixed {
        fn load(&self, source: &SampleSource) -> Result<DecodedSample, LoadError> {
            match source {
                SampleSource::Builtin(_) => Ok(DecodedSample {
                    data: vec![0.5; 32],
                    sample_rate: 24_000,
                }),
                other => Err(LoadError::Unsupported(other.describe())),
            }
        }
    }

    #[test]
    fn falls_back_in_priority_order() {
        let loaders = LoaderChain::new().with(Fixed);
        let mut bank = SampleBank::new(48_000.0);
        let sources = vec![
            SampleSource::File(PathBuf::from("missing.wav")),
            SampleSource::Builtin(SampleVoice::Kick),
        ];
        let loaded = bank.load(SampleVoice::Kick, &sources, &loaders).expect("fallback");
        assert_eq!(loaded.source, "builtin:kick");
        assert!((loaded.base_rate - 0.5).abs() < 1e-6);
        assert!(bank.is_ready(SampleVoice::Kick));
        assert!(bank.last_error().is_none());
    }

    #[test]
    fn exhausted_voice_is_never_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let loaders = LoaderChain::new().with(Counting {
            calls: calls.clone(),
        });
        let mut bank = SampleBank::new(48_000.0);
        let sources = vec![
            SampleSource::File(PathBuf::from("a.wav")),
            SampleSource::File(PathBuf::from("b.wav")),
        ];
        assert!(matches!(
            bank.load(SampleVoice::Snare, &sources, &loaders),
            Err(LoadError::Exhausted(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(bank.is_unavailable(SampleVoice::Snare));
        assert!(bank.last_error().is_some());

        assert!(bank.load(SampleVoice::Snare, &sources, &loaders).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 2, "no retry after exhaustion");
    }
}
