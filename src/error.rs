//! Error types surfaced by the engine.
//!
//! Runtime failures (no device, stream could not be built) are fatal to
//! `start()`. Sample loading failures are not: they only mark a voice as
//! unavailable, see [`crate::samples`].

use std::fmt;

/// Errors returned by engine start-up and configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The host has no default output device
    NoOutputDevice,
    /// The output device refused to report a usable stream config
    StreamConfig(String),
    /// Building the output stream failed (render callback never installed)
    StreamBuild(String),
    /// The stream was built but could not be started
    StreamPlay(String),
    /// Configuration text could not be parsed
    Config(String),
    /// `start()` called while already playing
    AlreadyRunning,
    /// `stop()` called while not playing
    NotRunning,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NoOutputDevice => write!(f, "no default output device available"),
            EngineError::StreamConfig(e) => write!(f, "failed to fetch output stream config: {}", e),
            EngineError::StreamBuild(e) => write!(f, "failed to build output stream: {}", e),
            EngineError::StreamPlay(e) => write!(f, "failed to start output stream: {}", e),
            EngineError::Config(e) => write!(f, "invalid configuration: {}", e),
            EngineError::AlreadyRunning => write!(f, "engine is already running"),
            EngineError::NotRunning => write!(f, "engine is not running"),
        }
    }
}

impl std::error::Error for EngineError {}

/// Errors produced while acquiring a decoded sample buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The source does not exist
    Missing(String),
    /// The loader has no decoder for this source's format
    Unsupported(String),
    /// The data was found but could not be decoded
    Decode(String),
    /// Every source in the fallback chain failed; the voice is disabled
    Exhausted(String),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Missing(name) => write!(f, "sample source not found: {}", name),
            LoadError::Unsupported(name) => write!(f, "no decoder for sample source: {}", name),
            LoadError::Decode(e) => write!(f, "failed to decode sample: {}", e),
            LoadError::Exhausted(voice) => {
                write!(f, "all sources failed for voice '{}', voice disabled", voice)
            }
        }
    }
}

impl std::error::Error for LoadError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_readable() {
        let err = EngineError::StreamBuild("device busy".into());
        assert_eq!(err.to_string(), "failed to build output stream: device busy");

        let err = LoadError::Exhausted("kick".into());
        assert!(err.to_string().contains("kick"));
    }
}
