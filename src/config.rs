//! Engine configuration.
//!
//! Defaults live in `config.toml` at the crate root and are embedded at build
//! time. A user file is merged table-by-table over the defaults, so it only
//! needs the keys it wants to change.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the arrangement PRNG. Same seed, same arrangement.
    pub seed: u32,
    pub arrangement: ArrangementConfig,
    pub scheduler: SchedulerConfig,
    pub tempo: TempoConfig,
    pub synth: SynthConfig,
    pub samples: SampleConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangementConfig {
    /// Bar at which Intro gives way to KickIn
    pub stage_kick_bar: u64,
    /// Bar at which KickIn gives way to Full
    pub stage_synth_bar: u64,
    /// Bars per flow scene while in Full
    pub scene_bars: u64,
    /// Bars per section (phrase)
    pub section_bars: u64,
    /// Force a break if none occurred within this many bars
    pub anti_stale_bars: u64,
    /// Quiet bars after a non-normal variant before another may be picked
    pub variant_cooldown_bars: u64,
    /// Added to the variant probability when no hands are visible
    pub idle_variant_boost: f32,
    /// Base variant probability per section
    pub section_variant_prob: [f32; 4],
    /// Chance of a fill on the last bar of a section
    pub fill_probability: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub tick_interval_ms: u64,
    pub lookahead_ms: f64,
    pub stall_slack_ms: f64,
    pub start_offset_ms: f64,
    pub param_throttle_ms: f64,
    pub trigger_epsilon_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TempoConfig {
    pub min_bpm: f32,
    pub max_bpm: f32,
    /// When set, the tempo axis is ignored
    pub fixed_bpm: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    pub max_delay_secs: f32,
    pub stop_ramp_ms: f32,
    pub render_quantum: usize,
    pub master_gain: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SampleConfig {
    /// Peak-to-peak gain variance per hit (fraction)
    pub hit_jitter_gain: f32,
    /// Peak-to-peak playback-rate variance per hit (fraction)
    pub hit_jitter_rate: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0x1234_5678,
            arrangement: ArrangementConfig::default(),
            scheduler: SchedulerConfig::default(),
            tempo: TempoConfig::default(),
            synth: SynthConfig::default(),
            samples: SampleConfig::default(),
        }
    }
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            stage_kick_bar: 4,
            stage_synth_bar: 12,
            scene_bars: 16,
            section_bars: 8,
            anti_stale_bars: 24,
            variant_cooldown_bars: 2,
            idle_variant_boost: 0.12,
            section_variant_prob: [0.10, 0.18, 0.25, 0.32],
            fill_probability: 0.45,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 25,
            lookahead_ms: 120.0,
            stall_slack_ms: 60.0,
            start_offset_ms: 50.0,
            param_throttle_ms: 33.0,
            trigger_epsilon_ms: 2.0,
        }
    }
}

impl Default for TempoConfig {
    fn default() -> Self {
        Self {
            min_bpm: 118.0,
            max_bpm: 150.0,
            fixed_bpm: None,
        }
    }
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            max_delay_secs: 2.0,
            stop_ramp_ms: 60.0,
            render_quantum: 128,
            master_gain: 0.8,
        }
    }
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            hit_jitter_gain: 0.12,
            hit_jitter_rate: 0.04,
        }
    }
}

impl EngineConfig {
    /// Parse a complete config from TOML text. Missing keys take defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, EngineError> {
        toml::from_str(text).map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Embedded defaults merged with an optional user file.
    ///
    /// A missing or malformed user file is logged and ignored; the embedded
    /// defaults always load.
    pub fn load(user_path: Option<&Path>) -> Self {
        let mut base: toml::Table = match DEFAULT_CONFIG.parse() {
            Ok(table) => table,
            Err(e) => {
                log::error!(target: "config", "embedded config.toml is malformed: {}", e);
                return Self::default();
            }
        };

        if let Some(path) = user_path {
            match std::fs::read_to_string(path) {
                Ok(contents) => match contents.parse::<toml::Table>() {
                    Ok(user) => merge_tables(&mut base, user),
                    Err(e) => {
                        log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                    }
                },
                Err(e) => {
                    log::warn!(target: "config", "cannot read config {}: {}", path.display(), e)
                }
            }
        }

        match toml::Value::Table(base).try_into::<EngineConfig>() {
            Ok(config) => config.sanitized(),
            Err(e) => {
                log::warn!(target: "config", "config rejected, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp values that would make the scheduler or DSP misbehave.
    pub fn sanitized(mut self) -> Self {
        let tempo = &mut self.tempo;
        tempo.min_bpm = tempo.min_bpm.clamp(40.0, 240.0);
        tempo.max_bpm = tempo.max_bpm.clamp(tempo.min_bpm, 240.0);
        tempo.fixed_bpm = tempo.fixed_bpm.map(|bpm| bpm.clamp(40.0, 240.0));

        let arr = &mut self.arrangement;
        arr.stage_synth_bar = arr.stage_synth_bar.max(arr.stage_kick_bar);
        arr.scene_bars = arr.scene_bars.max(1);
        arr.section_bars = arr.section_bars.max(1);
        arr.anti_stale_bars = arr.anti_stale_bars.max(1);
        for p in &mut arr.section_variant_prob {
            *p = p.clamp(0.0, 1.0);
        }
        arr.fill_probability = arr.fill_probability.clamp(0.0, 1.0);

        let sched = &mut self.scheduler;
        sched.tick_interval_ms = sched.tick_interval_ms.clamp(1, 200);
        sched.lookahead_ms = sched.lookahead_ms.max(sched.tick_interval_ms as f64);
        sched.trigger_epsilon_ms = sched.trigger_epsilon_ms.max(0.01);

        let synth = &mut self.synth;
        synth.max_delay_secs = synth.max_delay_secs.clamp(0.05, 4.0);
        synth.render_quantum = synth.render_quantum.clamp(16, crate::MAX_BLOCK_SIZE);
        synth.master_gain = synth.master_gain.clamp(0.0, 1.0);
        self
    }
}

fn merge_tables(base: &mut toml::Table, user: toml::Table) {
    for (key, value) in user {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(base_sub)), toml::Value::Table(user_sub)) => {
                merge_tables(base_sub, user_sub)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_defaults_match_struct_defaults() {
        let parsed = EngineConfig::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(parsed, EngineConfig::default());
    }

    #[test]
    fn partial_user_table_keeps_other_defaults() {
        let mut base: toml::Table = DEFAULT_CONFIG.parse().unwrap();
        let user: toml::Table = "[tempo]\nfixed_bpm = 138.0\n".parse().unwrap();
        merge_tables(&mut base, user);

        let config: EngineConfig = toml::Value::Table(base).try_into().unwrap();
        assert_eq!(config.tempo.fixed_bpm, Some(138.0));
        assert_eq!(config.tempo.min_bpm, 118.0);
        assert_eq!(config.arrangement.stage_kick_bar, 4);
    }

    #[test]
    fn malformed_text_is_a_config_error() {
        let err = EngineConfig::from_toml_str("seed = [").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn sanitize_clamps_out_of_range_values() {
        let mut config = EngineConfig::default();
        config.tempo.fixed_bpm = Some(9000.0);
        config.synth.render_quantum = 0;
        config.arrangement.stage_synth_bar = 1;

        let config = config.sanitized();
        assert_eq!(config.tempo.fixed_bpm, Some(240.0));
        assert_eq!(config.synth.render_quantum, 16);
        assert_eq!(config.arrangement.stage_synth_bar, config.arrangement.stage_kick_bar);
    }

    #[test]
    fn missing_user_file_falls_back_to_defaults() {
        let config = EngineConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert_eq!(config, EngineConfig::default());
    }
}
