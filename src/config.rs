//! Game configuration.
//!
//! Loaded from TOML. Every field is optional; a missing file means defaults.
//! Lookup order: explicit path, `COUNTUP_CONFIG`, `./countup.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::kernel::theme::CATALOG;

pub const CONFIG_ENV: &str = "COUNTUP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "countup.toml";

/// Which build of the game to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Five levels, three-note reward, quiet.
    Basic,
    /// Ten levels, four-note reward, spoken cues.
    #[default]
    Full,
}

const BASIC_CHORD: [f32; 3] = [523.0, 659.0, 784.0];
const FULL_CHORD: [f32; 4] = [523.0, 659.0, 784.0, 1047.0];

impl Variant {
    pub fn max_level(self) -> usize {
        match self {
            Variant::Basic => 5,
            Variant::Full => 10,
        }
    }

    pub fn reward_chord(self) -> &'static [f32] {
        match self {
            Variant::Basic => &BASIC_CHORD,
            Variant::Full => &FULL_CHORD,
        }
    }

    pub fn speaks_by_default(self) -> bool {
        matches!(self, Variant::Full)
    }
}

/// All sequencing delays, in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub tap_tone_ms: u64,
    /// Completion -> reward chord and bursts.
    pub reward_delay_ms: u64,
    /// Gap between chord notes.
    pub chord_step_ms: u64,
    pub chord_tone_ms: u64,
    /// Reward -> spoken praise.
    pub praise_delay_ms: u64,
    /// Completion -> next level becomes interactive.
    pub celebration_ms: u64,
    /// End of final celebration -> big burst.
    pub finale_burst_delay_ms: u64,
    /// Big burst -> wrap to level 1.
    pub wrap_delay_ms: u64,
    /// Activation -> instructional cue.
    pub startup_cue_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            tap_tone_ms: 100,
            reward_delay_ms: 200,
            chord_step_ms: 100,
            chord_tone_ms: 200,
            praise_delay_ms: 500,
            celebration_ms: 3000,
            finale_burst_delay_ms: 2000,
            wrap_delay_ms: 1500,
            startup_cue_delay_ms: 1000,
        }
    }
}

impl Timings {
    /// Completion to wrap on the final level.
    pub fn full_wrap_ms(&self) -> u64 {
        self.celebration_ms + self.finale_burst_delay_ms + self.wrap_delay_ms
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    /// Peak gain of each tone, 0.0 - 1.0.
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechConfig {
    /// `None` defers to the variant.
    pub enabled: Option<bool>,
    /// Preferred voices, first available wins.
    pub voices: Vec<String>,
    /// Multiplier on the engine's default speaking rate.
    pub rate: f32,
    /// Multiplier on the engine's default pitch.
    pub pitch: f32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            voices: vec!["Karen".into(), "Moira".into(), "Samantha".into()],
            rate: 0.9,
            pitch: 1.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub variant: Variant,
    pub high_contrast: bool,
    pub log_dir: Option<PathBuf>,
    pub audio: AudioConfig,
    pub speech: SpeechConfig,
    pub timings: Timings,
}

impl GameConfig {
    /// Resolve and load the config file. Absent files yield defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match Self::resolve_path(explicit) {
            Some(path) => Self::from_path(&path),
            None => {
                debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Some(from_env) = std::env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(from_env));
        }
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        local.is_file().then_some(local)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(path = %path.display(), variant = ?config.variant, "Config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.variant.max_level() > CATALOG.len() {
            return Err(ConfigError::Invalid(format!(
                "variant needs {} levels but the theme catalog has {}",
                self.variant.max_level(),
                CATALOG.len()
            )));
        }
        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(ConfigError::Invalid(format!(
                "audio.volume must be within 0.0..=1.0, got {}",
                self.audio.volume
            )));
        }
        let t = &self.timings;
        let chord_gaps = self.variant.reward_chord().len().saturating_sub(1) as u64;
        // Chord and praise must both land before the next level starts.
        let reward_tail_ms = t.reward_delay_ms + t.praise_delay_ms.max(chord_gaps * t.chord_step_ms);
        if t.celebration_ms <= reward_tail_ms {
            return Err(ConfigError::Invalid(format!(
                "timings.celebration_ms must exceed reward_delay_ms plus the longer of \
                 praise_delay_ms and the chord span ({reward_tail_ms} ms), got {}",
                t.celebration_ms
            )));
        }
        if self.speech.rate <= 0.0 || self.speech.pitch <= 0.0 {
            return Err(ConfigError::Invalid(
                "speech.rate and speech.pitch must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn speech_enabled(&self) -> bool {
        self.speech
            .enabled
            .unwrap_or_else(|| self.variant.speaks_by_default())
    }
}
