//! The `tonegen` configuration file.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tonegen_engine::EngineTiming;

use crate::error::ConfigError;
use crate::paths::user_config_file;

/// Top-level configuration.
///
/// Only the audio path, engine timing and scope cadence are configurable.
/// Tone settings (frequency, waveform, volume) always start at their defaults.
///
/// # TOML Format
///
/// ```toml
/// [audio]
/// sample_rate = 48000
/// buffer_size = 512
/// channels = 2
/// device = "USB"
///
/// [timing]
/// release_guard_ms = 50.0
/// master_glide_ms = 50.0
/// volume2_glide_ms = 50.0
/// retune_glide_ms = 10.0
/// dual_fade_ms = 50.0
/// dual_teardown_ms = 100.0
///
/// [scope]
/// refresh_hz = 60
/// frame_size = 1024
/// history = 2048
/// preview_width = 64
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToneConfig {
    /// Output stream settings.
    pub audio: AudioSection,
    /// Engine timing constants.
    pub timing: TimingSection,
    /// Visualization cadence and frame sizes.
    pub scope: ScopeSection,
}

/// `[audio]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSection {
    /// Requested sample rate in Hz.
    pub sample_rate: u32,
    /// Preferred buffer size in frames.
    pub buffer_size: u32,
    /// Output channel count.
    pub channels: u16,
    /// Output device name filter (system default if absent).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

impl Default for AudioSection {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            buffer_size: 512,
            channels: 2,
            device: None,
        }
    }
}

/// `[timing]` section, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimingSection {
    /// Delay after a release ramp ends before the voice is torn down.
    pub release_guard_ms: f64,
    /// Time constant of master volume changes while sounding.
    pub master_glide_ms: f64,
    /// Time constant of secondary volume changes.
    pub volume2_glide_ms: f64,
    /// Time constant of frequency changes while sounding.
    pub retune_glide_ms: f64,
    /// Fade-out of the secondary voice when dual tone is switched off.
    pub dual_fade_ms: f64,
    /// Teardown delay of the secondary voice when dual tone is switched off.
    pub dual_teardown_ms: f64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self::from(EngineTiming::default())
    }
}

impl From<EngineTiming> for TimingSection {
    fn from(timing: EngineTiming) -> Self {
        Self {
            release_guard_ms: timing.release_guard * 1000.0,
            master_glide_ms: timing.master_glide * 1000.0,
            volume2_glide_ms: timing.volume2_glide * 1000.0,
            retune_glide_ms: timing.retune_glide * 1000.0,
            dual_fade_ms: timing.dual_fade * 1000.0,
            dual_teardown_ms: timing.dual_teardown * 1000.0,
        }
    }
}

impl TimingSection {
    /// Engine timing in seconds.
    pub fn to_engine(&self) -> EngineTiming {
        EngineTiming {
            release_guard: self.release_guard_ms / 1000.0,
            master_glide: self.master_glide_ms / 1000.0,
            volume2_glide: self.volume2_glide_ms / 1000.0,
            retune_glide: self.retune_glide_ms / 1000.0,
            dual_fade: self.dual_fade_ms / 1000.0,
            dual_teardown: self.dual_teardown_ms / 1000.0,
        }
    }

    fn fields(&self) -> [(&'static str, f64); 6] {
        [
            ("timing.release_guard_ms", self.release_guard_ms),
            ("timing.master_glide_ms", self.master_glide_ms),
            ("timing.volume2_glide_ms", self.volume2_glide_ms),
            ("timing.retune_glide_ms", self.retune_glide_ms),
            ("timing.dual_fade_ms", self.dual_fade_ms),
            ("timing.dual_teardown_ms", self.dual_teardown_ms),
        ]
    }
}

/// `[scope]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScopeSection {
    /// Frame cadence in Hz.
    pub refresh_hz: u32,
    /// Samples per live frame.
    pub frame_size: usize,
    /// Samples retained by the tap.
    pub history: usize,
    /// Points in the idle preview.
    pub preview_width: usize,
}

impl Default for ScopeSection {
    fn default() -> Self {
        Self {
            refresh_hz: 60,
            frame_size: 1024,
            history: 2048,
            preview_width: 64,
        }
    }
}

impl ToneConfig {
    /// Engine timing in seconds.
    pub fn timing(&self) -> EngineTiming {
        self.timing.to_engine()
    }

    /// Check every value against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.sample_rate == 0 {
            return Err(ConfigError::invalid(
                "audio.sample_rate",
                "must be greater than 0",
            ));
        }
        if self.audio.buffer_size == 0 {
            return Err(ConfigError::invalid(
                "audio.buffer_size",
                "must be greater than 0",
            ));
        }
        if self.audio.channels == 0 {
            return Err(ConfigError::invalid("audio.channels", "must be greater than 0"));
        }
        for (field, value) in self.timing.fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a non-negative number of milliseconds, got {value}"),
                ));
            }
        }
        if self.timing.dual_teardown_ms < self.timing.dual_fade_ms {
            return Err(ConfigError::invalid(
                "timing.dual_teardown_ms",
                "must not be shorter than timing.dual_fade_ms",
            ));
        }
        if self.scope.refresh_hz == 0 {
            return Err(ConfigError::invalid("scope.refresh_hz", "must be greater than 0"));
        }
        if self.scope.frame_size == 0 || self.scope.frame_size > self.scope.history {
            return Err(ConfigError::invalid(
                "scope.frame_size",
                format!("must be between 1 and scope.history ({})", self.scope.history),
            ));
        }
        if self.scope.preview_width == 0 {
            return Err(ConfigError::invalid(
                "scope.preview_width",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    /// Parse and validate a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: ToneConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Save to a TOML file, creating its directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Load the explicit `path` if given, else the user config file if it
    /// exists, else the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let user = user_config_file();
        if user.is_file() {
            Self::load(user)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ToneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.audio.sample_rate, 48000);
        assert_eq!(config.scope.refresh_hz, 60);
        assert_eq!(config.timing(), EngineTiming::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config = ToneConfig::from_toml("[audio]\nsample_rate = 44100\n").unwrap();
        assert_eq!(config.audio.sample_rate, 44100);
        assert_eq!(config.audio.buffer_size, 512);
        assert_eq!(config.scope, ScopeSection::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(ToneConfig::from_toml("").unwrap(), ToneConfig::default());
    }

    #[test]
    fn test_timing_converts_to_seconds() {
        let config = ToneConfig::from_toml("[timing]\nretune_glide_ms = 25.0\n").unwrap();
        let timing = config.timing();
        assert!((timing.retune_glide - 0.025).abs() < 1e-12);
        assert!((timing.release_guard - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let err = ToneConfig::from_toml("[audio]\nsample_rate = 0\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::Invalid { field: "audio.sample_rate", .. }),
            "got {err}"
        );
    }

    #[test]
    fn test_rejects_negative_timing() {
        let err = ToneConfig::from_toml("[timing]\nmaster_glide_ms = -1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "timing.master_glide_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_frame_larger_than_history() {
        let err = ToneConfig::from_toml("[scope]\nframe_size = 4096\nhistory = 1024\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "scope.frame_size",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_teardown_before_fade_end() {
        let err =
            ToneConfig::from_toml("[timing]\ndual_fade_ms = 80.0\ndual_teardown_ms = 40.0\n")
                .unwrap_err();
        assert!(err.to_string().contains("dual_teardown_ms"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = ToneConfig::from_toml("[audio\nsample_rate = 1").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }

    #[test]
    fn test_device_is_omitted_when_unset() {
        let text = ToneConfig::default().to_toml().unwrap();
        assert!(!text.contains("device"));
        assert!(text.contains("[audio]"));
        assert!(text.contains("[timing]"));
        assert!(text.contains("[scope]"));
    }
}
