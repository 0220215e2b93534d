//! Host-facing configuration for a video source.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::status::LogLevel;

// ============================================================================
// Volume
// ============================================================================

/// Output gain, stored normalized in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Volume(f32);

impl Volume {
    pub const MUTE: Volume = Volume(0.0);
    pub const FULL: Volume = Volume(1.0);

    /// Build from a percentage. The input is clamped to `[0, 100]` before it is
    /// normalized; NaN counts as silence.
    pub fn from_percent(percent: f32) -> Self {
        if percent.is_nan() {
            return Self::MUTE;
        }
        Self(percent.clamp(0.0, 100.0) / 100.0)
    }

    pub fn gain(self) -> f32 {
        self.0
    }

    pub fn percent(self) -> f32 {
        self.0 * 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}

// ============================================================================
// Source Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Severity forwarded to the engine at init.
    pub log_level: LogLevel,
    /// Volume in percent, clamped to `[0, 100]` when applied.
    pub volume: f32,
    pub mute: bool,
    /// Loop request for the host's playback controller; the engine has no
    /// loop entry point, so the bridge only carries it.
    #[serde(rename = "loop")]
    pub looping: bool,
    /// Start playback as soon as a source opens.
    pub auto_play: bool,
    /// Engine library to load instead of the platform default.
    pub library: Option<PathBuf>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            volume: 100.0,
            mute: false,
            looping: false,
            auto_play: false,
            library: None,
        }
    }
}

impl SourceConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_clamps_input() {
        assert_eq!(Volume::from_percent(150.0).gain(), 1.0);
        assert_eq!(Volume::from_percent(-10.0).gain(), 0.0);
        assert_eq!(Volume::from_percent(50.0).gain(), 0.5);
        assert_eq!(Volume::from_percent(f32::NAN).gain(), 0.0);
        assert_eq!(Volume::from_percent(f32::INFINITY).gain(), 1.0);
    }

    #[test]
    fn test_volume_stays_normalized() {
        for percent in [-1e9, -0.5, 0.0, 0.1, 33.3, 99.9, 100.0, 100.1, 1e9] {
            let gain = Volume::from_percent(percent).gain();
            assert!((0.0..=1.0).contains(&gain), "{} -> {}", percent, gain);
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = SourceConfig::from_json_str("{}").unwrap();
        assert_eq!(config, SourceConfig::default());
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.volume, 100.0);
    }

    #[test]
    fn test_config_fields() {
        let config = SourceConfig::from_json_str(
            r#"{"log_level": "verbose", "volume": 40, "mute": true, "loop": true, "auto_play": true}"#,
        )
        .unwrap();

        assert_eq!(config.log_level, LogLevel::Verbose);
        assert_eq!(config.volume, 40.0);
        assert!(config.mute);
        assert!(config.looping);
        assert!(config.auto_play);
        assert!(config.library.is_none());
    }

    #[test]
    fn test_config_errors() {
        assert!(matches!(
            SourceConfig::from_json_str(r#"{"log_level": "loud"}"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SourceConfig::from_file("/nonexistent/texbridge.json"),
            Err(ConfigError::Io { .. })
        ));
    }
}
