//! Engine configuration loaded from `~/.config/tubeinfo/config.toml`.
//!
//! Every threshold here was tuned against one upstream's behavior, so each
//! one can be overridden without touching code.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Result, TubeInfoError};

/// Quality label of the first adaptive format that marks full-HD content.
pub const DEFAULT_FULL_HD_LABEL: &str = "1080p";
/// Days after upload before extended HLS formats are trusted.
pub const DEFAULT_EXTENDED_FORMATS_COOLDOWN_DAYS: i64 = 4;
/// How long an assembled descriptor may be reused.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;
/// Upper bound for the loudness-derived gain.
pub const DEFAULT_VOLUME_CAP: f32 = 2.5;
/// Fixed attenuation applied after normalization to leave headroom.
pub const DEFAULT_VOLUME_ATTENUATION: f32 = 0.8;

/// Tunable constants used by the descriptor assembler.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quality label that the first adaptive format must carry for the
    /// extended-format heuristics to apply.
    pub full_hd_label: String,
    /// Cooldown after upload, in days.
    pub extended_formats_cooldown_days: i64,
    /// Descriptor reuse window, in seconds.
    pub cache_ttl_secs: u64,
    pub volume_cap: f32,
    pub volume_attenuation: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            full_hd_label: DEFAULT_FULL_HD_LABEL.to_string(),
            extended_formats_cooldown_days: DEFAULT_EXTENDED_FORMATS_COOLDOWN_DAYS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            volume_cap: DEFAULT_VOLUME_CAP,
            volume_attenuation: DEFAULT_VOLUME_ATTENUATION,
        }
    }
}

impl EngineConfig {
    /// Parse a config from TOML text. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text isn't valid TOML or a value is out of
    /// the range the assembler can represent.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every duration fits the assembler's time arithmetic.
    pub fn validate(&self) -> Result<()> {
        if self.extended_formats_cooldown().is_none() {
            return Err(TubeInfoError::InvalidConfig {
                key: "extended_formats_cooldown_days",
                reason: format!("{} days is out of range", self.extended_formats_cooldown_days),
            });
        }

        if chrono::Duration::from_std(self.cache_ttl()).is_err() {
            return Err(TubeInfoError::InvalidConfig {
                key: "cache_ttl_secs",
                reason: format!("{} seconds is out of range", self.cache_ttl_secs),
            });
        }

        Ok(())
    }

    /// Load the config from `path`.
    ///
    /// Returns the defaults if the file doesn't exist (the config is optional).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Load the config from the default location.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// `None` when the day count overflows a [`chrono::Duration`].
    pub fn extended_formats_cooldown(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_days(self.extended_formats_cooldown_days)
    }
}

/// Return the path to the engine config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tubeinfo")
        .join("config.toml")
}
