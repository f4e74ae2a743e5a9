//! Harness settings loaded from TOML.
//!
//! Every field has a default, so a config file only needs the values it
//! changes. Command-line flags override whatever the file sets.
//!
//! ```toml
//! cycles = 60
//! drive_period = 30
//! drive_amplitude = 0.8
//! cutoff = 0.35
//! resonance = 0.4
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading harness settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A value is outside its valid range
    #[error("invalid value for '{field}': {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Description of why the value is invalid.
        reason: String,
    },
}

/// Drive and filter settings for `patchbay run`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Number of update cycles to run.
    pub cycles: usize,
    /// Samples per two periods of the sine drive.
    pub drive_period: usize,
    /// Peak amplitude of the sine drive.
    pub drive_amplitude: f32,
    /// Normalized lowpass cutoff coefficient.
    pub cutoff: f32,
    /// Lowpass resonance.
    pub resonance: f32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            cycles: 30,
            drive_period: 30,
            drive_amplitude: 1.0,
            cutoff: 0.35,
            resonance: 0.4,
        }
    }
}

impl HarnessConfig {
    /// Loads settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.drive_period == 0 {
            return Err(ConfigError::Invalid {
                field: "drive_period",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=0.99).contains(&self.cutoff) {
            return Err(ConfigError::Invalid {
                field: "cutoff",
                reason: format!("{} is outside 0.0..=0.99", self.cutoff),
            });
        }
        if !(0.0..=1.0).contains(&self.resonance) {
            return Err(ConfigError::Invalid {
                field: "resonance",
                reason: format!("{} is outside 0.0..=1.0", self.resonance),
            });
        }
        Ok(())
    }

    /// Drive value for cycle `i`: `amplitude * sin(2·i·2π / period)`.
    pub fn drive(&self, i: usize) -> f32 {
        let phase = 2.0 * i as f32 * std::f32::consts::TAU / self.drive_period as f32;
        self.drive_amplitude * phase.sin()
    }
}
