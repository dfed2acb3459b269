//! Configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file (or no file)
//! gives the stock acceleration-free behavior:
//!
//! ```toml
//! [scaling]
//! pointer_shift = 15
//! wheel_shift = 16
//! scroll_multiplier = -3
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interpreter::ScalingConfig;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Raw → fixed-point conversion.
    pub scaling: ScalingConfig,

    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g. `"info"`, `"rawpoint=trace,warn"`). `RUST_LOG` wins when set.
    pub level: String,

    /// Emit structured JSON logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Parse and validate.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.scaling.validate()?;
        Ok(config)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file; using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
