//! Chart preparation configuration.
//!
//! Stored as TOML; every section and field is optional and falls back to the
//! chart defaults:
//!
//! ```toml
//! [sampling]
//! min_points = 90
//! max_points = 150
//! event_padding = 20
//! ceiling = "soft"
//!
//! [dma]
//! reference_token = "btc"
//! window = 200
//!
//! [baseline]
//! strategy_ids = ["dca_classic"]
//! ```

use crate::indicators::DmaConfig;
use crate::sampling::SamplingParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Identifier the backtest service uses for its plain DCA reference strategy.
pub const DEFAULT_BASELINE_ID: &str = "dca_classic";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Strategies treated as the non-critical baseline when the payload does not
/// tag them itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineConfig {
    pub strategy_ids: Vec<String>,
}

impl Default for BaselineConfig {
    fn default() -> Self {
        Self {
            strategy_ids: vec![DEFAULT_BASELINE_ID.to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub sampling: SamplingParams,
    pub dma: DmaConfig,
    pub baseline: BaselineConfig,
}

impl ChartConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ChartConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.sampling;
        if s.min_points == 0 {
            return Err(ConfigError::Invalid("sampling.min_points must be >= 1".into()));
        }
        if s.max_points < 2 {
            return Err(ConfigError::Invalid(
                "sampling.max_points must be >= 2 (first and last points are always kept)".into(),
            ));
        }
        if s.min_points > s.max_points {
            return Err(ConfigError::Invalid(format!(
                "sampling.min_points ({}) exceeds sampling.max_points ({})",
                s.min_points, s.max_points
            )));
        }
        if self.dma.window == 0 {
            return Err(ConfigError::Invalid("dma.window must be >= 1".into()));
        }
        if self.dma.reference_token.trim().is_empty() {
            return Err(ConfigError::Invalid("dma.reference_token must not be empty".into()));
        }
        Ok(())
    }
}
