//! Configuration loaded from TOML. Every section defaults, so the empty
//! document is a valid config.

pub mod defaults;
pub mod encoding_config;
pub mod observability_config;

pub use encoding_config::{CategoryDefinition, EncodingConfig, FeatureDefinition};
pub use observability_config::ObservabilityConfig;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Root configuration for the encoder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InboxConfig {
    pub encoding: EncodingConfig,
    pub observability: ObservabilityConfig,
}

impl InboxConfig {
    /// Parse a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }
}
