//! Voting client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use peervote_provider::RetryPolicy;
use peervote_types::Network;

use crate::validity::DEFAULT_MIN_CONFIRMATIONS;
use crate::ValidityEngine;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid config: {0}")]
    Parse(String),
}

/// Configuration for scanning and building votes.
///
/// Can be loaded from a TOML file via [`VotingConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingConfig {
    /// Which network decks live on.
    #[serde(default = "default_network")]
    pub network: Network,

    /// Confirmations a ballot needs before it counts.
    #[serde(default = "default_min_confirmations")]
    pub min_confirmations: u64,

    /// Explorer base URL. The network's public explorer when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Backoff for transient explorer failures.
    #[serde(default)]
    pub retry: RetryPolicy,
}

fn default_network() -> Network {
    Network::Peercoin
}

fn default_min_confirmations() -> u64 {
    DEFAULT_MIN_CONFIRMATIONS
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl VotingConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// A validity engine honouring `min_confirmations`.
    pub fn validity_engine(&self) -> ValidityEngine {
        ValidityEngine::new(self.min_confirmations)
    }
}

impl Default for VotingConfig {
    fn default() -> Self {
        Self {
            network: default_network(),
            min_confirmations: default_min_confirmations(),
            explorer_url: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
            retry: RetryPolicy::default(),
        }
    }
}
