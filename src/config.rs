//! Configuration management for the Bitea ledger

use crate::error::{ChainError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "bitea.toml";

/// Hex characters in a SHA-256 digest; no difficulty above this is satisfiable.
pub const MAX_DIFFICULTY: u32 = 64;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub api: ApiConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Leading zero hex characters required of every block hash
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Pending queue size that triggers an automatic mine
    #[serde(default = "default_max_transactions_per_block")]
    pub max_transactions_per_block: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            max_transactions_per_block: default_max_transactions_per_block(),
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Config(format!(
                "ledger.difficulty must be at most {}, got {}",
                MAX_DIFFICULTY, self.difficulty
            )));
        }
        if self.max_transactions_per_block == 0 {
            return Err(ChainError::Config(
                "ledger.max_transactions_per_block must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        self.ledger.validate()?;
        if self.api.port == 0 {
            return Err(ChainError::Config("api.port must be non-zero".to_string()));
        }
        if self.api.host.trim().is_empty() {
            return Err(ChainError::Config("api.host must be set".to_string()));
        }
        Ok(())
    }
}

/// Load configuration from `path`. A missing file yields the defaults.
pub fn load_config_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let config: Config = if path.exists() {
        let config_str = fs::read_to_string(path)?;
        toml::from_str(&config_str)?
    } else {
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

fn default_difficulty() -> u32 {
    3
}

fn default_max_transactions_per_block() -> usize {
    5
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}
