//! Error types for the Bitea ledger

use thiserror::Error;

/// Failures surfaced by the ledger, its configuration and its API glue.
///
/// An empty mining batch and an invalid chain are deliberately absent:
/// the former is a no-op and the latter is reported as a
/// [`ChainValidity`](crate::blockchain::ChainValidity) value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("TOML error: {0}")]
    TomlError(String),
}

impl From<std::io::Error> for ChainError {
    fn from(err: std::io::Error) -> Self {
        ChainError::IoError(err.to_string())
    }
}

impl From<toml::de::Error> for ChainError {
    fn from(err: toml::de::Error) -> Self {
        ChainError::TomlError(err.to_string())
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
