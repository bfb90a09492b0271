//! Error types for Pixel Slots
//!
//! Game operations never fail: the wallet and the evaluator answer with
//! booleans and outcomes. These errors only come from the edges (storage,
//! configuration files, parsing user input).

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum PsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Unknown symbol: {0:?}")]
    InvalidSymbol(String),
}

impl From<serde_json::Error> for PsError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<serde_yml::Error> for PsError {
    fn from(err: serde_yml::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Invalid wallet limits: {0}")]
    InvalidWallet(&'static str),

    #[error("Multiplier for {0:?} must be positive")]
    ZeroMultiplier(String),

    #[error("Timing scale must be a finite positive number, got {0}")]
    InvalidTimingScale(String),

    #[error("History limit must be at least 1")]
    EmptyHistory,

    #[error("Storage key must not be empty: {0}")]
    EmptyStorageKey(&'static str),

    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(String),
}

/// Result type alias
pub type PsResult<T> = Result<T, PsError>;
