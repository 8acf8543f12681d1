//! # Engine Error Types
//!
//! Rule violations use [`folio_core::CoreError`] directly. This module only
//! adds what the engine itself can get wrong: its configuration.

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value is present but unusable.
    ///
    /// ## When This Occurs
    /// - A count limit is zero
    /// - A monetary limit is zero or negative
    /// - The duplicate window is negative
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The config file exists but could not be read or parsed.
    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
