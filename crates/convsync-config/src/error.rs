//! Error types for configuration management

use convsync_types::Error as ConvsyncError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error when reading a configuration file
    #[error("I/O error reading config file '{path}': {source}")]
    Io {
        /// Path to the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Configuration file parsing error
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] config::ConfigError),

    /// Configuration validation error
    #[error("configuration validation failed: {message}")]
    Validation {
        /// Validation error message
        message: String,
    },

    /// Serialization error
    #[error("serialization error: {message}")]
    Serialization {
        /// Error message
        message: String,
    },
}

impl ConfigError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for ConvsyncError {
    fn from(error: ConfigError) -> Self {
        Self::config(error.to_string())
    }
}

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
