//! Configuration management for convsync
//!
//! Supports TOML and YAML configuration files, environment variable
//! overrides under the `CONVSYNC_` prefix, and sensible defaults. Values
//! loaded here are a baseline: command-line flags override them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use convsync_config::{Config, ConfigBuilder};
//!
//! let config = ConfigBuilder::new()
//!     .add_source_file("convsync.toml")
//!     .add_env_prefix("CONVSYNC")
//!     .build()
//!     .expect("failed to load configuration");
//!
//! println!("workers: {}", config.execution.workers);
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};

pub mod builder;
pub mod error;
pub mod loader;

pub use builder::ConfigBuilder;
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Main configuration structure for convsync
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// What gets synchronized and how staleness is detected
    #[serde(default)]
    pub sync: SyncConfig,
    /// Worker sizing and run-mode switches
    #[serde(default)]
    pub execution: ExecutionConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// What gets synchronized and how staleness is detected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Extensions to convert, with or without the leading dot
    #[serde(default)]
    pub convert_exts: Vec<String>,
    /// Extension converted files receive at the destination
    #[serde(default)]
    pub target_ext: Option<String>,
    /// Extensions mirrored byte-for-byte without conversion
    #[serde(default)]
    pub copy_exts: Vec<String>,
    /// Regenerate destination files older than their source counterpart
    #[serde(default = "default_check_mtime")]
    pub check_mtime: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            convert_exts: Vec::new(),
            target_ext: None,
            copy_exts: Vec::new(),
            check_mtime: true,
        }
    }
}

/// Worker sizing and run-mode switches
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Requested worker count; zero or negative is relative to core count
    #[serde(default)]
    pub workers: i64,
    /// Compute and print the plan without mutating the filesystem
    #[serde(default)]
    pub dry_run: bool,
    /// Skip the interactive confirmation prompt
    #[serde(default)]
    pub skip_confirmation: bool,
    /// Always print captured converter output
    #[serde(default)]
    pub verbose: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when `RUST_LOG` is unset
    pub level: String,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            colored_output: true,
        }
    }
}

fn default_check_mtime() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.sync.convert_exts.is_empty());
        assert!(config.sync.target_ext.is_none());
        assert!(config.sync.check_mtime);
        assert_eq!(config.execution.workers, 0);
        assert!(!config.execution.dry_run);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_file_fills_missing_sections() {
        let config: Config = toml::from_str(
            r#"
            [sync]
            convert_exts = ["flac"]
            target_ext = "mp3"
            "#,
        )
        .unwrap();

        assert_eq!(config.sync.convert_exts, vec!["flac"]);
        assert_eq!(config.sync.target_ext.as_deref(), Some("mp3"));
        assert!(config.sync.check_mtime);
        assert_eq!(config.execution.workers, 0);
    }
}
