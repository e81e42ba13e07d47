//! Configuration loader utilities

use crate::{Config, ConfigBuilder, ConfigError, ConfigResult};
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "CONVSYNC";

/// Configuration loader with common loading patterns
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from default locations
    pub fn load_default() -> ConfigResult<Config> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = Self::config_exists() {
            builder = builder.add_source_file(path);
        }

        builder.add_env_prefix(ENV_PREFIX).build()
    }

    /// Load configuration from a specific file.
    ///
    /// Unlike the default search, an explicitly named file must exist.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "configuration file not found",
                ),
            });
        }

        ConfigBuilder::new()
            .add_source_file(path)
            .add_env_prefix(ENV_PREFIX)
            .build()
    }

    /// Save configuration to a file, format chosen by extension
    pub fn save_to_file<P: AsRef<Path>>(config: &Config, path: P) -> ConfigResult<()> {
        let path = path.as_ref();

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => {
                serde_yaml::to_string(config).map_err(|e| ConfigError::Serialization {
                    message: format!("failed to serialize to YAML: {e}"),
                })?
            }
            _ => toml::to_string_pretty(config).map_err(|e| ConfigError::Serialization {
                message: format!("failed to serialize to TOML: {e}"),
            })?,
        };

        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// Generate a default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> ConfigResult<()> {
        Self::save_to_file(&Config::default(), path)
    }

    /// Check if a configuration file exists in a default location
    pub fn config_exists() -> Option<PathBuf> {
        Self::default_config_paths()
            .into_iter()
            .find(|path| path.exists())
    }

    /// Default configuration file paths in order of preference
    fn default_config_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from("convsync.toml"),
            PathBuf::from("convsync.yaml"),
            PathBuf::from("convsync.yml"),
            PathBuf::from(".convsync.toml"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_load_from_missing_file_errors() {
        let result = ConfigLoader::load_from_file("/nonexistent/convsync.toml");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[rstest]
    #[case("config.toml")]
    #[case("config.yaml")]
    fn test_save_and_reload_round_trip(#[case] name: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);

        ConfigLoader::generate_default_config(&path).unwrap();
        let config = ConfigLoader::load_from_file(&path).unwrap();

        assert_eq!(config.logging.level, "warn");
        assert!(config.sync.check_mtime);
    }
}
