//! Configuration builder for flexible configuration loading

use crate::{Config, ConfigError, ConfigResult};
use config::{ConfigBuilder as ConfigBuilderInner, Environment, File, FileFormat};
use convsync_types::{Extension, WorkerCount};
use std::path::{Path, PathBuf};

/// Configuration builder layering defaults, files, and the environment
#[derive(Debug)]
pub struct ConfigBuilder {
    inner: ConfigBuilderInner<config::builder::DefaultState>,
    sources: Vec<ConfigSource>,
}

#[derive(Debug, Clone)]
enum ConfigSource {
    File { path: PathBuf, format: FileFormat },
    Environment { prefix: String },
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self {
            inner: config::Config::builder(),
            sources: Vec::new(),
        }
    }

    /// Add a configuration file source, format detected from the extension
    pub fn add_source_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let format = Self::detect_format(&path);
        self.sources.push(ConfigSource::File { path, format });
        self
    }

    /// Add environment variable source with prefix
    pub fn add_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.sources.push(ConfigSource::Environment {
            prefix: prefix.into(),
        });
        self
    }

    /// Build the configuration: defaults first, then files, then environment
    pub fn build(mut self) -> ConfigResult<Config> {
        let defaults = Config::default();
        self.inner = self.inner.add_source(config::Config::try_from(&defaults)?);

        for source in &self.sources {
            match source {
                ConfigSource::File { path, format } => {
                    if path.exists() {
                        self.inner = self
                            .inner
                            .add_source(File::from(path.clone()).format(*format));
                    }
                }
                ConfigSource::Environment { prefix } => {
                    self.inner = self
                        .inner
                        .add_source(Environment::with_prefix(prefix).separator("__"));
                }
            }
        }

        let config = self.inner.build()?;
        let result: Config = config.try_deserialize()?;

        Self::validate(&result)?;

        Ok(result)
    }

    /// Detect file format from extension
    fn detect_format(path: &Path) -> FileFormat {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => FileFormat::Yaml,
            Some("toml") => FileFormat::Toml,
            _ => FileFormat::Toml,
        }
    }

    /// Validate the configuration
    fn validate(config: &Config) -> ConfigResult<()> {
        if config.execution.workers > WorkerCount::MAX as i64 {
            return Err(ConfigError::validation(format!(
                "worker count {} exceeds maximum {}",
                config.execution.workers,
                WorkerCount::MAX
            )));
        }

        for raw in config
            .sync
            .convert_exts
            .iter()
            .chain(config.sync.copy_exts.iter())
            .chain(config.sync.target_ext.iter())
        {
            Extension::new(raw)
                .map_err(|e| ConfigError::validation(format!("invalid extension '{raw}': {e}")))?;
        }

        if config.logging.level.trim().is_empty() {
            return Err(ConfigError::validation("log level must not be empty"));
        }

        Ok(())
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_build_without_sources_yields_defaults() {
        let config = ConfigBuilder::new().build().unwrap();
        assert_eq!(config.execution.workers, 0);
        assert!(config.sync.check_mtime);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [sync]
            convert_exts = ["flac", "wav"]
            target_ext = "mp3"
            check_mtime = false

            [execution]
            workers = 2
            "#
        )
        .unwrap();

        let config = ConfigBuilder::new()
            .add_source_file(file.path())
            .build()
            .unwrap();

        assert_eq!(config.sync.convert_exts, vec!["flac", "wav"]);
        assert_eq!(config.sync.target_ext.as_deref(), Some("mp3"));
        assert!(!config.sync.check_mtime);
        assert_eq!(config.execution.workers, 2);
        // untouched sections keep their defaults
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config = ConfigBuilder::new()
            .add_source_file("/nonexistent/convsync.toml")
            .build()
            .unwrap();
        assert_eq!(config.execution.workers, 0);
    }

    #[test]
    fn test_invalid_extension_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [sync]
            convert_exts = ["."]
            "#
        )
        .unwrap();

        let result = ConfigBuilder::new().add_source_file(file.path()).build();
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_oversized_worker_count_fails_validation() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [execution]
            workers = 100000
            "#
        )
        .unwrap();

        let result = ConfigBuilder::new().add_source_file(file.path()).build();
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }
}
