use anyhow::anyhow;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "todo";
/// Prefix of environment variables overriding config keys, e.g. `TODO_STORAGE_PATH`.
pub const ENV_PREFIX: &str = "TODO";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Loads configuration from an optional file, then the environment.
    ///
    /// Without `path`, `todo.toml` (or any format `config` understands) in the
    /// working directory is used if present. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Parses `log_level` into a tracing level.
    pub fn level(&self) -> anyhow::Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("Invalid log level '{}'", self.log_level))
    }
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("todos.json")
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    mod deser_tests {
        use super::*;

        #[test]
        fn test_config_defaults_when_empty() {
            // Act
            let config: Config = toml::from_str("").unwrap();

            // Assert
            assert_eq!(config, Config::default());
            assert_eq!(config.storage_path, PathBuf::from("todos.json"));
            assert_eq!(config.log_level, "warn");
        }

        #[test]
        fn test_config_deserialize_from_toml() {
            // Arrange
            let toml_str = r#"
                storage_path = "/tmp/my-todos.json"
                log_level = "debug"
            "#;

            // Act
            let config: Config = toml::from_str(toml_str).unwrap();

            // Assert
            assert_eq!(config.storage_path, PathBuf::from("/tmp/my-todos.json"));
            assert_eq!(config.level().unwrap(), tracing::Level::DEBUG);
        }
    }

    #[test]
    fn test_load_reads_explicit_file() {
        // Arrange
        let dir = assert_fs::TempDir::new().unwrap();
        let file = dir.child("custom.toml");
        file.write_str("log_level = \"info\"\nstorage_path = \"data/tasks.json\"\n")
            .unwrap();

        // Act
        let config = Config::load(Some(file.path())).unwrap();

        // Assert
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage_path, PathBuf::from("data/tasks.json"));
    }

    #[test]
    fn test_load_fails_for_missing_explicit_file() {
        let dir = assert_fs::TempDir::new().unwrap();

        let result = Config::load(Some(dir.child("missing.toml").path()));

        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_level_is_rejected() {
        let config = Config {
            log_level: "chatty".to_string(),
            ..Config::default()
        };

        let err = config.level().unwrap_err();

        assert_eq!(err.to_string(), "Invalid log level 'chatty'");
    }
}
