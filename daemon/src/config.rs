//! Daemon configuration, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokenledger_utils::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings shared by every subcommand.
///
/// Loaded from a TOML file via [`DaemonConfig::from_toml_file`]; missing keys
/// fall back to their defaults. CLI flags and `TOKENLEDGER_*` environment
/// variables override file values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub map_size: usize,

    /// Log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log output format: `"human"` or `"json"`.
    #[serde(default)]
    pub log_format: LogFormat,

    /// Print command results as JSON instead of text.
    #[serde(default)]
    pub json_output: bool,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./tokenledger_data")
}

fn default_map_size() -> usize {
    tokenledger_store_lmdb::environment::DEFAULT_MAP_SIZE
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size: default_map_size(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            json_output: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = DaemonConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = DaemonConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = DaemonConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.data_dir, PathBuf::from("./tokenledger_data"));
        assert_eq!(config.map_size, 1 << 30);
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_format, LogFormat::Human);
        assert!(!config.json_output);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            data_dir = "/var/lib/tokenledger"
            log_format = "json"
            json_output = true
        "#;
        let config = DaemonConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/tokenledger"));
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.json_output);
        assert_eq!(config.log_level, "warn"); // default
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = DaemonConfig::from_toml_str(r#"log_format = "xml""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = DaemonConfig::from_toml_file(Path::new("/nonexistent/tokenledger.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
