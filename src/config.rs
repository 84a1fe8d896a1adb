//! Configuration — which handlers to register and how to tune them
//!
//! Loaded from YAML. Every field has a default, so an empty (or absent)
//! file yields a dispatcher with all three handlers enabled.

use crate::handlers::AccengageSettings;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` wins when set
    pub log_filter: String,
    pub accengage: AccengageConfig,
    pub firebase: BackendConfig,
    pub tune: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            accengage: AccengageConfig::default(),
            firebase: BackendConfig::default(),
            tune: BackendConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccengageConfig {
    pub enabled: bool,
    #[serde(flatten)]
    pub settings: AccengageSettings,
}

impl Default for AccengageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            settings: AccengageSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub enabled: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_value(value)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    /// Load `path` if given, else the default location if it exists, else defaults.
    pub fn resolve(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        match default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/tagdispatch/config.yaml` (e.g. ~/.config/tagdispatch/config.yaml)
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tagdispatch").join("config.yaml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::DEFAULT_MIN_EVENT_ID;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        assert_eq!(Config::from_yaml_str("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml_str("# nothing\n").unwrap(), Config::default());
    }

    #[test]
    fn defaults_enable_everything() {
        let config = Config::default();
        assert_eq!(config.log_filter, "info");
        assert!(config.accengage.enabled);
        assert!(config.firebase.enabled);
        assert!(config.tune.enabled);
        assert_eq!(config.accengage.settings.min_event_id, DEFAULT_MIN_EVENT_ID);
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let config = Config::from_yaml_str(
            "log_filter: debug\naccengage:\n  min_event_id: 2000\ntune:\n  enabled: false\n",
        )
        .unwrap();

        assert_eq!(config.log_filter, "debug");
        assert!(config.accengage.enabled);
        assert_eq!(config.accengage.settings.min_event_id, 2000);
        assert_eq!(
            config.accengage.settings.device_info_date_format,
            AccengageSettings::default().device_info_date_format
        );
        assert!(config.firebase.enabled);
        assert!(!config.tune.enabled);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = Config::from_yaml_str("accengage: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml(_)));
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "firebase:\n  enabled: false").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(!config.firebase.enabled);
        assert!(config.accengage.enabled);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let err = Config::load(&path).unwrap_err();

        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.yaml"));
    }

    #[test]
    fn explicit_path_wins_in_resolve() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_filter: warn").unwrap();

        let config = Config::resolve(Some(file.path())).unwrap();

        assert_eq!(config.log_filter, "warn");
    }
}
