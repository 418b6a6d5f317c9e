//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::TimeRange;
use crate::source::HttpSourceConfig;

/// Fallback base URL when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:5000";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub polling: PollingConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote data source configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_data_path")]
    pub data_path: String,

    #[serde(default = "default_range_param")]
    pub range_param: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_data_path() -> String {
    "/api/data".to_string()
}

fn default_range_param() -> String {
    "range".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            data_path: default_data_path(),
            range_param: default_range_param(),
            request_timeout_ms: default_request_timeout(),
        }
    }
}

impl SourceConfig {
    /// Connection settings for the HTTP source
    pub fn to_http_config(&self) -> HttpSourceConfig {
        HttpSourceConfig {
            base_url: self.base_url.clone(),
            data_path: self.data_path.clone(),
            range_param: self.range_param.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PollingConfig {
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    #[serde(default)]
    pub default_range: TimeRange,
}

fn default_interval() -> u64 {
    2000 // 2 seconds
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            default_range: TimeRange::default(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Config::default();
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load from default locations or environment
    ///
    /// The first existing file wins. A file that exists but fails to load is
    /// an error rather than a silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("thermodash").join("config.toml")),
            Some(PathBuf::from("/etc/thermodash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::info!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::info!("Using default config with environment overrides");
                Self::from_env()
            }
        }
    }

    /// Apply `THERMODASH_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Source overrides
        if let Some(url) = lookup("THERMODASH_API_URL") {
            self.source.base_url = url;
        }

        // Polling overrides
        if let Some(interval) = lookup("THERMODASH_POLL_INTERVAL_MS") {
            self.polling.interval_ms =
                interval.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "THERMODASH_POLL_INTERVAL_MS".to_string(),
                    value: interval.clone(),
                })?;
        }
        if let Some(range) = lookup("THERMODASH_DEFAULT_RANGE") {
            self.polling.default_range =
                range.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "THERMODASH_DEFAULT_RANGE".to_string(),
                    value: range.clone(),
                })?;
        }

        // Logging overrides
        if let Some(level) = lookup("THERMODASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("THERMODASH_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Some(file) = lookup("THERMODASH_LOG_FILE") {
            self.logging.file = Some(file);
        }

        self.validate()
    }

    /// Reject values that would leave the dashboard unable to poll
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "polling.interval_ms".to_string(),
                value: "0".to_string(),
            });
        }
        if self.source.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "source.request_timeout_ms".to_string(),
                value: "0".to_string(),
            });
        }
        if self.source.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "source.base_url".to_string(),
                value: String::new(),
            });
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Thermodash Configuration
#
# Environment variables override these settings:
# - THERMODASH_API_URL
# - THERMODASH_POLL_INTERVAL_MS
# - THERMODASH_DEFAULT_RANGE
# - THERMODASH_LOG_LEVEL
# - THERMODASH_LOG_FORMAT
# - THERMODASH_LOG_FILE

[source]
# Base URL of the temperature backend
base_url = "http://localhost:5000"

# Samples endpoint and the name of its range parameter.
# Backends exposing /api/datos?rango= need data_path = "/api/datos"
# and range_param = "rango".
data_path = "/api/data"
range_param = "range"

# Request timeout in milliseconds
request_timeout_ms = 5000

[polling]
# Time between fetches (ms)
interval_ms = 2000

# Range shown at startup: 1h, 6h or 24h
default_range = "1h"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"

# Optional log file path. The terminal dashboard only logs to this file.
# file = "/var/log/thermodash/thermodash.log"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.source.base_url, "http://localhost:5000");
        assert_eq!(config.source.data_path, "/api/data");
        assert_eq!(config.polling.interval(), Duration::from_millis(2000));
        assert_eq!(config.polling.default_range, TimeRange::LastHour);
        assert_eq!(config.logging.level, "info");
        assert!(config.logging.file.is_none());
    }

    #[test]
    fn test_generated_config_parses_to_defaults() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(config.source.base_url, defaults.source.base_url);
        assert_eq!(config.source.range_param, defaults.source.range_param);
        assert_eq!(config.polling.interval_ms, defaults.polling.interval_ms);
        assert_eq!(config.polling.default_range, defaults.polling.default_range);
        assert_eq!(config.logging.format, defaults.logging.format);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[source]
base_url = "http://backend:5000"
data_path = "/api/datos"
range_param = "rango"

[polling]
default_range = "24h"
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.source.base_url, "http://backend:5000");
        assert_eq!(config.source.data_path, "/api/datos");
        assert_eq!(config.source.request_timeout_ms, 5000);
        assert_eq!(config.polling.interval_ms, 2000);
        assert_eq!(config.polling.default_range, TimeRange::Last24Hours);
    }

    #[test]
    fn test_load_errors() {
        let missing = Config::load(Path::new("/nonexistent/thermodash.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[polling]\ndefault_range = \"7d\"").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[polling]\ninterval_ms = 0").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_broken_default_location_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        std::fs::write(
            &broken,
            "[source]\nbase_url = \"http://sensor:5000\"\n\n[polling]\ninterval_ms = 0\n",
        )
        .unwrap();

        let result = Config::load_first(&[dir.path().join("missing.toml"), broken]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "polling.interval_ms"
        ));
    }

    #[test]
    fn test_first_existing_default_location_wins() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first.toml");
        let second = dir.path().join("second.toml");
        std::fs::write(&first, "[source]\nbase_url = \"http://sensor:5000\"\n").unwrap();
        std::fs::write(&second, "[source]\nbase_url = \"http://other:5000\"\n").unwrap();

        let config =
            Config::load_first(&[dir.path().join("missing.toml"), first, second]).unwrap();
        assert_eq!(config.source.base_url, "http://sensor:5000");
    }

    #[test]
    fn test_zero_request_timeout_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[source]\nrequest_timeout_ms = 0").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for source.request_timeout_ms: '0'"
        );
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_overrides(lookup_from(&[
                ("THERMODASH_API_URL", "http://10.0.0.5:5000"),
                ("THERMODASH_POLL_INTERVAL_MS", "500"),
                ("THERMODASH_DEFAULT_RANGE", "6h"),
                ("THERMODASH_LOG_FORMAT", "json"),
                ("THERMODASH_LOG_FILE", "/tmp/thermodash.log"),
            ]))
            .unwrap();

        assert_eq!(config.source.base_url, "http://10.0.0.5:5000");
        assert_eq!(config.polling.interval_ms, 500);
        assert_eq!(config.polling.default_range, TimeRange::Last6Hours);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.file.as_deref(), Some("/tmp/thermodash.log"));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_env_values() {
        let mut config = Config::default();
        let err = config
            .apply_overrides(lookup_from(&[("THERMODASH_POLL_INTERVAL_MS", "soon")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value for THERMODASH_POLL_INTERVAL_MS: 'soon'"
        );

        let mut config = Config::default();
        assert!(config
            .apply_overrides(lookup_from(&[("THERMODASH_DEFAULT_RANGE", "1w")]))
            .is_err());
    }

    #[test]
    fn test_to_http_config() {
        let config = SourceConfig {
            base_url: "http://sensor-host:5000".to_string(),
            ..Default::default()
        };
        let http = config.to_http_config();
        assert_eq!(http.base_url, "http://sensor-host:5000");
        assert_eq!(http.data_path, "/api/data");
        assert_eq!(http.request_timeout_ms, 5000);
    }
}
