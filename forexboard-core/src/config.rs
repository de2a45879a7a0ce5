//! Dashboard configuration.
//!
//! Loaded from TOML. Every field has a default, so an absent file or an empty
//! one is a valid configuration. The API base URL can additionally be set via
//! the `FOREXBOARD_API_URL` environment variable and by a command-line flag,
//! in increasing order of precedence.
//!
//! ```toml
//! api_base_url = "http://127.0.0.1:8000"
//! default_symbol = "EURUSD"
//! default_timeframe = "DAY"
//! request_timeout_secs = 30
//! timestamp_format = "%Y-%m-%d %H:%M:%S"
//! log_level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::str::FromStr;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::view::DEFAULT_TIMESTAMP_FORMAT;

/// Environment variable overriding `api_base_url`.
pub const API_URL_ENV: &str = "FOREXBOARD_API_URL";

pub const DEFAULT_API_BASE_URL: &str = "https://forex-trading-2.onrender.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid api_base_url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("invalid log_level '{0}' (expected off, error, warn, info, debug or trace)")]
    InvalidLogLevel(String),

    #[error("request_timeout_secs must be positive")]
    InvalidTimeout,
}

/// Runtime configuration of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Origin of the backtest service.
    #[serde(alias = "apiBaseUrl")]
    pub api_base_url: String,
    /// Symbol selected after the catalogue loads, when listed.
    pub default_symbol: String,
    /// Timeframe selected after the catalogue loads, when listed.
    pub default_timeframe: String,
    pub request_timeout_secs: u64,
    /// chrono format string for signal timestamps.
    pub timestamp_format: String,
    pub log_level: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_symbol: "EURUSD".to_string(),
            default_timeframe: "DAY".to_string(),
            request_timeout_secs: 30,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// `<config_dir>/forexboard/config.toml`, when the platform has a config
    /// directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("forexboard").join("config.toml"))
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read a config file. A missing file is an error.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is read
    /// if present, otherwise defaults are used. Then `env_url` (the value of
    /// [`API_URL_ENV`]) and `flag_url` override the base URL, and the result
    /// is validated.
    pub fn resolve(
        path: Option<&Path>,
        env_url: Option<String>,
        flag_url: Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => Self::from_file(&p)?,
                None => Self::default(),
            },
        };

        if let Some(url) = env_url.filter(|u| !u.trim().is_empty()) {
            config.api_base_url = url;
        }
        if let Some(url) = flag_url {
            config.api_base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// [`resolve`](Self::resolve) reading [`API_URL_ENV`] from the process
    /// environment.
    pub fn load(path: Option<&Path>, flag_url: Option<String>) -> Result<Self, ConfigError> {
        Self::resolve(path, std::env::var(API_URL_ENV).ok(), flag_url)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        self.level_filter()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// The base URL parsed as an absolute http(s) URL.
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.api_base_url.clone(),
            reason,
        };
        let url = Url::parse(self.api_base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        log::LevelFilter::from_str(&self.log_level)
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = DashboardConfig::default();
        config.validate().unwrap();
        assert_eq!(config.default_symbol, "EURUSD");
        assert_eq!(config.level_filter().unwrap(), log::LevelFilter::Info);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = DashboardConfig::from_toml(
            "api_base_url = \"http://127.0.0.1:8000\"\ndefault_timeframe = \"1H\"\n",
            Path::new("test.toml"),
        )
        .unwrap();
        assert_eq!(config.api_base_url, "http://127.0.0.1:8000");
        assert_eq!(config.default_timeframe, "1H");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn camel_case_base_url_is_accepted() {
        let config =
            DashboardConfig::from_toml("apiBaseUrl = \"http://localhost:8000\"", Path::new("x"))
                .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:8000");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = DashboardConfig::from_toml("page_size = 50", Path::new("x")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn precedence_flag_over_env_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url = \"http://file.example\"").unwrap();

        let from_file = DashboardConfig::resolve(Some(file.path()), None, None).unwrap();
        assert_eq!(from_file.api_base_url, "http://file.example");

        let from_env = DashboardConfig::resolve(
            Some(file.path()),
            Some("http://env.example".into()),
            None,
        )
        .unwrap();
        assert_eq!(from_env.api_base_url, "http://env.example");

        let from_flag = DashboardConfig::resolve(
            Some(file.path()),
            Some("http://env.example".into()),
            Some("http://flag.example".into()),
        )
        .unwrap();
        assert_eq!(from_flag.api_base_url, "http://flag.example");
    }

    #[test]
    fn blank_env_value_is_ignored() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "api_base_url = \"http://file.example\"").unwrap();
        let config =
            DashboardConfig::resolve(Some(file.path()), Some("  ".into()), None).unwrap();
        assert_eq!(config.api_base_url, "http://file.example");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = DashboardConfig::resolve(Some(Path::new("/nonexistent/forexboard.toml")), None, None)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let config = DashboardConfig {
            api_base_url: "ftp://example.com".into(),
            ..DashboardConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })));

        let config = DashboardConfig {
            api_base_url: "not a url".into(),
            ..DashboardConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidBaseUrl { .. })));

        let config = DashboardConfig {
            log_level: "loud".into(),
            ..DashboardConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidLogLevel(_))));

        let config = DashboardConfig {
            request_timeout_secs: 0,
            ..DashboardConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidTimeout)));
    }
}
