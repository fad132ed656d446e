//! Client configuration
//!
//! Sources, lowest precedence first: built-in defaults, the TOML config file,
//! the `BOOKSEARCH_API_URL` environment variable, then command-line flags
//! (applied by the binary).

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const API_URL_ENV: &str = "BOOKSEARCH_API_URL";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base URL of the search service
    pub api_url: String,
    /// Quiet period after the last keystroke before a search is sent
    pub debounce_ms: u64,
    /// Minimum number of characters before a query is searched
    pub min_query_len: usize,
    /// Upper bound on a single request, after which it counts as failed
    pub request_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_query_len: 1,
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
        }
    }
}

/// Timing and gating parameters handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_len: usize,
    pub request_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Config::default().search_settings()
    }
}

impl Config {
    /// `~/.booksearch/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".booksearch").join("config.toml"))
    }

    /// Load from `path`, or from the default location if it exists.
    ///
    /// An explicitly given path must exist; a missing default file just
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply environment overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(API_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: self.debounce(),
            min_query_len: self.min_query_len,
            request_timeout: self.request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://127.0.0.1:8080");
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.min_query_len, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debounce_ms = 50").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.debounce_ms, 50);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout_ms, DEFAULT_REQUEST_TIMEOUT_MS);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "debounce = 50").unwrap();

        let err = Config::from_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_env_override() {
        let mut config = Config::default();
        config.apply_env_with(|key| {
            (key == API_URL_ENV).then(|| "https://books.example.com".to_string())
        });
        assert_eq!(config.api_url, "https://books.example.com");

        // Blank values are ignored
        config.apply_env_with(|_| Some("  ".to_string()));
        assert_eq!(config.api_url, "https://books.example.com");
    }

    #[test]
    fn test_validate() {
        let config = Config {
            api_url: "127.0.0.1:8080".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            request_timeout_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_search_settings() {
        let config = Config {
            debounce_ms: 50,
            min_query_len: 2,
            request_timeout_ms: 1500,
            ..Default::default()
        };
        let settings = config.search_settings();
        assert_eq!(settings.debounce, Duration::from_millis(50));
        assert_eq!(settings.min_query_len, 2);
        assert_eq!(settings.request_timeout, Duration::from_millis(1500));
    }
}
