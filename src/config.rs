//! Configuration for the news desk.
//!
//! Loaded from a TOML file (see [`DeskConfig::default_config_path`]) with
//! every section optional. Backend connection details can be overridden
//! from the environment so credentials never have to live on disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use newsdesk_search::SearchConfig;

use crate::error::{DeskError, Result};

/// Environment variable overriding [`BackendConfig::url`].
pub const BACKEND_URL_ENV: &str = "NEWSDESK_BACKEND_URL";
/// Environment variable overriding [`BackendConfig::anon_key`].
pub const ANON_KEY_ENV: &str = "NEWSDESK_ANON_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskConfig {
    /// Backend project connection.
    pub backend: BackendConfig,
    /// Search bar behaviour.
    pub search: SearchConfig,
    /// Log output.
    pub logging: LoggingConfig,
    /// Local persistence.
    pub storage: StorageConfig,
}

/// Connection to the hosted backend (auth, REST store, functions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// Public anonymous API key sent as `apikey` on every request.
    pub anon_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:54321".into(),
            anon_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub filter: String,
    /// Also write a daily rolling log file under the logs directory.
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "newsdesk=info,newsdesk_search=info".into(),
            file: false,
        }
    }
}

/// Local persistence settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for the recent-search file. Defaults to the data dir.
    pub recent_dir: Option<PathBuf>,
}

impl StorageConfig {
    /// The directory recent searches are persisted in.
    pub fn recent_dir(&self) -> PathBuf {
        self.recent_dir
            .clone()
            .unwrap_or_else(crate::desk_dirs::data_dir)
    }
}

impl DeskConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| DeskError::Config(e.to_string()))
    }

    /// Load from `path` if it exists, otherwise use defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| DeskError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path (`config_dir()/config.toml`).
    pub fn default_config_path() -> PathBuf {
        crate::desk_dirs::config_file()
    }

    /// Apply `NEWSDESK_BACKEND_URL` / `NEWSDESK_ANON_KEY` from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` in place of the process environment.
    /// Empty values are ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BACKEND_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.url = url;
        }
        if let Some(key) = lookup(ANON_KEY_ENV).filter(|v| !v.trim().is_empty()) {
            self.backend.anon_key = key;
        }
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DeskError::Config`] for an unparseable backend URL or a zero
    /// timeout, and passes through search config errors.
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.backend.url).map_err(|e| {
            DeskError::Config(format!("backend.url {:?} is invalid: {e}", self.backend.url))
        })?;
        if self.backend.timeout_secs == 0 {
            return Err(DeskError::Config(
                "backend.timeout_secs must be greater than 0".into(),
            ));
        }
        self.search.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(DeskConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: DeskConfig = toml::from_str(
            r#"
            [backend]
            url = "https://project.example.co"

            [search]
            debounce_ms = 250
            "#,
        )
        .expect("parse");
        assert_eq!(config.backend.url, "https://project.example.co");
        assert_eq!(config.backend.timeout_secs, 30);
        assert_eq!(config.search.debounce_ms, 250);
        assert_eq!(config.search.recent_capacity, 5);
        assert!(!config.logging.file);
    }

    #[test]
    fn round_trip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");
        let mut config = DeskConfig::default();
        config.backend.anon_key = "anon".into();
        config.storage.recent_dir = Some(dir.path().to_path_buf());
        config.save_to_file(&path).expect("save");

        let loaded = DeskConfig::from_file(&path).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn from_file_invalid_toml_returns_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");
        let err = DeskConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().starts_with("config error"));
    }

    #[test]
    fn load_or_default_without_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DeskConfig::load_or_default(&dir.path().join("missing.toml")).expect("load");
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn overrides_replace_backend_settings() {
        let mut config = DeskConfig::default();
        config.apply_overrides_from(|key| match key {
            BACKEND_URL_ENV => Some("https://override.example".into()),
            ANON_KEY_ENV => Some("  ".into()),
            _ => None,
        });
        assert_eq!(config.backend.url, "https://override.example");
        assert_eq!(config.backend.anon_key, "");
    }

    #[test]
    fn invalid_url_rejected() {
        let config = DeskConfig {
            backend: BackendConfig {
                url: "not a url".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("backend.url"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = DeskConfig::default();
        config.backend.timeout_secs = 0;
        assert!(config.validate().unwrap_err().to_string().contains("timeout"));
    }

    #[test]
    fn search_config_errors_surface() {
        let mut config = DeskConfig::default();
        config.search.recent_capacity = 0;
        assert!(config
            .validate()
            .unwrap_err()
            .to_string()
            .contains("recent_capacity"));
    }

    #[test]
    fn explicit_recent_dir_wins() {
        let storage = StorageConfig {
            recent_dir: Some(PathBuf::from("/srv/desk")),
        };
        assert_eq!(storage.recent_dir(), PathBuf::from("/srv/desk"));
    }
}
