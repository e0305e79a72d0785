//! Application directory paths for the news desk.
//!
//! Uses the [`dirs`] crate for platform-appropriate directory resolution.
//!
//! | Purpose | macOS | Linux |
//! |---------|-------|-------|
//! | App data | `~/Library/Application Support/newsdesk/` | `~/.local/share/newsdesk/` |
//! | Config | `~/Library/Application Support/newsdesk/` | `~/.config/newsdesk/` |
//!
//! # Environment Overrides
//!
//! - `NEWSDESK_DATA_DIR` overrides [`data_dir`]
//! - `NEWSDESK_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

/// Environment variable overriding [`data_dir`].
pub const DATA_DIR_ENV: &str = "NEWSDESK_DATA_DIR";
/// Environment variable overriding [`config_dir`].
pub const CONFIG_DIR_ENV: &str = "NEWSDESK_CONFIG_DIR";

/// Application data root: recent searches, exported posts and logs.
///
/// Resolves to `dirs::data_dir()/newsdesk/` by default.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join("newsdesk"))
        .unwrap_or_else(|| PathBuf::from("/tmp/newsdesk-data"))
}

/// Application config directory.
///
/// Resolves to `dirs::config_dir()/newsdesk/` by default.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join("newsdesk"))
        .unwrap_or_else(|| PathBuf::from("/tmp/newsdesk-config"))
}

/// Log file directory (`data_dir()/logs/`).
#[must_use]
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}

/// Exported post directory (`data_dir()/exports/`).
#[must_use]
pub fn exports_dir() -> PathBuf {
    data_dir().join("exports")
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_hang_off_their_roots() {
        assert!(logs_dir().starts_with(data_dir()));
        assert!(exports_dir().starts_with(data_dir()));
        assert!(config_file().starts_with(config_dir()));
        assert!(config_file().ends_with("config.toml"));
    }
}
