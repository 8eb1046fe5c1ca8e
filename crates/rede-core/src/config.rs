//! Configuration loading and path resolution.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for rede configuration and data directories.
    //!
    //! REDE_HOME resolution order:
    //! 1. REDE_HOME environment variable (if set)
    //! 2. ~/.config/rede (default)

    use std::path::PathBuf;

    /// Returns the user's home directory.
    pub fn home_dir() -> Option<PathBuf> {
        std::env::var_os("HOME").map(PathBuf::from)
    }

    /// Returns the rede home directory.
    ///
    /// Checks REDE_HOME env var first, falls back to ~/.config/rede.
    ///
    /// # Panics
    /// Panics if neither REDE_HOME nor HOME is set.
    pub fn rede_home() -> PathBuf {
        if let Ok(home) = std::env::var("REDE_HOME") {
            return PathBuf::from(home);
        }

        home_dir()
            .map(|h| h.join(".config").join("rede"))
            .expect("Could not determine home directory")
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        rede_home().join("config.toml")
    }

    /// Returns the path to the persisted auth token file.
    pub fn token_path() -> PathBuf {
        rede_home().join("auth.json")
    }

    /// Returns the directory for log files.
    pub fn logs_dir() -> PathBuf {
        rede_home().join("logs")
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote API.
    pub base_url: String,

    /// Feed page size used for all paginated fetches.
    pub page_size: u32,

    /// HTTP request timeout in seconds (0 disables).
    pub timeout_secs: u32,
}

impl Config {
    const DEFAULT_BASE_URL: &str = "http://localhost:8000";
    const DEFAULT_PAGE_SIZE: u32 = 20;
    const DEFAULT_TIMEOUT_SECS: u32 = 30;

    /// Loads configuration from the default config path.
    ///
    /// The `REDE_BASE_URL` environment variable overrides the file value.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))?
        } else {
            Config::default()
        };

        if let Ok(url) = std::env::var("REDE_BASE_URL") {
            let trimmed = url.trim();
            if !trimmed.is_empty() {
                config.base_url = trimmed.to_string();
            }
        }

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            page_size: Self::DEFAULT_PAGE_SIZE,
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: missing file yields defaults.
    #[test]
    fn test_load_from_missing_file() {
        let config = Config::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.page_size, 20);
        assert_eq!(config.timeout_secs, 30);
    }

    /// Test: partial config files keep defaults for missing fields.
    #[test]
    fn test_partial_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = \"https://rede.example.com\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.base_url, "https://rede.example.com");
        assert_eq!(config.page_size, 20);
    }

    /// Test: invalid TOML is an error, not a silent default.
    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "base_url = [not toml").unwrap();

        assert!(Config::load_from(&path).is_err());
    }
}
