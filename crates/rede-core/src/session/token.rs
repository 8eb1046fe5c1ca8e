//! Bearer token persistence.
//!
//! Stores the session token in `<rede_home>/auth.json` with restricted
//! permissions (0600). The token is never logged in full.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::paths;

/// The persisted bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub token_type: String,
}

impl StoredToken {
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "bearer".to_string(),
        }
    }
}

/// File-backed token store.
///
/// The persisted copy is the source of truth: the HTTP layer re-reads it
/// before every request, and startup hydration trusts it over any
/// in-memory state.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    /// Store at the default location under the rede home directory.
    pub fn open_default() -> Self {
        Self {
            path: paths::token_path(),
        }
    }

    /// Store at an explicit path (used by tests).
    pub fn open_at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the persisted token.
    /// Returns `None` if the file doesn't exist.
    pub fn load(&self) -> Result<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token from {}", self.path.display()))?;

        let token = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse token from {}", self.path.display()))?;
        Ok(Some(token))
    }

    /// Saves the token to disk with restricted permissions (0600).
    pub fn save(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents = serde_json::to_string_pretty(token).context("Failed to serialize token")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .with_context(|| format!("Failed to open {} for writing", self.path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, contents)
                .with_context(|| format!("Failed to write to {}", self.path.display()))?;
        }

        Ok(())
    }

    /// Deletes the persisted token.
    /// Returns whether a token was present.
    pub fn clear(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)
            .with_context(|| format!("Failed to remove {}", self.path.display()))?;
        Ok(true)
    }

    /// Returns a masked version of the token for display.
    pub fn mask(token: &str) -> String {
        if token.len() <= 12 {
            return "***".to_string();
        }
        format!("{}...", &token[..8])
    }
}
