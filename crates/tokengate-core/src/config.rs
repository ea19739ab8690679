//! Application configuration management.
//!
//! Holds the backend base URLs, the token store choice and the last used
//! username. Stored at `~/.config/tokengate/config.json`; every field can be
//! overridden from the environment.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::ApiClient;
use crate::auth::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "tokengate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Backend both frontends talk to out of the box
const DEFAULT_API_URL: &str = "http://localhost:8000";

pub const ENV_AUTH_URL: &str = "TOKENGATE_AUTH_URL";
pub const ENV_FINANCE_URL: &str = "TOKENGATE_FINANCE_URL";
pub const ENV_TOKEN_STORE: &str = "TOKENGATE_TOKEN_STORE";
pub const ENV_USERNAME: &str = "TOKENGATE_USERNAME";

/// Where the token is persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenStoreKind {
    /// `token.json` in the cache directory
    #[default]
    File,
    /// OS keychain
    Keyring,
    /// Process memory only
    Memory,
}

impl FromStr for TokenStoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(TokenStoreKind::File),
            "keyring" => Ok(TokenStoreKind::Keyring),
            "memory" => Ok(TokenStoreKind::Memory),
            other => Err(anyhow::anyhow!(
                "unknown token store {other:?} (expected file, keyring or memory)"
            )),
        }
    }
}

impl fmt::Display for TokenStoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenStoreKind::File => "file",
            TokenStoreKind::Keyring => "keyring",
            TokenStoreKind::Memory => "memory",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub auth_api_url: String,
    pub finance_api_url: String,
    pub token_store: TokenStoreKind,
    pub last_username: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auth_api_url: DEFAULT_API_URL.to_string(),
            finance_api_url: DEFAULT_API_URL.to_string(),
            token_store: TokenStoreKind::default(),
            last_username: None,
        }
    }
}

impl Config {
    /// Load the config file (defaults if missing), then apply environment
    /// overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `TOKENGATE_*` overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))
        } else {
            debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }

    /// Apply overrides from a variable lookup (the process environment in
    /// production). Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_AUTH_URL) {
            self.auth_api_url = url;
        }
        if let Some(url) = get(ENV_FINANCE_URL) {
            self.finance_api_url = url;
        }
        if let Some(kind) = get(ENV_TOKEN_STORE) {
            self.token_store = kind
                .parse()
                .with_context(|| format!("Invalid {ENV_TOKEN_STORE}"))?;
        }
        if let Some(username) = get(ENV_USERNAME) {
            self.last_username = Some(username);
        }
        Ok(())
    }

    /// Record the last successful username.
    ///
    /// Only `last_username` is written, into the config as it is on disk, so
    /// environment overrides held by `self` never end up in the file. A file
    /// that fails to parse is left alone and the error returned.
    pub fn remember_username(&mut self, username: &str) -> Result<()> {
        self.last_username = Some(username.to_string());
        Self::save_username_to(&Self::config_path()?, username)
    }

    pub fn save_username_to(path: &Path, username: &str) -> Result<()> {
        let mut on_disk = Self::load_from(path)?;
        if on_disk.last_username.as_deref() == Some(username) {
            return Ok(());
        }
        on_disk.last_username = Some(username.to_string());
        on_disk.save_to(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// Build the configured token store
    pub fn open_token_store(&self) -> Result<Arc<dyn TokenStore>> {
        let store: Arc<dyn TokenStore> = match self.token_store {
            TokenStoreKind::File => Arc::new(FileTokenStore::new(self.cache_dir()?)),
            TokenStoreKind::Keyring => Arc::new(KeyringTokenStore::new()?),
            TokenStoreKind::Memory => Arc::new(MemoryTokenStore::new()),
        };
        debug!(kind = %self.token_store, "Token store opened");
        Ok(store)
    }

    /// Build an API client for the configured backends
    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.auth_api_url, &self.finance_api_url)
            .context("Failed to create API client")
    }
}
