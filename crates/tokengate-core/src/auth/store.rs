use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The well-known key the token lives under
pub const TOKEN_KEY: &str = "token";

/// Token file name in the cache directory
const TOKEN_FILE: &str = "token.json";

/// A single persisted token slot.
///
/// At most one token is stored at a time. Implementations use interior
/// mutability so one store can be shared by the login flow and the gate.
pub trait TokenStore: Send + Sync {
    /// The stored token, if any
    fn read(&self) -> Result<Option<String>>;

    /// Overwrite the stored token
    fn write(&self, token: &str) -> Result<()>;

    /// Remove the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// Process-local slot. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a token already stored
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.slot
            .lock()
            .map_err(|_| anyhow::anyhow!("token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn write(&self, token: &str) -> Result<()> {
        *self.lock()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.lock()?.take();
        Ok(())
    }
}

// ============================================================================
// File store
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    stored_at: DateTime<Utc>,
}

/// Token persisted as JSON in the cache directory.
pub struct FileTokenStore {
    cache_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_FILE)
    }

    fn load(path: &Path) -> Result<Option<StoredToken>> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(path).context("Failed to read token file")?;
        match serde_json::from_str::<StoredToken>(&contents) {
            Ok(stored) => Ok(Some(stored)),
            Err(e) => {
                // A corrupt file is as good as no token; the next write replaces it.
                warn!(error = %e, path = %path.display(), "Ignoring unreadable token file");
                Ok(None)
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Result<Option<String>> {
        let stored = Self::load(&self.path())?;
        if let Some(ref s) = stored {
            debug!(stored_at = %s.stored_at, "Token loaded from disk");
        }
        Ok(stored.map(|s| s.token))
    }

    fn write(&self, token: &str) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create token directory")?;
        }
        let stored = StoredToken {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        let contents = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&path, contents).context("Failed to write token file")?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(self.path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove token file"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_write_read_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.read().unwrap(), None);

        store.write("abc123").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("abc123"));

        // Overwrite, never append
        store.write("def456").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("def456"));

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_memory_store_clear_is_idempotent() {
        let store = MemoryTokenStore::with_token("abc123");
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_token_store_is_object_safe() {
        let store: std::sync::Arc<dyn TokenStore> = std::sync::Arc::new(MemoryTokenStore::new());
        store.write("t").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("t"));
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested"));
        assert_eq!(store.read().unwrap(), None);

        store.write("abc123").unwrap();
        let reopened = FileTokenStore::new(dir.path().join("nested"));
        assert_eq!(reopened.read().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        store.write("abc123").unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        assert_eq!(store.read().unwrap(), None);

        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_file_store_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        std::fs::write(store.path(), "{not json").unwrap();
        assert_eq!(store.read().unwrap(), None);

        // A write replaces the corrupt file
        store.write("fresh").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("fresh"));
    }

    #[test]
    fn test_file_store_format_uses_token_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().to_path_buf());
        store.write("abc123").unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[TOKEN_KEY], "abc123");
        assert!(value["stored_at"].is_string());
    }
}
