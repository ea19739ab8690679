use anyhow::{Context, Result};
use keyring::Entry;

use super::store::{TokenStore, TOKEN_KEY};

const SERVICE_NAME: &str = "tokengate";

/// Token kept in the OS keychain under service `tokengate`, account `token`.
pub struct KeyringTokenStore {
    entry: Entry,
}

impl KeyringTokenStore {
    pub fn new() -> Result<Self> {
        Self::with_service(SERVICE_NAME)
    }

    /// Use a different keychain service name (one slot per service)
    pub fn with_service(service: &str) -> Result<Self> {
        let entry = Entry::new(service, TOKEN_KEY).context("Failed to create keyring entry")?;
        Ok(Self { entry })
    }
}

impl TokenStore for KeyringTokenStore {
    fn read(&self) -> Result<Option<String>> {
        match self.entry.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn write(&self, token: &str) -> Result<()> {
        self.entry
            .set_password(token)
            .context("Failed to store token in keychain")
    }

    fn clear(&self) -> Result<()> {
        match self.entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_store() -> KeyringTokenStore {
        // In-process credentials; never touches the real keychain
        keyring::set_default_credential_builder(keyring::mock::default_credential_builder());
        KeyringTokenStore::with_service("tokengate-test").unwrap()
    }

    #[test]
    fn test_write_then_read() {
        let store = mock_store();
        store.write("abc123").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_write_overwrites() {
        let store = mock_store();
        store.write("abc123").unwrap();
        store.write("def456").unwrap();
        assert_eq!(store.read().unwrap().as_deref(), Some("def456"));
    }

    #[test]
    fn test_missing_entry_reads_none() {
        let store = mock_store();
        assert_eq!(store.read().unwrap(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = mock_store();

        // Nothing stored yet
        store.clear().unwrap();

        store.write("abc123").unwrap();
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
        store.clear().unwrap();
        assert_eq!(store.read().unwrap(), None);
    }
}
