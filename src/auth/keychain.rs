//! OS keychain token storage.
//!
//! Uses the `keyring` crate: macOS Keychain (apple-native) or Windows
//! Credential Manager (windows-native). The module is not built on other
//! platforms. Each storage key becomes the keychain entry's user name under one
//! service name, so the token never touches disk in plain text.

use keyring::Entry;

use super::{StorageError, TokenStorage};

/// Default keychain service name for the CLI.
pub const DEFAULT_SERVICE_NAME: &str = "cloud-disk";

impl From<keyring::Error> for StorageError {
    fn from(err: keyring::Error) -> Self {
        StorageError::Keychain(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct KeyringStorage {
    service: String,
}

impl KeyringStorage {
    pub fn new(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self, key: &str) -> Result<Entry, StorageError> {
        Ok(Entry::new(&self.service, key)?)
    }
}

impl Default for KeyringStorage {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_NAME)
    }
}

impl TokenStorage for KeyringStorage {
    /// Returns `None` if no entry exists (never stored or already cleared).
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value)?;
        Ok(())
    }

    /// Idempotent: a missing entry counts as removed.
    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(StorageError::from(e)),
        }
    }
}
