//! Bearer token storage and unverified claim decoding.
//!
//! The token lives behind a [`TokenStorage`] backend so call sites can be
//! tested without touching the OS keychain or the filesystem.

pub mod claims;
pub mod file;
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub mod keychain;
pub mod memory;

use thiserror::Error;

pub use claims::{token_payload, TokenClaims};
pub use file::FileStorage;
#[cfg(any(target_os = "macos", target_os = "windows"))]
pub use keychain::KeyringStorage;
pub use memory::MemoryStorage;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Keychain operation failed: {0}")]
    Keychain(String),

    #[error("Token file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token storage lock poisoned")]
    Poisoned,
}

/// Minimal string key/value persistence.
pub trait TokenStorage: Send + Sync {
    /// Value stored under `key`, or `None` if nothing is stored.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: TokenStorage + ?Sized> TokenStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// The single persisted bearer token.
///
/// Every read goes to the backend; nothing is cached here.
pub struct TokenStore<S: TokenStorage> {
    storage: S,
}

impl<S: TokenStorage> TokenStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn get_token(&self) -> Result<Option<String>, StorageError> {
        self.storage.get(TOKEN_KEY)
    }

    pub fn set_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)
    }

    pub fn clear_token(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
