//! Process-local token storage. Values are zeroized when removed or replaced.

use std::collections::HashMap;
use std::sync::RwLock;

use zeroize::Zeroize;

use super::{StorageError, TokenStorage};

#[derive(Default)]
pub struct MemoryStorage {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.values.read().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self.values.write().map_err(|_| StorageError::Poisoned)?;
        if let Some(mut old) = guard.insert(key.to_string(), value.to_string()) {
            old.zeroize();
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self.values.write().map_err(|_| StorageError::Poisoned)?;
        if let Some(mut old) = guard.remove(key) {
            old.zeroize();
        }
        Ok(())
    }
}

impl Drop for MemoryStorage {
    fn drop(&mut self) {
        if let Ok(values) = self.values.get_mut() {
            for value in values.values_mut() {
                value.zeroize();
            }
        }
    }
}
