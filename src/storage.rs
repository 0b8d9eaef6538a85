//! Persistent credential storage for the signed-in session.
//!
//! Production uses the OS credential store through the `keyring` crate
//! (DPAPI on Windows, Keychain on macOS, Secret Service on Linux). Tests and
//! headless tools can use [`MemoryStore`].

use std::collections::HashMap;
use std::sync::Mutex;

use keyring::Entry;
use tracing::{info, warn};

use crate::error::{BackofficeError, Result};

const SERVICE_NAME: &str = "pos-backoffice";

// Credential keys
pub const KEY_TOKEN: &str = "token";
pub const KEY_USER: &str = "user";
pub const KEY_ROLE: &str = "role";

/// All credential keys managed by the session.
pub const ALL_KEYS: &[&str] = &[KEY_TOKEN, KEY_USER, KEY_ROLE];

pub trait CredentialStore: Send + Sync {
    /// Returns `None` when the entry does not exist.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Silently succeeds if the entry does not exist.
    fn delete(&self, key: &str) -> Result<()>;

    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Delete every session credential.
    fn clear(&self) -> Result<()> {
        for key in ALL_KEYS {
            self.delete(key)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// OS keyring
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringStore;

impl CredentialStore for KeyringStore {
    fn get(&self, key: &str) -> Option<String> {
        let entry = match Entry::new(SERVICE_NAME, key) {
            Ok(e) => e,
            Err(e) => {
                warn!(key, error = %e, "keyring: failed to create entry");
                return None;
            }
        };
        match entry.get_password() {
            Ok(pw) => Some(pw),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(key, error = %e, "keyring: failed to read credential");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(BackofficeError::from(e)),
        }
    }

    fn clear(&self) -> Result<()> {
        info!("clearing stored session credentials");
        for key in ALL_KEYS {
            self.delete(key)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| BackofficeError::Storage(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| BackofficeError::Storage(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip_and_clear() {
        let store = MemoryStore::new();
        assert!(!store.has(KEY_TOKEN));

        store.set(KEY_TOKEN, "abc").unwrap();
        store.set(KEY_ROLE, "ADMIN").unwrap();
        assert_eq!(store.get(KEY_TOKEN).as_deref(), Some("abc"));

        store.clear().unwrap();
        assert!(!store.has(KEY_TOKEN));
        assert!(!store.has(KEY_ROLE));
    }

    #[test]
    fn memory_store_delete_missing_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete("never-set").is_ok());
    }
}
