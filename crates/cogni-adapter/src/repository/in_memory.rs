//! In-Memory Session Store
//!
//! Simple in-memory implementation of the `SessionStore` port.
//! Useful for testing and for sessions that should not outlive the process.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use cogni_domain::repository::session_store::{SessionStore, StoreError};

/// In-memory Session Store
///
/// Thread-safe implementation using RwLock. Clones share the same map, so a
/// test can keep one handle and inspect what the orchestrator wrote.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            values: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of keys currently held
    pub fn len(&self) -> usize {
        self.values.read().map(|v| v.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every key, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .values
            .read()
            .map(|v| v.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self.values.read().map_err(|_| StoreError::ReadError {
            key: key.to_string(),
            message: "Failed to acquire read lock".to_string(),
        })?;
        Ok(values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::WriteError {
            key: key.to_string(),
            message: "Failed to acquire write lock".to_string(),
        })?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().map_err(|_| StoreError::WriteError {
            key: key.to_string(),
            message: "Failed to acquire write lock".to_string(),
        })?;
        values.remove(key);
        Ok(())
    }
}
