//! Unavailable Store - Storage that cannot be reached
//!
//! Used when the state file cannot be opened. Every call fails, so the
//! orchestrator keeps the session in memory and reports itself degraded.

use cogni_domain::repository::session_store::{SessionStore, StoreError};

#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn error(&self) -> StoreError {
        StoreError::Unavailable {
            message: self.reason.clone(),
        }
    }
}

impl SessionStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(self.error())
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(self.error())
    }

    fn remove(&mut self, _key: &str) -> Result<(), StoreError> {
        Err(self.error())
    }
}
