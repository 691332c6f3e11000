//! Session Store - Abstract key-value persistence for session state
//!
//! This trait defines what operations the domain needs.
//! How they're implemented (file, memory, browser storage) is not our concern here.
//! Values are plain strings; encoding them is the use case layer's job.

/// Errors that can occur during store operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backing storage cannot be reached at all
    Unavailable { message: String },
    /// Failed to read
    ReadError { key: String, message: String },
    /// Failed to persist
    WriteError { key: String, message: String },
}

impl core::fmt::Display for StoreError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StoreError::Unavailable { message } => {
                write!(f, "Storage unavailable: {}", message)
            }
            StoreError::ReadError { key, message } => {
                write!(f, "Failed to read '{}': {}", key, message)
            }
            StoreError::WriteError { key, message } => {
                write!(f, "Failed to write '{}': {}", key, message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

/// Session Store Trait
///
/// This is a PORT in hexagonal architecture.
/// The domain defines what it needs; adapters provide implementations.
///
/// Note: No async here - the session runs on a single logical thread.
pub trait SessionStore {
    /// Read a value; `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write a value (create or replace)
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Check if a key exists
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}

impl<S: SessionStore + ?Sized> SessionStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key)
    }
}
