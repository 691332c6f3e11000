//! File Session Store - All keys in one JSON object on disk
//!
//! The file is read once when the store is opened and kept in a cache.
//! Every change rewrites the whole object through a temporary file and an
//! atomic rename, so a crash leaves either the old or the new snapshot.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use cogni_domain::repository::session_store::{SessionStore, StoreError};
use shared::error::CogniError;
use tracing::{debug, warn};

/// JSON-file backed store
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    cache: BTreeMap<String, String>,
}

impl FileSessionStore {
    /// Open the store at `path`
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is ignored (logged) and replaced on the next write. Any other
    /// I/O failure is returned.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CogniError> {
        let path = path.into();
        let cache = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => match serde_json::from_str::<BTreeMap<String, String>>(&content) {
                Ok(cache) => cache,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "State file is corrupt, starting empty");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), keys = cache.len(), "Opened state file");
        Ok(Self { path, cache })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Write the cache out atomically
    fn flush(&self) -> Result<(), CogniError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.cache)?;
        let temp = self.temp_path();
        {
            let mut file = File::create(&temp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn flush_for(&self, key: &str) -> Result<(), StoreError> {
        self.flush().map_err(|e| StoreError::WriteError {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.cache.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.cache.insert(key.to_string(), value.to_string());
        self.flush_for(key)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.cache.remove(key).is_none() {
            return Ok(());
        }
        self.flush_for(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let mut store = FileSessionStore::open(&path).unwrap();
        store.set("cognitive_current_game", "hanoi").unwrap();
        store.set("cognitive_total_score", "5").unwrap();
        store.remove("cognitive_total_score").unwrap();

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("cognitive_current_game").unwrap().as_deref(),
            Some("hanoi")
        );
        assert_eq!(reopened.get("cognitive_total_score").unwrap(), None);
        assert!(!dir.path().join("session.json.tmp").exists());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("nested/none.json")).unwrap();
        assert_eq!(store.get("anything").unwrap(), None);
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/session.json");
        let mut store = FileSessionStore::open(&path).unwrap();
        store.set("k", "v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{\"cognitive_total_score\": 12").unwrap();

        let mut store = FileSessionStore::open(&path).unwrap();
        assert_eq!(store.get("cognitive_total_score").unwrap(), None);

        store.set("cognitive_total_score", "0").unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed["cognitive_total_score"], "0");
    }

    #[test]
    fn test_write_failure_reported() {
        let dir = TempDir::new().unwrap();
        let mut store = FileSessionStore::open(dir.path().join("sub/session.json")).unwrap();

        // The parent directory is now a regular file, so nothing can be written below it
        fs::write(dir.path().join("sub"), "").unwrap();
        let err = store.set("k", "v").unwrap_err();
        assert!(matches!(err, StoreError::WriteError { .. }));
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
