//! Durable key-value storage for session data.
//!
//! The session manager talks to storage through the [`TokenStore`] trait so
//! tests can swap the file-backed store for an in-memory one.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::config::APP_NAME;

/// File name of the session record inside the data directory
const SESSION_FILE: &str = "session.json";

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read session storage")]
    Read(#[source] io::Error),

    #[error("Failed to write session storage")]
    Write(#[source] io::Error),

    #[error("Session storage is corrupt")]
    Corrupt(#[from] serde_json::Error),

    #[error("Could not determine the data directory")]
    NoDataDir,
}

/// Durable string key-value storage.
///
/// Writes must be visible to later reads from the same store, including a
/// fresh store opened over the same backing location.
pub trait TokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

/// [`TokenStore`] backed by a JSON file in the user's data directory.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store at the platform's standard data location
    pub fn standard() -> Result<Self, StoreError> {
        let dir = dirs::data_dir().ok_or(StoreError::NoDataDir)?;
        Ok(Self::at(dir.join(APP_NAME).join(SESSION_FILE)))
    }

    /// Store at an explicit path
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    fn read_map(&self) -> Result<HashMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(StoreError::Read)?;
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_map(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(StoreError::Write)?;
        }

        let contents = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, contents).map_err(StoreError::Write)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)?;

        debug!(key, path = %self.path.display(), "Session record written");
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        let mut map = self.read_map()?;
        if map.remove(key).is_none() {
            return Ok(());
        }

        if map.is_empty() {
            match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(StoreError::Write(e)),
            }
        } else {
            self.write_map(&map)?;
        }

        debug!(key, path = %self.path.display(), "Session record removed");
        Ok(())
    }
}

/// In-memory [`TokenStore`] for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    map: HashMap<String, String>,
}

#[cfg(test)]
impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.map.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.map.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        self.map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> FileTokenStore {
        FileTokenStore::at(dir.path().join(SESSION_FILE))
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        assert_eq!(store.get("jwtToken").unwrap(), None);

        store.set("jwtToken", "abc123").unwrap();
        assert_eq!(store.get("jwtToken").unwrap().as_deref(), Some("abc123"));

        store.delete("jwtToken").unwrap();
        assert_eq!(store.get("jwtToken").unwrap(), None);
    }

    #[test]
    fn test_delete_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.delete("jwtToken").unwrap();
        store.delete("jwtToken").unwrap();
    }

    #[test]
    fn test_values_survive_reopening() {
        let dir = TempDir::new().unwrap();

        let mut store = store_in(&dir);
        store.set("jwtToken", "abc123").unwrap();
        drop(store);

        let store = store_in(&dir);
        assert_eq!(store.get("jwtToken").unwrap().as_deref(), Some("abc123"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SESSION_FILE);
        std::fs::write(&path, "{not json").unwrap();

        let store = FileTokenStore::at(path);
        assert!(matches!(store.get("jwtToken"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_missing_parent_dirs_are_created() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deeply").join("nested").join(SESSION_FILE);

        let mut store = FileTokenStore::at(path);
        store.set("jwtToken", "abc123").unwrap();
        assert_eq!(store.get("jwtToken").unwrap().as_deref(), Some("abc123"));
    }
}
