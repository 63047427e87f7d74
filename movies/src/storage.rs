//! File-backed [`KeyValueStore`]: a JSON object on disk standing in for
//! browser local storage.

use movie_tracker_core::environment::{KeyValueStore, StorageError};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Key-value storage kept in one JSON object file
///
/// A missing file reads as empty. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileKeyValueStore {
    path: PathBuf,
    // serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Storage backed by `path` (created on first write)
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// The backing file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StorageError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(StorageError::Io(format!("{}: {e}", self.path.display()))),
        };

        if text.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str(&text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(StorageError::Corrupt(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(StorageError::Corrupt(format!("{}: {e}", self.path.display()))),
        }
    }

    fn write_all(&self, map: &Map<String, Value>) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(map)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, text)
            .map_err(|e| StorageError::Io(format!("{}: {e}", self.path.display())))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.get(key).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_all()?;
        map.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut map = self.read_all()?;
        if map.remove(key).is_some() {
            self.write_all(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "movie-tracker-{name}-{}.json",
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let storage = FileKeyValueStore::new(temp_path("missing"));
        assert!(matches!(storage.get("Last User"), Ok(None)));
    }

    #[test]
    fn test_values_survive_a_new_instance() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let first = FileKeyValueStore::new(&path);
        assert!(first.set("Last User", r#"{"id":1}"#).is_ok());
        assert!(first.set("other", "x").is_ok());

        let second = FileKeyValueStore::new(&path);
        assert!(matches!(second.get("Last User"), Ok(Some(v)) if v == r#"{"id":1}"#));

        assert!(second.remove("other").is_ok());
        assert!(matches!(first.get("other"), Ok(None)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_non_object_file_is_corrupt() {
        let path = temp_path("corrupt");
        assert!(std::fs::write(&path, "[1, 2]").is_ok());

        let storage = FileKeyValueStore::new(&path);
        assert!(matches!(storage.get("Last User"), Err(StorageError::Corrupt(_))));

        let _ = std::fs::remove_file(&path);
    }
}
