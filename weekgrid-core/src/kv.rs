//! Key-value storage medium.
//!
//! The event store only needs an opaque string-to-string mapping that
//! survives reloads. `MemoryStore` backs tests and throwaway sessions;
//! `FileStore` keeps one JSON file per key in a directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{WeekGridError, WeekGridResult};

const VALUE_EXTENSION: &str = "json";

/// Opaque string key -> string value mapping.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> WeekGridResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> WeekGridResult<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&mut self, key: &str) -> WeekGridResult<()>;

    fn keys(&self) -> WeekGridResult<Vec<String>>;
}

/// In-memory medium. Nothing outlives the value itself.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> WeekGridResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> WeekGridResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&mut self, key: &str) -> WeekGridResult<()> {
        self.entries.remove(key);
        Ok(())
    }

    fn keys(&self) -> WeekGridResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }
}

/// Directory-backed medium: `<dir>/<key>.json`.
///
/// `:` and `%` in keys are percent-escaped in file names so that keys such as
/// `event-2025-03-17-09:00` are valid on every platform.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> WeekGridResult<PathBuf> {
        validate_key(key)?;
        Ok(self
            .dir
            .join(format!("{}.{}", encode_key(key), VALUE_EXTENSION)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> WeekGridResult<Option<String>> {
        let path = self.path_for(key)?;

        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WeekGridError::Storage(format!(
                "Could not read {}: {e}",
                path.display()
            ))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> WeekGridResult<()> {
        let path = self.path_for(key)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            WeekGridError::Storage(format!("Could not create {}: {e}", self.dir.display()))
        })?;

        // Write to a sibling temp file first so a crash never leaves half a value
        let temp = path.with_extension(format!("{VALUE_EXTENSION}.tmp"));
        std::fs::write(&temp, value)
            .and_then(|_| std::fs::rename(&temp, &path))
            .map_err(|e| {
                WeekGridError::Storage(format!("Could not write {}: {e}", path.display()))
            })?;

        Ok(())
    }

    fn delete(&mut self, key: &str) -> WeekGridResult<()> {
        let path = self.path_for(key)?;

        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WeekGridError::Storage(format!(
                "Could not delete {}: {e}",
                path.display()
            ))),
        }
    }

    fn keys(&self) -> WeekGridResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|e| {
            WeekGridError::Storage(format!("Could not list {}: {e}", self.dir.display()))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry?.path();

            if path.is_file()
                && path.extension().is_some_and(|e| e == VALUE_EXTENSION)
                && let Some(stem) = path.file_stem().and_then(|s| s.to_str())
            {
                keys.push(decode_key(stem));
            }
        }

        keys.sort();
        Ok(keys)
    }
}

fn validate_key(key: &str) -> WeekGridResult<()> {
    if key.is_empty()
        || key.starts_with('.')
        || key.contains(['/', '\\'])
        || key.chars().any(char::is_control)
    {
        return Err(WeekGridError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn encode_key(key: &str) -> String {
    key.replace('%', "%25").replace(':', "%3A")
}

fn decode_key(stem: &str) -> String {
    stem.replace("%3A", ":").replace("%25", "%")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_basics() {
        let mut store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("a", "3").unwrap();

        assert_eq!(store.get("a").unwrap().as_deref(), Some("3"));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);

        store.delete("a").unwrap();
        store.delete("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("events"));

        assert!(store.keys().unwrap().is_empty());

        store.set("event-2025-03-17-09:00", "{}").unwrap();
        assert_eq!(
            store.get("event-2025-03-17-09:00").unwrap().as_deref(),
            Some("{}")
        );
        assert_eq!(store.keys().unwrap(), vec!["event-2025-03-17-09:00"]);
        assert!(
            dir.path()
                .join("events/event-2025-03-17-09%3A00.json")
                .exists()
        );
    }

    #[test]
    fn test_file_store_delete_missing_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path());

        store.delete("event-2025-03-17-09:00").unwrap();
        assert_eq!(store.get("event-2025-03-17-09:00").unwrap(), None);
    }

    #[test]
    fn test_file_store_ignores_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        std::fs::write(dir.path().join("prefs.json"), "{}").unwrap();

        let store = FileStore::new(dir.path());
        assert_eq!(store.keys().unwrap(), vec!["prefs"]);
    }

    #[test]
    fn test_file_store_rejects_path_like_keys() {
        let mut store = FileStore::new("/nonexistent");
        assert!(matches!(
            store.set("../escape", "x"),
            Err(WeekGridError::InvalidKey(_))
        ));
        assert!(matches!(store.get(".hidden"), Err(WeekGridError::InvalidKey(_))));
    }

    #[test]
    fn test_key_encoding_round_trip() {
        for key in ["plain", "event-2025-03-17-09:00", "100%:done"] {
            assert_eq!(decode_key(&encode_key(key)), key);
        }
    }
}
