//! Key-value store backed by a JSON object on disk

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::persistence::{KeyValueStore, StoreError};

/// Reads are served from memory; every write rewrites the whole file
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open `path`, treating a missing file as empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::debug!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("maze-runner-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let store = FileStore::open(temp_path("missing.json")).unwrap();
        assert_eq!(store.get("maze_runner_best_stage").unwrap(), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_path("reopen.json");
        let _ = fs::remove_file(&path);

        let mut store = FileStore::open(&path).unwrap();
        store.set("maze_runner_best_score", "1234").unwrap();
        store.set("maze_runner_best_stage", "3").unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get("maze_runner_best_score").unwrap().as_deref(), Some("1234"));
        assert_eq!(reopened.get("maze_runner_best_stage").unwrap().as_deref(), Some("3"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(FileStore::open(&path), Err(StoreError::Serde(_))));
        let _ = fs::remove_file(&path);
    }
}
