//! Flat JSON file implementation of the key-value store
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use digitslots_game::KeyValueStore;

#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A JSON object of string values, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or is not a
    /// flat JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FileStoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(FileStoreError::Io { path, source }),
        };
        Ok(Self { path, values })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), FileStoreError> {
        let io_err = |source| FileStoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let payload = serde_json::to_string_pretty(&self.values)?;
        let staging = self.path.with_extension("tmp");
        fs::write(&staging, payload).map_err(io_err)?;
        fs::rename(&staging, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), Self::Error> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        if self.values.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "digitslots-store-{label}-{}.json",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn missing_file_is_empty_and_writes_create_it() {
        let path = temp_path("create");
        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.get("balance").unwrap().is_none());
        store.set("balance", "1000".to_string()).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("balance").unwrap().as_deref(), Some("1000"));
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"balance\": \"1000\""));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn remove_drops_the_key_on_disk() {
        let path = temp_path("remove");
        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("lastClaimDate", "2024-01-01T00:00:00+00:00".to_string()).unwrap();
        store.remove("lastClaimDate").unwrap();
        let reopened = JsonFileStore::open(&path).unwrap();
        assert!(reopened.get("lastClaimDate").unwrap().is_none());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let path = temp_path("corrupt");
        fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(
            JsonFileStore::open(&path),
            Err(FileStoreError::Serialization(_))
        ));
        let _ = fs::remove_file(path);
    }
}
