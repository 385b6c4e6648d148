use super::PersistenceError;
use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

/// JSON-document-per-key store rooted at a directory.
///
/// Each key maps to `<dir>/<key>.json`. Writes go to a temporary sibling file
/// first and are renamed into place, so a failed write never leaves a
/// half-written document behind.
pub struct KeyValueStore {
    dir: PathBuf,
}

impl KeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn ensure_dir(&self) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    pub fn file_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    /// Read the value stored under `key`. Returns None if nothing was stored.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, PersistenceError> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path)?;
        let value = serde_json::from_str(&contents)?;
        Ok(Some(value))
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), PersistenceError> {
        self.ensure_dir()?;
        let path = self.file_path(key);
        let tmp = self.dir.join(format!(".{}.json.tmp", key));
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&tmp, json)?;
        if let Err(e) = std::fs::rename(&tmp, &path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}
