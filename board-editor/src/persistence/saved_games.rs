use super::json_store::KeyValueStore;
use super::traits::PersistenceBackend;
use super::PersistenceError;
use chess::Analysis;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Key under which the saved-positions list is stored.
pub const SAVED_GAMES_KEY: &str = "saved_games";

/// A named position saved by the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SavedPosition {
    /// Creation time in milliseconds, unique within the list.
    pub id: u64,
    pub name: String,
    pub fen: String,
    /// Unix timestamp in seconds.
    pub created_at: u64,
    /// Analysis shown when the position was saved, if any.
    #[serde(default)]
    pub analysis: Option<Analysis>,
}

/// Saved positions persisted as one JSON document in the data directory.
pub struct JsonSavedGames {
    inner: KeyValueStore,
}

impl JsonSavedGames {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            inner: KeyValueStore::new(data_dir),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.inner.file_path(SAVED_GAMES_KEY)
    }
}

impl PersistenceBackend for JsonSavedGames {
    fn read(&self) -> Result<Vec<SavedPosition>, PersistenceError> {
        Ok(self.inner.read(SAVED_GAMES_KEY)?.unwrap_or_default())
    }

    fn write(&self, positions: &[SavedPosition]) -> Result<(), PersistenceError> {
        self.inner.write(SAVED_GAMES_KEY, positions)?;
        tracing::debug!(
            count = positions.len(),
            path = %self.file_path().display(),
            "Wrote saved positions"
        );
        Ok(())
    }
}
