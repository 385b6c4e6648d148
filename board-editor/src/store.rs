//! Current position plus the persisted list of named positions.

use crate::persistence::{
    generate_position_id, now_timestamp, PersistenceBackend, PersistenceError, SavedPosition,
};
use chess::{validate_game_name, Analysis, NameError, STARTING_FEN};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error("Failed to persist saved positions: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Owns the current position and the saved-positions list.
///
/// The saved list is only replaced after the backend accepted the write, so the
/// in-memory list and the backend never disagree.
pub struct PositionStore<B> {
    backend: B,
    current: String,
    saved: Vec<SavedPosition>,
}

impl<B: PersistenceBackend> PositionStore<B> {
    /// Load the saved list from `backend`; the current position starts at the
    /// standard opening setup.
    pub fn open(backend: B) -> Result<Self, PersistenceError> {
        let saved = backend.read()?;
        tracing::debug!(count = saved.len(), "Loaded saved positions");
        Ok(Self {
            backend,
            current: STARTING_FEN.to_string(),
            saved,
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    /// Replace the current position. Callers validate first; nothing is
    /// checked here.
    pub fn set_current(&mut self, fen: impl Into<String>) {
        self.current = fen.into();
    }

    /// Saved positions in insertion order.
    pub fn saved(&self) -> &[SavedPosition] {
        &self.saved
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Append a new named position and persist the full list.
    pub fn save(
        &mut self,
        name: &str,
        fen: &str,
        analysis: Option<Analysis>,
    ) -> Result<SavedPosition, StoreError> {
        let name = validate_game_name(name)?;

        let mut id = generate_position_id();
        while self.saved.iter().any(|p| p.id == id) {
            id += 1;
        }

        let entry = SavedPosition {
            id,
            name,
            fen: fen.to_string(),
            created_at: now_timestamp(),
            analysis,
        };

        let mut updated = self.saved.clone();
        updated.push(entry.clone());
        self.backend.write(&updated)?;
        self.saved = updated;

        tracing::info!(id = entry.id, name = %entry.name, "Saved position");
        Ok(entry)
    }

    /// Look up a saved position without removing it.
    pub fn load(&self, id: u64) -> Option<&SavedPosition> {
        self.saved.iter().find(|p| p.id == id)
    }

    /// Remove a saved position. Unknown ids are a no-op and do not touch the
    /// backend. Returns whether an entry was removed.
    pub fn delete(&mut self, id: u64) -> Result<bool, PersistenceError> {
        if self.load(id).is_none() {
            tracing::debug!(id, "Delete of unknown position ignored");
            return Ok(false);
        }

        let updated: Vec<SavedPosition> =
            self.saved.iter().filter(|p| p.id != id).cloned().collect();
        self.backend.write(&updated)?;
        self.saved = updated;

        tracing::info!(id, "Deleted position");
        Ok(true)
    }
}
