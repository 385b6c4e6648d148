//! Storage capability consumed by the position store.
//!
//! The store never buffers writes: every successful save or delete hands the
//! full list to [`PersistenceBackend::write`], so a backend always holds exactly
//! what the store shows.

use super::{PersistenceError, SavedPosition};
use std::sync::Arc;

/// Key-value style storage for the saved-positions list.
pub trait PersistenceBackend: Send + Sync {
    /// Read the stored list. A backend that has never been written returns an
    /// empty list rather than an error.
    fn read(&self) -> Result<Vec<SavedPosition>, PersistenceError>;

    /// Replace the stored list.
    fn write(&self, positions: &[SavedPosition]) -> Result<(), PersistenceError>;
}

impl<B: PersistenceBackend + ?Sized> PersistenceBackend for Arc<B> {
    fn read(&self) -> Result<Vec<SavedPosition>, PersistenceError> {
        (**self).read()
    }

    fn write(&self, positions: &[SavedPosition]) -> Result<(), PersistenceError> {
        (**self).write(positions)
    }
}

impl<B: PersistenceBackend + ?Sized> PersistenceBackend for Box<B> {
    fn read(&self) -> Result<Vec<SavedPosition>, PersistenceError> {
        (**self).read()
    }

    fn write(&self, positions: &[SavedPosition]) -> Result<(), PersistenceError> {
        (**self).write(positions)
    }
}
