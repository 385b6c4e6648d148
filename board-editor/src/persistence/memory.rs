use super::traits::PersistenceBackend;
use super::{PersistenceError, SavedPosition};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// Process-local backend. Nothing survives the process; used for
/// `--no-persist` sessions and tests.
#[derive(Default)]
pub struct InMemoryBackend {
    positions: Mutex<Vec<SavedPosition>>,
    writes: AtomicUsize,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing list, as if it had been written earlier.
    pub fn with_positions(positions: Vec<SavedPosition>) -> Self {
        Self {
            positions: Mutex::new(positions),
            writes: AtomicUsize::new(0),
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> Vec<SavedPosition> {
        self.positions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of completed writes.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl PersistenceBackend for InMemoryBackend {
    fn read(&self) -> Result<Vec<SavedPosition>, PersistenceError> {
        Ok(self.snapshot())
    }

    fn write(&self, positions: &[SavedPosition]) -> Result<(), PersistenceError> {
        let mut guard = self.positions.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = positions.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let backend = InMemoryBackend::new();
        assert!(backend.read().unwrap().is_empty());
        assert_eq!(backend.write_count(), 0);
    }

    #[test]
    fn test_write_replaces_contents() {
        let backend = InMemoryBackend::new();
        let entry = SavedPosition {
            id: 1,
            name: "a".to_string(),
            fen: "8/8/8/8/8/8/8/8".to_string(),
            created_at: 0,
            analysis: None,
        };
        backend.write(std::slice::from_ref(&entry)).unwrap();
        backend.write(&[]).unwrap();
        assert!(backend.read().unwrap().is_empty());
        assert_eq!(backend.write_count(), 2);
    }
}
