mod json_store;
mod memory;
mod saved_games;
mod traits;

pub use json_store::KeyValueStore;
pub use memory::InMemoryBackend;
pub use saved_games::{JsonSavedGames, SavedPosition, SAVED_GAMES_KEY};
pub use traits::PersistenceBackend;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Errors from the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Storage backend error: {0}")]
    Backend(String),
}

static LAST_POSITION_ID: AtomicU64 = AtomicU64::new(0);

/// Generate a position ID from the current time in milliseconds.
///
/// IDs are strictly increasing within the process even when two are requested
/// in the same millisecond or the wall clock steps backwards.
pub fn generate_position_id() -> u64 {
    let now = now_millis();
    match LAST_POSITION_ID.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
        Some(now.max(last + 1))
    }) {
        Ok(prev) | Err(prev) => now.max(prev + 1),
    }
}

/// Get the current unix timestamp in seconds.
pub fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

fn now_millis() -> u64 {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    u64::try_from(millis).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_ids_strictly_increase() {
        let ids: Vec<u64> = (0..1000).map(|_| generate_position_id()).collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn position_ids_track_wall_clock() {
        let id = generate_position_id();
        assert!(id >= now_timestamp() * 1000);
    }
}
