//! Structural validation of user-supplied input.
//!
//! These checks gate every path where a value becomes authoritative state
//! (FEN import, saving a position). They are purely structural: a placement
//! with no kings or with pawns on the back rank still passes.

/// Longest accepted game name, in characters, after trimming.
pub const MAX_NAME_LEN: usize = 100;

const PIECE_SYMBOLS: &str = "rnbqkpRNBQKP";

/// Why a placement field was rejected. Ranks are numbered from 1 in the order
/// they appear in the string, so rank 1 here is the first `/`-separated field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FenError {
    #[error("FEN must be a non-empty string")]
    Empty,
    #[error("FEN must have 8 ranks separated by / (found {found})")]
    RankCount { found: usize },
    #[error("Invalid empty square count '{symbol}' in rank {rank}")]
    InvalidEmptyCount { rank: usize, symbol: char },
    #[error("Invalid piece character '{symbol}' in rank {rank}")]
    InvalidPiece { rank: usize, symbol: char },
    #[error("Rank {rank} has {squares} squares instead of 8")]
    RankWidth { rank: usize, squares: usize },
}

impl FenError {
    /// The offending rank, when the failure is local to one.
    pub fn rank(&self) -> Option<usize> {
        match self {
            Self::Empty | Self::RankCount { .. } => None,
            Self::InvalidEmptyCount { rank, .. }
            | Self::InvalidPiece { rank, .. }
            | Self::RankWidth { rank, .. } => Some(*rank),
        }
    }
}

/// Why a game name was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Game name cannot be empty")]
    Empty,
    #[error("Game name must be at most 100 characters (got {len})")]
    TooLong { len: usize },
}

/// Check that `fen` is a well-formed placement field.
///
/// The input is trimmed first. Exactly eight ranks are required; each rank may
/// contain digits 1-8 and the letters `rnbqkpRNBQKP`, and must describe exactly
/// eight squares.
pub fn validate_fen(fen: &str) -> Result<(), FenError> {
    let fen = fen.trim();
    if fen.is_empty() {
        return Err(FenError::Empty);
    }

    let ranks: Vec<&str> = fen.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenError::RankCount { found: ranks.len() });
    }

    for (idx, rank_str) in ranks.iter().enumerate() {
        let rank = idx + 1;
        let mut squares = 0usize;
        for symbol in rank_str.chars() {
            if let Some(run) = symbol.to_digit(10) {
                if !(1..=8).contains(&run) {
                    return Err(FenError::InvalidEmptyCount { rank, symbol });
                }
                squares += run as usize;
            } else {
                if !PIECE_SYMBOLS.contains(symbol) {
                    return Err(FenError::InvalidPiece { rank, symbol });
                }
                squares += 1;
            }
        }
        if squares != 8 {
            return Err(FenError::RankWidth { rank, squares });
        }
    }

    Ok(())
}

/// Trim and check a display name, returning the trimmed value.
pub fn validate_game_name(name: &str) -> Result<String, NameError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(NameError::Empty);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(NameError::TooLong { len });
    }
    Ok(trimmed.to_string())
}
