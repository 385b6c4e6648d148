pub mod analysis;
pub mod board_display;
pub mod fen;
pub mod placement;
pub mod types;
pub mod validate;

pub use analysis::{Analysis, CandidateLine};
pub use board_display::render_ascii;
pub use fen::{decode, encode, EMPTY_FEN, STARTING_FEN};
pub use placement::{Cell, Placement, Square, SquareParseError};
pub use types::{Piece, PieceColor, PieceKind};
pub use validate::{validate_fen, validate_game_name, FenError, NameError, MAX_NAME_LEN};
