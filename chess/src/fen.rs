//! FEN placement-field codec.
//!
//! Only the board field of FEN is handled here; side to move, castling rights
//! and clocks are not part of this project's positions.
//!
//! [`decode`] is deliberately permissive and never fails. Anything that must be
//! correct (imports, saves) runs [`crate::validate::validate_fen`] first.

use crate::placement::{Cell, Placement};

/// Placement field of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Placement field of a board with no pieces.
pub const EMPTY_FEN: &str = "8/8/8/8/8/8/8/8";

/// Decode a placement field into a grid.
///
/// Splits on `/` without checking the rank count. A decimal digit expands to
/// that many empty cells; any other character becomes a cell holding that
/// literal symbol. Malformed input yields a ragged or short grid.
pub fn decode(fen: &str) -> Placement {
    let ranks = fen
        .split('/')
        .map(|rank| {
            let mut cells = Vec::with_capacity(8);
            for c in rank.chars() {
                match c.to_digit(10) {
                    Some(run) => cells.extend(std::iter::repeat(Cell::Empty).take(run as usize)),
                    None => cells.push(Cell::Symbol(c)),
                }
            }
            cells
        })
        .collect();
    Placement::from_ranks(ranks)
}

/// Encode a grid as a placement field.
///
/// Runs of empty cells collapse into their decimal count. Counts above nine are
/// written out in full rather than split.
pub fn encode(placement: &Placement) -> String {
    placement
        .ranks()
        .iter()
        .map(|rank| encode_rank(rank))
        .collect::<Vec<_>>()
        .join("/")
}

fn encode_rank(rank: &[Cell]) -> String {
    let mut out = String::with_capacity(8);
    let mut empty_run = 0usize;
    for cell in rank {
        match cell {
            Cell::Empty => empty_run += 1,
            Cell::Symbol(c) => {
                if empty_run > 0 {
                    out.push_str(&empty_run.to_string());
                    empty_run = 0;
                }
                out.push(*c);
            }
        }
    }
    if empty_run > 0 {
        out.push_str(&empty_run.to_string());
    }
    out
}
