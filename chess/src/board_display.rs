//! Plain-text board diagrams.
//!
//! Rendering never validates: a ragged placement shows missing squares as
//! empty and extra cells are not drawn.

use crate::placement::{Cell, Placement, Square};

/// Render `placement` as an 8x8 diagram with rank and file labels.
///
/// Empty squares are `.`; a highlighted square is wrapped in brackets.
pub fn render_ascii(placement: &Placement, highlight: Option<Square>) -> String {
    let mut out = String::new();
    for row in 0..8u8 {
        out.push_str(&format!("{} ", 8 - row));
        for col in 0..8u8 {
            let Some(square) = Square::new(row, col) else {
                continue;
            };
            let symbol = match placement.get(square) {
                Some(Cell::Symbol(c)) => c,
                Some(Cell::Empty) | None => '.',
            };
            if highlight == Some(square) {
                out.push_str(&format!("[{symbol}]"));
            } else {
                out.push_str(&format!(" {symbol} "));
            }
        }
        out.push('\n');
    }
    out.push_str("  ");
    for file in 'a'..='h' {
        out.push_str(&format!(" {file} "));
    }
    out
}
