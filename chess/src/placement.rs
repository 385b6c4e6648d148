//! Grid representation of piece placement.
//!
//! Row 0 is rank 8 and row 7 is rank 1; column 0 is file a. A [`Placement`]
//! decoded from malformed FEN may be ragged, so every accessor tolerates rows
//! that are shorter or longer than eight cells.

use crate::types::Piece;
use std::str::FromStr;

/// One square's content.
///
/// `Symbol` holds whatever character the FEN carried, so a permissive decode of
/// malformed input never has to drop information. Use [`Cell::piece`] for the
/// typed view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Symbol(char),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The piece on this cell, if the symbol is a legal piece letter.
    pub fn piece(self) -> Option<Piece> {
        match self {
            Self::Empty => None,
            Self::Symbol(c) => Piece::from_symbol(c),
        }
    }
}

impl From<Piece> for Cell {
    fn from(piece: Piece) -> Self {
        Self::Symbol(piece.symbol())
    }
}

impl From<Option<Piece>> for Cell {
    fn from(piece: Option<Piece>) -> Self {
        piece.map_or(Self::Empty, Self::from)
    }
}

/// A board coordinate in grid terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    row: u8,
    col: u8,
}

impl Square {
    /// Build a square; `None` unless both coordinates are in `0..8`.
    pub const fn new(row: u8, col: u8) -> Option<Self> {
        if row < 8 && col < 8 {
            Some(Self { row, col })
        } else {
            None
        }
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Parse algebraic notation such as `e4`. `a8` is (0, 0), `h1` is (7, 7).
    pub fn from_algebraic(s: &str) -> Option<Self> {
        let mut chars = s.chars();
        let file = chars.next()?.to_ascii_lowercase();
        let rank = chars.next()?;
        if chars.next().is_some() || !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        let col = file as u8 - b'a';
        let row = b'8' - rank as u8;
        Self::new(row, col)
    }

    pub fn to_algebraic(self) -> String {
        format!("{}{}", (b'a' + self.col) as char, 8 - self.row)
    }

    /// Step by a signed offset, staying on the board.
    pub fn offset(self, d_row: i8, d_col: i8) -> Option<Self> {
        let row = u8::try_from(self.row as i8 + d_row).ok()?;
        let col = u8::try_from(self.col as i8 + d_col).ok()?;
        Self::new(row, col)
    }

    pub fn is_light(self) -> bool {
        (self.row + self.col) % 2 == 0
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_algebraic())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid square '{0}': expected algebraic (e.g. e4) or row,col (e.g. 4,4)")]
pub struct SquareParseError(pub String);

impl FromStr for Square {
    type Err = SquareParseError;

    /// Accepts `e4` or `row,col` with both in `0..8`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || SquareParseError(s.to_string());
        if let Some((row, col)) = s.split_once(',') {
            let row = row.trim().parse::<u8>().map_err(|_| err())?;
            let col = col.trim().parse::<u8>().map_err(|_| err())?;
            return Self::new(row, col).ok_or_else(err);
        }
        Self::from_algebraic(s).ok_or_else(err)
    }
}

/// Ordered grid of cells, rank 8 first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Placement {
    ranks: Vec<Vec<Cell>>,
}

impl Placement {
    /// An 8x8 board with no pieces.
    pub fn empty() -> Self {
        Self {
            ranks: vec![vec![Cell::Empty; 8]; 8],
        }
    }

    pub fn from_ranks(ranks: Vec<Vec<Cell>>) -> Self {
        Self { ranks }
    }

    pub fn ranks(&self) -> &[Vec<Cell>] {
        &self.ranks
    }

    /// Cell at `square`, or `None` when the grid is too short to contain it.
    pub fn get(&self, square: Square) -> Option<Cell> {
        self.ranks
            .get(square.row())
            .and_then(|rank| rank.get(square.col()))
            .copied()
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.get(square).and_then(Cell::piece)
    }

    /// Overwrite one cell. Returns `false` and leaves the grid untouched when
    /// the square lies outside a ragged grid.
    pub fn set(&mut self, square: Square, cell: Cell) -> bool {
        match self
            .ranks
            .get_mut(square.row())
            .and_then(|rank| rank.get_mut(square.col()))
        {
            Some(slot) => {
                *slot = cell;
                true
            }
            None => false,
        }
    }

    /// True for exactly eight ranks of exactly eight cells.
    pub fn is_regular(&self) -> bool {
        self.ranks.len() == 8 && self.ranks.iter().all(|rank| rank.len() == 8)
    }

    /// Occupied cells holding a recognised piece, in row-major order.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.ranks.iter().enumerate().flat_map(|(row, rank)| {
            rank.iter().enumerate().filter_map(move |(col, cell)| {
                let square = Square::new(u8::try_from(row).ok()?, u8::try_from(col).ok()?)?;
                cell.piece().map(|piece| (square, piece))
            })
        })
    }
}
