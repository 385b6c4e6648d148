//! Transient board-editing intent.
//!
//! An [`EditSession`] is a small value type. Every transition consumes the old
//! session and returns the new one together with the position it produced, if
//! any. Nothing here touches storage or analysis.

use chess::{decode, encode, Cell, Piece, Square, EMPTY_FEN, STARTING_FEN};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    /// Clicking highlights squares.
    #[default]
    Viewing,
    /// Clicking places or removes pieces.
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditSession {
    mode: EditMode,
    selected_piece: Option<Piece>,
    selected_square: Option<Square>,
}

/// Outcome of a session transition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Edit {
    pub session: EditSession,
    /// The new position, when the transition changed it.
    pub position: Option<String>,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    pub fn selected_piece(&self) -> Option<Piece> {
        self.selected_piece
    }

    pub fn selected_square(&self) -> Option<Square> {
        self.selected_square
    }

    /// Switch between viewing and editing. Pending selections carry over, so
    /// re-entering edit mode resumes a piece pick.
    pub fn toggle_edit_mode(self) -> Self {
        let mode = match self.mode {
            EditMode::Viewing => EditMode::Editing,
            EditMode::Editing => EditMode::Viewing,
        };
        tracing::debug!(?mode, "Edit mode toggled");
        Self { mode, ..self }
    }

    /// Choose the piece the next edit click places; `None` makes clicks erase.
    pub fn select_piece(self, piece: Option<Piece>) -> Self {
        Self {
            selected_piece: piece,
            ..self
        }
    }

    /// Handle a click on `square` while `position` is shown.
    ///
    /// Viewing: toggles the highlight on `square`. Editing: writes the selected
    /// piece there and consumes the pick, or clears the square when no piece is
    /// selected. A square outside a malformed grid leaves everything unchanged.
    pub fn click_square(self, position: &str, square: Square) -> Edit {
        match self.mode {
            EditMode::Viewing => {
                let selected_square = if self.selected_square == Some(square) {
                    None
                } else {
                    Some(square)
                };
                Edit {
                    session: Self {
                        selected_square,
                        ..self
                    },
                    position: None,
                }
            }
            EditMode::Editing => {
                let mut placement = decode(position);
                let cell = Cell::from(self.selected_piece);
                if !placement.set(square, cell) {
                    tracing::debug!(%square, "Square outside placement grid; edit ignored");
                    return Edit {
                        session: self,
                        position: None,
                    };
                }
                Edit {
                    session: Self {
                        selected_piece: None,
                        ..self
                    },
                    position: Some(encode(&placement)),
                }
            }
        }
    }

    /// Back to the standard position with no selections, viewing.
    pub fn reset(self) -> Edit {
        Edit {
            session: Self::default(),
            position: Some(STARTING_FEN.to_string()),
        }
    }

    /// Remove every piece. Mode and selections are kept.
    pub fn clear_board(self) -> Edit {
        Edit {
            session: self,
            position: Some(EMPTY_FEN.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{PieceColor, PieceKind};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    fn white_queen() -> Piece {
        Piece::new(PieceColor::White, PieceKind::Queen)
    }

    #[test]
    fn viewing_click_toggles_highlight_only() {
        let session = EditSession::new();
        let edit = session.click_square(STARTING_FEN, sq("e2"));
        assert_eq!(edit.position, None);
        assert_eq!(edit.session.selected_square(), Some(sq("e2")));

        let edit = edit.session.click_square(STARTING_FEN, sq("d2"));
        assert_eq!(edit.session.selected_square(), Some(sq("d2")));

        let edit = edit.session.click_square(STARTING_FEN, sq("d2"));
        assert_eq!(edit.session.selected_square(), None);
    }

    #[test]
    fn editing_click_places_selected_piece_once() {
        let session = EditSession::new()
            .toggle_edit_mode()
            .select_piece(Some(white_queen()));
        let edit = session.click_square(EMPTY_FEN, sq("d4"));
        assert_eq!(edit.position.as_deref(), Some("8/8/8/8/3Q4/8/8/8"));
        assert_eq!(edit.session.selected_piece(), None);

        // With the pick consumed the next click erases.
        let position = edit.position.unwrap();
        let edit = edit.session.click_square(&position, sq("d4"));
        assert_eq!(edit.position.as_deref(), Some(EMPTY_FEN));
    }

    #[test]
    fn editing_click_without_piece_clears_square() {
        let session = EditSession::new().toggle_edit_mode();
        let edit = session.click_square(STARTING_FEN, sq("e2"));
        assert_eq!(
            edit.position.as_deref(),
            Some("rnbqkbnr/pppppppp/8/8/8/8/PPPP1PPP/RNBQKBNR")
        );
    }

    #[test]
    fn editing_ignores_highlight() {
        let session = EditSession::new().toggle_edit_mode();
        let edit = session.click_square(STARTING_FEN, sq("a1"));
        assert_eq!(edit.session.selected_square(), None);
    }

    #[test]
    fn toggle_keeps_selections() {
        let viewing = EditSession::new().click_square(STARTING_FEN, sq("c3")).session;
        let session = viewing
            .toggle_edit_mode()
            .select_piece(Some(white_queen()))
            .toggle_edit_mode();
        assert_eq!(session.mode(), EditMode::Viewing);
        assert_eq!(session.selected_piece(), Some(white_queen()));
        assert_eq!(session.selected_square(), Some(sq("c3")));
        assert!(session.toggle_edit_mode().is_editing());
    }

    #[test]
    fn reset_returns_to_start_and_viewing() {
        let session = EditSession::new()
            .click_square(STARTING_FEN, sq("c3"))
            .session
            .toggle_edit_mode()
            .select_piece(Some(white_queen()));
        let edit = session.reset();
        assert_eq!(edit.position.as_deref(), Some(STARTING_FEN));
        assert_eq!(edit.session, EditSession::default());
    }

    #[test]
    fn clear_board_keeps_state() {
        let session = EditSession::new()
            .toggle_edit_mode()
            .select_piece(Some(white_queen()));
        let edit = session.clear_board();
        assert_eq!(edit.position.as_deref(), Some(EMPTY_FEN));
        assert_eq!(edit.session, session);
    }

    #[test]
    fn edit_outside_ragged_grid_is_ignored() {
        let session = EditSession::new()
            .toggle_edit_mode()
            .select_piece(Some(white_queen()));
        let edit = session.click_square("8/8", sq("a1"));
        assert_eq!(edit.position, None);
        assert_eq!(edit.session.selected_piece(), Some(white_queen()));
    }
}
