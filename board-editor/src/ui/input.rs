//! Key handling for the terminal UI.
//!
//! Keys are translated into [`Action`]s by a pure function so the bindings can
//! be tested without a terminal.

use chess::Piece;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Text prompts the UI can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    ImportFen,
    SaveName,
    ImagePath,
}

impl PromptKind {
    pub fn title(self) -> &'static str {
        match self {
            Self::ImportFen => " Import FEN ",
            Self::SaveName => " Save position as ",
            Self::ImagePath => " Image file ",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::ImportFen => "Type or paste a FEN placement field...",
            Self::SaveName => "Game name (1-100 characters)",
            Self::ImagePath => "Path to a JPEG, PNG or GIF",
        }
    }
}

/// An open text prompt and what has been typed so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub buffer: String,
}

impl Prompt {
    pub fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            buffer: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveCursor { d_row: i8, d_col: i8 },
    Click,
    ToggleEdit,
    SelectPiece(Option<Piece>),
    Reset,
    ClearBoard,
    Analyze,
    OpenPrompt(PromptKind),
    PromptChar(char),
    PromptBackspace,
    PromptSubmit,
    PromptCancel,
    SavedPrev,
    SavedNext,
    LoadSelected,
    DeleteSelected,
    ConfirmDelete,
    CancelDelete,
    ToggleLogin,
}

/// Map a key press to an action given what the UI is currently doing.
pub fn map_key(key: KeyEvent, editing: bool, prompt_open: bool) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    if prompt_open {
        return match key.code {
            KeyCode::Esc => Some(Action::PromptCancel),
            KeyCode::Enter => Some(Action::PromptSubmit),
            KeyCode::Backspace => Some(Action::PromptBackspace),
            KeyCode::Char(c) => Some(Action::PromptChar(c)),
            _ => None,
        };
    }

    if let Some(action) = cursor_action(key.code) {
        return Some(action);
    }

    match key.code {
        KeyCode::Enter | KeyCode::Char(' ') => return Some(Action::Click),
        KeyCode::Tab => return Some(Action::ToggleEdit),
        _ => {}
    }

    if editing {
        return match key.code {
            KeyCode::Esc => Some(Action::ToggleEdit),
            KeyCode::Char('x') | KeyCode::Delete => Some(Action::SelectPiece(None)),
            KeyCode::Char(c) => Piece::from_symbol(c).map(|p| Action::SelectPiece(Some(p))),
            _ => None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Some(Action::Quit),
        KeyCode::Char('e') => Some(Action::ToggleEdit),
        KeyCode::Char('a') => Some(Action::Analyze),
        KeyCode::Char('r') => Some(Action::Reset),
        KeyCode::Char('c') => Some(Action::ClearBoard),
        KeyCode::Char('f') => Some(Action::OpenPrompt(PromptKind::ImportFen)),
        KeyCode::Char('s') => Some(Action::OpenPrompt(PromptKind::SaveName)),
        KeyCode::Char('i') => Some(Action::OpenPrompt(PromptKind::ImagePath)),
        KeyCode::Char('[') | KeyCode::PageUp => Some(Action::SavedPrev),
        KeyCode::Char(']') | KeyCode::PageDown => Some(Action::SavedNext),
        KeyCode::Char('o') => Some(Action::LoadSelected),
        KeyCode::Char('d') => Some(Action::DeleteSelected),
        KeyCode::Char('l') => Some(Action::ToggleLogin),
        _ => None,
    }
}

/// Answer to a pending delete: `y` confirms, any other key cancels.
pub fn map_confirm_key(key: KeyEvent) -> Option<Action> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::ConfirmDelete),
        _ => Some(Action::CancelDelete),
    }
}

fn cursor_action(code: KeyCode) -> Option<Action> {
    let (d_row, d_col) = match code {
        KeyCode::Up => (-1, 0),
        KeyCode::Down => (1, 0),
        KeyCode::Left => (0, -1),
        KeyCode::Right => (0, 1),
        _ => return None,
    };
    Some(Action::MoveCursor { d_row, d_col })
}

/// Footer help for the current mode.
pub fn help_text(editing: bool, prompt_open: bool) -> &'static str {
    if prompt_open {
        "Enter: submit | Esc: cancel"
    } else if editing {
        "Arrows: move | Space: place/erase | KQRBNP/kqrbnp: pick piece | x: eraser | Tab/Esc: stop editing"
    } else {
        "Arrows: move | Space: select | Tab/e: edit | a: analyze | r: reset | c: clear | f: FEN | s: save | i: image | [ ]: saved | o: load | d: delete | l: login | q: quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess::{PieceColor, PieceKind};

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn ctrl_c_always_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(key, false, false), Some(Action::Quit));
        assert_eq!(map_key(key, true, false), Some(Action::Quit));
        assert_eq!(map_key(key, false, true), Some(Action::Quit));
    }

    #[test]
    fn letters_pick_pieces_while_editing() {
        assert_eq!(
            map_key(press(KeyCode::Char('Q')), true, false),
            Some(Action::SelectPiece(Some(Piece::new(
                PieceColor::White,
                PieceKind::Queen
            ))))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('r')), true, false),
            Some(Action::SelectPiece(Some(Piece::new(
                PieceColor::Black,
                PieceKind::Rook
            ))))
        );
        assert_eq!(
            map_key(press(KeyCode::Char('x')), true, false),
            Some(Action::SelectPiece(None))
        );
        assert_eq!(map_key(press(KeyCode::Char('z')), true, false), None);
    }

    #[test]
    fn same_letters_are_commands_while_viewing() {
        assert_eq!(map_key(press(KeyCode::Char('q')), false, false), Some(Action::Quit));
        assert_eq!(map_key(press(KeyCode::Char('r')), false, false), Some(Action::Reset));
    }

    #[test]
    fn prompt_captures_text() {
        assert_eq!(
            map_key(press(KeyCode::Char('q')), false, true),
            Some(Action::PromptChar('q'))
        );
        assert_eq!(map_key(press(KeyCode::Enter), true, true), Some(Action::PromptSubmit));
        assert_eq!(map_key(press(KeyCode::Esc), false, true), Some(Action::PromptCancel));
    }

    #[test]
    fn arrows_move_cursor_in_both_modes() {
        for editing in [false, true] {
            assert_eq!(
                map_key(press(KeyCode::Up), editing, false),
                Some(Action::MoveCursor { d_row: -1, d_col: 0 })
            );
        }
    }

    #[test]
    fn delete_needs_y_to_confirm() {
        assert_eq!(map_confirm_key(press(KeyCode::Char('y'))), Some(Action::ConfirmDelete));
        assert_eq!(map_confirm_key(press(KeyCode::Char('d'))), Some(Action::CancelDelete));
        assert_eq!(map_confirm_key(press(KeyCode::Esc)), Some(Action::CancelDelete));
    }

    #[test]
    fn key_release_is_ignored() {
        let mut key = press(KeyCode::Char('q'));
        key.kind = KeyEventKind::Release;
        assert_eq!(map_key(key, false, false), None);
    }
}
